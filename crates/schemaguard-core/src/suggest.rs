//! "Did you mean" suggestions for misspelled identifiers.
//!
//! Pure functions over the candidate pool; suggestion ranking is the only
//! place in the crate where names are compared case-insensitively.

/// Maximum edit distance at which a candidate is still offered.
const MAX_DISTANCE: usize = 2;

/// Picks the closest candidate to `target`, or `None` when nothing is close
/// enough to be worth offering.
///
/// Candidates are compared on lowercased forms. Ties are broken by sorting
/// the pool first, so the result is deterministic regardless of input order.
/// A singular/plural stem match is offered even beyond the edit-distance
/// threshold, catching `job` vs `jobs` style misses on long names.
pub fn suggest<'a, I>(target: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let target_lower = target.to_lowercase();

    let mut pool: Vec<&str> = candidates.into_iter().collect();
    pool.sort_unstable();
    pool.dedup();

    let mut best: Option<(&str, usize)> = None;
    for candidate in &pool {
        let candidate_lower = candidate.to_lowercase();
        if candidate_lower == target_lower {
            // Exact lowercase match is a casing mistake; nothing beats it.
            return Some((*candidate).to_string());
        }

        let distance = if stems_match(&target_lower, &candidate_lower) {
            1
        } else {
            levenshtein(&target_lower, &candidate_lower)
        };

        if distance <= MAX_DISTANCE {
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((candidate, distance)),
            }
        }
    }

    best.map(|(name, _)| name.to_string())
}

/// True when the names differ only by an English plural suffix.
fn stems_match(a: &str, b: &str) -> bool {
    fn stem(name: &str) -> &str {
        if let Some(root) = name.strip_suffix("ies") {
            return root;
        }
        name.strip_suffix('s').unwrap_or(name)
    }

    fn singular(name: &str) -> &str {
        name.strip_suffix('y').unwrap_or(name)
    }

    a != b && singular(stem(a)) == singular(stem(b))
}

/// Classic two-row Wagner-Fischer edit distance.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", 0)]
    #[case("abc", "", 3)]
    #[case("kitten", "sitting", 3)]
    #[case("job_type", "job_tpye", 2)]
    #[case("same", "same", 0)]
    fn levenshtein_distances(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein(a, b), expected);
        assert_eq!(levenshtein(b, a), expected);
    }

    #[test]
    fn close_candidate_is_suggested() {
        let pool = ["job_type", "status", "created_at"];
        assert_eq!(suggest("job_tpye", pool), Some("job_type".to_string()));
    }

    #[test]
    fn casing_mistake_wins_outright() {
        let pool = ["job_type", "jobtypes"];
        assert_eq!(suggest("JOB_TYPE", pool), Some("job_type".to_string()));
    }

    #[test]
    fn far_candidates_yield_nothing() {
        let pool = ["status", "created_at"];
        assert_eq!(suggest("workspace_id", pool), None);
    }

    #[test]
    fn plural_stem_beats_distance_threshold() {
        let pool = ["organization_memberships"];
        assert_eq!(
            suggest("organization_membership", pool),
            Some("organization_memberships".to_string())
        );
        // "categories" vs "category" is edit distance 3, stem match still fires.
        assert_eq!(
            suggest("category", ["categories"]),
            Some("categories".to_string())
        );
    }

    #[test]
    fn ties_resolve_to_first_in_sorted_order() {
        assert_eq!(suggest("idz", ["idy", "idx"]), Some("idx".to_string()));
        assert_eq!(suggest("idz", ["idx", "idy"]), Some("idx".to_string()));
    }
}
