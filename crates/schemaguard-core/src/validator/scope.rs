//! Name-resolution scopes for the statement walk.
//!
//! Each SELECT pushes a relations scope holding the bindings its FROM clause
//! introduces; each WITH pushes a CTE scope. Lookups walk the stack from the
//! innermost scope outward, which gives subqueries access to outer relations
//! and nested queries access to enclosing CTEs.

/// Column inventory of one bound relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ColumnSet {
    /// The full column list is known; membership checks are authoritative.
    Known(Vec<String>),
    /// The relation exists but its columns cannot be enumerated (unknown
    /// table, VALUES body, wildcard projection). Membership checks pass so
    /// one unknown relation does not cascade into column noise.
    Opaque,
}

impl ColumnSet {
    pub(crate) fn contains(&self, column: &str) -> bool {
        match self {
            Self::Known(columns) => columns.iter().any(|c| c == column),
            Self::Opaque => true,
        }
    }
}

/// One relation visible under a key (its alias, or its bare name).
///
/// An empty key makes the binding reachable only through unqualified
/// resolution; derived tables without an alias are bound that way.
#[derive(Debug, Clone)]
pub(crate) struct Binding {
    pub key: String,
    pub columns: ColumnSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    /// FROM-clause relations of one SELECT (plus projection aliases, pushed
    /// as their own inner scope for the clauses that may use them).
    Relations,
    /// CTEs of one WITH clause.
    Ctes,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    bindings: Vec<Binding>,
}

/// Outcome of resolving an unqualified column name.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Exactly one visible relation owns the column, or an opaque relation
    /// could.
    Found,
    /// More than one relation in the same scope owns the column; carries the
    /// binding keys in FROM order.
    Ambiguous(Vec<String>),
    /// No visible relation owns the column and none was opaque.
    NotFound,
}

#[derive(Debug, Default)]
pub(crate) struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub(crate) fn push(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            bindings: Vec::new(),
        });
    }

    pub(crate) fn pop(&mut self) {
        self.scopes.pop();
    }

    /// Adds a binding to the innermost scope of the given kind.
    pub(crate) fn bind(&mut self, kind: ScopeKind, binding: Binding) {
        if let Some(scope) = self.scopes.iter_mut().rev().find(|s| s.kind == kind) {
            scope.bindings.push(binding);
        }
    }

    /// Finds the relation a qualifier refers to, innermost scope first.
    ///
    /// Matching is exact on the binding key; a multi-part qualifier also
    /// matches on its final segment so `schema.table.col` finds a relation
    /// bound as `table`.
    pub(crate) fn resolve_qualifier(&self, qualifier: &str) -> Option<&Binding> {
        let last_segment = qualifier.rsplit('.').next().unwrap_or(qualifier);
        self.scopes
            .iter()
            .rev()
            .filter(|s| s.kind == ScopeKind::Relations)
            .flat_map(|s| s.bindings.iter())
            .find(|b| !b.key.is_empty() && (b.key == qualifier || b.key == last_segment))
    }

    /// Resolves an unqualified column name.
    ///
    /// Each relations scope is examined innermost-out. Within a scope: one
    /// owner resolves, several owners is an ambiguity, and no owner falls
    /// through to the enclosing scope (outer references from subqueries).
    pub(crate) fn resolve_unqualified(&self, column: &str) -> Resolution {
        for scope in self.scopes.iter().rev() {
            if scope.kind != ScopeKind::Relations || scope.bindings.is_empty() {
                continue;
            }

            let owners: Vec<&Binding> = scope
                .bindings
                .iter()
                .filter(|b| matches!(&b.columns, ColumnSet::Known(cols) if cols.iter().any(|c| c == column)))
                .collect();

            match owners.len() {
                1 => return Resolution::Found,
                0 => {
                    if scope
                        .bindings
                        .iter()
                        .any(|b| matches!(b.columns, ColumnSet::Opaque))
                    {
                        return Resolution::Found;
                    }
                    // Fall through to the enclosing scope.
                }
                _ => {
                    return Resolution::Ambiguous(
                        owners.iter().map(|b| b.key.clone()).collect(),
                    );
                }
            }
        }
        Resolution::NotFound
    }

    /// Looks up a CTE by name, innermost WITH clause first. Later siblings
    /// shadow earlier ones, so iteration within a scope runs back to front.
    pub(crate) fn lookup_cte(&self, name: &str) -> Option<&Binding> {
        self.scopes
            .iter()
            .rev()
            .filter(|s| s.kind == ScopeKind::Ctes)
            .flat_map(|s| s.bindings.iter().rev())
            .find(|b| b.key == name)
    }

    /// All CTE names currently visible, for unknown-table suggestions.
    pub(crate) fn cte_names(&self) -> impl Iterator<Item = &str> {
        self.scopes
            .iter()
            .filter(|s| s.kind == ScopeKind::Ctes)
            .flat_map(|s| s.bindings.iter())
            .map(|b| b.key.as_str())
    }

    /// All binding keys of visible relations, for qualifier suggestions.
    pub(crate) fn relation_keys(&self) -> impl Iterator<Item = &str> {
        self.scopes
            .iter()
            .filter(|s| s.kind == ScopeKind::Relations)
            .flat_map(|s| s.bindings.iter())
            .map(|b| b.key.as_str())
            .filter(|k| !k.is_empty())
    }

    /// Every known column visible from the current position, for
    /// unqualified-column suggestions.
    pub(crate) fn visible_columns(&self) -> Vec<&str> {
        self.scopes
            .iter()
            .filter(|s| s.kind == ScopeKind::Relations)
            .flat_map(|s| s.bindings.iter())
            .filter_map(|b| match &b.columns {
                ColumnSet::Known(cols) => Some(cols.iter().map(String::as_str)),
                ColumnSet::Opaque => None,
            })
            .flatten()
            .collect()
    }
}
