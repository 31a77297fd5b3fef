//! Batch validation: run many queries against one schema and summarize.

use crate::types::{IssueKind, PhysicalSchema, QueryRequest, QueryResult};
use crate::validator::validate_request;
use crate::{Dialect, DialectResolutionError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
#[cfg(feature = "tracing")]
use tracing::info;

/// Results of one batch run, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub results: Vec<QueryResult>,
    pub summary: RunSummary,
}

/// Issue counts aggregated over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub syntax_errors: usize,
    pub unknown_tables: usize,
    pub unknown_columns: usize,
    pub ambiguous_columns: usize,
}

impl RunSummary {
    fn absorb(&mut self, result: &QueryResult) {
        self.total += 1;
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        for issue in &result.issues {
            match issue.kind {
                IssueKind::SyntaxError => self.syntax_errors += 1,
                IssueKind::UnknownTable => self.unknown_tables += 1,
                IssueKind::UnknownColumn => self.unknown_columns += 1,
                IssueKind::AmbiguousColumn => self.ambiguous_columns += 1,
            }
        }
    }
}

/// Validates every request against the schema.
///
/// Requests are independent of each other; the shared schema is only read.
/// Fails up front when a request carries an unparseable dialect override,
/// since that is a configuration mistake rather than a query finding.
pub fn validate_requests(
    requests: &[QueryRequest],
    schema: &PhysicalSchema,
    default_dialect: Dialect,
) -> Result<ValidationReport, DialectResolutionError> {
    let mut results = Vec::with_capacity(requests.len());
    let mut summary = RunSummary::default();

    for request in requests {
        let result = validate_request(request, schema, default_dialect)?;
        summary.absorb(&result);
        results.push(result);
    }

    #[cfg(feature = "tracing")]
    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        "validation run complete"
    );

    Ok(ValidationReport { results, summary })
}
