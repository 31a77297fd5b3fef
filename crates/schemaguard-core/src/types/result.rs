//! Reporting contract: issues produced by validation and the request/result
//! pair used for batch runs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a [`ValidationIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The query string could not be parsed at all.
    SyntaxError,
    /// A referenced table has no entry in the physical schema.
    UnknownTable,
    /// A referenced column exists in no visible relation.
    UnknownColumn,
    /// An unqualified column name matches more than one visible relation.
    AmbiguousColumn,
}

/// One finding about one query, ordered by position in the statement walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub kind: IssueKind,

    /// The offending identifier as written in the query, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    /// Narrows the finding, e.g. the table a column was looked up in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Closest known name, when one is close enough to be worth offering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Human-readable description, stable enough to assert on.
    pub message: String,
}

impl ValidationIssue {
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::SyntaxError,
            identifier: None,
            context: None,
            suggestion: None,
            message: message.into(),
        }
    }

    pub fn unknown_table(name: &str, suggestion: Option<String>) -> Self {
        Self {
            kind: IssueKind::UnknownTable,
            identifier: Some(name.to_string()),
            context: None,
            suggestion,
            message: format!("Table \"{name}\" not found in schema"),
        }
    }

    pub fn unknown_column_in(table: &str, column: &str, suggestion: Option<String>) -> Self {
        Self {
            kind: IssueKind::UnknownColumn,
            identifier: Some(column.to_string()),
            context: Some(table.to_string()),
            suggestion,
            message: format!("Column \"{column}\" not found in table \"{table}\""),
        }
    }

    pub fn unknown_column(column: &str, suggestion: Option<String>) -> Self {
        Self {
            kind: IssueKind::UnknownColumn,
            identifier: Some(column.to_string()),
            context: None,
            suggestion,
            message: format!("Column \"{column}\" not found in any table in scope"),
        }
    }

    pub fn ambiguous_column(column: &str, candidates: &[String]) -> Self {
        Self {
            kind: IssueKind::AmbiguousColumn,
            identifier: Some(column.to_string()),
            context: Some(candidates.join(", ")),
            suggestion: None,
            message: format!(
                "Column \"{column}\" is ambiguous; it exists in: {}",
                candidates.join(", ")
            ),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, ". Did you mean \"{suggestion}\"?")?;
        }
        Ok(())
    }
}

/// One query to validate, with an optional per-query dialect override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Caller-chosen identifier echoed back in the result.
    pub name: String,

    pub sql: String,

    /// Overrides the run-level dialect for this query only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
}

impl QueryRequest {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
            dialect: None,
        }
    }

    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = Some(dialect.into());
        self
    }
}

/// Outcome of validating one [`QueryRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Echo of [`QueryRequest::name`].
    pub name: String,

    /// Issues in statement-walk order; empty means the query passed.
    pub issues: Vec<ValidationIssue>,
}

impl QueryResult {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_suggestion() {
        let issue = ValidationIssue::unknown_column_in("jobs", "jobType", Some("job_type".into()));
        assert_eq!(
            issue.to_string(),
            "Column \"jobType\" not found in table \"jobs\". Did you mean \"job_type\"?"
        );

        let bare = ValidationIssue::unknown_table("Job", None);
        assert_eq!(bare.to_string(), "Table \"Job\" not found in schema");
    }

    #[test]
    fn issue_serializes_without_empty_fields() {
        let issue = ValidationIssue::syntax_error("sql parser error: expected identifier");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "syntax_error");
        assert!(json.get("identifier").is_none());
        assert!(json.get("suggestion").is_none());
    }

    #[test]
    fn ambiguous_column_lists_candidates() {
        let issue = ValidationIssue::ambiguous_column("id", &["a".into(), "b".into()]);
        assert_eq!(issue.context.as_deref(), Some("a, b"));
        assert!(issue.message.contains("exists in: a, b"));
    }
}
