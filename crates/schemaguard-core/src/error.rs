//! Error types.
//!
//! # Error Handling Strategy
//!
//! Two complementary patterns are used:
//!
//! - Hard errors ([`SchemaBuildError`], [`DialectResolutionError`],
//!   [`ParseError`]) are returned as `Result` and mean the operation could
//!   not produce a usable artifact at all.
//!
//! - [`crate::types::ValidationIssue`] values are non-fatal findings about a
//!   query. They are accumulated in a vector so that one bad reference never
//!   hides the rest; an empty vector means the query passed.
//!
//! [`ValidationFailed`] bridges the two for callers who want issues raised
//! as an error instead of inspected as data.

use crate::types::ValidationIssue;
use crate::Dialect;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
#[cfg(feature = "tracing")]
use tracing::trace;

/// The logical schema could not be compiled into a physical schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaBuildError {
    /// Two models resolve to the same physical table name.
    #[error("duplicate table \"{table}\": models \"{first_model}\" and \"{second_model}\" both map to it")]
    DuplicateTable {
        table: String,
        first_model: String,
        second_model: String,
    },

    /// Two fields of one model resolve to the same physical column name.
    #[error("duplicate column \"{column}\" in table \"{table}\": fields \"{first_field}\" and \"{second_field}\" both map to it")]
    DuplicateColumn {
        table: String,
        column: String,
        first_field: String,
        second_field: String,
    },
}

/// No dialect could be chosen for a validation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialectResolutionError {
    /// The datasource provider has no known dialect mapping.
    #[error("unknown datasource provider \"{name}\"")]
    UnknownProvider { name: String },

    /// An explicit dialect override named an unsupported dialect.
    #[error("unsupported SQL dialect \"{name}\"")]
    UnknownDialect { name: String },
}

/// The strict entry point found issues.
///
/// Carries the full issue list so callers catching the error lose nothing
/// over callers inspecting the returned vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailed {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query validation failed with {} issue(s):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  - {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailed {}

/// Error encountered during SQL parsing.
///
/// Preserves structured information from the underlying parser, including
/// position information when available.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Position where the error occurred, if available.
    pub position: Option<Position>,
    /// The SQL dialect being parsed when the error occurred.
    pub dialect: Option<Dialect>,
}

/// Position information for a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            dialect: None,
        }
    }

    /// Adds dialect context to the error.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Parses position from the sqlparser error message format,
    /// "... at Line: X, Column: Y".
    ///
    /// # Implementation Note
    ///
    /// Coupled to the `sqlparser` crate's error message format. Gracefully
    /// returns `None` when the expected format is not found.
    fn parse_position_from_message(message: &str) -> Option<Position> {
        static POSITION_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = POSITION_REGEX.get_or_init(|| {
            // Handles variations like "Line: 1, Column: 5" or "Line:1,Column:5"
            Regex::new(r"Line:\s*(\d+)\s*,\s*Column:\s*(\d+)").expect("Invalid regex pattern")
        });

        let result = re.captures(message).and_then(|caps| {
            let line: usize = caps.get(1)?.as_str().parse().ok()?;
            let column: usize = caps.get(2)?.as_str().parse().ok()?;
            Some(Position { line, column })
        });

        #[cfg(feature = "tracing")]
        if result.is_none() && (message.contains("Line") || message.contains("Column")) {
            trace!(
                "Failed to parse position from error message that appears to contain position info: {}",
                message
            );
        }

        result
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error")?;

        if let Some(dialect) = self.dialect {
            write!(f, " ({dialect})")?;
        }

        if let Some(pos) = self.position {
            write!(f, " at line {}, column {}", pos.line, pos.column)?;
        }

        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<sqlparser::parser::ParserError> for ParseError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        let message = err.to_string();
        let position = Self::parse_position_from_message(&message);

        Self {
            message,
            position,
            dialect: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_position_from_message() {
        let msg = "Expected SELECT, found 'INSERT' at Line: 1, Column: 5";
        let pos = ParseError::parse_position_from_message(msg);
        assert_eq!(pos, Some(Position { line: 1, column: 5 }));
    }

    #[test]
    fn parse_position_no_position() {
        let msg = "Unexpected token";
        assert_eq!(ParseError::parse_position_from_message(msg), None);
    }

    #[test]
    fn parse_position_no_whitespace() {
        let msg = "Error at Line:1,Column:5";
        let pos = ParseError::parse_position_from_message(msg);
        assert_eq!(pos, Some(Position { line: 1, column: 5 }));
    }

    #[test]
    fn parse_position_malformed_values() {
        assert_eq!(
            ParseError::parse_position_from_message("Error at Line: abc, Column: 5"),
            None
        );
        assert_eq!(
            ParseError::parse_position_from_message("Error at Line: 5"),
            None
        );
    }

    #[test]
    fn display_with_dialect_and_position() {
        let mut err = ParseError::new("Bad syntax").with_dialect(Dialect::Snowflake);
        err.position = Some(Position { line: 1, column: 5 });
        assert_eq!(
            err.to_string(),
            "Parse error (snowflake) at line 1, column 5: Bad syntax"
        );
    }

    #[test]
    fn schema_build_error_display() {
        let err = SchemaBuildError::DuplicateTable {
            table: "jobs".into(),
            first_model: "Job".into(),
            second_model: "LegacyJob".into(),
        };
        assert!(err.to_string().contains("duplicate table \"jobs\""));
    }

    #[test]
    fn validation_failed_lists_every_issue() {
        let failed = ValidationFailed {
            issues: vec![
                ValidationIssue::unknown_table("Job", Some("jobs".into())),
                ValidationIssue::unknown_column("job_tpye", Some("job_type".into())),
            ],
        };
        let text = failed.to_string();
        assert!(text.contains("2 issue(s)"));
        assert!(text.contains("Did you mean \"jobs\"?"));
        assert!(text.contains("Did you mean \"job_type\"?"));
    }
}
