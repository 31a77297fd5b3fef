//! Static validation of raw SQL strings against a mapped relational schema.
//!
//! The crate answers one question without ever touching a database: does this
//! query reference only tables and columns that actually exist? A logical
//! schema description (models, fields, physical-name overrides) is compiled
//! into an immutable [`PhysicalSchema`], and each query string is parsed and
//! semantically resolved against it, producing an ordered list of
//! [`ValidationIssue`]s with "did you mean" suggestions.
//!
//! ```
//! use schemaguard_core::{build, validate, Dialect, FieldType, LogicalModel};
//!
//! let models = vec![LogicalModel::new("Job")
//!     .mapped_to("jobs")
//!     .field("id", "Int")
//!     .field_mapped("jobType", "String", "job_type")];
//! let schema = build(&models).unwrap();
//!
//! assert!(validate("SELECT job_type FROM jobs", &schema, Dialect::Postgres).is_empty());
//!
//! let issues = validate("SELECT jobType FROM jobs", &schema, Dialect::Postgres);
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].suggestion.as_deref(), Some("job_type"));
//! ```
//!
//! Everything is a pure function over its inputs: [`PhysicalSchema`] is
//! read-only after [`build`], no state is shared between queries, and
//! validating the same input twice yields identical issue sequences.

pub mod dialect;
pub mod error;
pub mod parser;
pub mod report;
pub mod schema;
pub mod suggest;
pub mod types;
pub mod validator;

pub use dialect::{resolve, Dialect};
pub use error::{DialectResolutionError, ParseError, SchemaBuildError, ValidationFailed};
pub use report::{validate_requests, RunSummary, ValidationReport};
pub use schema::build;
pub use suggest::suggest;
pub use validator::{validate, validate_request, validate_strict};

pub use types::{
    FieldType, IssueKind, LogicalField, LogicalModel, PhysicalSchema, PhysicalTable, QueryRequest,
    QueryResult, ValidationIssue,
};
