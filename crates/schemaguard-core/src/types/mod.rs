//! Data model: logical schema input, physical schema artifact, and the
//! reporting contract.

mod model;
mod physical;
mod result;

pub use model::{FieldType, LogicalField, LogicalModel};
pub use physical::{PhysicalSchema, PhysicalTable};
pub use result::{IssueKind, QueryRequest, QueryResult, ValidationIssue};
