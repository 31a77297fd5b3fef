use schemaguard_core::{build, validate, Dialect, LogicalModel, PhysicalSchema, ValidationIssue};

/// Schema used by most validation tests:
///
/// - `Job` is renamed to table `jobs`, field `jobType` to column `job_type`
/// - `Run` keeps its logical names (`Run` table, `startedAt` column)
/// - `a` and `b` both carry an `id` column for ambiguity cases
pub fn fixture_schema() -> PhysicalSchema {
    build(&[
        LogicalModel::new("Job")
            .mapped_to("jobs")
            .field("id", "Int")
            .field_mapped("jobType", "String", "job_type")
            .field("status", "String")
            .relation("runs"),
        LogicalModel::new("Run")
            .field("id", "Int")
            .field_mapped("jobId", "Int", "job_id")
            .field("startedAt", "DateTime"),
        LogicalModel::new("A")
            .mapped_to("a")
            .field("id", "Int")
            .field("left_only", "Int"),
        LogicalModel::new("B")
            .mapped_to("b")
            .field("id", "Int")
            .field("right_only", "Int"),
    ])
    .unwrap()
}

pub fn check(sql: &str) -> Vec<ValidationIssue> {
    validate(sql, &fixture_schema(), Dialect::Postgres)
}
