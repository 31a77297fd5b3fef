mod common;

use common::fixture_schema;
use schemaguard_core::{build, Dialect, LogicalModel, SchemaBuildError};

#[test]
fn schema_from_serialized_models_round_trips_into_validation() {
    // Models arrive as JSON when the schema is produced by an external
    // generator; the same build path must apply.
    let json = r#"[
        {
            "name": "Job",
            "dbName": "jobs",
            "fields": [
                { "name": "id", "fieldType": { "scalar": "Int" } },
                { "name": "jobType", "dbName": "job_type", "fieldType": { "scalar": "String" } },
                { "name": "runs", "fieldType": "relation" }
            ]
        }
    ]"#;
    let models: Vec<LogicalModel> = serde_json::from_str(json).unwrap();
    let schema = build(&models).unwrap();

    let issues = schemaguard_core::validate("SELECT job_type FROM jobs", &schema, Dialect::Postgres);
    assert_eq!(issues, vec![]);
}

#[test]
fn fixture_schema_has_expected_shape() {
    let schema = fixture_schema();
    assert_eq!(schema.len(), 4);

    let jobs = schema.table("jobs").unwrap();
    assert_eq!(jobs.column_type("job_type"), Some("text"));
    assert_eq!(jobs.column_type("id"), Some("integer"));
    // The relation field contributed no column.
    assert_eq!(jobs.len(), 3);

    let run = schema.table("Run").unwrap();
    assert_eq!(run.column_type("startedAt"), Some("timestamp"));
}

#[test]
fn colliding_renames_fail_the_build() {
    let models = vec![
        LogicalModel::new("Job").mapped_to("jobs").field("id", "Int"),
        LogicalModel::new("ArchivedJob").mapped_to("jobs").field("id", "Int"),
    ];
    assert!(matches!(
        build(&models),
        Err(SchemaBuildError::DuplicateTable { .. })
    ));
}
