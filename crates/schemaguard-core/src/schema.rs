//! Compiles the logical schema into the physical schema the validator
//! resolves against.

use crate::error::SchemaBuildError;
use crate::types::{FieldType, LogicalModel, PhysicalSchema, PhysicalTable};
use std::collections::BTreeMap;

/// Builds the physical schema from a set of logical models.
///
/// Table and column renames are applied, relation fields are dropped (they
/// carry no column of their own), and scalar types are normalized to their
/// SQL spellings. Fails when two models or two fields collide on the same
/// physical name, since a schema with silent shadowing would make every
/// later validation result suspect.
pub fn build(models: &[LogicalModel]) -> Result<PhysicalSchema, SchemaBuildError> {
    let mut schema = PhysicalSchema::default();
    let mut table_owners: BTreeMap<String, String> = BTreeMap::new();

    for model in models {
        let table_name = model.physical_name().to_string();
        if let Some(first_model) = table_owners.get(&table_name) {
            return Err(SchemaBuildError::DuplicateTable {
                table: table_name,
                first_model: first_model.clone(),
                second_model: model.name.clone(),
            });
        }

        let mut table = PhysicalTable::default();
        let mut column_owners: BTreeMap<String, String> = BTreeMap::new();

        for field in &model.fields {
            let scalar = match &field.field_type {
                FieldType::Scalar(name) => name,
                FieldType::Relation => continue,
            };

            let column_name = field.physical_name().to_string();
            if let Some(first_field) = column_owners.get(&column_name) {
                return Err(SchemaBuildError::DuplicateColumn {
                    table: table_name,
                    column: column_name,
                    first_field: first_field.clone(),
                    second_field: field.name.clone(),
                });
            }

            column_owners.insert(column_name.clone(), field.name.clone());
            table.insert_column(column_name, normalize_type(scalar));
        }

        table_owners.insert(table_name.clone(), model.name.clone());
        schema.insert_table(table_name, table);
    }

    Ok(schema)
}

/// Maps a schema-language scalar type to its SQL spelling.
///
/// Unrecognized types pass through lowercased rather than failing the build;
/// validation only needs column existence, not exact types.
fn normalize_type(scalar: &str) -> String {
    match scalar {
        "String" => "text".to_string(),
        "Int" => "integer".to_string(),
        "BigInt" => "bigint".to_string(),
        "Float" => "double precision".to_string(),
        "Decimal" => "decimal".to_string(),
        "Boolean" => "boolean".to_string(),
        "DateTime" => "timestamp".to_string(),
        "Json" => "jsonb".to_string(),
        "Bytes" => "bytea".to_string(),
        other => other.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogicalModel;
    use rstest::rstest;

    fn job_model() -> LogicalModel {
        LogicalModel::new("Job")
            .mapped_to("jobs")
            .field("id", "Int")
            .field_mapped("jobType", "String", "job_type")
            .relation("owner")
    }

    #[test]
    fn renames_apply_and_relations_are_dropped() {
        let schema = build(&[job_model()]).unwrap();

        assert!(schema.contains_table("jobs"));
        assert!(!schema.contains_table("Job"));

        let jobs = schema.table("jobs").unwrap();
        assert!(jobs.contains_column("job_type"));
        assert!(!jobs.contains_column("jobType"));
        assert!(!jobs.contains_column("owner"));
        assert_eq!(jobs.len(), 2);
    }

    #[test]
    fn unmapped_names_are_kept_verbatim() {
        let schema = build(&[LogicalModel::new("User").field("id", "Int")]).unwrap();
        assert!(schema.contains_table("User"));
        assert!(!schema.contains_table("user"));
    }

    #[rstest]
    #[case("String", "text")]
    #[case("Int", "integer")]
    #[case("BigInt", "bigint")]
    #[case("Float", "double precision")]
    #[case("Decimal", "decimal")]
    #[case("Boolean", "boolean")]
    #[case("DateTime", "timestamp")]
    #[case("Json", "jsonb")]
    #[case("Bytes", "bytea")]
    #[case("Uuid", "uuid")]
    #[case("GeoPoint", "geopoint")]
    fn scalar_types_normalize(#[case] scalar: &str, #[case] expected: &str) {
        let schema = build(&[LogicalModel::new("t").field("c", scalar)]).unwrap();
        assert_eq!(schema.table("t").unwrap().column_type("c"), Some(expected));
    }

    #[test]
    fn duplicate_physical_table_fails() {
        let models = vec![
            LogicalModel::new("Job").mapped_to("jobs"),
            LogicalModel::new("LegacyJob").mapped_to("jobs"),
        ];
        let err = build(&models).unwrap_err();
        assert_eq!(
            err,
            SchemaBuildError::DuplicateTable {
                table: "jobs".into(),
                first_model: "Job".into(),
                second_model: "LegacyJob".into(),
            }
        );
    }

    #[test]
    fn duplicate_physical_column_fails() {
        let model = LogicalModel::new("Job")
            .field("jobType", "String")
            .field_mapped("kind", "String", "jobType");
        let err = build(&[model]).unwrap_err();
        assert!(matches!(err, SchemaBuildError::DuplicateColumn { ref column, .. } if column == "jobType"));
    }

    #[test]
    fn empty_input_builds_empty_schema() {
        let schema = build(&[]).unwrap();
        assert!(schema.is_empty());
    }
}
