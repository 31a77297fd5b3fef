//! Logical schema description: entities and fields as the schema language
//! declares them, independent of physical storage names.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named entity from the source schema.
///
/// The logical name is unique within the schema. When `db_name` is set the
/// entity is stored under that table name instead of its logical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogicalModel {
    /// Logical name, unique within the schema.
    pub name: String,

    /// Table-level rename, when the physical table name differs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,

    /// Ordered field list.
    #[serde(default)]
    pub fields: Vec<LogicalField>,
}

/// A field belonging to exactly one [`LogicalModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogicalField {
    /// Logical name, unique within the owning model.
    pub name: String,

    /// Column-level rename, when the physical column name differs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,

    /// Declared type. Relation fields do not map to a column.
    pub field_type: FieldType,
}

/// Declared type of a [`LogicalField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    /// A scalar type as spelled in the schema language, e.g. `"Int"`.
    Scalar(String),
    /// Marker for a relation to another model; excluded from the physical
    /// schema because it has no column of its own.
    Relation,
}

impl LogicalModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_name: None,
            fields: Vec::new(),
        }
    }

    /// Sets the table-level rename.
    pub fn mapped_to(mut self, table: impl Into<String>) -> Self {
        self.db_name = Some(table.into());
        self
    }

    /// Appends a scalar field stored under its logical name.
    pub fn field(mut self, name: impl Into<String>, scalar_type: impl Into<String>) -> Self {
        self.fields.push(LogicalField {
            name: name.into(),
            db_name: None,
            field_type: FieldType::Scalar(scalar_type.into()),
        });
        self
    }

    /// Appends a scalar field with a column-level rename.
    pub fn field_mapped(
        mut self,
        name: impl Into<String>,
        scalar_type: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        self.fields.push(LogicalField {
            name: name.into(),
            db_name: Some(column.into()),
            field_type: FieldType::Scalar(scalar_type.into()),
        });
        self
    }

    /// Appends a relation field (no physical column).
    pub fn relation(mut self, name: impl Into<String>) -> Self {
        self.fields.push(LogicalField {
            name: name.into(),
            db_name: None,
            field_type: FieldType::Relation,
        });
        self
    }

    /// Physical table name: the rename when present, else the logical name
    /// verbatim.
    pub fn physical_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(&self.name)
    }
}

impl LogicalField {
    /// Physical column name: the rename when present, else the logical name.
    pub fn physical_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_name_prefers_rename() {
        let model = LogicalModel::new("Job").mapped_to("jobs");
        assert_eq!(model.physical_name(), "jobs");

        let plain = LogicalModel::new("User");
        assert_eq!(plain.physical_name(), "User");
    }

    #[test]
    fn model_deserializes_from_meta_model_json() {
        let json = r#"{
            "name": "Job",
            "dbName": "jobs",
            "fields": [
                { "name": "id", "fieldType": { "scalar": "Int" } },
                { "name": "jobType", "dbName": "job_type", "fieldType": { "scalar": "String" } },
                { "name": "owner", "fieldType": "relation" }
            ]
        }"#;

        let model: LogicalModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.fields.len(), 3);
        assert_eq!(model.fields[1].physical_name(), "job_type");
        assert_eq!(model.fields[2].field_type, FieldType::Relation);
    }
}
