//! The derived physical schema the validator resolves against.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only mapping of physical table name to column definitions.
///
/// Built once per schema version by [`crate::schema::build`] and passed
/// explicitly into every validation call, so concurrent validation over one
/// schema is safe by construction.
///
/// Name matching is case-sensitive and exact; lowercase folding happens only
/// inside suggestion ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PhysicalSchema {
    tables: BTreeMap<String, PhysicalTable>,
}

/// Columns of one physical table, each with its normalized SQL type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PhysicalTable {
    columns: BTreeMap<String, String>,
}

impl PhysicalSchema {
    pub fn table(&self, name: &str) -> Option<&PhysicalTable> {
        self.tables.get(name)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Table names in lexicographic order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Inserts a table. Duplicate detection is the builder's job, which
    /// knows the logical model names the collision came from.
    pub(crate) fn insert_table(&mut self, name: String, table: PhysicalTable) {
        self.tables.insert(name, table);
    }
}

impl PhysicalTable {
    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_type(&self, name: &str) -> Option<&str> {
        self.columns.get(name).map(String::as_str)
    }

    /// Column names in lexicographic order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn insert_column(&mut self, name: String, sql_type: String) {
        self.columns.insert(name, sql_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_case_sensitive() {
        let mut table = PhysicalTable::default();
        table.insert_column("job_type".to_string(), "text".to_string());

        let mut schema = PhysicalSchema::default();
        schema.insert_table("jobs".to_string(), table);

        assert!(schema.contains_table("jobs"));
        assert!(!schema.contains_table("Jobs"));
        let jobs = schema.table("jobs").unwrap();
        assert!(jobs.contains_column("job_type"));
        assert!(!jobs.contains_column("jobType"));
        assert_eq!(jobs.column_type("job_type"), Some("text"));
    }

    #[test]
    fn names_iterate_in_lexicographic_order() {
        let mut schema = PhysicalSchema::default();
        schema.insert_table("runs".to_string(), PhysicalTable::default());
        schema.insert_table("jobs".to_string(), PhysicalTable::default());

        let names: Vec<_> = schema.table_names().collect();
        assert_eq!(names, ["jobs", "runs"]);
    }
}
