//! dbt model metadata (`schema.yml`) as an in-memory document.

use serde::{Deserialize, Serialize};

/// Ordered list of model records plus the dbt schema version header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub version: u32,
    pub models: Vec<ModelRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub name: String,
    pub description: Option<String>,
    pub tests: Vec<String>,
    pub columns: Vec<ColumnRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    pub description: Option<String>,
    pub tests: Vec<String>,
}

impl ColumnRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_test(mut self, test: impl Into<String>) -> Self {
        self.tests.push(test.into());
        self
    }
}

/// Changes to apply to one model record.
///
/// `None` / empty fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelUpdate {
    pub name: String,
    pub description: Option<String>,
    pub columns: Vec<ColumnRecord>,
    pub tests: Vec<String>,
}

impl ModelUpdate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn columns(mut self, columns: Vec<ColumnRecord>) -> Self {
        self.columns = columns;
        self
    }

    pub fn tests(mut self, tests: Vec<String>) -> Self {
        self.tests = tests;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

impl MetadataDocument {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            models: Vec::new(),
        }
    }

    pub fn model(&self, name: &str) -> Option<&ModelRecord> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Insert a model record or update the existing one in place.
    ///
    /// Columns are replaced wholesale when supplied, never merged per column.
    pub fn upsert_model(&mut self, update: ModelUpdate) -> UpsertOutcome {
        match self.models.iter_mut().find(|m| m.name == update.name) {
            Some(record) => {
                if let Some(description) = update.description {
                    record.description = Some(description);
                }
                if !update.tests.is_empty() {
                    record.tests = update.tests;
                }
                if !update.columns.is_empty() {
                    record.columns = update.columns;
                }
                UpsertOutcome::Updated
            }
            None => {
                self.models.push(ModelRecord {
                    name: update.name,
                    description: update.description,
                    tests: update.tests,
                    columns: update.columns,
                });
                UpsertOutcome::Inserted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_appends_new_models_in_order() {
        let mut doc = MetadataDocument::new(2);
        doc.upsert_model(ModelUpdate::new("a").description("first"));
        let outcome = doc.upsert_model(ModelUpdate::new("b"));

        assert_eq!(outcome, UpsertOutcome::Inserted);
        let names: Vec<_> = doc.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(doc.model("a").unwrap().description.as_deref(), Some("first"));
    }

    #[test]
    fn description_only_update_keeps_columns() {
        let mut doc = MetadataDocument::new(2);
        doc.upsert_model(
            ModelUpdate::new("m").columns(vec![ColumnRecord::new("id").with_description("pk")]),
        );

        let outcome = doc.upsert_model(ModelUpdate::new("m").description("new text"));

        assert_eq!(outcome, UpsertOutcome::Updated);
        let m = doc.model("m").unwrap();
        assert_eq!(m.description.as_deref(), Some("new text"));
        assert_eq!(m.columns, vec![ColumnRecord::new("id").with_description("pk")]);
        assert_eq!(doc.models.len(), 1);
    }

    #[test]
    fn supplied_columns_replace_wholesale() {
        let mut doc = MetadataDocument::new(2);
        doc.upsert_model(ModelUpdate::new("m").columns(vec![
            ColumnRecord::new("id"),
            ColumnRecord::new("email"),
        ]));
        doc.upsert_model(ModelUpdate::new("m").columns(vec![ColumnRecord::new("user_id")]));

        let cols: Vec<_> = doc.model("m").unwrap().columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cols, ["user_id"]);
    }

    #[test]
    fn empty_tests_do_not_clear_existing() {
        let mut doc = MetadataDocument::new(2);
        doc.upsert_model(ModelUpdate::new("m").tests(vec!["unique".into()]));
        doc.upsert_model(ModelUpdate::new("m"));
        assert_eq!(doc.model("m").unwrap().tests, vec!["unique"]);
    }
}
