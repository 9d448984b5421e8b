//! Query & Reporting Engine
//!
//! Runs each catalog query in its own read snapshot, renders the rows as an
//! aligned table and exports them to one CSV file per query. Empty results
//! are reported and never exported.

pub mod catalog;
pub mod engine;
pub mod export;
pub mod render;

pub use catalog::{CATALOG, CatalogQuery};
pub use engine::{CatalogRun, QueryOutcome, QueryStatus, ReportEngine};

use rusqlite::types::Value;

/// Column names plus the unrendered rows of one query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` in row `row`, if both exist
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| (column.clone(), value_to_json(value)))
                    .collect();
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::json!(i),
        Value::Real(f) => serde_json::json!(f),
        Value::Text(s) => serde_json::json!(s),
        Value::Blob(b) => serde_json::json!(b.len()),
    }
}
