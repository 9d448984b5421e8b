//! Record Source Adapter
//!
//! A record source turns a table declaration into the ordered sequence of
//! records the loader inserts. The production source reads one CSV file per
//! table from a data directory.

pub mod csv_source;

pub use csv_source::CsvSource;

use crate::Result;
use crate::schema::TableSchema;

/// One source row projected onto a table's declared fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line in the source, 0 when the source has no lines
    pub line: u64,
    fields: Vec<(&'static str, String)>,
}

impl Record {
    pub fn new(line: u64) -> Self {
        Self {
            line,
            fields: Vec::new(),
        }
    }

    /// Builder-style field append
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.push((name, value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }
}

/// Supplies the records for a table.
///
/// Implementations must:
/// 1. Fail with `SourceNotFound` when the table has no backing data at all
/// 2. Fail with `SchemaMismatch` when a declared field is unavailable
/// 3. Return an empty vector for a source with a header but no rows
pub trait RecordSource {
    /// Short description used in logs (e.g. the data directory)
    fn describe(&self) -> String;

    /// Load every record for `table`, in source order
    fn load(&self, table: &TableSchema) -> Result<Vec<Record>>;
}
