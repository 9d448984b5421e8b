//! CSV directory source

use std::path::PathBuf;
use crate::{Error, Result};
use crate::schema::TableSchema;
use super::{Record, RecordSource};

/// Reads `<dir>/<table.source_file>` for each table.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, table: &TableSchema) -> PathBuf {
        self.dir.join(table.source_file)
    }
}

impl RecordSource for CsvSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn load(&self, table: &TableSchema) -> Result<Vec<Record>> {
        let path = self.path_for(table);
        if !path.is_file() {
            return Err(Error::SourceNotFound {
                entity: table.entity,
                path,
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(&path)?;
        let headers = reader.headers()?.clone();

        // Map each declared field to its header position; extra columns are ignored.
        let mut positions: Vec<(&'static str, usize)> = Vec::with_capacity(table.columns.len());
        let mut missing: Vec<String> = Vec::new();
        for column in table.columns {
            match headers.iter().position(|h| h == column.name) {
                Some(idx) => positions.push((column.name, idx)),
                None => missing.push(column.name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(Error::SchemaMismatch {
                entity: table.entity,
                missing,
            });
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let mut record = Record::new(line);
            for (name, idx) in &positions {
                record.push(*name, row.get(*idx).unwrap_or_default());
            }
            records.push(record);
        }

        tracing::debug!("Read {} records for {} from {}", records.len(), table.name(), path.display());
        Ok(records)
    }
}
