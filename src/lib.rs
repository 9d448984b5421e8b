//! # shopdb - relational ingestion and sales reporting
//!
//! Loads five flat e-commerce record sets into SQLite under foreign-key
//! constraints and runs a fixed catalog of analytical reports over them.
//!
//! shopdb provides:
//! - A schema registry with an explicit dependency graph between tables
//! - A CSV record source that projects each file onto its declared fields
//! - A loader that rebuilds the store and inserts one transaction per entity
//! - A report engine that renders and exports each catalog query

pub mod schema;
pub mod source;
pub mod storage;
pub mod ingest;
pub mod report;
pub mod config;
pub mod output;
pub mod ui;

use std::path::PathBuf;

// Re-exports for convenient access
pub use schema::{Entity, SchemaRegistry, TableSchema};
pub use source::{CsvSource, Record, RecordSource};
pub use storage::SqliteStore;
pub use ingest::{LoadAborted, LoadReport, Loader, TotalsPolicy};
pub use report::{CatalogQuery, QueryOutcome, ReportEngine, ResultSet};

/// Result type alias for shopdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for shopdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Source for {entity} not found: {}", .path.display())]
    SourceNotFound { entity: Entity, path: PathBuf },

    #[error("Source for {entity} is missing declared fields: {}", .missing.join(", "))]
    SchemaMismatch { entity: Entity, missing: Vec<String> },

    #[error("Constraint violation in {entity} at line {line}: {message}")]
    ConstraintViolation {
        entity: Entity,
        line: u64,
        message: String,
    },

    #[error("Cannot convert {field}={value:?} in {entity} at line {line}: {reason}")]
    Coercion {
        entity: Entity,
        line: u64,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Query '{query}' failed: {source}")]
    QueryExecution {
        query: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Export to {} failed: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid schema: {0}")]
    Schema(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Errors that are contained at a unit-of-work boundary (one entity
    /// batch or one catalog query). Everything else aborts the run.
    pub fn is_unit_failure(&self) -> bool {
        matches!(
            self,
            Error::SourceNotFound { .. }
                | Error::SchemaMismatch { .. }
                | Error::ConstraintViolation { .. }
                | Error::Coercion { .. }
                | Error::QueryExecution { .. }
                | Error::Export { .. }
                | Error::Csv(_)
        )
    }

    /// Short machine-readable label for reports and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Error::SourceNotFound { .. } => "source_not_found",
            Error::SchemaMismatch { .. } => "schema_mismatch",
            Error::ConstraintViolation { .. } => "constraint_violation",
            Error::Coercion { .. } => "coercion",
            Error::QueryExecution { .. } => "query_execution",
            Error::Export { .. } => "export",
            Error::Schema(_) => "schema",
            Error::Storage(_) => "storage",
            Error::Io(_) => "io",
            Error::Csv(_) => "csv",
            Error::Config(_) => "config",
        }
    }
}
