//! Report engine implementation
//!
//! Provides the report-stage operations:
//! - Executing a catalog query against a read snapshot
//! - Rendering non-empty results for the operator
//! - Exporting each non-empty result to its CSV file

use std::path::PathBuf;
use crate::{Error, Result};
use crate::storage::SqliteStore;
use super::catalog::CatalogQuery;
use super::export::export_csv;
use super::render::render_table;
use super::ResultSet;

/// How one catalog query ended
#[derive(Debug)]
pub enum QueryStatus {
    /// Rows were returned and rendered; export may still have failed
    Rendered {
        result: ResultSet,
        table: String,
        export: Result<PathBuf>,
    },
    /// Zero rows; nothing exported
    Empty,
    /// The query itself failed
    Failed(Error),
}

/// Outcome of one unit of work in the report stage
#[derive(Debug)]
pub struct QueryOutcome {
    pub query: &'static CatalogQuery,
    pub status: QueryStatus,
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self.status, QueryStatus::Failed(_))
    }

    /// Rows returned, 0 for empty or failed queries
    pub fn row_count(&self) -> usize {
        match &self.status {
            QueryStatus::Rendered { result, .. } => result.len(),
            _ => 0,
        }
    }
}

/// All outcomes of a catalog run, in catalog order
#[derive(Debug, Default)]
pub struct CatalogRun {
    pub outcomes: Vec<QueryOutcome>,
}

impl CatalogRun {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Report engine over a populated store
pub struct ReportEngine<'a> {
    store: &'a SqliteStore,
    output_dir: PathBuf,
}

impl<'a> ReportEngine<'a> {
    /// Create a new report engine exporting into `output_dir`
    pub fn new(store: &'a SqliteStore, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            output_dir: output_dir.into(),
        }
    }

    /// Execute a query and collect its full result set
    pub fn execute(&self, query: &CatalogQuery) -> Result<ResultSet> {
        let (columns, rows) = self
            .store
            .query_rows(query.sql)
            .map_err(|source| Error::QueryExecution {
                query: query.name.to_string(),
                source,
            })?;
        Ok(ResultSet { columns, rows })
    }

    /// Execute, render and export a single query; never fails the caller
    pub fn run_query(&self, query: &'static CatalogQuery) -> QueryOutcome {
        let status = match self.execute(query) {
            Ok(result) if result.is_empty() => {
                tracing::info!("{}: no results, skipping export", query.name);
                QueryStatus::Empty
            }
            Ok(result) => {
                let table = render_table(&result);
                let export = export_csv(&result, &self.output_dir, query.export_file);
                match &export {
                    Ok(path) => tracing::info!("{}: exported {} rows to {}", query.name, result.len(), path.display()),
                    Err(e) => tracing::warn!("{}: {}", query.name, e),
                }
                QueryStatus::Rendered {
                    result,
                    table,
                    export,
                }
            }
            Err(e) => {
                tracing::error!("{}", e);
                QueryStatus::Failed(e)
            }
        };
        QueryOutcome { query, status }
    }

    /// Run every query independently; one failure does not stop the rest
    pub fn run_catalog(&self, queries: &[&'static CatalogQuery]) -> CatalogRun {
        let outcomes = queries.iter().map(|query| self.run_query(query)).collect();
        CatalogRun { outcomes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::catalog::{CATALOG, MONTHLY_SALES};

    static BROKEN: CatalogQuery = CatalogQuery {
        name: "broken",
        title: "Broken",
        sql: "SELECT missing_column FROM orders",
        export_file: "output_broken.csv",
    };

    #[test]
    fn test_unpopulated_store_fails_each_query() {
        let store = SqliteStore::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let engine = ReportEngine::new(&store, dir.path());

        let run = engine.run_catalog(CATALOG);

        assert_eq!(run.outcomes.len(), CATALOG.len());
        assert_eq!(run.failed(), CATALOG.len());
        assert!(matches!(
            run.outcomes[0].status,
            QueryStatus::Failed(Error::QueryExecution { .. })
        ));
    }

    #[test]
    fn test_empty_result_skips_export() {
        let registry = crate::schema::SchemaRegistry::standard().unwrap();
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.rebuild(&registry).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let engine = ReportEngine::new(&store, dir.path());

        let outcome = engine.run_query(&MONTHLY_SALES);

        assert!(matches!(outcome.status, QueryStatus::Empty));
        assert!(outcome.is_success());
        assert!(!dir.path().join(MONTHLY_SALES.export_file).exists());
    }

    #[test]
    fn test_failure_does_not_stop_catalog() {
        let registry = crate::schema::SchemaRegistry::standard().unwrap();
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.rebuild(&registry).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let engine = ReportEngine::new(&store, dir.path());

        let run = engine.run_catalog(&[&BROKEN, &MONTHLY_SALES]);

        assert_eq!(run.failed(), 1);
        assert_eq!(run.succeeded(), 1);
        assert!(matches!(run.outcomes[1].status, QueryStatus::Empty));
    }
}
