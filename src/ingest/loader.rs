//! Dependency-ordered, per-entity transactional loader

use crate::{Error, Result};
use crate::schema::{Entity, SchemaRegistry, TableSchema};
use crate::source::{Record, RecordSource};
use crate::storage::{RowValues, SqliteStore};
use super::coerce::coerce_record;
use super::report::{EntityOutcome, LoadAborted, LoadReport, Verification, VerifiedCount};
use super::{TOTALS_TOLERANCE, TotalsPolicy};

/// Rebuilds a store and fills it from a record source.
pub struct Loader<'a, S: RecordSource + ?Sized> {
    registry: &'a SchemaRegistry,
    source: &'a S,
    policy: TotalsPolicy,
}

impl<'a, S: RecordSource + ?Sized> Loader<'a, S> {
    pub fn new(registry: &'a SchemaRegistry, source: &'a S) -> Self {
        Self {
            registry,
            source,
            policy: TotalsPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TotalsPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Drop and recreate every table.
    pub fn rebuild(&self, store: &mut SqliteStore) -> Result<()> {
        store.rebuild(self.registry)?;
        tracing::info!("Rebuilt {} tables", self.registry.tables().len());
        Ok(())
    }

    /// Full ingestion run: rebuild, then one isolated batch per entity.
    ///
    /// Unit-level failures are recorded in the report and the run goes on.
    /// Any other error stops the run and comes back with the partial report.
    pub fn run(&self, store: &mut SqliteStore) -> std::result::Result<LoadReport, LoadAborted> {
        let mut report = LoadReport::default();

        if let Err(error) = self.rebuild(store) {
            return Err(LoadAborted { report, error });
        }

        tracing::info!("Loading from {} (totals policy: {})", self.source.describe(), self.policy);
        for table in self.registry.ordered_tables() {
            match self.load_entity(store, table) {
                Ok(inserted) => {
                    tracing::info!("Inserted {} records into {}", inserted, table.name());
                    report.push(EntityOutcome::loaded(table.entity, inserted));
                }
                Err(error) if error.is_unit_failure() => {
                    tracing::warn!("{} not loaded: {}", table.name(), error);
                    report.push(EntityOutcome::failed(table.entity, error));
                }
                Err(error) => return Err(LoadAborted { report, error }),
            }
        }

        if self.policy != TotalsPolicy::Trust && report.inserted(Entity::Order) > 0 {
            match store.order_total_mismatches(TOTALS_TOLERANCE) {
                Ok(mismatches) => {
                    for m in &mismatches {
                        tracing::warn!(
                            "order {} total {:?} differs from item sum {:?}",
                            m.id,
                            m.recorded,
                            m.computed
                        );
                    }
                    report.total_mismatches = mismatches;
                }
                Err(error) => return Err(LoadAborted { report, error }),
            }
        }

        Ok(report)
    }

    /// Read, convert and insert one entity as a single transaction.
    pub fn load_entity(&self, store: &mut SqliteStore, table: &TableSchema) -> Result<usize> {
        let records = self.source.load(table)?;
        if records.is_empty() {
            tracing::info!("No data found for {}", table.name());
            return Ok(0);
        }

        let mut rows: Vec<RowValues> = Vec::with_capacity(records.len());
        for record in &records {
            if table.entity == Entity::OrderItem {
                self.check_line_subtotal(table, record)?;
            }
            rows.push(coerce_record(table, record)?);
        }

        store.insert_batch(table, &rows)
    }

    /// Apply the totals policy to one order item row
    fn check_line_subtotal(&self, table: &TableSchema, record: &Record) -> Result<()> {
        if self.policy == TotalsPolicy::Trust {
            return Ok(());
        }

        let parse = |field: &str| record.get(field).and_then(|v| v.trim().parse::<f64>().ok());
        let (Some(quantity), Some(unit_price), Some(subtotal)) =
            (parse("quantity"), parse("unit_price"), parse("subtotal"))
        else {
            // Unparseable cells are reported by coercion instead.
            return Ok(());
        };

        let expected = quantity * unit_price;
        if (expected - subtotal).abs() <= TOTALS_TOLERANCE {
            return Ok(());
        }

        let message = format!(
            "subtotal {} does not equal quantity * unit_price ({})",
            subtotal, expected
        );
        match self.policy {
            TotalsPolicy::Reject => Err(Error::ConstraintViolation {
                entity: table.entity,
                line: record.line,
                message,
            }),
            _ => {
                tracing::warn!("{} line {}: {}", table.name(), record.line, message);
                Ok(())
            }
        }
    }

    /// Recount every table and compare against what the report says was inserted.
    pub fn verify(&self, store: &SqliteStore, report: &LoadReport) -> Result<Verification> {
        let counts = store
            .table_counts(self.registry)?
            .into_iter()
            .map(|(entity, actual)| VerifiedCount {
                entity,
                reported: report.inserted(entity),
                actual,
            })
            .collect();

        Ok(Verification {
            counts,
            dangling_references: store.foreign_key_violations()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// In-memory source keyed by entity; absent entities behave like missing files.
    #[derive(Default)]
    struct MemorySource {
        records: HashMap<Entity, Vec<Record>>,
        requested: Mutex<Vec<Entity>>,
        /// Entity whose read fails with an I/O error
        unreadable: Option<Entity>,
    }

    impl MemorySource {
        fn with(mut self, entity: Entity, records: Vec<Record>) -> Self {
            self.records.insert(entity, records);
            self
        }
    }

    impl RecordSource for MemorySource {
        fn describe(&self) -> String {
            "memory".to_string()
        }

        fn load(&self, table: &TableSchema) -> Result<Vec<Record>> {
            self.requested.lock().unwrap().push(table.entity);
            if self.unreadable == Some(table.entity) {
                return Err(Error::Io(std::io::Error::other("disk gone")));
            }
            self.records
                .get(&table.entity)
                .cloned()
                .ok_or_else(|| Error::SourceNotFound {
                    entity: table.entity,
                    path: PathBuf::from(table.source_file),
                })
        }
    }

    fn supplier(id: i64) -> Record {
        Record::new(id as u64 + 1)
            .with("supplier_id", id.to_string())
            .with("supplier_name", format!("Supplier {}", id))
    }

    fn customer(id: i64) -> Record {
        Record::new(id as u64 + 1)
            .with("customer_id", id.to_string())
            .with("first_name", "Ada")
            .with("last_name", "Lovelace")
            .with("registration_date", "2023-05-01")
    }

    fn product(id: i64, supplier_id: i64) -> Record {
        Record::new(id as u64 + 1)
            .with("product_id", id.to_string())
            .with("product_name", format!("Widget {}", id))
            .with("category", "Electronics")
            .with("price", "10.0")
            .with("stock_quantity", "5")
            .with("supplier_id", supplier_id.to_string())
    }

    fn order(id: i64, customer_id: i64, total: &str) -> Record {
        Record::new(id as u64 + 1)
            .with("order_id", id.to_string())
            .with("customer_id", customer_id.to_string())
            .with("order_date", "2024-01-15")
            .with("total_amount", total)
            .with("status", "Delivered")
    }

    fn item(id: i64, order_id: i64, product_id: i64, quantity: i64, unit_price: f64, subtotal: f64) -> Record {
        Record::new(id as u64 + 1)
            .with("order_item_id", id.to_string())
            .with("order_id", order_id.to_string())
            .with("product_id", product_id.to_string())
            .with("quantity", quantity.to_string())
            .with("unit_price", unit_price.to_string())
            .with("subtotal", subtotal.to_string())
    }

    fn full_source() -> MemorySource {
        MemorySource::default()
            .with(Entity::Supplier, vec![supplier(1), supplier(2)])
            .with(Entity::Customer, vec![customer(1)])
            .with(Entity::Product, vec![product(1, 1), product(2, 2)])
            .with(Entity::Order, vec![order(1, 1, "30.0")])
            .with(Entity::OrderItem, vec![item(1, 1, 1, 1, 10.0, 10.0), item(2, 1, 2, 2, 10.0, 20.0)])
    }

    #[test]
    fn test_loads_in_dependency_order() {
        let registry = SchemaRegistry::standard().unwrap();
        let source = full_source();
        let mut store = SqliteStore::open_in_memory().unwrap();

        let report = Loader::new(&registry, &source).run(&mut store).unwrap();

        assert_eq!(
            *source.requested.lock().unwrap(),
            vec![Entity::Supplier, Entity::Customer, Entity::Product, Entity::Order, Entity::OrderItem]
        );
        assert!(report.is_complete());
        assert_eq!(report.total_inserted(), 8);
    }

    #[test]
    fn test_verification_matches_report() {
        let registry = SchemaRegistry::standard().unwrap();
        let source = full_source();
        let mut store = SqliteStore::open_in_memory().unwrap();
        let loader = Loader::new(&registry, &source);

        let report = loader.run(&mut store).unwrap();
        let verification = loader.verify(&store, &report).unwrap();

        assert!(verification.is_consistent());
        assert_eq!(verification.total_rows(), report.total_inserted());
    }

    #[test]
    fn test_missing_parent_isolated() {
        let registry = SchemaRegistry::standard().unwrap();
        let source = full_source().with(Entity::Product, vec![product(1, 1), product(2, 99)]);
        let mut store = SqliteStore::open_in_memory().unwrap();

        let report = Loader::new(&registry, &source).run(&mut store).unwrap();

        let products = report.outcome(Entity::Product).unwrap();
        assert!(matches!(products.error, Some(Error::ConstraintViolation { .. })));
        assert_eq!(store.count_rows("products").unwrap(), 0);
        // Orders do not depend on products and still load.
        assert_eq!(report.inserted(Entity::Order), 1);
        // Items reference the missing products and fail in turn.
        assert_eq!(report.inserted(Entity::OrderItem), 0);
        assert_eq!(report.outcome(Entity::OrderItem).unwrap().status, crate::ingest::OutcomeStatus::Failed);
    }

    #[test]
    fn test_missing_source_skipped() {
        let registry = SchemaRegistry::standard().unwrap();
        let mut source = full_source();
        source.records.remove(&Entity::Customer);
        let mut store = SqliteStore::open_in_memory().unwrap();

        let report = Loader::new(&registry, &source).run(&mut store).unwrap();

        assert_eq!(report.inserted(Entity::Supplier), 2);
        assert!(matches!(
            report.outcome(Entity::Customer).unwrap().error,
            Some(Error::SourceNotFound { .. })
        ));
        assert_eq!(report.inserted(Entity::Order), 0);
        assert_eq!(source.requested.lock().unwrap().len(), 5);
    }

    #[test]
    fn test_bad_cell_rolls_back_entity() {
        let registry = SchemaRegistry::standard().unwrap();
        let source = full_source().with(Entity::Order, vec![order(1, 1, "30.0"), order(2, 1, "n/a")]);
        let mut store = SqliteStore::open_in_memory().unwrap();

        let report = Loader::new(&registry, &source).run(&mut store).unwrap();

        assert!(matches!(
            report.outcome(Entity::Order).unwrap().error,
            Some(Error::Coercion { .. })
        ));
        assert_eq!(store.count_rows("orders").unwrap(), 0);
    }

    #[test]
    fn test_reject_policy_fails_mismatched_subtotal() {
        let registry = SchemaRegistry::standard().unwrap();
        let source = full_source().with(Entity::OrderItem, vec![item(1, 1, 1, 2, 10.0, 15.0)]);
        let mut store = SqliteStore::open_in_memory().unwrap();

        let report = Loader::new(&registry, &source)
            .with_policy(TotalsPolicy::Reject)
            .run(&mut store)
            .unwrap();

        assert_eq!(report.inserted(Entity::OrderItem), 0);
        assert!(matches!(
            report.outcome(Entity::OrderItem).unwrap().error,
            Some(Error::ConstraintViolation { line: 2, .. })
        ));
    }

    #[test]
    fn test_warn_policy_keeps_rows_and_reports_totals() {
        let registry = SchemaRegistry::standard().unwrap();
        let source = full_source().with(Entity::Order, vec![order(1, 1, "99.0")]);
        let mut store = SqliteStore::open_in_memory().unwrap();

        let report = Loader::new(&registry, &source)
            .with_policy(TotalsPolicy::Warn)
            .run(&mut store)
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.total_mismatches.len(), 1);
        assert_eq!(report.total_mismatches[0].id, 1);
        assert_eq!(report.total_mismatches[0].computed, Some(30.0));
    }

    #[test]
    fn test_fatal_error_aborts_with_partial_report() {
        let registry = SchemaRegistry::standard().unwrap();
        let mut source = full_source();
        source.unreadable = Some(Entity::Product);
        let mut store = SqliteStore::open_in_memory().unwrap();

        let aborted = Loader::new(&registry, &source).run(&mut store).unwrap_err();

        assert!(matches!(aborted.error, Error::Io(_)));
        assert!(!aborted.error.is_unit_failure());
        let done: Vec<Entity> = aborted.report.outcomes.iter().map(|o| o.entity).collect();
        assert_eq!(done, vec![Entity::Supplier, Entity::Customer]);
        assert_eq!(aborted.report.total_inserted(), 3);
        // Nothing after the failing entity was attempted
        assert_eq!(source.requested.lock().unwrap().len(), 3);
        assert!(aborted.to_string().starts_with("load aborted after 2 entities"));
    }
}
