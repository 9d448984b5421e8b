use tabled::{settings::Style, Table, Tabled};
use crate::ingest::{LoadReport, Verification};
use crate::storage::{DbStats, TotalMismatch};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Tabled)]
struct LoadRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Inserted")]
    inserted: usize,
    #[tabled(rename = "Error")]
    error: String,
}

#[derive(Tabled)]
struct VerifyRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Reported")]
    reported: usize,
    #[tabled(rename = "Counted")]
    actual: usize,
    #[tabled(rename = "OK")]
    ok: &'static str,
}

#[derive(Tabled)]
struct MismatchRow {
    #[tabled(rename = "Id")]
    id: i64,
    #[tabled(rename = "Recorded")]
    recorded: String,
    #[tabled(rename = "Computed")]
    computed: String,
}

/// Per-entity outcome of a load, in load order
pub fn load_table(report: &LoadReport) -> String {
    let rows: Vec<LoadRow> = report
        .outcomes
        .iter()
        .map(|o| LoadRow {
            table: o.entity.table_name(),
            status: o.status.as_str(),
            inserted: o.inserted,
            error: o.error.as_ref().map(ToString::to_string).unwrap_or_default(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn verification_table(verification: &Verification) -> String {
    let rows: Vec<VerifyRow> = verification
        .counts
        .iter()
        .map(|c| VerifyRow {
            table: c.entity.table_name(),
            reported: c.reported,
            actual: c.actual,
            ok: if c.matches() { "yes" } else { "NO" },
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn mismatch_table(mismatches: &[TotalMismatch]) -> String {
    let amount = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "NULL".to_string());
    let rows: Vec<MismatchRow> = mismatches
        .iter()
        .map(|m| MismatchRow {
            id: m.id,
            recorded: amount(m.recorded),
            computed: amount(m.computed),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    for stat in &stats.tables {
        let value = stat
            .rows
            .map(|rows| rows.to_string())
            .unwrap_or_else(|| "(missing)".to_string());
        builder.add_row(&stat.table, &value);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{EntityOutcome, VerifiedCount};
    use crate::schema::Entity;
    use crate::storage::TableStat;

    #[test]
    fn test_load_table_lists_each_entity() {
        let mut report = LoadReport::default();
        report.push(EntityOutcome::loaded(Entity::Supplier, 3));
        report.push(EntityOutcome::failed(
            Entity::Product,
            crate::Error::ConstraintViolation {
                entity: Entity::Product,
                line: 2,
                message: "FOREIGN KEY constraint failed".into(),
            },
        ));

        let rendered = load_table(&report);
        assert!(rendered.contains("suppliers"));
        assert!(rendered.contains("loaded"));
        assert!(rendered.contains("FOREIGN KEY constraint failed"));
    }

    #[test]
    fn test_verification_flags_mismatch() {
        let verification = Verification {
            counts: vec![VerifiedCount {
                entity: Entity::Order,
                reported: 2,
                actual: 1,
            }],
            dangling_references: 0,
        };
        assert!(verification_table(&verification).contains("NO"));
    }

    #[test]
    fn test_stats_table_marks_missing() {
        let stats = DbStats {
            tables: vec![
                TableStat { table: "suppliers".into(), rows: Some(3) },
                TableStat { table: "orders".into(), rows: None },
            ],
        };
        let rendered = stats_table(&stats);
        assert!(rendered.contains("(missing)"));
        assert!(rendered.contains('3'));
    }

    #[test]
    fn test_empty_builder() {
        assert!(TableBuilder::new().build().is_empty());
    }
}
