use crate::{emit_success, OutputMode, ReportArgs, Settings};
use shopdb::config::{self, ShopConfig};
use shopdb::ingest::{LoadReport, TOTALS_TOLERANCE, Verification};
use shopdb::report::{catalog, CatalogQuery, CatalogRun, QueryStatus, ReportEngine};
use shopdb::ui::{self, Icons, Spinner};
use shopdb::{CsvSource, Loader, SchemaRegistry, SqliteStore};
use std::path::Path;

pub fn run_init(mode: OutputMode, path: &Path, force: bool) -> anyhow::Result<()> {
    let config = ShopConfig::with_defaults();
    config::write_config(path, &config, force)?;

    if mode.is_human() {
        ui::success(&format!("Wrote {}", path.display()));
        ui::info("database", &config.database_path().display().to_string());
        ui::info("data_dir", &config.data_dir().display().to_string());
        ui::info("output_dir", &config.output_dir().display().to_string());
        ui::info("totals_policy", config.totals_policy().as_str());
    }
    emit_success(mode, "init", serde_json::json!({ "path": path, "config": config }))
}

pub fn run_ingest(mode: OutputMode, settings: &Settings) -> anyhow::Result<()> {
    let registry = SchemaRegistry::standard()?;
    let source = CsvSource::new(&settings.data_dir);
    config::ensure_db_dir(&settings.database)?;
    let mut store = SqliteStore::open(&settings.database)?;

    if mode.is_human() {
        ui::header("Ingesting e-commerce data");
        ui::status(Icons::FOLDER, "Data", &settings.data_dir.display().to_string());
        ui::status(Icons::DATABASE, "Database", &settings.database.display().to_string());
    }

    let loader = Loader::new(&registry, &source).with_policy(settings.totals_policy);
    let spinner = mode.is_human().then(|| Spinner::new("Loading tables"));
    let result = loader.run(&mut store);

    let report = match result {
        Ok(report) => report,
        Err(aborted) => {
            if let Some(spinner) = &spinner {
                spinner.finish_with_message("Aborted");
            }
            if mode.is_human() {
                ui::section("Completed before abort");
                println!("{}", ui::load_table(&aborted.report));
            }
            return Err(aborted.into());
        }
    };

    if let Some(spinner) = &spinner {
        spinner.finish_with_summary("Loaded", report.total_inserted());
    }

    let verification = loader.verify(&store, &report)?;

    if mode.is_human() {
        print_load_summary(&report, &verification);
    }
    emit_success(mode, "ingest", ingest_json(&report, &verification))
}

fn print_load_summary(report: &LoadReport, verification: &Verification) {
    ui::section("Load results");
    println!("{}", ui::load_table(report));
    ui::summary_row("Total records inserted:", &report.total_inserted().to_string());

    ui::section("Verification");
    println!("{}", ui::verification_table(verification));
    ui::summary_row("Rows in store:", &verification.total_rows().to_string());
    if verification.dangling_references > 0 {
        ui::warn(&format!(
            "{} rows reference missing parents",
            verification.dangling_references
        ));
    }

    if !report.total_mismatches.is_empty() {
        ui::section("Order totals that disagree with their items");
        println!("{}", ui::mismatch_table(&report.total_mismatches));
    }

    if report.is_complete() && verification.is_consistent() {
        ui::success("All tables loaded");
    } else {
        let failed = report.failures().count();
        ui::warn(&format!("{} of {} tables not loaded", failed, report.outcomes.len()));
    }
}

/// Per-entity outcomes, also attached to the error envelope of an aborted run
pub fn load_outcomes_json(report: &LoadReport) -> serde_json::Value {
    let tables: Vec<serde_json::Value> = report
        .outcomes
        .iter()
        .map(|o| {
            serde_json::json!({
                "table": o.entity.table_name(),
                "status": o.status.as_str(),
                "inserted": o.inserted,
                "error": o.error.as_ref().map(|e| serde_json::json!({
                    "kind": e.kind(),
                    "message": e.to_string(),
                })),
            })
        })
        .collect();
    serde_json::Value::Array(tables)
}

fn ingest_json(report: &LoadReport, verification: &Verification) -> serde_json::Value {
    let tables = load_outcomes_json(report);
    let counts: Vec<serde_json::Value> = verification
        .counts
        .iter()
        .map(|c| {
            serde_json::json!({
                "table": c.entity.table_name(),
                "reported": c.reported,
                "actual": c.actual,
            })
        })
        .collect();

    serde_json::json!({
        "tables": tables,
        "total_inserted": report.total_inserted(),
        "verification": {
            "counts": counts,
            "dangling_references": verification.dangling_references,
            "consistent": verification.is_consistent(),
        },
        "total_mismatches": report.total_mismatches,
    })
}

pub fn run_report(mode: OutputMode, settings: &Settings, args: &ReportArgs) -> anyhow::Result<()> {
    let queries: Vec<&'static CatalogQuery> = match &args.query {
        Some(name) => match catalog::find(name) {
            Some(query) => vec![query],
            None => {
                let known: Vec<&str> = catalog::CATALOG.iter().map(|q| q.name).collect();
                anyhow::bail!("unknown query '{}' (expected one of: {})", name, known.join(", "));
            }
        },
        None => catalog::CATALOG.to_vec(),
    };

    let store = SqliteStore::open_read_only(&settings.database)?;
    let engine = ReportEngine::new(&store, &settings.output_dir);

    if mode.is_human() {
        ui::header("Running sales reports");
        ui::status(Icons::DATABASE, "Database", &settings.database.display().to_string());
        ui::status(Icons::FOLDER, "Output", &settings.output_dir.display().to_string());
    }

    let run = engine.run_catalog(&queries);

    if mode.is_human() {
        print_catalog_run(&run, args.show_sql);
    }
    emit_success(mode, "report", report_json(&run))
}

fn print_catalog_run(run: &CatalogRun, show_sql: bool) {
    for outcome in &run.outcomes {
        ui::section(outcome.query.title);
        if show_sql {
            println!("{}", ui::dim(outcome.query.sql.trim()));
            println!();
        }

        match &outcome.status {
            QueryStatus::Rendered { result, table, export } => {
                println!("{}", table);
                println!("Total rows: {}", result.len());
                match export {
                    Ok(path) => ui::status(Icons::FILE, "Exported", &path.display().to_string()),
                    Err(e) => ui::warn(&e.to_string()),
                }
            }
            QueryStatus::Empty => {
                println!("{} {}", Icons::EMPTY, ui::muted("No results found."));
            }
            QueryStatus::Failed(e) => ui::error(&e.to_string()),
        }
    }

    println!();
    let summary = format!("{} of {} queries succeeded", run.succeeded(), run.outcomes.len());
    if run.failed() == 0 {
        ui::success(&summary);
    } else {
        ui::warn(&summary);
    }
}

fn report_json(run: &CatalogRun) -> serde_json::Value {
    let queries: Vec<serde_json::Value> = run
        .outcomes
        .iter()
        .map(|outcome| {
            let query = outcome.query;
            match &outcome.status {
                QueryStatus::Rendered { result, export, .. } => serde_json::json!({
                    "name": query.name,
                    "status": "ok",
                    "rows": result.len(),
                    "columns": result.columns,
                    "results": result.to_json(),
                    "export": export.as_ref().ok(),
                    "export_error": export.as_ref().err().map(ToString::to_string),
                }),
                QueryStatus::Empty => serde_json::json!({
                    "name": query.name,
                    "status": "empty",
                    "rows": 0,
                }),
                QueryStatus::Failed(e) => serde_json::json!({
                    "name": query.name,
                    "status": "failed",
                    "error": { "kind": e.kind(), "message": e.to_string() },
                }),
            }
        })
        .collect();

    serde_json::json!({
        "queries": queries,
        "succeeded": run.succeeded(),
        "total": run.outcomes.len(),
    })
}

pub fn run_stats(mode: OutputMode, settings: &Settings) -> anyhow::Result<()> {
    let registry = SchemaRegistry::standard()?;
    let store = SqliteStore::open_read_only(&settings.database)?;
    let stats = store.stats(&registry)?;

    if mode.is_human() {
        println!("{} shopdb Statistics ({})", Icons::STATS, settings.database.display());
        println!("{}", ui::stats_table(&stats));
    }
    emit_success(mode, "stats", serde_json::to_value(&stats)?)
}

pub fn run_check(mode: OutputMode, settings: &Settings) -> anyhow::Result<()> {
    let store = SqliteStore::open_read_only(&settings.database)?;
    let orders = store.order_total_mismatches(TOTALS_TOLERANCE)?;
    let items = store.line_subtotal_mismatches(TOTALS_TOLERANCE)?;

    if mode.is_human() {
        ui::header("Checking stored totals");
        if orders.is_empty() {
            ui::success("Every order total matches the sum of its items");
        } else {
            ui::section("Orders");
            println!("{}", ui::mismatch_table(&orders));
        }
        if items.is_empty() {
            ui::success("Every item subtotal equals quantity * unit_price");
        } else {
            ui::section("Order items");
            println!("{}", ui::mismatch_table(&items));
        }
    }
    emit_success(
        mode,
        "check",
        serde_json::json!({ "orders": orders, "order_items": items }),
    )?;

    let found = orders.len() + items.len();
    if found > 0 {
        anyhow::bail!("{} inconsistent totals found", found);
    }
    Ok(())
}
