//! shopdb CLI - load e-commerce CSV exports into SQLite and run sales reports

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use shopdb::config::{self, ShopConfig};
use shopdb::{LoadAborted, TotalsPolicy};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "shopdb")]
#[command(version)]
#[command(about = "Relational ingestion and sales reporting over e-commerce CSV exports")]
#[command(long_about = r#"
shopdb rebuilds a SQLite store from five CSV files and reports on it:
  • Loads suppliers, customers, products, orders and order items in dependency order
  • Enforces primary keys, foreign keys and value checks on every row
  • Runs a fixed catalog of sales reports and exports each one to CSV

Example usage:
  shopdb init
  shopdb ingest --data-dir ./data
  shopdb report --show-sql
  shopdb report --query top_customers
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "human")]
    format: OutputMode,

    /// Path to the database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default shopdb.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Rebuild the store and load every CSV file
    Ingest {
        #[command(flatten)]
        load: LoadArgs,
    },

    /// Run the report catalog against the store
    Report {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Ingest, then report
    Run {
        #[command(flatten)]
        load: LoadArgs,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Show row counts per table
    Stats,

    /// Compare stored totals against the amounts recomputed from order items
    Check,
}

#[derive(clap::Args, Clone)]
pub struct LoadArgs {
    /// Directory containing the input CSV files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// How to treat precomputed subtotals and order totals (trust, warn, reject)
    #[arg(long, value_parser = parse_policy)]
    pub totals_policy: Option<TotalsPolicy>,
}

#[derive(clap::Args, Clone)]
pub struct ReportArgs {
    /// Directory the report CSV files are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Print each query's SQL before its results
    #[arg(long)]
    pub show_sql: bool,

    /// Run a single catalog query by name
    #[arg(short, long)]
    pub query: Option<String>,
}

fn parse_policy(s: &str) -> Result<TotalsPolicy, String> {
    s.parse().map_err(|e: shopdb::Error| e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Settings after merging CLI flags over the config file
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: PathBuf,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub totals_policy: TotalsPolicy,
}

impl Settings {
    fn resolve(file: &ShopConfig, database: Option<PathBuf>, load: Option<&LoadArgs>, report: Option<&ReportArgs>) -> Self {
        Self {
            database: database.unwrap_or_else(|| file.database_path()),
            data_dir: load
                .and_then(|l| l.data_dir.clone())
                .unwrap_or_else(|| file.data_dir()),
            output_dir: report
                .and_then(|r| r.output_dir.clone())
                .unwrap_or_else(|| file.output_dir()),
            totals_policy: load
                .and_then(|l| l.totals_policy)
                .unwrap_or_else(|| file.totals_policy()),
        }
    }
}

pub fn emit_success(mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

/// Failure envelope; an aborted load keeps the tables it finished
fn error_envelope(err: &anyhow::Error) -> serde_json::Value {
    let mut envelope = serde_json::json!({
        "ok": false,
        "error": format!("{:#}", err),
    });
    if let Some(aborted) = err.downcast_ref::<LoadAborted>() {
        envelope["data"] = serde_json::json!({
            "tables": commands::load_outcomes_json(&aborted.report),
            "total_inserted": aborted.report.total_inserted(),
        });
    }
    envelope
}

fn emit_error(mode: OutputMode, err: &anyhow::Error) {
    match mode {
        OutputMode::Json => println!("{}", error_envelope(err)),
        OutputMode::Human => shopdb::ui::error(&format!("{:#}", err)),
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = cli.format;
    if let Err(err) = dispatch(cli) {
        emit_error(mode, &err);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let mode = cli.format;
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    if let Commands::Init { force } = cli.command {
        return commands::run_init(mode, &config_path, force);
    }

    let file = config::load_config(Some(&config_path))?.unwrap_or_default();

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Ingest { load } => {
            let settings = Settings::resolve(&file, cli.database, Some(&load), None);
            commands::run_ingest(mode, &settings)
        }
        Commands::Report { report } => {
            let settings = Settings::resolve(&file, cli.database, None, Some(&report));
            commands::run_report(mode, &settings, &report)
        }
        Commands::Run { load, report } => {
            let settings = Settings::resolve(&file, cli.database, Some(&load), Some(&report));
            if mode.is_human() {
                shopdb::ui::phase("Phase 1: ingest");
            }
            commands::run_ingest(mode, &settings)?;
            if mode.is_human() {
                shopdb::ui::phase("Phase 2: report");
            }
            commands::run_report(mode, &settings, &report)
        }
        Commands::Stats => {
            let settings = Settings::resolve(&file, cli.database, None, None);
            commands::run_stats(mode, &settings)
        }
        Commands::Check => {
            let settings = Settings::resolve(&file, cli.database, None, None);
            commands::run_check(mode, &settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdb::ingest::{EntityOutcome, LoadReport};
    use shopdb::schema::Entity;

    #[test]
    fn test_aborted_load_envelope_keeps_partial_report() {
        let mut report = LoadReport::default();
        report.push(EntityOutcome::loaded(Entity::Supplier, 3));
        report.push(EntityOutcome::loaded(Entity::Customer, 2));
        let err = anyhow::Error::from(LoadAborted {
            report,
            error: shopdb::Error::Io(std::io::Error::other("disk gone")),
        });

        let envelope = error_envelope(&err);

        assert_eq!(envelope["ok"], false);
        assert!(envelope["error"].as_str().unwrap().contains("load aborted after 2 entities"));
        assert_eq!(envelope["data"]["tables"][0]["table"], "suppliers");
        assert_eq!(envelope["data"]["tables"][1]["inserted"], 2);
        assert_eq!(envelope["data"]["total_inserted"], 5);
    }

    #[test]
    fn test_other_errors_have_no_data() {
        let envelope = error_envelope(&anyhow::anyhow!("unknown query 'x'"));
        assert!(envelope.get("data").is_none());
    }
}
