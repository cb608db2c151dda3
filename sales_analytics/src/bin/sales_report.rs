use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sales_analytics::{
    config::{AnalyticsConfig, load_config_path},
    service::{ReportRequest, ReportSettings, SalesReportService},
};
use tracing_subscriber::EnvFilter;
use transaction_store::{
    fixture::load_json_file,
    models::CallerId,
    sqlite::{SqliteStore, connection::connect_sqlite, insert_transactions, migrate::run_sqlite},
};

#[derive(Parser)]
#[command(version, about = "Sales analytics CLI")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply pending database migrations.
    Migrate,
    /// Load a JSON array of transactions for one owner.
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,
        #[arg(long)]
        caller: String,
    },
    /// Print a sales report as JSON.
    Report {
        #[arg(long)]
        caller: String,
        #[arg(long)]
        timeframe: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<AnalyticsConfig> {
    let mut cfg = match path {
        Some(p) => load_config_path(p)?,
        None => AnalyticsConfig::default(),
    };
    cfg.apply_env_overrides();
    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Cmd::Migrate => {
            let url = cfg.database_url()?;
            let applied = run_sqlite(url)?;
            tracing::info!(applied, "migrations applied");
        }
        Cmd::Import { file, caller } => {
            let url = cfg.database_url()?;
            let txs = load_json_file(&file)?;
            let mut conn = connect_sqlite(url)?;
            let inserted = insert_transactions(&mut conn, &CallerId::new(caller), &txs)
                .with_context(|| format!("importing {file}"))?;
            tracing::info!(inserted, "transactions imported");
        }
        Cmd::Report {
            caller,
            timeframe,
            start,
            end,
        } => {
            let store = SqliteStore::new(cfg.database_url()?);
            let settings = ReportSettings {
                calendar: cfg.calendar()?,
                top_products: cfg.top_products,
            };
            let service = SalesReportService::new(Arc::new(store), settings);
            let req = ReportRequest {
                timeframe,
                start,
                end,
            };

            match service.report(Some(&CallerId::new(caller)), &req).await {
                Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                Err(e) => {
                    println!("{}", e.body());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
