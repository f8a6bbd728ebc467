use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use crypto_feed::providers::{FeedClient, cryptocompare::CryptoCompareClient};
use price_sync::{
    analytics::DEFAULT_RSI_PERIOD,
    catalog::{load_instruments, sync_instruments},
    config::AppConfig,
    db::{connection::connect_sqlite, migrate},
    ingest::{IngestionOutcome, run_ingestion},
    query,
    store::SqlitePriceStore,
};
use serde::Serialize;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Crypto daily price sync")]
struct Cli {
    /// TOML config file; defaults apply when omitted.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply pending schema migrations.
    Migrate,
    Catalog(CatalogCmd),
    /// Fetch and store the latest daily bars for every instrument.
    Ingest,
    /// Run `ingest` on the configured cron schedule until interrupted.
    Schedule,
    Query(QueryCmd),
}

#[derive(Args)]
struct CatalogCmd {
    #[command(subcommand)]
    sub: CatalogSub,
}

#[derive(Subcommand)]
enum CatalogSub {
    /// Add coins from the feed's coin list that are not stored yet.
    Sync,
}

#[derive(Args)]
struct QueryCmd {
    #[command(subcommand)]
    sub: QuerySub,
}

#[derive(Subcommand)]
enum QuerySub {
    PriceRange {
        symbol: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    DailyReturn {
        symbol: String,
    },
    Rsi {
        symbol: String,
        #[arg(long, default_value_t = DEFAULT_RSI_PERIOD)]
        period: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;
    let db_url = cfg.database_url()?;

    match cli.cmd {
        Cmd::Migrate => {
            let applied = tokio::task::spawn_blocking(move || migrate::run_sqlite(&db_url)).await??;
            info!(applied, "migrations up to date");
        }
        Cmd::Catalog(CatalogCmd { sub: CatalogSub::Sync }) => {
            let feed = CryptoCompareClient::new(cfg.feed.clone())?;
            let descriptors = feed.list_instruments().await?;
            let report = tokio::task::spawn_blocking(move || {
                let mut conn = connect_sqlite(&db_url)?;
                sync_instruments(&mut conn, &descriptors)
            })
            .await??;
            info!(
                new = report.new.len(),
                existing = report.existing.len(),
                total = report.total,
                "catalog synced"
            );
            print_json(&report)?;
        }
        Cmd::Ingest => {
            let outcome = ingest_once(&cfg, &db_url).await?;
            print_json(&outcome)?;
        }
        Cmd::Schedule => schedule(cfg, db_url).await?,
        Cmd::Query(QueryCmd { sub }) => {
            tokio::task::spawn_blocking(move || run_query(&db_url, sub)).await??;
        }
    }

    Ok(())
}

/// One ingestion run, aborted once `max_runtime` elapses. Bars committed
/// before the deadline stay in place.
async fn ingest_once(cfg: &AppConfig, db_url: &str) -> Result<IngestionOutcome> {
    let feed = CryptoCompareClient::new(cfg.feed.clone())?;

    let url = db_url.to_string();
    let (instruments, store) = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut conn = connect_sqlite(&url)?;
        let instruments = load_instruments(&mut conn)?;
        Ok((instruments, SqlitePriceStore::new(connect_sqlite(&url)?)))
    })
    .await??;

    let opts = cfg.ingest_options();
    let limit = cfg.ingest.max_runtime();

    tokio::time::timeout(limit, run_ingestion(&feed, &store, &instruments, &opts))
        .await
        .with_context(|| format!("ingestion exceeded {}s", limit.as_secs()))
}

async fn schedule(cfg: AppConfig, db_url: String) -> Result<()> {
    let cron = cfg.ingest.schedule.clone();
    let ctx = Arc::new((cfg, db_url));

    let sched = JobScheduler::new().await?;
    sched
        .add(Job::new_async(cron.as_str(), move |_id, _sched| {
            let ctx = Arc::clone(&ctx);
            Box::pin(async move {
                let (cfg, db_url) = &*ctx;
                match ingest_once(cfg, db_url).await {
                    Ok(outcome) => info!(
                        updated = outcome.updated.len(),
                        no_data = outcome.no_data.len(),
                        "scheduled ingestion done"
                    ),
                    Err(e) => error!(error = %e, "scheduled ingestion failed"),
                }
            })
        })?)
        .await?;
    sched.start().await?;
    info!(%cron, "scheduler started");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    Ok(())
}

fn run_query(db_url: &str, sub: QuerySub) -> Result<()> {
    let mut conn = connect_sqlite(db_url)?;
    match sub {
        QuerySub::PriceRange { symbol, start, end } => {
            print_json(&query::price_range(&mut conn, &symbol, start, end)?)
        }
        QuerySub::DailyReturn { symbol } => print_json(&query::daily_return(&mut conn, &symbol)?),
        QuerySub::Rsi { symbol, period } => print_json(&query::rsi(&mut conn, &symbol, period)?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
