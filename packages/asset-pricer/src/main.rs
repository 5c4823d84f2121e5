//! Asset pricer
//!
//! Values every asset in the asset file and writes the result to Lunch Money,
//! once or on a cron schedule.

mod config;
mod ledger;
mod schedule;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lunchmoney_client::LunchMoneyClient;
use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use valuation::{
    AssetBook, EventSink, Fetcher, FirecrawlFetcher, Ledger, Pipeline, PipelineConfig,
    ReportingSink, RunSummary, TracingEventSink,
};

use crate::config::Config;
use crate::ledger::LunchMoneyLedger;

#[derive(Parser)]
#[command(name = "asset-pricer")]
#[command(about = "Scrape asset prices and update Lunch Money")]
struct Cli {
    /// Do not update Lunch Money, just log results
    #[arg(long)]
    dry_run: bool,

    /// Path to the assets JSON file
    #[arg(long, default_value = "assets.json")]
    assets_path: PathBuf,

    /// Cron expression; repeat the run on this schedule instead of once
    #[arg(long, env = "SCHEDULE")]
    schedule: Option<String>,

    /// Save KBB page html and screenshots here
    #[arg(long)]
    debug_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before the subscriber reads RUST_LOG and clap reads SCHEDULE
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,valuation=debug,asset_pricer=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing::info!(
        dry_run = cli.dry_run,
        assets_path = %cli.assets_path.display(),
        "Starting asset pricer"
    );

    let ledger = LunchMoneyLedger::new(LunchMoneyClient::new(
        config.lunch_money_api_key.expose_secret().to_string(),
    ));
    let fetcher = FirecrawlFetcher::new(config.firecrawl_api_key)
        .context("Failed to build Firecrawl client")?;

    let mut pipeline_config = PipelineConfig::default().with_default_zipcode(&config.kbb_zipcode);
    if let Some(dir) = &cli.debug_dir {
        pipeline_config = pipeline_config.with_debug_dir(dir);
    }

    let pipeline = Pipeline::new(
        fetcher,
        ReportingSink::new(ledger, cli.dry_run),
        TracingEventSink,
        pipeline_config,
    );

    match cli.schedule.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(expression) => schedule::run_scheduled(pipeline, cli.assets_path, expression).await,
        None => run_once(&pipeline, &cli.assets_path).await.map(|_| ()),
    }
}

/// Load the asset file and run the pipeline over it once.
pub(crate) async fn run_once<F, L, E>(
    pipeline: &Pipeline<F, L, E>,
    assets_path: &Path,
) -> Result<RunSummary>
where
    F: Fetcher,
    L: Ledger,
    E: EventSink,
{
    let book = AssetBook::load(assets_path)
        .with_context(|| format!("Failed to load assets from {}", assets_path.display()))?;

    tracing::info!(assets = book.len(), "Loaded asset file");

    let summary = pipeline.run(&book).await;

    for failure in &summary.failures {
        tracing::debug!(
            asset_id = failure.asset_id,
            kind = failure.kind,
            detail = %failure.detail,
            "asset not reported"
        );
    }

    Ok(summary)
}
