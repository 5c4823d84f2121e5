//! Repeated runs on a cron schedule using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (cron expression)
//!     │
//!     └─► reload asset file ─► Pipeline::run ─► summary logged
//! ```
//!
//! Every tick reloads the asset file so edits apply without a restart. A
//! tick that cannot load the file is skipped; the schedule keeps going.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};
use valuation::{EventSink, Fetcher, Ledger, Pipeline};

use crate::run_once;

/// The scheduler wants a seconds field; plain five-field crontab
/// expressions get one prepended.
pub fn normalize_cron(expression: &str) -> String {
    let expression = expression.trim();
    if expression.split_whitespace().count() == 5 {
        format!("0 {}", expression)
    } else {
        expression.to_string()
    }
}

/// Start the scheduler and block until Ctrl-C.
pub async fn run_scheduled<F, L, E>(
    pipeline: Pipeline<F, L, E>,
    assets_path: PathBuf,
    expression: &str,
) -> Result<()>
where
    F: Fetcher + 'static,
    L: Ledger + 'static,
    E: EventSink + 'static,
{
    let schedule = normalize_cron(expression);
    let pipeline = Arc::new(pipeline);
    let assets_path = Arc::new(assets_path);

    let mut scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule.as_str(), move |_uuid, _lock| {
        let pipeline = Arc::clone(&pipeline);
        let assets_path = Arc::clone(&assets_path);
        Box::pin(async move {
            tracing::info!("Running scheduled valuation");
            if let Err(e) = run_once(&pipeline, &assets_path).await {
                tracing::error!("Scheduled valuation failed: {:#}", e);
            }
        })
    })
    .with_context(|| format!("invalid schedule {:?}", expression))?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %schedule, "Scheduler started");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("Shutting down scheduler");
    scheduler.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cron() {
        assert_eq!(normalize_cron("0 9 * * *"), "0 0 9 * * *");
        assert_eq!(normalize_cron(" 0 0 9 * * MON "), "0 0 9 * * MON");
    }
}
