//! Structured pipeline events.
//!
//! The pipeline never logs directly; it hands every notable step to an
//! [`EventSink`]. Production code uses [`TracingEventSink`], tests use
//! [`RecordingEventSink`](crate::testing::RecordingEventSink) and assert on
//! the recorded events.

use serde::Serialize;

use crate::types::price::{ExtractedPrice, PriceSource};

/// Something worth recording while valuing and reporting assets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    AssetStarted {
        asset_id: i64,
        url: String,
    },
    MileageProjected {
        asset_id: i64,
        mileage: i64,
        url: String,
    },
    FetchFailed {
        asset_id: i64,
        url: String,
        reason: String,
    },
    PriceExtracted {
        asset_id: i64,
        price: ExtractedPrice,
        from_markup: bool,
    },
    AdjustmentApplied {
        asset_id: i64,
        adjustment: f64,
        price: f64,
    },
    PricesAveraged {
        asset_id: i64,
        zillow: f64,
        redfin: f64,
        average: f64,
    },
    SourceMissing {
        asset_id: i64,
        source: PriceSource,
        detail: String,
    },
    ArtifactSaved {
        asset_id: i64,
        path: String,
    },
    ArtifactSkipped {
        asset_id: i64,
        reason: String,
    },
    FinalPrice {
        asset_id: i64,
        price: f64,
    },
    Reported {
        asset_id: i64,
        balance: String,
    },
    DryRun {
        asset_id: i64,
        balance: String,
    },
    AssetFailed {
        asset_id: i64,
        kind: &'static str,
        detail: String,
    },
    RunFinished {
        reported: usize,
        dry_run: usize,
        failed: usize,
    },
}

/// Receives pipeline events.
pub trait EventSink: Send + Sync {
    fn record(&self, event: PipelineEvent);
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn record(&self, event: PipelineEvent) {
        (**self).record(event)
    }
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn record(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::AssetStarted { asset_id, url } => {
                tracing::info!(asset_id, url = %url, "processing asset");
            }
            PipelineEvent::MileageProjected {
                asset_id,
                mileage,
                url,
            } => {
                tracing::info!(asset_id, mileage, url = %url, "calculated mileage");
            }
            PipelineEvent::FetchFailed {
                asset_id,
                url,
                reason,
            } => {
                tracing::error!(asset_id, url = %url, error = %reason, "fetch failed");
            }
            PipelineEvent::PriceExtracted {
                asset_id,
                price,
                from_markup,
            } => {
                tracing::info!(
                    asset_id,
                    source = %price.source,
                    price = price.value,
                    from_markup,
                    "extracted price"
                );
            }
            PipelineEvent::AdjustmentApplied {
                asset_id,
                adjustment,
                price,
            } => {
                tracing::info!(asset_id, adjustment, price, "applied adjustment");
            }
            PipelineEvent::PricesAveraged {
                asset_id,
                zillow,
                redfin,
                average,
            } => {
                tracing::info!(asset_id, zillow, redfin, average, "averaged price");
            }
            PipelineEvent::SourceMissing {
                asset_id,
                source,
                detail,
            } => {
                tracing::warn!(asset_id, source = %source, error = %detail, "no price from source");
            }
            PipelineEvent::ArtifactSaved { asset_id, path } => {
                tracing::info!(asset_id, path = %path, "debug artifact saved");
            }
            PipelineEvent::ArtifactSkipped { asset_id, reason } => {
                tracing::warn!(asset_id, reason = %reason, "debug artifact skipped");
            }
            PipelineEvent::FinalPrice { asset_id, price } => {
                tracing::info!(asset_id, price, "final price");
            }
            PipelineEvent::Reported { asset_id, balance } => {
                tracing::info!(asset_id, balance = %balance, "updated ledger asset");
            }
            PipelineEvent::DryRun { asset_id, balance } => {
                tracing::info!(asset_id, balance = %balance, "dry run: skipping update");
            }
            PipelineEvent::AssetFailed {
                asset_id,
                kind,
                detail,
            } => {
                if kind == "unsupported_source" || kind == crate::pipeline::INVALID_RECORD {
                    tracing::warn!(asset_id, kind, error = %detail, "asset skipped");
                } else {
                    tracing::error!(asset_id, kind, error = %detail, "asset failed");
                }
            }
            PipelineEvent::RunFinished {
                reported,
                dry_run,
                failed,
            } => {
                tracing::info!(reported, dry_run, failed, "run finished");
            }
        }
    }
}
