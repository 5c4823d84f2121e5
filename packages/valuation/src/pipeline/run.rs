//! The run loop: value and report every asset in the book, one at a time.

use chrono::NaiveDateTime;

use crate::error::{Result, ValuationError};
use crate::report::{ReportOutcome, ReportingSink};
use crate::traits::events::{EventSink, PipelineEvent};
use crate::traits::fetcher::Fetcher;
use crate::traits::ledger::Ledger;
use crate::types::asset::{AssetBook, AssetRecord};
use crate::types::price::PriceSource;

use super::dispatch::SourceKind;
use super::kbb::value_kbb;
use super::property::value_property;
use super::reconcile::reconcile;
use super::PipelineConfig;

/// Failure kind for asset file entries that could not be read.
pub const INVALID_RECORD: &str = "invalid_record";

/// One asset that did not make it to the ledger this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFailure {
    pub asset_id: i64,
    pub kind: &'static str,
    pub detail: String,
}

/// Tally of a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `(asset_id, balance)` written to the ledger
    pub reported: Vec<(i64, String)>,
    /// `(asset_id, balance)` that would have been written
    pub dry_run: Vec<(i64, String)>,
    pub failures: Vec<AssetFailure>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Values assets and reports them through a [`ReportingSink`].
pub struct Pipeline<F, L, E> {
    fetcher: F,
    sink: ReportingSink<L>,
    events: E,
    config: PipelineConfig,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

impl<F, L, E> Pipeline<F, L, E>
where
    F: Fetcher,
    L: Ledger,
    E: EventSink,
{
    pub fn new(fetcher: F, sink: ReportingSink<L>, events: E, config: PipelineConfig) -> Self {
        Self {
            fetcher,
            sink,
            events,
            config,
            clock: local_now,
        }
    }

    /// Replace the wall clock used for mileage projection.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Process every asset in file order. Never fails as a whole.
    pub async fn run(&self, book: &AssetBook) -> RunSummary {
        let mut summary = RunSummary::default();

        for skipped in book.skipped() {
            self.fail(&mut summary, skipped.asset_id, INVALID_RECORD, skipped.reason.clone());
        }

        for (asset_id, record) in book.iter() {
            match self.process(asset_id, record).await {
                Ok(ReportOutcome::Sent { balance }) => summary.reported.push((asset_id, balance)),
                Ok(ReportOutcome::DryRun { balance }) => summary.dry_run.push((asset_id, balance)),
                Err(e) => self.fail(&mut summary, asset_id, e.kind(), e.to_string()),
            }
        }

        self.events.record(PipelineEvent::RunFinished {
            reported: summary.reported.len(),
            dry_run: summary.dry_run.len(),
            failed: summary.failures.len(),
        });

        summary
    }

    fn fail(&self, summary: &mut RunSummary, asset_id: i64, kind: &'static str, detail: String) {
        self.events.record(PipelineEvent::AssetFailed {
            asset_id,
            kind,
            detail: detail.clone(),
        });
        summary.failures.push(AssetFailure {
            asset_id,
            kind,
            detail,
        });
    }

    /// Value and report a single asset.
    pub async fn process(&self, asset_id: i64, record: &AssetRecord) -> Result<ReportOutcome> {
        self.events.record(PipelineEvent::AssetStarted {
            asset_id,
            url: record.url.clone(),
        });

        let price = self.value_asset(asset_id, record).await?;
        self.events
            .record(PipelineEvent::FinalPrice { asset_id, price });

        let outcome = self.sink.report(asset_id, price).await?;
        match &outcome {
            ReportOutcome::Sent { balance } => self.events.record(PipelineEvent::Reported {
                asset_id,
                balance: balance.clone(),
            }),
            ReportOutcome::DryRun { balance } => self.events.record(PipelineEvent::DryRun {
                asset_id,
                balance: balance.clone(),
            }),
        }

        Ok(outcome)
    }

    /// Final price for one asset, without reporting it.
    pub async fn value_asset(&self, asset_id: i64, record: &AssetRecord) -> Result<f64> {
        match SourceKind::classify(&record.url) {
            SourceKind::Kbb => {
                value_kbb(
                    &self.fetcher,
                    &self.events,
                    &self.config,
                    asset_id,
                    record,
                    (self.clock)(),
                )
                .await
            }
            SourceKind::Zillow => self.value_home(asset_id, record).await,
            SourceKind::Unsupported => Err(ValuationError::UnsupportedSource {
                url: record.url.clone(),
            }),
        }
    }

    async fn value_home(&self, asset_id: i64, record: &AssetRecord) -> Result<f64> {
        let zillow = value_property(
            &self.fetcher,
            &self.events,
            asset_id,
            &record.url,
            PriceSource::Zillow,
        )
        .await;

        let Some(redfin_url) = record.redfin_url.as_deref() else {
            return zillow.map(|p| p.value);
        };

        let redfin = value_property(
            &self.fetcher,
            &self.events,
            asset_id,
            redfin_url,
            PriceSource::Redfin,
        )
        .await;

        match (zillow, redfin) {
            (Ok(z), Ok(r)) => {
                let average = reconcile(Some(z.value), Some(r.value)).unwrap_or(z.value);
                self.events.record(PipelineEvent::PricesAveraged {
                    asset_id,
                    zillow: z.value,
                    redfin: r.value,
                    average,
                });
                Ok(average)
            }
            (Ok(z), Err(e)) => {
                self.note_missing(asset_id, PriceSource::Redfin, &e);
                Ok(z.value)
            }
            (Err(e), Ok(r)) => {
                self.note_missing(asset_id, PriceSource::Zillow, &e);
                Ok(r.value)
            }
            (Err(zillow_err), Err(redfin_err)) => {
                self.note_missing(asset_id, PriceSource::Redfin, &redfin_err);
                Err(zillow_err)
            }
        }
    }

    fn note_missing(&self, asset_id: i64, source: PriceSource, error: &ValuationError) {
        self.events.record(PipelineEvent::SourceMissing {
            asset_id,
            source,
            detail: error.to_string(),
        });
    }
}
