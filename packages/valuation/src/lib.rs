//! Asset Valuation Library
//!
//! Values a small book of assets (vehicles, homes) from third-party
//! valuation sites and hands the final figure to a ledger.
//!
//! # Flow
//!
//! ```text
//! AssetBook ──► classify url ──► KBB extractor ─────────┐
//!                     │                                 ├──► ReportingSink ──► Ledger
//!                     └──────► Zillow + Redfin ──► reconcile
//! ```
//!
//! Each asset is valued and reported to completion before the next one
//! starts. Any failure is scoped to its asset; only loading the asset book
//! can fail a whole run.
//!
//! # Usage
//!
//! ```rust,ignore
//! use valuation::{AssetBook, Pipeline, PipelineConfig, ReportingSink, TracingEventSink};
//! use valuation::fetchers::FirecrawlFetcher;
//!
//! let book = AssetBook::load("assets.json")?;
//! let fetcher = FirecrawlFetcher::new(api_key)?;
//! let sink = ReportingSink::new(ledger, dry_run);
//! let pipeline = Pipeline::new(fetcher, sink, TracingEventSink, PipelineConfig::default());
//! let summary = pipeline.run(&book).await;
//! ```
//!
//! # Modules
//!
//! - [`parsing`] - Pure text helpers (currency, query params, zipcodes, KBB markup)
//! - [`mileage`] - Odometer projection and URL rewriting
//! - [`pipeline`] - Source dispatch, extractors, reconciliation and the run loop
//! - [`report`] - Reporting sink in front of the ledger
//! - [`traits`] - Collaborator seams (Fetcher, Ledger, EventSink)
//! - [`fetchers`] - Fetcher implementations
//! - [`testing`] - Mock collaborators for tests

pub mod error;
pub mod fetchers;
pub mod mileage;
pub mod parsing;
pub mod pipeline;
pub mod report;
pub mod testing;
pub mod traits;
pub mod types;

pub use error::{ConfigError, FetchError, ParseError, ValuationError};
pub use pipeline::{
    reconcile, AssetFailure, Pipeline, PipelineConfig, RunSummary, SourceKind, INVALID_RECORD,
};
pub use report::{ReportOutcome, ReportingSink};
pub use traits::{
    events::{EventSink, PipelineEvent, TracingEventSink},
    fetcher::{ExtractionSchema, FetchOutcome, FetchRequest, Fetcher, StructuredPage},
    ledger::{Ledger, LedgerError},
};
pub use types::{
    asset::{AssetBook, AssetRecord, SkippedRecord, DEFAULT_YEARLY_MILEAGE},
    price::{ExtractedPrice, PriceSource},
};

pub use fetchers::MockFetcher;

#[cfg(feature = "firecrawl")]
pub use fetchers::FirecrawlFetcher;

pub use testing::{MockLedger, RecordingEventSink};
