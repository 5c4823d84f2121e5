//! Typed errors for the valuation library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell
//! a fatal configuration problem from a per-asset failure.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::price::PriceSource;

/// Per-asset failures. None of these abort a run.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// URL matches no known valuation site
    #[error("unsupported source: {url}")]
    UnsupportedSource { url: String },

    /// Network error, timeout or anti-bot block while fetching
    #[error("fetch failed for {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    /// Fetch succeeded but nothing usable could be extracted
    #[error("no {provenance} price found")]
    PriceNotFound { provenance: PriceSource },

    /// Price was computed but the ledger rejected or never received it
    #[error("ledger update failed for asset {asset_id}: {message}")]
    ReportingFailure { asset_id: i64, message: String },
}

impl ValuationError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ValuationError::UnsupportedSource { .. } => "unsupported_source",
            ValuationError::FetchFailure { .. } => "fetch_failure",
            ValuationError::PriceNotFound { .. } => "price_not_found",
            ValuationError::ReportingFailure { .. } => "reporting_failure",
        }
    }
}

/// Startup errors. These are the only errors that stop a run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Asset file missing or unreadable
    #[error("cannot read asset file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Asset file is not valid JSON for the asset schema
    #[error("invalid asset file: {0}")]
    Json(#[from] serde_json::Error),

    /// Asset key does not map to an integer ledger id
    #[error("asset id {0:?} is not an integer ledger id")]
    InvalidAssetId(String),

    /// Required credential not present in the environment
    #[error("missing credential: {0} must be set")]
    MissingCredential(&'static str),
}

/// Currency string with no numeric form left after stripping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse {input:?} as a number")]
pub struct ParseError {
    pub input: String,
}

/// Errors raised inside a fetcher before they are folded into a
/// [`FetchOutcome::Failure`](crate::traits::fetcher::FetchOutcome).
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote API answered with an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Remote API answered 2xx but reported failure or returned nothing
    #[error("empty response: {0}")]
    Empty(String),
}

/// Result type alias for per-asset valuation operations.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Result type alias for startup configuration.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetcher internals.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
