//! Fetcher trait for pluggable page retrieval.
//!
//! A fetcher turns a URL plus an extraction schema into either structured
//! data, raw markup, or a failure reason. It never returns an error: any
//! network error, timeout or anti-bot block becomes
//! [`FetchOutcome::Failure`] so a bad page can only cost its own asset.
//!
//! # Usage
//!
//! ```rust,ignore
//! use valuation::traits::fetcher::{ExtractionSchema, FetchRequest, Fetcher};
//!
//! let request = FetchRequest::new(url, ExtractionSchema::Price);
//! match fetcher.fetch(&request).await {
//!     FetchOutcome::Structured(page) => { /* read page.data["price"] */ }
//!     FetchOutcome::Markup(text) => { /* parse text */ }
//!     FetchOutcome::Failure { reason } => { /* give up on this asset */ }
//! }
//! ```

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields the scraper is asked to pull from a KBB valuation page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KbbExtraction {
    /// The Private Party Value or Fair Market Value for a private sale.
    pub private_party_value: f64,

    /// The Trade-in Value of the vehicle.
    pub trade_in_value: Option<f64>,

    /// The Typical Listing Price or Retail Value.
    pub typical_listing_price: Option<f64>,
}

/// Single price field for property pages.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PriceExtraction {
    /// The price or value of the asset/home/car.
    pub price: f64,
}

/// What the fetcher should extract from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSchema {
    /// KBB valuation fields plus the raw page markup
    KbbValuation,
    /// A single `price` field
    Price,
    /// Raw markup only, no structured extraction
    RawMarkup,
}

impl ExtractionSchema {
    /// JSON schema sent to structured-extraction backends.
    pub fn json_schema(&self) -> Option<Value> {
        let schema = match self {
            ExtractionSchema::KbbValuation => schemars::schema_for!(KbbExtraction),
            ExtractionSchema::Price => schemars::schema_for!(PriceExtraction),
            ExtractionSchema::RawMarkup => return None,
        };
        serde_json::to_value(schema).ok()
    }

    /// Natural-language hint that accompanies the schema.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            ExtractionSchema::KbbValuation => Some(
                "Extract the different valuation prices for this vehicle. Look for the \
                 'Private Party Value' which is the main highlighted price value in the \
                 pricing section. This value is typically displayed prominently in the \
                 center of a price gauge or chart. Also extract 'Trade-in Value' and \
                 'Typical Listing Price' if available.",
            ),
            ExtractionSchema::Price | ExtractionSchema::RawMarkup => None,
        }
    }
}

/// A single fetch to perform.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub schema: ExtractionSchema,

    /// Let client-side rendering settle before capture (milliseconds)
    pub wait_ms: Option<u64>,

    /// Also capture rendered html and a screenshot for debugging
    pub capture_artifacts: bool,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, schema: ExtractionSchema) -> Self {
        Self {
            url: url.into(),
            schema,
            wait_ms: None,
            capture_artifacts: false,
        }
    }

    pub fn with_wait_ms(mut self, wait_ms: u64) -> Self {
        self.wait_ms = Some(wait_ms);
        self
    }

    pub fn with_artifacts(mut self, capture: bool) -> Self {
        self.capture_artifacts = capture;
        self
    }
}

/// Structured extraction result, with whatever else the backend captured.
#[derive(Debug, Clone, Default)]
pub struct StructuredPage {
    pub data: Map<String, Value>,
    pub raw_markup: Option<String>,
    pub html: Option<String>,
    /// Data URL, bare base64, or a remote URL depending on the backend
    pub screenshot: Option<String>,
}

impl StructuredPage {
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    pub fn with_raw_markup(mut self, markup: impl Into<String>) -> Self {
        self.raw_markup = Some(markup.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_screenshot(mut self, screenshot: impl Into<String>) -> Self {
        self.screenshot = Some(screenshot.into());
        self
    }
}

/// Result of one fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Structured(StructuredPage),
    Markup(String),
    Failure { reason: String },
}

impl FetchOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        FetchOutcome::Failure {
            reason: reason.into(),
        }
    }

    /// Raw markup, from either variant that carries it.
    pub fn markup(&self) -> Option<&str> {
        match self {
            FetchOutcome::Structured(page) => page.raw_markup.as_deref(),
            FetchOutcome::Markup(text) => Some(text),
            FetchOutcome::Failure { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchOutcome::Failure { .. })
    }
}

/// Fetcher trait for retrieving valuation pages.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch one page. Failures are reported in-band.
    async fn fetch(&self, request: &FetchRequest) -> FetchOutcome;

    /// Get the fetcher name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
        (**self).fetch(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
