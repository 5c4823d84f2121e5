//! Valuation pipeline.
//!
//! # Flow
//!
//! ```text
//! AssetRecord
//!     │
//!     ├─► dispatch (kbb.com / zillow.com / unsupported)
//!     │
//!     ├─► kbb: project mileage ─► fetch page ─► advisor svg ─► adjust
//!     │
//!     └─► zillow (+ redfin) ─► reconcile
//!             │
//!             └─► ReportingSink
//! ```

pub mod artifacts;
pub mod dispatch;
pub mod kbb;
pub mod property;
pub mod reconcile;
pub mod run;

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::parsing::currency::parse_currency;
use crate::parsing::zipcode::FALLBACK_ZIPCODE;

pub use dispatch::SourceKind;
pub use kbb::value_kbb;
pub use property::value_property;
pub use reconcile::reconcile;
pub use run::{AssetFailure, Pipeline, RunSummary, INVALID_RECORD};

/// How long KBB pages get to render their price gauge.
pub const DEFAULT_KBB_WAIT_MS: u64 = 5_000;

/// Process-wide settings for a run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Zipcode used when an asset has none or an invalid one
    pub default_zipcode: String,

    /// Render wait for the KBB page (milliseconds)
    pub kbb_wait_ms: u64,

    /// Where to write KBB html/screenshot captures; `None` disables capture
    pub debug_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_zipcode: FALLBACK_ZIPCODE.to_string(),
            kbb_wait_ms: DEFAULT_KBB_WAIT_MS,
            debug_dir: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_default_zipcode(mut self, zipcode: impl Into<String>) -> Self {
        self.default_zipcode = zipcode.into();
        self
    }

    pub fn with_kbb_wait_ms(mut self, wait_ms: u64) -> Self {
        self.kbb_wait_ms = wait_ms;
        self
    }

    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }
}

/// Read a price out of a structured extraction field.
///
/// Numbers are taken as-is, strings go through the currency parser.
pub(crate) fn read_price_field(data: &Map<String, Value>, key: &str) -> Option<f64> {
    match data.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_currency(Some(s)).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_read_price_field() {
        assert_eq!(read_price_field(&map(json!({"price": 425000})), "price"), Some(425000.0));
        assert_eq!(
            read_price_field(&map(json!({"price": "$425,000"})), "price"),
            Some(425000.0)
        );
        assert_eq!(read_price_field(&map(json!({"price": null})), "price"), None);
        assert_eq!(read_price_field(&map(json!({"price": "n/a"})), "price"), None);
        assert_eq!(read_price_field(&map(json!({})), "price"), None);
    }
}
