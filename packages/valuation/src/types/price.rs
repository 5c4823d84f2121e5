//! Extracted prices and their provenance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Site a price was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Kbb,
    Zillow,
    Redfin,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::Kbb => "kbb",
            PriceSource::Zillow => "zillow",
            PriceSource::Redfin => "redfin",
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A price pulled out of a fetch result, before any adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPrice {
    pub value: f64,
    pub source: PriceSource,
}

impl ExtractedPrice {
    /// Accepts finite, strictly positive values only.
    ///
    /// A zero price is what a missing or blank field parses to, so it is
    /// treated the same as no price at all.
    pub fn new(value: f64, source: PriceSource) -> Option<Self> {
        if value.is_finite() && value > 0.0 {
            Some(Self { value, source })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_negative() {
        assert!(ExtractedPrice::new(0.0, PriceSource::Zillow).is_none());
        assert!(ExtractedPrice::new(-1.0, PriceSource::Zillow).is_none());
        assert!(ExtractedPrice::new(f64::NAN, PriceSource::Zillow).is_none());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(PriceSource::Kbb.to_string(), "kbb");
        assert_eq!(
            serde_json::to_string(&PriceSource::Redfin).unwrap(),
            "\"redfin\""
        );
    }
}
