//! Zillow and Redfin home valuations.

use crate::error::{Result, ValuationError};
use crate::parsing::parse_currency;
use crate::traits::events::{EventSink, PipelineEvent};
use crate::traits::fetcher::{ExtractionSchema, FetchOutcome, FetchRequest, Fetcher};
use crate::types::price::{ExtractedPrice, PriceSource};

use super::read_price_field;

/// Fetch `url` and read its single `price` field.
pub async fn value_property<F, E>(
    fetcher: &F,
    events: &E,
    asset_id: i64,
    url: &str,
    source: PriceSource,
) -> Result<ExtractedPrice>
where
    F: Fetcher + ?Sized,
    E: EventSink + ?Sized,
{
    let request = FetchRequest::new(url, ExtractionSchema::Price);

    let value = match fetcher.fetch(&request).await {
        FetchOutcome::Failure { reason } => {
            events.record(PipelineEvent::FetchFailed {
                asset_id,
                url: url.to_string(),
                reason: reason.clone(),
            });
            return Err(ValuationError::FetchFailure {
                url: url.to_string(),
                reason,
            });
        }
        FetchOutcome::Structured(page) => read_price_field(&page.data, "price"),
        FetchOutcome::Markup(text) => parse_currency(Some(text.trim())).ok(),
    };

    let price = value
        .and_then(|v| ExtractedPrice::new(v, source))
        .ok_or(ValuationError::PriceNotFound { provenance: source })?;

    events.record(PipelineEvent::PriceExtracted {
        asset_id,
        price,
        from_markup: false,
    });

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::MockFetcher;
    use crate::testing::RecordingEventSink;
    use crate::traits::fetcher::StructuredPage;
    use serde_json::json;

    const ZILLOW: &str = "https://www.zillow.com/homedetails/1_zpid/";

    fn structured(value: serde_json::Value) -> FetchOutcome {
        FetchOutcome::Structured(StructuredPage::new(value.as_object().cloned().unwrap()))
    }

    #[tokio::test]
    async fn test_numeric_price() {
        let fetcher = MockFetcher::new().with_outcome(ZILLOW, structured(json!({"price": 425000.0})));
        let events = RecordingEventSink::new();

        let price = value_property(&fetcher, &events, 9, ZILLOW, PriceSource::Zillow)
            .await
            .unwrap();

        assert_eq!(price.value, 425000.0);
        assert_eq!(price.source, PriceSource::Zillow);
        assert_eq!(fetcher.fetch_calls()[0].schema, ExtractionSchema::Price);
    }

    #[tokio::test]
    async fn test_markup_price() {
        let fetcher = MockFetcher::new().with_outcome(ZILLOW, FetchOutcome::Markup(" $512,300 ".into()));

        let price = value_property(&fetcher, &RecordingEventSink::new(), 9, ZILLOW, PriceSource::Redfin)
            .await
            .unwrap();

        assert_eq!(price.value, 512300.0);
        assert_eq!(price.source, PriceSource::Redfin);
    }

    #[tokio::test]
    async fn test_missing_or_zero_price() {
        for body in [json!({}), json!({"price": 0}), json!({"price": "call for price"})] {
            let fetcher = MockFetcher::new().with_outcome(ZILLOW, structured(body));
            let err = value_property(&fetcher, &RecordingEventSink::new(), 9, ZILLOW, PriceSource::Zillow)
                .await
                .unwrap_err();
            assert!(matches!(err, ValuationError::PriceNotFound { .. }));
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_recorded() {
        let fetcher = MockFetcher::new().with_outcome(ZILLOW, FetchOutcome::failure("timeout"));
        let events = RecordingEventSink::new();

        let err = value_property(&fetcher, &events, 9, ZILLOW, PriceSource::Zillow)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "fetch_failure");
        assert!(events.contains(&PipelineEvent::FetchFailed {
            asset_id: 9,
            url: ZILLOW.to_string(),
            reason: "timeout".to_string(),
        }));
    }
}
