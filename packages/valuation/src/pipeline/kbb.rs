//! KBB vehicle valuations.
//!
//! The KBB page is fetched once with a structured extraction for
//! `private_party_value`. Its raw markup usually links a price advisor SVG;
//! when that SVG can be fetched and read, its figure wins over the
//! structured value. The asset's `adjustment` is applied last.

use chrono::NaiveDateTime;

use crate::error::{Result, ValuationError};
use crate::mileage::projected_url;
use crate::parsing::{find_advisor_url, parse_private_party_value, replace_param, resolve_zipcode};
use crate::traits::events::{EventSink, PipelineEvent};
use crate::traits::fetcher::{ExtractionSchema, FetchOutcome, FetchRequest, Fetcher};
use crate::types::asset::AssetRecord;
use crate::types::price::{ExtractedPrice, PriceSource};

use super::artifacts::save_kbb_artifacts;
use super::{read_price_field, PipelineConfig};

/// Value a KBB asset, adjustment included.
pub async fn value_kbb<F, E>(
    fetcher: &F,
    events: &E,
    config: &PipelineConfig,
    asset_id: i64,
    record: &AssetRecord,
    now: NaiveDateTime,
) -> Result<f64>
where
    F: Fetcher + ?Sized,
    E: EventSink + ?Sized,
{
    let (url, mileage) = projected_url(record, now);
    if let Some(mileage) = mileage {
        events.record(PipelineEvent::MileageProjected {
            asset_id,
            mileage,
            url: url.clone(),
        });
    }

    let request = FetchRequest::new(&url, ExtractionSchema::KbbValuation)
        .with_wait_ms(config.kbb_wait_ms)
        .with_artifacts(config.debug_dir.is_some());

    let outcome = fetcher.fetch(&request).await;

    let structured = match &outcome {
        FetchOutcome::Failure { reason } => {
            events.record(PipelineEvent::FetchFailed {
                asset_id,
                url: url.clone(),
                reason: reason.clone(),
            });
            return Err(ValuationError::FetchFailure {
                url,
                reason: reason.clone(),
            });
        }
        FetchOutcome::Structured(page) => {
            if let Some(dir) = &config.debug_dir {
                save_kbb_artifacts(dir, asset_id, page, events).await;
            }
            read_price_field(&page.data, "private_party_value")
        }
        FetchOutcome::Markup(_) => None,
    };

    let markup_price = match outcome.markup() {
        Some(markup) => markup_price(fetcher, events, config, asset_id, record, markup).await,
        None => None,
    };

    let (price, from_markup) = match (markup_price, structured) {
        (Some(price), _) => (ExtractedPrice::new(price, PriceSource::Kbb), true),
        (None, Some(price)) => (ExtractedPrice::new(price, PriceSource::Kbb), false),
        (None, None) => (None, false),
    };

    let price = price.ok_or(ValuationError::PriceNotFound {
        provenance: PriceSource::Kbb,
    })?;

    events.record(PipelineEvent::PriceExtracted {
        asset_id,
        price,
        from_markup,
    });

    Ok(apply_adjustment(events, asset_id, price.value, record.adjustment))
}

/// Price from the advisor SVG linked in `markup`, or from `markup` itself
/// when it already is the SVG.
async fn markup_price<F, E>(
    fetcher: &F,
    events: &E,
    config: &PipelineConfig,
    asset_id: i64,
    record: &AssetRecord,
    markup: &str,
) -> Option<f64>
where
    F: Fetcher + ?Sized,
    E: EventSink + ?Sized,
{
    let Some(advisor_url) = find_advisor_url(markup) else {
        return parse_private_party_value(markup);
    };

    let advisor_url =
        match resolve_zipcode(record.zipcode.as_deref(), &config.default_zipcode) {
            Some(zipcode) => replace_param(&advisor_url, "zipcode", &zipcode),
            None => advisor_url,
        };

    let request = FetchRequest::new(&advisor_url, ExtractionSchema::RawMarkup);
    match fetcher.fetch(&request).await {
        FetchOutcome::Failure { reason } => {
            events.record(PipelineEvent::FetchFailed {
                asset_id,
                url: advisor_url,
                reason,
            });
            None
        }
        outcome => outcome.markup().and_then(parse_private_party_value),
    }
}

fn apply_adjustment<E: EventSink + ?Sized>(
    events: &E,
    asset_id: i64,
    price: f64,
    adjustment: Option<f64>,
) -> f64 {
    match adjustment.filter(|a| *a != 0.0) {
        Some(adjustment) => {
            let adjusted = price + adjustment;
            events.record(PipelineEvent::AdjustmentApplied {
                asset_id,
                adjustment,
                price: adjusted,
            });
            adjusted
        }
        None => price,
    }
}
