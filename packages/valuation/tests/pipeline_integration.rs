//! Integration tests for a full valuation run.
//!
//! These tests drive the pipeline from an asset file body through fetching,
//! extraction, reconciliation and reporting, with mock collaborators at the
//! fetcher and ledger seams.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::json;
use valuation::{
    AssetBook, FetchOutcome, MockFetcher, MockLedger, Pipeline, PipelineConfig, PipelineEvent,
    RecordingEventSink, ReportingSink, StructuredPage,
};

const KBB_PAGE: &str = "https://www.kbb.com/honda/odyssey/2016/?mileage=10000";
const KBB_PROJECTED: &str = "https://www.kbb.com/honda/odyssey/2016/?mileage=22000";
const ADVISOR: &str =
    "https://upa.syndication.kbb.com/usedcar/privateparty/sell/?vehicleid=1&zipcode=55401";
const ZILLOW: &str = "https://www.zillow.com/homedetails/1_zpid/";
const REDFIN: &str = "https://www.redfin.com/CO/Denver/1/home/1";

const ASSETS: &str = r#"{
    "101": {
        "url": "https://www.kbb.com/honda/odyssey/2016/?mileage=10000",
        "mileageStart": 10000,
        "mileageDate": "2024-01-01",
        "adjustment": -500,
        "zipcode": "55401"
    },
    "202": {
        "url": "https://www.zillow.com/homedetails/1_zpid/",
        "redfin": "https://www.redfin.com/CO/Denver/1/home/1"
    },
    "303": {
        "url": "https://www.carvana.com/vehicle/1"
    }
}"#;

/// 365.25 days after the mileage date.
fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 12, 31)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(6, 0, 0).unwrap())
}

fn structured(value: serde_json::Value, markup: Option<&str>) -> FetchOutcome {
    let mut page = StructuredPage::new(value.as_object().cloned().unwrap());
    if let Some(markup) = markup {
        page = page.with_raw_markup(markup);
    }
    FetchOutcome::Structured(page)
}

/// Fetcher answering every page in [`ASSETS`].
fn scripted_fetcher() -> MockFetcher {
    let kbb_markup = r#"<script>{"href":"https://upa.syndication.kbb.com/usedcar/privateparty/sell/?vehicleid=1&amp;zipcode=00000"}</script>"#;
    let svg = r#"<svg><text x="1">Private Party Value</text><text x="2">$15,500</text></svg>"#;

    MockFetcher::new()
        .with_outcome(
            KBB_PROJECTED,
            structured(json!({"private_party_value": 15000}), Some(kbb_markup)),
        )
        .with_outcome(ADVISOR, FetchOutcome::Markup(svg.to_string()))
        .with_outcome(ZILLOW, structured(json!({"price": 400000}), None))
        .with_outcome(REDFIN, structured(json!({"price": "$410,001"}), None))
}

#[tokio::test]
async fn test_full_run_reports_each_asset() {
    let book = AssetBook::from_json(ASSETS).unwrap();
    let fetcher = scripted_fetcher();
    let ledger = MockLedger::new();
    let events = RecordingEventSink::new();

    let pipeline = Pipeline::new(
        fetcher.clone(),
        ReportingSink::new(ledger.clone(), false),
        events.clone(),
        PipelineConfig::default(),
    )
    .with_clock(fixed_now);

    let summary = pipeline.run(&book).await;

    // Advisor $15,500 beats structured 15000, then -500. The home average
    // of 405000.5 rounds half to even.
    assert_eq!(
        ledger.updates(),
        vec![(101, "15000".to_string()), (202, "405000".to_string())]
    );
    assert_eq!(summary.reported.len(), 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].asset_id, 303);
    assert_eq!(summary.failures[0].kind, "unsupported_source");

    assert!(fetcher.was_fetched(KBB_PROJECTED));
    assert!(!fetcher.was_fetched(KBB_PAGE));
    assert!(events.contains(&PipelineEvent::MileageProjected {
        asset_id: 101,
        mileage: 22_000,
        url: KBB_PROJECTED.to_string(),
    }));
    assert!(events.contains(&PipelineEvent::PricesAveraged {
        asset_id: 202,
        zillow: 400000.0,
        redfin: 410001.0,
        average: 405000.0,
    }));
    assert!(events.contains(&PipelineEvent::RunFinished {
        reported: 2,
        dry_run: 0,
        failed: 1,
    }));
}

#[tokio::test]
async fn test_dry_run_never_touches_ledger() {
    let book = AssetBook::from_json(ASSETS).unwrap();
    let ledger = MockLedger::new();

    let pipeline = Pipeline::new(
        scripted_fetcher(),
        ReportingSink::new(ledger.clone(), true),
        RecordingEventSink::new(),
        PipelineConfig::default(),
    )
    .with_clock(fixed_now);

    let summary = pipeline.run(&book).await;

    assert_eq!(ledger.attempts(), 0);
    assert!(summary.reported.is_empty());
    assert_eq!(
        summary.dry_run,
        vec![(101, "15000".to_string()), (202, "405000".to_string())]
    );
}

#[tokio::test]
async fn test_failures_stay_with_their_asset() {
    let book = AssetBook::from_json(ASSETS).unwrap();
    // KBB page blocked, Zillow fine, Redfin missing
    let fetcher = MockFetcher::new()
        .with_outcome(KBB_PROJECTED, FetchOutcome::failure("403 blocked"))
        .with_outcome(ZILLOW, structured(json!({"price": 400000}), None));
    let ledger = MockLedger::new();
    let events = RecordingEventSink::new();

    let pipeline = Pipeline::new(
        fetcher,
        ReportingSink::new(ledger.clone(), false),
        events.clone(),
        PipelineConfig::default(),
    )
    .with_clock(fixed_now);

    let summary = pipeline.run(&book).await;

    assert_eq!(ledger.updates(), vec![(202, "400000".to_string())]);
    let kinds: Vec<(i64, &str)> = summary
        .failures
        .iter()
        .map(|f| (f.asset_id, f.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![(101, "fetch_failure"), (303, "unsupported_source")]
    );
    assert_eq!(
        events.count(|e| matches!(e, PipelineEvent::SourceMissing { asset_id: 202, .. })),
        1
    );
}

#[tokio::test]
async fn test_ledger_rejection_is_reported_per_asset() {
    let book = AssetBook::from_json(ASSETS).unwrap();
    let ledger = MockLedger::new().failing_for(101, "asset not found");

    let pipeline = Pipeline::new(
        scripted_fetcher(),
        ReportingSink::new(ledger.clone(), false),
        RecordingEventSink::new(),
        PipelineConfig::default(),
    )
    .with_clock(fixed_now);

    let summary = pipeline.run(&book).await;

    assert_eq!(summary.failures[0].asset_id, 101);
    assert_eq!(summary.failures[0].kind, "reporting_failure");
    assert!(summary.failures[0].detail.contains("asset not found"));
    assert_eq!(ledger.updates(), vec![(202, "405000".to_string())]);
}
