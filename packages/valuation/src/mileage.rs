//! Odometer projection for vehicle valuations.
//!
//! KBB prices depend on mileage, so the configured URL carries a
//! `mileage=<n>` parameter. Instead of editing the asset file every month,
//! records store a known reading and its date and the current reading is
//! projected from an average yearly distance.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::parsing::round_half_even;
use crate::types::asset::AssetRecord;

const DAYS_PER_YEAR: f64 = 365.25;
const SECONDS_PER_DAY: f64 = 86_400.0;

static RE_MILEAGE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"mileage=\d+").unwrap());

/// Project the odometer reading at `now`.
///
/// Elapsed time is measured from midnight of `since` in fractional days and
/// may be negative for a future date. The result rounds half to even.
pub fn project_mileage(start: i64, since: NaiveDate, yearly: i64, now: NaiveDateTime) -> i64 {
    let since = since.and_time(NaiveTime::MIN);
    let days_passed = (now - since).num_seconds() as f64 / SECONDS_PER_DAY;
    let travelled = days_passed * yearly as f64 / DAYS_PER_YEAR;

    round_half_even(start as f64 + travelled) as i64
}

/// Rewrite the first `mileage=<digits>` in `url`.
///
/// A URL without the parameter comes back unchanged; nothing is appended.
pub fn substitute_mileage(url: &str, mileage: i64) -> String {
    RE_MILEAGE_PARAM
        .replace(url, format!("mileage={}", mileage).as_str())
        .into_owned()
}

/// Derived valuation URL for a record, with the projected mileage if the
/// record carries mileage inputs.
pub fn projected_url(record: &AssetRecord, now: NaiveDateTime) -> (String, Option<i64>) {
    match record.mileage_inputs() {
        Some((start, since, yearly)) => {
            let mileage = project_mileage(start, since, yearly, now);
            (substitute_mileage(&record.url, mileage), Some(mileage))
        }
        None => (record.url.clone(), None),
    }
}
