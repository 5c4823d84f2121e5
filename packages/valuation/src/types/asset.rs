//! Asset records and the asset book loaded from disk.

use std::path::Path;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};

/// Miles per year assumed when a record does not say.
pub const DEFAULT_YEARLY_MILEAGE: i64 = 12_000;

/// One tracked asset, as written in the asset file.
///
/// Field names follow the file format (`mileageStart`, `redfin`, ...);
/// snake_case spellings are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Valuation page; its host decides the source type
    pub url: String,

    /// Second opinion for Zillow assets
    #[serde(default, rename = "redfin", alias = "redfinUrl", alias = "redfin_url")]
    pub redfin_url: Option<String>,

    /// Odometer reading at `mileage_date`
    #[serde(default, alias = "mileage_start")]
    pub mileage_start: Option<i64>,

    #[serde(default, alias = "mileage_date")]
    pub mileage_date: Option<NaiveDate>,

    #[serde(default, alias = "yearly_mileage")]
    pub yearly_mileage: Option<i64>,

    /// Signed dollar amount added to the KBB price
    #[serde(default)]
    pub adjustment: Option<f64>,

    #[serde(default, deserialize_with = "string_or_number")]
    pub zipcode: Option<String>,
}

impl AssetRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            redfin_url: None,
            mileage_start: None,
            mileage_date: None,
            yearly_mileage: None,
            adjustment: None,
            zipcode: None,
        }
    }

    pub fn with_redfin(mut self, url: impl Into<String>) -> Self {
        self.redfin_url = Some(url.into());
        self
    }

    pub fn with_mileage(mut self, start: i64, date: NaiveDate) -> Self {
        self.mileage_start = Some(start);
        self.mileage_date = Some(date);
        self
    }

    pub fn with_yearly_mileage(mut self, miles: i64) -> Self {
        self.yearly_mileage = Some(miles);
        self
    }

    pub fn with_adjustment(mut self, adjustment: f64) -> Self {
        self.adjustment = Some(adjustment);
        self
    }

    pub fn with_zipcode(mut self, zipcode: impl Into<String>) -> Self {
        self.zipcode = Some(zipcode.into());
        self
    }

    /// Mileage inputs, only when both the start reading and its date are set.
    pub fn mileage_inputs(&self) -> Option<(i64, NaiveDate, i64)> {
        match (self.mileage_start, self.mileage_date) {
            (Some(start), Some(date)) => Some((
                start,
                date,
                self.yearly_mileage.unwrap_or(DEFAULT_YEARLY_MILEAGE),
            )),
            _ => None,
        }
    }
}

/// Zipcodes show up as both `"80110"` and `80110` in hand-written files.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// An asset file entry that could not be read as an [`AssetRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub asset_id: i64,
    pub reason: String,
}

/// All assets of a run, keyed by integer ledger id in file order.
///
/// Entries that fail to deserialize, or carry a blank `url`, are set aside
/// in [`skipped`](Self::skipped) instead of failing the whole file.
#[derive(Debug, Clone, Default)]
pub struct AssetBook {
    assets: IndexMap<i64, AssetRecord>,
    skipped: Vec<SkippedRecord>,
}

impl AssetBook {
    /// Read and parse the asset file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse an asset file body.
    ///
    /// Malformed JSON and non-integer keys are fatal; a bad record is not.
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let parsed: IndexMap<String, Value> = serde_json::from_str(raw)?;

        let mut book = Self::default();
        for (key, value) in parsed {
            let asset_id = key
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidAssetId(key.clone()))?;

            match serde_json::from_value::<AssetRecord>(value) {
                Ok(record) if record.url.trim().is_empty() => book.skipped.push(SkippedRecord {
                    asset_id,
                    reason: "url is empty".to_string(),
                }),
                Ok(record) => {
                    book.assets.insert(asset_id, record);
                }
                Err(e) => book.skipped.push(SkippedRecord {
                    asset_id,
                    reason: e.to_string(),
                }),
            }
        }

        Ok(book)
    }

    pub fn get(&self, asset_id: i64) -> Option<&AssetRecord> {
        self.assets.get(&asset_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &AssetRecord)> {
        self.assets.iter().map(|(id, record)| (*id, record))
    }

    /// Entries left out of the book, in file order.
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FromIterator<(i64, AssetRecord)> for AssetBook {
    fn from_iter<T: IntoIterator<Item = (i64, AssetRecord)>>(iter: T) -> Self {
        Self {
            assets: iter.into_iter().collect(),
            skipped: Vec::new(),
        }
    }
}
