use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `PUT /v1/assets/{id}`. Unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAssetRequest {
    /// Decimal string, e.g. `"15000"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateAssetRequest {
    pub fn balance(balance: impl Into<String>) -> Self {
        Self {
            balance: Some(balance.into()),
            ..Default::default()
        }
    }
}

/// A manually-managed asset as returned by Lunch Money.
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: Option<String>,
    pub balance: Option<String>,
    pub currency: Option<String>,
    pub balance_as_of: Option<DateTime<Utc>>,
    pub type_name: Option<String>,
    pub institution_name: Option<String>,
}

/// Lunch Money reports some failures with a 2xx status and an `error`
/// field holding either a string or a list of strings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(alias = "errors")]
    pub error: Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.error {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
