//! Pure Lunch Money REST API client.
//!
//! A minimal client for the Lunch Money developer API. Only covers what the
//! asset pricer needs: updating the balance of a manually-managed asset.
//!
//! # Example
//!
//! ```rust,ignore
//! use lunchmoney_client::{LunchMoneyClient, UpdateAssetRequest};
//!
//! let client = LunchMoneyClient::new("your-access-token".into());
//!
//! let asset = client.update_asset(101, &UpdateAssetRequest::balance("15000")).await?;
//! println!("{:?}", asset.balance);
//! ```

pub mod error;
pub mod types;

pub use error::{LunchMoneyError, Result};
pub use types::{Asset, UpdateAssetRequest};

use serde_json::Value;
use types::ErrorBody;

const BASE_URL: &str = "https://dev.lunchmoney.app";

pub struct LunchMoneyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl LunchMoneyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Update a manually-managed asset.
    pub async fn update_asset(&self, asset_id: i64, request: &UpdateAssetRequest) -> Result<Asset> {
        let url = format!("{}/v1/assets/{}", self.base_url, asset_id);
        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LunchMoneyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: Value = resp.json().await?;
        if let Ok(error) = serde_json::from_value::<ErrorBody>(body.clone()) {
            return Err(LunchMoneyError::Rejected(error.message()));
        }

        tracing::debug!(asset_id, "Lunch Money asset updated");

        serde_json::from_value(body).map_err(|e| LunchMoneyError::Rejected(e.to_string()))
    }
}
