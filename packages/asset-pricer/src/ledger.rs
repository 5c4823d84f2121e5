//! Lunch Money as the valuation ledger.

use async_trait::async_trait;
use lunchmoney_client::{LunchMoneyClient, UpdateAssetRequest};
use valuation::{Ledger, LedgerError};

pub struct LunchMoneyLedger {
    client: LunchMoneyClient,
}

impl LunchMoneyLedger {
    pub fn new(client: LunchMoneyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Ledger for LunchMoneyLedger {
    async fn update_balance(&self, asset_id: i64, balance: &str) -> Result<(), LedgerError> {
        self.client
            .update_asset(asset_id, &UpdateAssetRequest::balance(balance))
            .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "lunchmoney"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_update_balance_puts_asset() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/assets/202"))
            .and(body_json(json!({"balance": "405000"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 202})))
            .expect(1)
            .mount(&server)
            .await;

        let ledger = LunchMoneyLedger::new(
            LunchMoneyClient::new("lm-test".into()).with_base_url(server.uri()),
        );

        ledger.update_balance(202, "405000").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejection_surfaces_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/assets/9"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "Asset not found"})),
            )
            .mount(&server)
            .await;

        let ledger = LunchMoneyLedger::new(
            LunchMoneyClient::new("lm-test".into()).with_base_url(server.uri()),
        );

        let err = ledger.update_balance(9, "1").await.unwrap_err();
        assert!(err.to_string().contains("Asset not found"));
    }
}
