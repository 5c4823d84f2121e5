//! Firecrawl-based fetcher implementation.
//!
//! Uses the Firecrawl scrape API for JavaScript-heavy valuation pages with
//! anti-bot protection. Structured fields come back from its `json` format;
//! raw markup, rendered html and screenshots from the matching formats.
//!
//! Requires the `firecrawl` feature to be enabled.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{
    ExtractionSchema, FetchOutcome, FetchRequest, Fetcher, StructuredPage,
};

const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

/// Firecrawl-based fetcher for valuation pages.
///
/// # Example
///
/// ```rust,ignore
/// use valuation::fetchers::FirecrawlFetcher;
///
/// let fetcher = FirecrawlFetcher::new(api_key)?;
/// let outcome = fetcher.fetch(&request).await;
/// ```
pub struct FirecrawlFetcher {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

// Request/Response types for Firecrawl API

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest {
    url: String,
    formats: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    json_options: Option<JsonOptions>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    actions: Vec<Action>,
    only_main_content: bool,
}

#[derive(Serialize)]
struct JsonOptions {
    schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'static str>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Action {
    Wait { milliseconds: u64 },
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ScrapeData {
    json: Option<Value>,
    raw_html: Option<String>,
    html: Option<String>,
    screenshot: Option<String>,
}

impl FirecrawlFetcher {
    /// Create a new Firecrawl fetcher with the given API key.
    pub fn new(api_key: impl Into<SecretString>) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: FIRECRAWL_API_URL.to_string(),
        })
    }

    /// Point at a different API root (self-hosted Firecrawl, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request(request: &FetchRequest) -> ScrapeRequest {
        let mut formats = Vec::new();

        let json_options = request.schema.json_schema().map(|schema| {
            formats.push("json");
            JsonOptions {
                schema,
                prompt: request.schema.prompt(),
            }
        });

        match request.schema {
            ExtractionSchema::KbbValuation | ExtractionSchema::RawMarkup => formats.push("rawHtml"),
            ExtractionSchema::Price => {}
        }

        if request.capture_artifacts {
            formats.push("html");
            formats.push("screenshot");
        }

        ScrapeRequest {
            url: request.url.clone(),
            formats,
            json_options,
            actions: request
                .wait_ms
                .map(|milliseconds| vec![Action::Wait { milliseconds }])
                .unwrap_or_default(),
            only_main_content: false,
        }
    }

    async fn scrape(&self, request: &ScrapeRequest) -> FetchResult<ScrapeData> {
        let url = format!("{}/scrape", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Api { status, message });
        }

        let body: ScrapeResponse = response.json().await?;

        if !body.success {
            return Err(FetchError::Empty(
                body.error.unwrap_or_else(|| "Firecrawl scrape failed".to_string()),
            ));
        }

        body.data
            .ok_or_else(|| FetchError::Empty("no data returned from Firecrawl".to_string()))
    }
}

/// Fold scrape data into an outcome for the requested schema.
fn into_outcome(schema: ExtractionSchema, data: ScrapeData) -> FetchOutcome {
    if schema == ExtractionSchema::RawMarkup {
        return match data.raw_html.filter(|h| !h.is_empty()) {
            Some(markup) => FetchOutcome::Markup(markup),
            None => FetchOutcome::failure("no raw html returned from Firecrawl"),
        };
    }

    match data.json {
        Some(Value::Object(fields)) if !fields.is_empty() => {
            let mut page = StructuredPage::new(fields);
            page.raw_markup = data.raw_html;
            page.html = data.html;
            page.screenshot = data.screenshot;
            FetchOutcome::Structured(page)
        }
        _ => match data.raw_html.filter(|h| !h.is_empty()) {
            Some(markup) => FetchOutcome::Structured(
                StructuredPage::new(Map::new()).with_raw_markup(markup),
            ),
            None => FetchOutcome::failure("no json returned from Firecrawl"),
        },
    }
}

#[async_trait]
impl Fetcher for FirecrawlFetcher {
    async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
        tracing::debug!(url = %request.url, schema = ?request.schema, "Firecrawl scrape");

        let body = Self::build_request(request);
        match self.scrape(&body).await {
            Ok(data) => into_outcome(request.schema, data),
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "Firecrawl scrape failed");
                FetchOutcome::failure(e.to_string())
            }
        }
    }

    fn name(&self) -> &str {
        "firecrawl"
    }
}
