//! Mock fetcher for testing.
//!
//! Provides a configurable mock implementation of the Fetcher trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::fetcher::{ExtractionSchema, FetchOutcome, FetchRequest, Fetcher};

/// Record of a fetch made against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub url: String,
    pub schema: ExtractionSchema,
    pub wait_ms: Option<u64>,
}

/// Mock fetcher for testing.
///
/// Returns canned outcomes by exact URL. Any URL without one fails, the same
/// way a blocked or unreachable page would.
///
/// # Example
///
/// ```rust
/// use valuation::fetchers::{FetchOutcome, MockFetcher};
///
/// let mock = MockFetcher::new()
///     .with_outcome("https://www.zillow.com/homedetails/1_zpid/", FetchOutcome::Markup("$425,000".into()));
/// ```
#[derive(Default)]
pub struct MockFetcher {
    /// Canned outcomes indexed by URL
    outcomes: Arc<RwLock<HashMap<String, FetchOutcome>>>,
    /// Track calls for verification
    calls: Arc<RwLock<Vec<FetchCall>>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an outcome returned for `url`.
    pub fn add_outcome(&self, url: &str, outcome: FetchOutcome) {
        let mut outcomes = self.outcomes.write().unwrap();
        outcomes.insert(url.to_string(), outcome);
    }

    /// Builder form of [`add_outcome`](Self::add_outcome).
    pub fn with_outcome(self, url: &str, outcome: FetchOutcome) -> Self {
        self.add_outcome(url, outcome);
        self
    }

    /// Get the number of fetches made.
    pub fn fetch_call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Get every fetch made, in order.
    pub fn fetch_calls(&self) -> Vec<FetchCall> {
        self.calls.read().unwrap().clone()
    }

    /// Whether `url` was requested at least once.
    pub fn was_fetched(&self, url: &str) -> bool {
        self.calls.read().unwrap().iter().any(|c| c.url == url)
    }
}

impl Clone for MockFetcher {
    fn clone(&self) -> Self {
        Self {
            outcomes: Arc::clone(&self.outcomes),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
        self.calls.write().unwrap().push(FetchCall {
            url: request.url.clone(),
            schema: request.schema,
            wait_ms: request.wait_ms,
        });

        let outcomes = self.outcomes.read().unwrap();
        outcomes
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| FetchOutcome::failure(format!("no canned outcome for {}", request.url)))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_canned_outcome() {
        let mock = MockFetcher::new().with_outcome("https://a", FetchOutcome::Markup("$1".into()));

        let outcome = mock
            .fetch(&FetchRequest::new("https://a", ExtractionSchema::Price))
            .await;

        assert_eq!(outcome.markup(), Some("$1"));
        assert!(mock.was_fetched("https://a"));
        assert_eq!(mock.fetch_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_unknown_url_fails() {
        let mock = MockFetcher::new();

        let outcome = mock
            .fetch(&FetchRequest::new("https://b", ExtractionSchema::RawMarkup).with_wait_ms(10))
            .await;

        assert!(outcome.is_failure());
        assert_eq!(
            mock.fetch_calls(),
            vec![FetchCall {
                url: "https://b".to_string(),
                schema: ExtractionSchema::RawMarkup,
                wait_ms: Some(10),
            }]
        );
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockFetcher::new();
        let clone = mock.clone();
        clone.add_outcome("https://c", FetchOutcome::Markup("x".into()));

        let _ = mock
            .fetch(&FetchRequest::new("https://c", ExtractionSchema::Price))
            .await;

        assert!(clone.was_fetched("https://c"));
    }
}
