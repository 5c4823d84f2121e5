//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the valuation library
//! without touching a real ledger or reading log output.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::events::{EventSink, PipelineEvent};
use crate::traits::ledger::{Ledger, LedgerError};

/// A mock ledger for testing.
///
/// Records successful balance updates and can be told to reject specific
/// asset ids. Clones share state, so keep one to assert on after handing
/// another to a [`ReportingSink`](crate::report::ReportingSink).
#[derive(Default)]
pub struct MockLedger {
    /// Successful `(asset_id, balance)` updates, in order
    updates: Arc<RwLock<Vec<(i64, String)>>>,

    /// Asset ids that fail, with their error message
    failures: Arc<RwLock<HashMap<i64, String>>>,

    /// Every call, successful or not
    attempts: Arc<RwLock<usize>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject updates for `asset_id` with `message`.
    pub fn failing_for(self, asset_id: i64, message: impl Into<String>) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(asset_id, message.into());
        self
    }

    pub fn updates(&self) -> Vec<(i64, String)> {
        self.updates.read().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.read().unwrap()
    }
}

impl Clone for MockLedger {
    fn clone(&self) -> Self {
        Self {
            updates: Arc::clone(&self.updates),
            failures: Arc::clone(&self.failures),
            attempts: Arc::clone(&self.attempts),
        }
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn update_balance(&self, asset_id: i64, balance: &str) -> Result<(), LedgerError> {
        *self.attempts.write().unwrap() += 1;

        if let Some(message) = self.failures.read().unwrap().get(&asset_id) {
            return Err(message.clone().into());
        }

        self.updates
            .write()
            .unwrap()
            .push((asset_id, balance.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Event sink that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Arc<RwLock<Vec<PipelineEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.read().unwrap().clone()
    }

    pub fn contains(&self, event: &PipelineEvent) -> bool {
        self.events.read().unwrap().iter().any(|e| e == event)
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&PipelineEvent) -> bool) -> usize {
        self.events.read().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl Clone for RecordingEventSink {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl EventSink for RecordingEventSink {
    fn record(&self, event: PipelineEvent) {
        self.events.write().unwrap().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_ledger_records_and_fails() {
        let ledger = MockLedger::new().failing_for(2, "nope");

        ledger.update_balance(1, "100").await.unwrap();
        let err = ledger.update_balance(2, "200").await.unwrap_err();

        assert_eq!(err.to_string(), "nope");
        assert_eq!(ledger.updates(), vec![(1, "100".to_string())]);
        assert_eq!(ledger.attempts(), 2);
    }

    #[test]
    fn test_recording_sink_shares_state() {
        let sink = RecordingEventSink::new();
        let clone = sink.clone();

        clone.record(PipelineEvent::FinalPrice {
            asset_id: 1,
            price: 10.0,
        });

        assert_eq!(sink.events().len(), 1);
        assert_eq!(
            sink.count(|e| matches!(e, PipelineEvent::FinalPrice { .. })),
            1
        );
    }
}
