//! Ledger trait: where final prices are written.

use async_trait::async_trait;

/// Boxed error from a ledger backend.
pub type LedgerError = Box<dyn std::error::Error + Send + Sync>;

/// External ledger holding each asset's balance.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Set the balance of `asset_id`. `balance` is a decimal string.
    async fn update_balance(&self, asset_id: i64, balance: &str) -> Result<(), LedgerError>;

    /// Get the ledger name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}
