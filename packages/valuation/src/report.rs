//! Reporting sink in front of the ledger.
//!
//! One update per asset per run, no retries. A failed update is the
//! asset's problem only; the next run tries again from scratch.

use crate::error::{Result, ValuationError};
use crate::parsing::round_half_even;
use crate::traits::ledger::Ledger;

/// What happened to a final price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Sent { balance: String },
    DryRun { balance: String },
}

impl ReportOutcome {
    pub fn balance(&self) -> &str {
        match self {
            ReportOutcome::Sent { balance } | ReportOutcome::DryRun { balance } => balance,
        }
    }
}

/// Sends final prices to a [`Ledger`], or only pretends to in dry-run mode.
pub struct ReportingSink<L> {
    ledger: L,
    dry_run: bool,
}

impl<L: Ledger> ReportingSink<L> {
    pub fn new(ledger: L, dry_run: bool) -> Self {
        Self { ledger, dry_run }
    }

    /// Round `price` to whole currency units and write it to the ledger.
    pub async fn report(&self, asset_id: i64, price: f64) -> Result<ReportOutcome> {
        let balance = format_balance(price);

        if self.dry_run {
            return Ok(ReportOutcome::DryRun { balance });
        }

        self.ledger
            .update_balance(asset_id, &balance)
            .await
            .map_err(|e| ValuationError::ReportingFailure {
                asset_id,
                message: e.to_string(),
            })?;

        Ok(ReportOutcome::Sent { balance })
    }
}

/// Whole currency units as a decimal string.
pub fn format_balance(price: f64) -> String {
    format!("{:.0}", round_half_even(price))
}
