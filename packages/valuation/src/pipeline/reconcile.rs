//! Combining Zillow and Redfin estimates.

use crate::parsing::round_half_even;

/// Average both estimates when present, otherwise take whichever exists.
pub fn reconcile(zillow: Option<f64>, redfin: Option<f64>) -> Option<f64> {
    match (zillow, redfin) {
        (Some(z), Some(r)) => Some(round_half_even((z + r) / 2.0)),
        (Some(z), None) => Some(z),
        (None, Some(r)) => Some(r),
        (None, None) => None,
    }
}
