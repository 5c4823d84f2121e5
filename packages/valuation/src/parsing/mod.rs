//! Pure text helpers used by the extractors.
//!
//! Nothing in here does I/O; every function is deterministic.

pub mod currency;
pub mod kbb_markup;
pub mod query;
pub mod zipcode;

pub use currency::{parse_currency, round_half_even};
pub use kbb_markup::{find_advisor_url, parse_private_party_value};
pub use query::replace_param;
pub use zipcode::{normalize_zipcode, resolve_zipcode};
