//! Currency string parsing.

use crate::error::ParseError;

/// Parse a currency-formatted string such as `"$1,234.56"`.
///
/// Every character that is not an ASCII digit or `.` is dropped before
/// parsing. Missing or empty input is `0.0`.
pub fn parse_currency(value: Option<&str>) -> Result<f64, ParseError> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(0.0),
    };

    let digits: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    digits.parse::<f64>().map_err(|_| ParseError {
        input: value.to_string(),
    })
}

/// Round to the nearest whole unit, ties to even.
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}
