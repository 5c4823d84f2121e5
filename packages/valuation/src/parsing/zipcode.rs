//! US zipcode validation.

/// Zipcode used when neither the asset nor the environment provides one.
pub const FALLBACK_ZIPCODE: &str = "80110";

/// Trim and validate a 5-digit zipcode.
pub fn normalize_zipcode(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Pick the asset's zipcode if valid, otherwise the process default if valid.
pub fn resolve_zipcode(asset_zipcode: Option<&str>, default_zipcode: &str) -> Option<String> {
    asset_zipcode
        .and_then(normalize_zipcode)
        .or_else(|| normalize_zipcode(default_zipcode))
}
