use anyhow::Result;
use secrecy::SecretString;
use std::env;
use valuation::parsing::zipcode::FALLBACK_ZIPCODE;
use valuation::ConfigError;

/// Application configuration loaded from environment variables
#[derive(Debug)]
pub struct Config {
    pub lunch_money_api_key: SecretString,
    pub firecrawl_api_key: SecretString,
    /// Default zipcode for KBB price advisor lookups
    pub kbb_zipcode: String,
}

impl Config {
    /// Load configuration from the process environment. `.env` is read by
    /// `main` before logging starts, not here.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            lunch_money_api_key: var("LUNCH_MONEY_API_KEY")
                .ok_or(ConfigError::MissingCredential("LUNCH_MONEY_API_KEY"))?
                .into(),
            firecrawl_api_key: var("FIRECRAWL_KEY")
                .or_else(|| var("FIRECRAWL_API_KEY"))
                .ok_or(ConfigError::MissingCredential("FIRECRAWL_KEY"))?
                .into(),
            kbb_zipcode: var("KBB_ZIPCODE").unwrap_or_else(|| FALLBACK_ZIPCODE.to_string()),
        })
    }
}
