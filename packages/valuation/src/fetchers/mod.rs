//! Fetcher implementations.
//!
//! # Available Fetchers
//!
//! - `FirecrawlFetcher` - Firecrawl scrape API (requires `firecrawl` feature)
//! - `MockFetcher` - For testing
//!
//! # Example
//!
//! ```rust,ignore
//! use valuation::fetchers::{ExtractionSchema, FetchRequest, Fetcher, FirecrawlFetcher};
//!
//! let fetcher = FirecrawlFetcher::new(api_key)?;
//! let request = FetchRequest::new("https://www.zillow.com/homedetails/1_zpid/", ExtractionSchema::Price);
//! let outcome = fetcher.fetch(&request).await;
//! ```

mod mock;

#[cfg(feature = "firecrawl")]
mod firecrawl;

pub use mock::{FetchCall, MockFetcher};

#[cfg(feature = "firecrawl")]
pub use firecrawl::FirecrawlFetcher;

// Re-export from traits for convenience
pub use crate::traits::fetcher::{
    ExtractionSchema, FetchOutcome, FetchRequest, Fetcher, StructuredPage,
};
