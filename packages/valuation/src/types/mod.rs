//! Data types for assets and prices.

pub mod asset;
pub mod price;
