//! Collaborator seams for the valuation pipeline.
//!
//! These traits define the interfaces that applications implement to
//! provide page fetching, ledger updates and observability.

pub mod events;
pub mod fetcher;
pub mod ledger;
