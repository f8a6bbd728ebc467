//! Client side of the crypto market-data feed: the [`providers::FeedClient`]
//! seam, the CryptoCompare implementation, and the raw wire models.

pub mod config;
pub mod env;
pub mod errors;
pub mod models;
pub mod providers;
