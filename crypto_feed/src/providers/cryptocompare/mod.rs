//! CryptoCompare (`min-api.cryptocompare.com`) feed.

mod client;
pub mod response;

pub use client::CryptoCompareClient;
