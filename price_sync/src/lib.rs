//! Daily crypto price ingestion into SQLite, plus RSI and daily-return
//! analytics over the stored series.
//!
//! - [`catalog`] keeps the instrument table in step with the feed's coin list.
//! - [`ingest`] fetches recent bars for every instrument and stores new ones.
//! - [`analytics`] and [`query`] read stored closes back out.

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod db;
pub mod ingest;
pub mod models;
pub mod quantize;
pub mod query;
pub mod schema;
pub mod store;
