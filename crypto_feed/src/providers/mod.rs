//! Feed abstraction for crypto market data.
//!
//! [`FeedClient`] is the seam between the ingestion pipeline and the upstream
//! HTTP API. The pipeline only ever talks to `dyn FeedClient` (or a generic
//! bound on it), which lets tests drive it with in-memory doubles.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use crypto_feed::errors::FeedError;
//! use crypto_feed::models::{history::HistoryFetch, instrument::InstrumentDescriptor};
//! use crypto_feed::providers::FeedClient;
//!
//! struct EmptyFeed;
//!
//! #[async_trait]
//! impl FeedClient for EmptyFeed {
//!     async fn list_instruments(&self) -> Result<Vec<InstrumentDescriptor>, FeedError> {
//!         Ok(vec![])
//!     }
//!
//!     async fn fetch_history(&self, _symbol: &str, _limit: u32) -> HistoryFetch {
//!         HistoryFetch::from_bars(vec![])
//!     }
//! }
//! ```

pub mod cryptocompare;

use async_trait::async_trait;

use crate::{
    errors::FeedError,
    models::{history::HistoryFetch, instrument::InstrumentDescriptor},
};

/// Upstream market-data endpoint.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetches the full coin catalog in a single request.
    ///
    /// Fails with a "feed unavailable" [`FeedError`] on network/timeout errors
    /// or an unusable response; the caller decides whether to abort.
    async fn list_instruments(&self) -> Result<Vec<InstrumentDescriptor>, FeedError>;

    /// Fetches the most recent `limit` daily bars for `symbol`.
    ///
    /// Never fails: every ordinary feed problem is reported as
    /// [`HistoryFetch::NoData`].
    async fn fetch_history(&self, symbol: &str, limit: u32) -> HistoryFetch;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{history::NoDataReason, raw_bar::RawBar};

    struct StaticFeed;
    struct DownFeed;

    #[async_trait]
    impl FeedClient for StaticFeed {
        async fn list_instruments(&self) -> Result<Vec<InstrumentDescriptor>, FeedError> {
            Ok(vec![InstrumentDescriptor {
                coin_id: "1182".into(),
                name: "Bitcoin".into(),
                symbol: "BTC".into(),
                description: String::new(),
            }])
        }

        async fn fetch_history(&self, _symbol: &str, limit: u32) -> HistoryFetch {
            let bars = (0..limit)
                .map(|i| RawBar {
                    time: Some(1_704_067_200 + i64::from(i) * 86_400),
                    ..Default::default()
                })
                .collect();
            HistoryFetch::from_bars(bars)
        }
    }

    #[async_trait]
    impl FeedClient for DownFeed {
        async fn list_instruments(&self) -> Result<Vec<InstrumentDescriptor>, FeedError> {
            Err(FeedError::BadResponse("maintenance".into()))
        }

        async fn fetch_history(&self, _symbol: &str, _limit: u32) -> HistoryFetch {
            HistoryFetch::NoData(NoDataReason::HttpStatus(503))
        }
    }

    fn get_feed(name: &str) -> Box<dyn FeedClient> {
        if name == "static" {
            Box::new(StaticFeed)
        } else {
            Box::new(DownFeed)
        }
    }

    #[tokio::test]
    async fn dynamic_feed_dispatch() {
        let feed = get_feed("static");
        assert_eq!(feed.list_instruments().await.unwrap().len(), 1);
        match feed.fetch_history("BTC", 2).await {
            HistoryFetch::Bars(bars) => assert_eq!(bars.len(), 2),
            other => panic!("expected bars, got {other:?}"),
        }

        let feed = get_feed("down");
        assert!(feed.list_instruments().await.unwrap_err().is_unavailable());
        assert!(feed.fetch_history("BTC", 1).await.is_no_data());
    }

    #[tokio::test]
    async fn zero_limit_is_no_data() {
        let fetch = StaticFeed.fetch_history("BTC", 0).await;
        assert_eq!(fetch, HistoryFetch::NoData(NoDataReason::EmptySeries));
    }
}
