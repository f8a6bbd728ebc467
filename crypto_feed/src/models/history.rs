//! Outcome of a per-symbol history request.
//!
//! A history fetch never fails with an error: ordinary feed failures are
//! reported as [`HistoryFetch::NoData`] so one bad symbol can't abort a
//! batch of concurrent fetches.

use std::fmt;

use crate::models::raw_bar::RawBar;

/// Result of [`FeedClient::fetch_history`](crate::providers::FeedClient::fetch_history).
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryFetch {
    /// Non-empty series of raw bars, in feed order.
    Bars(Vec<RawBar>),
    /// Nothing usable came back.
    NoData(NoDataReason),
}

impl HistoryFetch {
    /// Wraps a series, mapping an empty one to [`NoDataReason::EmptySeries`].
    pub fn from_bars(bars: Vec<RawBar>) -> Self {
        if bars.is_empty() {
            HistoryFetch::NoData(NoDataReason::EmptySeries)
        } else {
            HistoryFetch::Bars(bars)
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, HistoryFetch::NoData(_))
    }
}

/// Why a history fetch produced no data. Only used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDataReason {
    /// HTTP status outside 2xx.
    HttpStatus(u16),
    /// Body decoded but `Response` was not `"Success"`.
    Unsuccessful(String),
    /// Body could not be decoded.
    Malformed(String),
    /// `Data.Data` was empty.
    EmptySeries,
    /// Network, TLS or timeout failure.
    Transport(String),
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::HttpStatus(code) => write!(f, "http status {code}"),
            NoDataReason::Unsuccessful(msg) => write!(f, "unsuccessful response: {msg}"),
            NoDataReason::Malformed(msg) => write!(f, "malformed body: {msg}"),
            NoDataReason::EmptySeries => write!(f, "empty series"),
            NoDataReason::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}
