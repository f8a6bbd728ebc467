//! CryptoCompare wire types and their interpretation.
//!
//! Decoding is kept apart from the HTTP client so the status/body rules can
//! be tested without a server.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{
    errors::FeedError,
    models::{
        history::{HistoryFetch, NoDataReason},
        instrument::InstrumentDescriptor,
        raw_bar::RawBar,
    },
};

/// Value of `Response` on a successful call.
pub const SUCCESS: &str = "Success";

/// `GET /data/all/coinlist`
#[derive(Deserialize, Debug)]
pub struct CoinListResponse {
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "Data", default)]
    pub data: IndexMap<String, CoinListEntry>,
}

#[derive(Deserialize, Debug)]
pub struct CoinListEntry {
    #[serde(rename = "Id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "CoinName")]
    pub coin_name: String,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

/// `GET /data/v2/histoday`
#[derive(Deserialize, Debug)]
pub struct HistoDayResponse {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "Data", default)]
    pub data: Option<HistoDayData>,
}

#[derive(Deserialize, Debug, Default)]
pub struct HistoDayData {
    #[serde(rename = "Data", default)]
    pub data: Vec<RawBar>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected coin id: {other}"))),
    }
}

/// Turns a history response into a [`HistoryFetch`]. Never fails.
pub fn interpret_history(status: u16, body: &[u8]) -> HistoryFetch {
    if !(200..300).contains(&status) {
        return HistoryFetch::NoData(NoDataReason::HttpStatus(status));
    }

    let parsed: HistoDayResponse = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return HistoryFetch::NoData(NoDataReason::Malformed(e.to_string())),
    };

    if parsed.response != SUCCESS {
        let msg = parsed.message.unwrap_or(parsed.response);
        return HistoryFetch::NoData(NoDataReason::Unsuccessful(msg));
    }

    HistoryFetch::from_bars(parsed.data.unwrap_or_default().data)
}

/// Turns a coin list response into descriptors, preserving feed order.
pub fn interpret_coin_list(
    status: u16,
    body: &[u8],
) -> Result<Vec<InstrumentDescriptor>, FeedError> {
    if !(200..300).contains(&status) {
        return Err(FeedError::BadResponse(format!("coin list returned http {status}")));
    }

    let parsed: CoinListResponse = serde_json::from_slice(body)
        .map_err(|e| FeedError::BadResponse(format!("coin list body: {e}")))?;

    if let Some(resp) = parsed.response.as_deref() {
        if resp != SUCCESS {
            let msg = parsed.message.unwrap_or_else(|| resp.to_string());
            return Err(FeedError::BadResponse(msg));
        }
    }

    Ok(parsed
        .data
        .into_values()
        .map(|e| InstrumentDescriptor {
            coin_id: e.id,
            name: e.coin_name,
            symbol: e.symbol,
            description: e.description.unwrap_or_default(),
        })
        .collect())
}
