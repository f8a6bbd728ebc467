//! Raw daily bar as delivered by the feed, before any rounding or storage.
//!
//! Numeric fields are kept as [`RawValue`] so that a malformed or missing
//! field never fails decoding of the whole payload. Turning these into
//! fixed-point decimals is the job of the consumer.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A numeric field of unknown shape, as found on the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    /// A JSON number.
    Number(f64),
    /// A JSON string, possibly holding a number.
    Text(String),
    /// Absent or `null`.
    #[default]
    Missing,
    /// Anything else (bool, array, object).
    Malformed,
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Missing,
            Value::Number(n) => n.as_f64().map_or(RawValue::Malformed, RawValue::Number),
            Value::String(s) => RawValue::Text(s),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => RawValue::Malformed,
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(RawValue::from)
    }
}

/// One OHLCV entry of a `histoday` response.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawBar {
    /// Bar open time in unix seconds. Bars without a usable time are skipped.
    #[serde(default, deserialize_with = "lenient_time")]
    pub time: Option<i64>,
    #[serde(default)]
    pub open: RawValue,
    #[serde(default)]
    pub high: RawValue,
    #[serde(default)]
    pub low: RawValue,
    #[serde(default)]
    pub close: RawValue,
    /// Volume in the base asset.
    #[serde(default, rename = "volumefrom")]
    pub volume_from: RawValue,
    /// Volume in the quote currency.
    #[serde(default, rename = "volumeto")]
    pub volume_to: RawValue,
}

impl RawBar {
    /// Calendar date (UTC) of this bar, if its timestamp is valid.
    pub fn date(&self) -> Option<NaiveDate> {
        let secs = self.time?;
        DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
    }
}

fn lenient_time<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}
