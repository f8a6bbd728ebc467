//! Pure price analytics over stored closes.
//!
//! Neither function touches storage; the query layer loads the window and
//! hands over plain [`Decimal`](rust_decimal::Decimal) closes.

mod daily_return;
mod rsi;

pub use daily_return::compute_daily_return;
pub use rsi::{Interpretation, RelativeStrength, RsiResult, compute_rsi};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serializer;
use thiserror::Error;

/// Default RSI look-back.
pub const DEFAULT_RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("insufficient data: need {needed} prices, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("period must be at least 1")]
    InvalidPeriod,

    #[error("previous close is zero")]
    ZeroBasePrice,

    #[error("arithmetic overflow")]
    Overflow,
}

/// Serializes decimals as JSON numbers.
pub(crate) fn serialize_floats<S: Serializer>(
    values: &[Decimal],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|v| v.to_f64().unwrap_or_default()))
}
