// Relative Strength Index over a simple (non-smoothed) average.
//
//   deltas[i] = price[i+1] - price[i]
//   avg_gain  = mean(max(delta, 0))   over the first `period` deltas
//   avg_loss  = mean(max(-delta, 0))  over the first `period` deltas
//   RS        = avg_gain / avg_loss   (infinite when avg_loss is 0)
//   RSI       = 100 - 100 / (1 + RS), clamped to [0, 100]
//
// Thresholds: RSI > 70 => Overbought, RSI < 30 => Oversold.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::AnalyticsError;

const OVERSOLD_BELOW: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
const OVERBOUGHT_ABOVE: Decimal = Decimal::from_parts(70, 0, 0, false, 0);

/// Average gain over average loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeStrength {
    Finite(Decimal),
    /// No losses in the window. Serialized as `"Infinity"`; finite values
    /// serialize as JSON numbers.
    Infinite,
}

impl Serialize for RelativeStrength {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RelativeStrength::Finite(rs) => rust_decimal::serde::float::serialize(rs, serializer),
            RelativeStrength::Infinite => serializer.serialize_str("Infinity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Interpretation {
    Oversold,
    Neutral,
    Overbought,
}

impl Interpretation {
    pub fn from_rsi(rsi: Decimal) -> Self {
        if rsi < OVERSOLD_BELOW {
            Interpretation::Oversold
        } else if rsi > OVERBOUGHT_ABOVE {
            Interpretation::Overbought
        } else {
            Interpretation::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsiResult {
    /// One entry per delta, including those past the averaging window.
    #[serde(serialize_with = "super::serialize_floats")]
    pub gains: Vec<Decimal>,
    #[serde(serialize_with = "super::serialize_floats")]
    pub losses: Vec<Decimal>,
    pub rs: RelativeStrength,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub rsi: Decimal,
    pub interpretation: Interpretation,
}

/// Computes RSI over closes ordered oldest to newest.
///
/// # Errors
/// - [`AnalyticsError::InvalidPeriod`] when `period == 0`
/// - [`AnalyticsError::InsufficientData`] when fewer than `period + 1` closes
pub fn compute_rsi(closes: &[Decimal], period: usize) -> Result<RsiResult, AnalyticsError> {
    if period == 0 {
        return Err(AnalyticsError::InvalidPeriod);
    }
    let needed = period.saturating_add(1);
    if closes.len() < needed {
        return Err(AnalyticsError::InsufficientData {
            needed,
            got: closes.len(),
        });
    }

    let deltas = closes
        .windows(2)
        .map(|w| w[1].checked_sub(w[0]))
        .collect::<Option<Vec<_>>>()
        .ok_or(AnalyticsError::Overflow)?;

    let gains: Vec<Decimal> = deltas.iter().map(|d| (*d).max(Decimal::ZERO)).collect();
    let losses: Vec<Decimal> = deltas.iter().map(|d| (-*d).max(Decimal::ZERO)).collect();

    let avg_gain = mean(&gains[..period])?;
    let avg_loss = mean(&losses[..period])?;

    let (rs, rsi) = if avg_loss.is_zero() {
        (RelativeStrength::Infinite, Decimal::ONE_HUNDRED)
    } else {
        match avg_gain.checked_div(avg_loss) {
            Some(rs) => (RelativeStrength::Finite(rs), rsi_from_rs(rs)?),
            // RS beyond Decimal range: RSI is 100 at this precision.
            None => (RelativeStrength::Infinite, Decimal::ONE_HUNDRED),
        }
    };
    let rsi = rsi.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    Ok(RsiResult {
        gains,
        losses,
        rs,
        rsi,
        interpretation: Interpretation::from_rsi(rsi),
    })
}

fn mean(values: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or(AnalyticsError::Overflow)?;
    sum.checked_div(Decimal::from(values.len()))
        .ok_or(AnalyticsError::Overflow)
}

fn rsi_from_rs(rs: Decimal) -> Result<Decimal, AnalyticsError> {
    Decimal::ONE
        .checked_add(rs)
        .and_then(|d| Decimal::ONE_HUNDRED.checked_div(d))
        .and_then(|q| Decimal::ONE_HUNDRED.checked_sub(q))
        .ok_or(AnalyticsError::Overflow)
}
