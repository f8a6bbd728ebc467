//! Fixed-point rounding of raw feed values.
//!
//! [`quantize`] is total: absent, non-numeric or unrepresentable input
//! becomes zero at the requested scale. Ingestion relies on this so a bad
//! field never drops a bar.

use std::str::FromStr;

use crypto_feed::models::raw_bar::RawValue;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits kept for open/high/low/close.
pub const PRICE_SCALE: u32 = 4;
/// Fractional digits kept for both volume fields.
pub const VOLUME_SCALE: u32 = 10;

/// Rounds `raw` half away from zero to exactly `scale` fractional digits.
///
/// Numbers are taken at their exact binary value; numeric strings may be in
/// plain or scientific notation.
///
/// ```
/// use crypto_feed::models::raw_bar::RawValue;
/// use price_sync::quantize::{PRICE_SCALE, quantize};
///
/// assert_eq!(quantize(&RawValue::from("1.23455"), PRICE_SCALE).to_string(), "1.2346");
/// assert_eq!(quantize(&RawValue::Missing, PRICE_SCALE).to_string(), "0.0000");
/// ```
pub fn quantize(raw: &RawValue, scale: u32) -> Decimal {
    parse(raw)
        .and_then(|value| with_scale(value, scale))
        .unwrap_or_else(|| zero(scale))
}

fn parse(raw: &RawValue) -> Option<Decimal> {
    match raw {
        RawValue::Number(n) => Decimal::from_f64_retain(*n),
        RawValue::Text(s) => {
            let s = s.trim();
            Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)).ok()
        }
        RawValue::Missing | RawValue::Malformed => None,
    }
}

fn with_scale(value: Decimal, scale: u32) -> Option<Decimal> {
    let mut rounded = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    // rescale silently settles for a smaller scale when the digits don't fit
    rounded.rescale(scale);
    (rounded.scale() == scale).then_some(rounded)
}

fn zero(scale: u32) -> Decimal {
    let mut z = Decimal::ZERO;
    z.rescale(scale);
    z
}
