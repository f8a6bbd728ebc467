use rust_decimal::Decimal;

use super::AnalyticsError;

/// `(today - yesterday) / yesterday` over closes ordered most recent first.
///
/// Only the first two entries are used.
pub fn compute_daily_return(recent_first: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    let [today, yesterday, ..] = recent_first else {
        return Err(AnalyticsError::InsufficientData {
            needed: 2,
            got: recent_first.len(),
        });
    };
    if yesterday.is_zero() {
        return Err(AnalyticsError::ZeroBasePrice);
    }
    today
        .checked_sub(*yesterday)
        .and_then(|diff| diff.checked_div(*yesterday))
        .ok_or(AnalyticsError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ten_percent_up() {
        let r = compute_daily_return(&[dec!(110), dec!(100)]).unwrap();
        assert_eq!(r, dec!(0.10));
    }

    #[test]
    fn loss_is_negative_and_extra_bars_ignored() {
        let r = compute_daily_return(&[dec!(90.5), dec!(100.0), dec!(1)]).unwrap();
        assert_eq!(r, dec!(-0.095));
    }

    #[test]
    fn needs_two_bars() {
        assert_eq!(
            compute_daily_return(&[dec!(1)]),
            Err(AnalyticsError::InsufficientData { needed: 2, got: 1 })
        );
        assert!(compute_daily_return(&[]).is_err());
    }

    #[test]
    fn zero_base() {
        assert_eq!(
            compute_daily_return(&[dec!(1), dec!(0.0000)]),
            Err(AnalyticsError::ZeroBasePrice)
        );
    }
}
