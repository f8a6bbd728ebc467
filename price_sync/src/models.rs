//! Diesel models mapping to the database schema, plus their decimal-typed
//! domain forms.
//!
//! - [`crate::schema::instrument`]: one tradable coin from the feed catalog
//! - [`crate::schema::price_bar`]: one daily OHLCV bar per instrument and date
//!
//! Decimal columns are stored as fixed-scale TEXT. [`PriceBar`] and
//! [`NewPriceBar`] carry [`Decimal`] values; the `*Row` types are what Diesel
//! reads and writes.

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::schema::*;

/// A row in [`crate::schema::instrument`].
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Serialize)]
#[diesel(table_name = instrument, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Instrument {
    /// Database primary key. Populated by the DB.
    pub id: i32,
    /// Feed identifier; unique.
    pub coin_id: String,
    /// Display name (e.g., "Bitcoin").
    pub name: String,
    /// Ticker (e.g., "BTC"). Not unique across instruments.
    pub symbol: String,
    /// Free text; empty when the feed has none.
    pub description: String,
}

/// Insertable form of [`Instrument`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = instrument)]
pub struct NewInstrument<'a> {
    /// Feed identifier.
    pub coin_id: &'a str,
    /// Display name.
    pub name: &'a str,
    /// Ticker.
    pub symbol: &'a str,
    /// Free text, possibly empty.
    pub description: &'a str,
}

/// A row in [`crate::schema::price_bar`] as stored.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = price_bar, check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(belongs_to(Instrument, foreign_key = instrument_id))]
pub struct PriceBarRow {
    /// Database primary key.
    pub id: i32,
    /// FK to [`Instrument::id`].
    pub instrument_id: i32,
    /// UTC calendar date of the bar.
    pub date: NaiveDate,
    /// Scale-4 decimal text.
    pub open: String,
    /// Scale-4 decimal text.
    pub high: String,
    /// Scale-4 decimal text.
    pub low: String,
    /// Scale-4 decimal text.
    pub close: String,
    /// Scale-10 decimal text.
    pub volume_from: String,
    /// Scale-10 decimal text.
    pub volume_to: String,
}

/// Insertable form of [`PriceBarRow`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = price_bar)]
pub struct NewPriceBarRow {
    /// FK to [`Instrument::id`].
    pub instrument_id: i32,
    /// UTC calendar date of the bar.
    pub date: NaiveDate,
    /// Scale-4 decimal text.
    pub open: String,
    /// Scale-4 decimal text.
    pub high: String,
    /// Scale-4 decimal text.
    pub low: String,
    /// Scale-4 decimal text.
    pub close: String,
    /// Scale-10 decimal text.
    pub volume_from: String,
    /// Scale-10 decimal text.
    pub volume_to: String,
}

/// A stored daily bar with decimal fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBar {
    /// FK to [`Instrument::id`].
    pub instrument_id: i32,
    /// UTC calendar date of the bar.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Decimal,
    /// Session high.
    pub high: Decimal,
    /// Session low.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Volume in the base asset.
    pub volume_from: Decimal,
    /// Volume in the quote currency.
    pub volume_to: Decimal,
}

/// A quantized bar staged for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPriceBar {
    /// FK to [`Instrument::id`].
    pub instrument_id: i32,
    /// UTC calendar date of the bar.
    pub date: NaiveDate,
    /// Opening price, scale 4.
    pub open: Decimal,
    /// Session high, scale 4.
    pub high: Decimal,
    /// Session low, scale 4.
    pub low: Decimal,
    /// Closing price, scale 4.
    pub close: Decimal,
    /// Base volume, scale 10.
    pub volume_from: Decimal,
    /// Quote volume, scale 10.
    pub volume_to: Decimal,
}

impl From<&NewPriceBar> for NewPriceBarRow {
    fn from(bar: &NewPriceBar) -> Self {
        Self {
            instrument_id: bar.instrument_id,
            date: bar.date,
            open: bar.open.to_string(),
            high: bar.high.to_string(),
            low: bar.low.to_string(),
            close: bar.close.to_string(),
            volume_from: bar.volume_from.to_string(),
            volume_to: bar.volume_to.to_string(),
        }
    }
}

impl TryFrom<PriceBarRow> for PriceBar {
    type Error = rust_decimal::Error;

    fn try_from(row: PriceBarRow) -> Result<Self, Self::Error> {
        Ok(Self {
            instrument_id: row.instrument_id,
            date: row.date,
            open: Decimal::from_str(&row.open)?,
            high: Decimal::from_str(&row.high)?,
            low: Decimal::from_str(&row.low)?,
            close: Decimal::from_str(&row.close)?,
            volume_from: Decimal::from_str(&row.volume_from)?,
            volume_to: Decimal::from_str(&row.volume_to)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_text_keeps_scale() {
        let bar = NewPriceBar {
            instrument_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            open: Decimal::new(10, 4),
            high: Decimal::new(0, 4),
            low: Decimal::new(0, 4),
            close: Decimal::new(441_795_500, 4),
            volume_from: Decimal::new(0, 10),
            volume_to: Decimal::new(15, 1),
        };
        let row = NewPriceBarRow::from(&bar);
        assert_eq!(row.open, "0.0010");
        assert_eq!(row.high, "0.0000");
        assert_eq!(row.close, "44179.5500");
        assert_eq!(row.volume_from, "0.0000000000");
        assert_eq!(row.volume_to, "1.5");
    }
}
