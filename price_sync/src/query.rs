//! Symbol-level reads over stored bars.
//!
//! A symbol can belong to several instruments. [`resolve_instrument`] picks
//! the one with the greatest total `volume_to`; every other query goes
//! through it.

use std::str::FromStr;

use chrono::NaiveDate;
use diesel::SqliteConnection;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::analytics::{
    AnalyticsError, Interpretation, RelativeStrength, compute_daily_return, compute_rsi,
};
use crate::models::{Instrument, PriceBar, PriceBarRow};
use crate::schema::{instrument, price_bar};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no instrument with symbol {0:?}")]
    NotFound(String),

    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("stored decimal is unreadable: {0}")]
    Decode(#[from] rust_decimal::Error),
}

impl QueryError {
    /// True when the caller asked for something that can't be answered
    /// (as opposed to a storage failure).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueryError::NotFound(_) | QueryError::InvalidRange { .. } | QueryError::Analytics(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyReturnReport {
    pub symbol: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub daily_return: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsiReport {
    pub symbol: String,
    pub period: usize,
    #[serde(serialize_with = "crate::analytics::serialize_floats")]
    pub gains: Vec<Decimal>,
    #[serde(serialize_with = "crate::analytics::serialize_floats")]
    pub losses: Vec<Decimal>,
    pub rs: RelativeStrength,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub rsi: Decimal,
    pub interpretation: Interpretation,
}

/// The instrument trading as `symbol` with the greatest total quote volume.
///
/// Instruments without bars count as zero volume; ties go to the lowest id.
pub fn resolve_instrument(
    conn: &mut SqliteConnection,
    symbol: &str,
) -> Result<Option<Instrument>, QueryError> {
    let candidates: Vec<Instrument> = instrument::table
        .filter(instrument::symbol.eq(symbol))
        .order(instrument::id.asc())
        .select(Instrument::as_select())
        .load(conn)?;

    let mut best: Option<(Decimal, Instrument)> = None;
    for candidate in candidates {
        let volumes: Vec<String> = price_bar::table
            .filter(price_bar::instrument_id.eq(candidate.id))
            .select(price_bar::volume_to)
            .load(conn)?;
        let total = volumes.iter().try_fold(Decimal::ZERO, |acc, v| {
            Decimal::from_str(v).map(|v| acc.saturating_add(v))
        })?;

        if best.as_ref().is_none_or(|(max, _)| total > *max) {
            best = Some((total, candidate));
        }
    }
    Ok(best.map(|(_, instrument)| instrument))
}

/// Bars for `symbol` with `start <= date <= end`, oldest first.
pub fn price_range(
    conn: &mut SqliteConnection,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PriceBar>, QueryError> {
    if start > end {
        return Err(QueryError::InvalidRange { start, end });
    }
    let instrument = require(conn, symbol)?;

    let rows: Vec<PriceBarRow> = price_bar::table
        .filter(price_bar::instrument_id.eq(instrument.id))
        .filter(price_bar::date.between(start, end))
        .order(price_bar::date.asc())
        .select(PriceBarRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(PriceBar::try_from).collect::<Result<_, _>>()?)
}

/// Return between the two most recent closes.
pub fn daily_return(
    conn: &mut SqliteConnection,
    symbol: &str,
) -> Result<DailyReturnReport, QueryError> {
    let instrument = require(conn, symbol)?;
    let closes = recent_closes(conn, instrument.id, 2)?;

    Ok(DailyReturnReport {
        symbol: symbol.to_string(),
        daily_return: compute_daily_return(&closes)?,
    })
}

/// RSI over the `period + 1` most recent closes.
pub fn rsi(
    conn: &mut SqliteConnection,
    symbol: &str,
    period: usize,
) -> Result<RsiReport, QueryError> {
    let instrument = require(conn, symbol)?;
    let window = i64::try_from(period.saturating_add(1)).unwrap_or(i64::MAX);
    let mut closes = recent_closes(conn, instrument.id, window)?;
    closes.reverse();

    let out = compute_rsi(&closes, period)?;
    Ok(RsiReport {
        symbol: symbol.to_string(),
        period,
        gains: out.gains,
        losses: out.losses,
        rs: out.rs,
        rsi: out.rsi,
        interpretation: out.interpretation,
    })
}

fn require(conn: &mut SqliteConnection, symbol: &str) -> Result<Instrument, QueryError> {
    resolve_instrument(conn, symbol)?.ok_or_else(|| QueryError::NotFound(symbol.to_string()))
}

/// Closes of the `limit` most recent bars, newest first.
fn recent_closes(
    conn: &mut SqliteConnection,
    instrument_id: i32,
    limit: i64,
) -> Result<Vec<Decimal>, QueryError> {
    let closes: Vec<String> = price_bar::table
        .filter(price_bar::instrument_id.eq(instrument_id))
        .order(price_bar::date.desc())
        .limit(limit)
        .select(price_bar::close)
        .load(conn)?;

    Ok(closes
        .iter()
        .map(|c| Decimal::from_str(c))
        .collect::<Result<_, _>>()?)
}
