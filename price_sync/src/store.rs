//! Durable bar storage used by the ingestion loop.
//!
//! [`PriceStore`] is the seam between [`crate::ingest`] and the database;
//! [`SqlitePriceStore`] is the Diesel implementation. Diesel is synchronous,
//! so every call runs on the blocking pool.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::{SqliteConnection, insert_or_ignore_into};
use thiserror::Error;

use crate::models::{NewPriceBar, NewPriceBarRow};
use crate::schema::price_bar;

/// Storage failure. Ingestion records the affected symbol as no-data.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("connection lock poisoned")]
    Poisoned,
}

#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Which of `dates` already have a bar for `instrument_id`.
    async fn existing_dates(
        &self,
        instrument_id: i32,
        dates: Vec<NaiveDate>,
    ) -> Result<HashSet<NaiveDate>, StoreError>;

    /// Inserts `bars`, silently skipping any `(instrument, date)` that is
    /// already present. Returns the number of rows written.
    async fn insert_bars(&self, bars: Vec<NewPriceBar>) -> Result<usize, StoreError>;
}

/// [`PriceStore`] over a single shared SQLite connection.
#[derive(Clone)]
pub struct SqlitePriceStore {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl SqlitePriceStore {
    pub fn new(conn: SqliteConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut guard)
        })
        .await?
    }
}

#[async_trait]
impl PriceStore for SqlitePriceStore {
    async fn existing_dates(
        &self,
        instrument_id: i32,
        dates: Vec<NaiveDate>,
    ) -> Result<HashSet<NaiveDate>, StoreError> {
        if dates.is_empty() {
            return Ok(HashSet::new());
        }
        self.with_conn(move |conn| {
            let found: Vec<NaiveDate> = price_bar::table
                .filter(price_bar::instrument_id.eq(instrument_id))
                .filter(price_bar::date.eq_any(&dates))
                .select(price_bar::date)
                .load(conn)?;
            Ok(found.into_iter().collect())
        })
        .await
    }

    async fn insert_bars(&self, bars: Vec<NewPriceBar>) -> Result<usize, StoreError> {
        if bars.is_empty() {
            return Ok(0);
        }
        let rows: Vec<NewPriceBarRow> = bars.iter().map(NewPriceBarRow::from).collect();
        self.with_conn(move |conn| {
            let n = conn.immediate_transaction::<_, diesel::result::Error, _>(|tx| {
                insert_or_ignore_into(price_bar::table).values(&rows).execute(tx)
            })?;
            Ok(n)
        })
        .await
    }
}
