//! Batched, concurrency-bounded ingestion of daily bars.
//!
//! Instruments are split into fixed-size batches processed one after the
//! other. Inside a batch every instrument runs concurrently on the current
//! task, with a [`Semaphore`] bounding how many feed requests are in flight.
//! A per-date existence check before each insert makes a run idempotent.
//!
//! Nothing here returns an error: a feed or storage problem for one
//! instrument is recorded in [`IngestionOutcome::no_data`] and its siblings
//! carry on. The caller is responsible for an overall time limit.

use std::collections::{BTreeSet, HashSet};

use crypto_feed::models::history::HistoryFetch;
use crypto_feed::models::raw_bar::RawBar;
use crypto_feed::providers::FeedClient;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::models::{Instrument, NewPriceBar};
use crate::quantize::{PRICE_SCALE, VOLUME_SCALE, quantize};
use crate::store::PriceStore;

/// Tuning knobs for [`run_ingestion`]. Zero sizes are treated as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub batch_size: usize,
    pub max_concurrency: usize,
    /// Days of history requested per instrument.
    pub history_limit: u32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: 50,
            max_concurrency: 10,
            history_limit: 1,
        }
    }
}

/// Aggregate result of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionOutcome {
    /// Symbols that received at least one new bar.
    pub updated: BTreeSet<String>,
    /// Symbols that got nothing new: feed had no data, every date was
    /// already stored, or storage failed.
    pub no_data: BTreeSet<String>,
    pub total_instruments: usize,
    pub bars_inserted: usize,
    pub batches: usize,
}

impl IngestionOutcome {
    fn record(&mut self, report: InstrumentReport) {
        self.total_instruments += 1;
        match report {
            InstrumentReport::Updated { symbol, inserted } => {
                self.bars_inserted += inserted;
                self.updated.insert(symbol);
            }
            InstrumentReport::NoData { symbol } => {
                self.no_data.insert(symbol);
            }
        }
    }
}

/// What happened to a single instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstrumentReport {
    Updated { symbol: String, inserted: usize },
    NoData { symbol: String },
}

/// Fetches the latest history for every instrument and stores the bars
/// that are not yet present.
pub async fn run_ingestion<F, S>(
    feed: &F,
    store: &S,
    instruments: &[Instrument],
    opts: &IngestOptions,
) -> IngestionOutcome
where
    F: FeedClient + ?Sized,
    S: PriceStore + ?Sized,
{
    let batch_size = opts.batch_size.max(1);
    let total_batches = instruments.len().div_ceil(batch_size);
    let gate = Semaphore::new(opts.max_concurrency.max(1));
    let mut outcome = IngestionOutcome::default();

    info!(
        instruments = instruments.len(),
        batch_size,
        max_concurrency = opts.max_concurrency.max(1),
        "starting ingestion"
    );

    for (i, batch) in instruments.chunks(batch_size).enumerate() {
        info!("batch {}/{} ({} instruments)", i + 1, total_batches, batch.len());

        let tasks = batch.iter().map(|instrument| {
            ingest_instrument(feed, store, &gate, instrument, opts.history_limit)
        });
        for report in join_all(tasks).await {
            outcome.record(report);
        }
        outcome.batches += 1;
    }

    info!(
        total = outcome.total_instruments,
        updated = outcome.updated.len(),
        no_data = outcome.no_data.len(),
        bars = outcome.bars_inserted,
        "ingestion finished"
    );
    outcome
}

async fn ingest_instrument<F, S>(
    feed: &F,
    store: &S,
    gate: &Semaphore,
    instrument: &Instrument,
    history_limit: u32,
) -> InstrumentReport
where
    F: FeedClient + ?Sized,
    S: PriceStore + ?Sized,
{
    let symbol = instrument.symbol.clone();

    let fetched = {
        // The gate is never closed, so acquire only fails if that changes.
        let Ok(_permit) = gate.acquire().await else {
            warn!(%symbol, "admission gate closed");
            return InstrumentReport::NoData { symbol };
        };
        feed.fetch_history(&symbol, history_limit).await
    };

    let raw = match fetched {
        HistoryFetch::Bars(raw) => raw,
        HistoryFetch::NoData(reason) => {
            debug!(%symbol, %reason, "no data");
            return InstrumentReport::NoData { symbol };
        }
    };

    match store_new_bars(store, instrument.id, &raw).await {
        Ok(0) => {
            debug!(%symbol, "nothing new");
            InstrumentReport::NoData { symbol }
        }
        Ok(inserted) => {
            debug!(%symbol, inserted, "stored bars");
            InstrumentReport::Updated { symbol, inserted }
        }
        Err(e) => {
            warn!(%symbol, error = %e, "failed to store bars");
            InstrumentReport::NoData { symbol }
        }
    }
}

async fn store_new_bars<S>(
    store: &S,
    instrument_id: i32,
    raw: &[RawBar],
) -> Result<usize, crate::store::StoreError>
where
    S: PriceStore + ?Sized,
{
    let dated: Vec<_> = raw.iter().filter_map(|bar| bar.date().map(|d| (d, bar))).collect();
    let candidates: Vec<_> = dated.iter().map(|(d, _)| *d).collect();
    let existing = store.existing_dates(instrument_id, candidates).await?;

    let mut staged_dates = HashSet::new();
    let staged: Vec<NewPriceBar> = dated
        .into_iter()
        .filter(|(date, _)| !existing.contains(date) && staged_dates.insert(*date))
        .map(|(date, bar)| NewPriceBar {
            instrument_id,
            date,
            open: quantize(&bar.open, PRICE_SCALE),
            high: quantize(&bar.high, PRICE_SCALE),
            low: quantize(&bar.low, PRICE_SCALE),
            close: quantize(&bar.close, PRICE_SCALE),
            volume_from: quantize(&bar.volume_from, VOLUME_SCALE),
            volume_to: quantize(&bar.volume_to, VOLUME_SCALE),
        })
        .collect();

    if staged.is_empty() {
        return Ok(0);
    }
    store.insert_bars(staged).await
}
