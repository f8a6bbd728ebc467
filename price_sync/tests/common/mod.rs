#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use crypto_feed::errors::FeedError;
use crypto_feed::models::history::{HistoryFetch, NoDataReason};
use crypto_feed::models::instrument::InstrumentDescriptor;
use crypto_feed::models::raw_bar::{RawBar, RawValue};
use crypto_feed::providers::FeedClient;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use price_sync::catalog::{load_instruments, sync_instruments};
use price_sync::db::{connection, migrate};
use price_sync::models::Instrument;
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}
#[derive(QueryableByName)]
struct Count {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn count(conn: &mut SqliteConnection, table: &str) -> i64 {
    diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {table}"))
        .get_result::<Count>(conn)
        .unwrap()
        .n
}

pub fn fk_check_empty(conn: &mut SqliteConnection) {
    #[derive(QueryableByName)]
    struct Violation {
        #[diesel(sql_type = Text)]
        table: String,
    }
    let rows: Vec<Violation> = diesel::sql_query("PRAGMA foreign_key_check;").load(conn).unwrap();
    let tables: Vec<_> = rows.iter().map(|r| &r.table).collect();
    assert!(rows.is_empty(), "fk violations in {tables:?}");
}

pub fn descriptor(coin_id: &str, name: &str, symbol: &str) -> InstrumentDescriptor {
    InstrumentDescriptor {
        coin_id: coin_id.into(),
        name: name.into(),
        symbol: symbol.into(),
        description: String::new(),
    }
}

/// Syncs one instrument per `(coin_id, symbol)` and returns them all.
pub fn seed_instruments(conn: &mut SqliteConnection, coins: &[(&str, &str)]) -> Vec<Instrument> {
    let descriptors: Vec<_> = coins
        .iter()
        .map(|(id, symbol)| descriptor(id, &format!("{symbol} coin"), symbol))
        .collect();
    sync_instruments(conn, &descriptors).expect("seed instruments");
    load_instruments(conn).expect("load instruments")
}

pub const DAY: i64 = 86_400;
/// 2024-01-01T00:00:00Z
pub const JAN_1: i64 = 1_704_067_200;

pub fn bar(time: i64, close: f64) -> RawBar {
    RawBar {
        time: Some(time),
        open: RawValue::Number(close - 1.0),
        high: RawValue::Number(close + 1.0),
        low: RawValue::Number(close - 2.0),
        close: RawValue::Number(close),
        volume_from: RawValue::Number(10.0),
        volume_to: RawValue::Number(close * 10.0),
    }
}

/// Scripted feed that records how many fetches overlap.
#[derive(Default)]
pub struct FakeFeed {
    descriptors: Vec<InstrumentDescriptor>,
    histories: HashMap<String, HistoryFetch>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
    events: Option<EventLog>,
}

/// Shared, ordered record of fetch and insert events.
pub type EventLog = Arc<Mutex<Vec<String>>>;

impl FakeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_descriptors(mut self, descriptors: Vec<InstrumentDescriptor>) -> Self {
        self.descriptors = descriptors;
        self
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<RawBar>) -> Self {
        self.histories.insert(symbol.to_string(), HistoryFetch::from_bars(bars));
        self
    }

    /// Appends `fetch:<symbol>` to `events` as each fetch starts.
    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedClient for FakeFeed {
    async fn list_instruments(&self) -> Result<Vec<InstrumentDescriptor>, FeedError> {
        Ok(self.descriptors.clone())
    }

    async fn fetch_history(&self, symbol: &str, _limit: u32) -> HistoryFetch {
        if let Some(events) = &self.events {
            events.lock().unwrap().push(format!("fetch:{symbol}"));
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.histories
            .get(symbol)
            .cloned()
            .unwrap_or(HistoryFetch::NoData(NoDataReason::HttpStatus(404)))
    }
}
