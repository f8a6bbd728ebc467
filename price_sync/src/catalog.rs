//! Instrument catalog synchronization.
//!
//! Feeds the ingestion loop: descriptors from the feed's coin list are
//! inserted by `coin_id` when absent. Existing rows are never modified, so a
//! renamed coin keeps its stored name.
//!
//! Everything runs inside a single `BEGIN IMMEDIATE` transaction via
//! `SqliteConnection::immediate_transaction`, so a sync applies fully or not
//! at all.

use crypto_feed::models::instrument::InstrumentDescriptor;
use diesel::prelude::*;
use diesel::{SqliteConnection, insert_into};
use serde::Serialize;

use crate::models::{Instrument, NewInstrument};
use crate::schema::instrument;

/// What a sync did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSyncReport {
    /// Names of newly created instruments, in input order.
    pub new: Vec<String>,
    /// Names of descriptors whose `coin_id` was already stored.
    pub existing: Vec<String>,
    /// Instrument count after the sync.
    pub total: i64,
}

/// Insert each descriptor unless its `coin_id` is already present.
pub fn sync_instruments(
    conn: &mut SqliteConnection,
    descriptors: &[InstrumentDescriptor],
) -> anyhow::Result<CatalogSyncReport> {
    conn.immediate_transaction::<_, anyhow::Error, _>(|tx| {
        let mut report = CatalogSyncReport::default();

        for d in descriptors {
            let row = NewInstrument {
                coin_id: &d.coin_id,
                name: &d.name,
                symbol: &d.symbol,
                description: &d.description,
            };
            let n = insert_into(instrument::table)
                .values(&row)
                .on_conflict(instrument::coin_id)
                .do_nothing()
                .execute(tx)?;

            if n == 0 {
                report.existing.push(d.name.clone());
            } else {
                report.new.push(d.name.clone());
            }
        }

        report.total = instrument::table.count().get_result(tx)?;
        Ok(report)
    })
}

/// Every stored instrument, ordered by id.
pub fn load_instruments(conn: &mut SqliteConnection) -> QueryResult<Vec<Instrument>> {
    instrument::table
        .order(instrument::id.asc())
        .select(Instrument::as_select())
        .load(conn)
}
