//! Embedded schema migrations.

use anyhow::anyhow;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::db::connection::connect_sqlite;

/// Embedded Diesel migrations bundled with this crate.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs pending migrations on the SQLite database at `url`, creating the
/// file if needed. Returns the number of migrations applied.
pub fn run_sqlite(url: &str) -> anyhow::Result<usize> {
    let mut conn = connect_sqlite(url)?;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| anyhow!(e))?;
    Ok(applied.len())
}
