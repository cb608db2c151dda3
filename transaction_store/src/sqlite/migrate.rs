//! Embedded schema migrations.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::{
    sqlite::connection::connect_sqlite,
    store::{MigrationSnafu, StoreError},
};

/// Embedded Diesel migrations bundled with this crate.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs pending migrations on the SQLite database at `url`, returning how many
/// were applied.
pub fn run_sqlite(url: &str) -> Result<usize, StoreError> {
    let mut conn = connect_sqlite(url)?;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
        MigrationSnafu {
            message: e.to_string(),
        }
        .build()
    })?;
    tracing::info!(url, applied = applied.len(), "sqlite migrations applied");
    Ok(applied.len())
}
