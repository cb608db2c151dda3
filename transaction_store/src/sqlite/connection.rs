//! SQLite connection helpers.

use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};
use snafu::ResultExt;

use crate::store::{ConnectSnafu, QuerySnafu, StoreError};

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> Result<SqliteConnection, StoreError> {
    let mut conn =
        SqliteConnection::establish(database_url).context(ConnectSnafu { url: database_url })?;

    // WAL lets report reads proceed while an import is writing
    sql_query("PRAGMA journal_mode=WAL;")
        .execute(&mut conn)
        .context(QuerySnafu)?;
    sql_query("PRAGMA foreign_keys=ON;")
        .execute(&mut conn)
        .context(QuerySnafu)?;
    sql_query("PRAGMA busy_timeout=5000;")
        .execute(&mut conn)
        .context(QuerySnafu)?;
    Ok(conn)
}
