use async_trait::async_trait;
use diesel::prelude::*;
use snafu::ResultExt;

use crate::{
    models::{CallerId, DateRange, Transaction},
    sqlite::{
        connection::connect_sqlite,
        rows::{NewTransactionRow, TransactionRow, to_rfc3339_nanos},
        schema::sales_transaction,
    },
    store::{BlockingSnafu, QuerySnafu, StoreError, TransactionStore},
};

use crate::sqlite::schema::sales_transaction::dsl as st;

/// [`TransactionStore`] over a SQLite database file.
///
/// Each query opens its own connection on the blocking pool, so concurrent
/// fetches never share a connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    database_url: String,
}

impl SqliteStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

fn load_range(
    conn: &mut SqliteConnection,
    caller: &CallerId,
    range: DateRange,
) -> Result<Vec<Transaction>, StoreError> {
    let rows = st::sales_transaction
        .filter(st::owner_id.eq(caller.as_str()))
        .filter(st::created_at.ge(to_rfc3339_nanos(range.start)))
        .filter(st::created_at.le(to_rfc3339_nanos(range.end)))
        .order((st::created_at.asc(), st::id.asc()))
        .select(TransactionRow::as_select())
        .load::<TransactionRow>(conn)
        .context(QuerySnafu)?;

    rows.into_iter()
        .map(TransactionRow::into_transaction)
        .collect()
}

#[async_trait]
impl TransactionStore for SqliteStore {
    #[tracing::instrument(skip(self, range), fields(start = %range.start, end = %range.end))]
    async fn fetch_range(
        &self,
        caller: &CallerId,
        range: DateRange,
    ) -> Result<Vec<Transaction>, StoreError> {
        let url = self.database_url.clone();
        let caller = caller.clone();

        let txs = tokio::task::spawn_blocking(move || {
            let mut conn = connect_sqlite(&url)?;
            load_range(&mut conn, &caller, range)
        })
        .await
        .context(BlockingSnafu)??;

        tracing::debug!(rows = txs.len(), "fetched transactions");
        Ok(txs)
    }
}

/// Insert `txs` for `owner` in one immediate transaction. Returns the number of
/// rows written.
pub fn insert_transactions(
    conn: &mut SqliteConnection,
    owner: &CallerId,
    txs: &[Transaction],
) -> Result<usize, StoreError> {
    let rows = txs
        .iter()
        .map(|tx| NewTransactionRow::from_transaction(owner.as_str(), tx))
        .collect::<Result<Vec<_>, _>>()?;

    conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
        let mut written = 0;
        for row in &rows {
            written += diesel::insert_into(sales_transaction::table)
                .values(row)
                .execute(conn)?;
        }
        Ok(written)
    })
    .context(QuerySnafu)
}
