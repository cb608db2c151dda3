//! Queryable/Insertable helper structs used by the SQLite store.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use snafu::ResultExt;

use crate::{
    models::{LineItem, Transaction},
    sqlite::schema::sales_transaction,
    store::{DecodeItemsSnafu, EncodeItemsSnafu, StoreError, TimestampSnafu},
};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = sales_transaction, check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct TransactionRow {
    pub(crate) id: String,
    pub(crate) customer: String,
    pub(crate) total_amount: f64,
    pub(crate) created_at: String, // RFC3339 UTC, nanoseconds
    pub(crate) items: String,      // JSON array of LineItem
}

#[derive(Insertable, Debug)]
#[diesel(table_name = sales_transaction)]
pub(crate) struct NewTransactionRow<'a> {
    pub(crate) id: &'a str,
    pub(crate) owner_id: &'a str,
    pub(crate) customer: &'a str,
    pub(crate) total_amount: f64,
    pub(crate) created_at: String,
    pub(crate) items: String,
}

/// Storage key for an instant: fixed-width, so string order is time order.
pub(crate) fn to_rfc3339_nanos(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl TransactionRow {
    pub(crate) fn into_transaction(self) -> Result<Transaction, StoreError> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .context(TimestampSnafu {
                id: self.id.as_str(),
                value: self.created_at.as_str(),
            })?
            .with_timezone(&Utc);
        let items: Vec<LineItem> =
            serde_json::from_str(&self.items).context(DecodeItemsSnafu { id: self.id.as_str() })?;

        Ok(Transaction {
            id: self.id,
            customer: self.customer,
            total_amount: self.total_amount,
            created_at,
            items,
        })
    }
}

impl<'a> NewTransactionRow<'a> {
    pub(crate) fn from_transaction(owner: &'a str, tx: &'a Transaction) -> Result<Self, StoreError> {
        let items = serde_json::to_string(&tx.items).context(EncodeItemsSnafu { id: tx.id.as_str() })?;
        Ok(Self {
            id: &tx.id,
            owner_id: owner,
            customer: &tx.customer,
            total_amount: tx.total_amount,
            created_at: to_rfc3339_nanos(tx.created_at),
            items,
        })
    }
}
