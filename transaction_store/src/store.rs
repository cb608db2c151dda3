//! Storage abstraction for recorded sales.
//!
//! This module defines the [`TransactionStore`] trait, the single seam through
//! which analytics code reads transactions. Implementations decide where rows
//! live (SQLite, memory, a remote service); callers only ever see
//! [`Transaction`] values.
//!
//! The trait is async and object safe, so a store can be picked at runtime and
//! shared as `Arc<dyn TransactionStore>`.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use transaction_store::models::{CallerId, DateRange, Transaction};
//! use transaction_store::store::{StoreError, TransactionStore};
//!
//! struct EmptyStore;
//!
//! #[async_trait]
//! impl TransactionStore for EmptyStore {
//!     async fn fetch_range(
//!         &self,
//!         _caller: &CallerId,
//!         _range: DateRange,
//!     ) -> Result<Vec<Transaction>, StoreError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{CallerId, DateRange, Transaction};

/// Read access to a caller-scoped transaction log.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Returns every transaction owned by `caller` whose creation timestamp lies
    /// in `range` (both bounds inclusive), oldest first.
    async fn fetch_range(
        &self,
        caller: &CallerId,
        range: DateRange,
    ) -> Result<Vec<Transaction>, StoreError>;
}

/// Errors raised by [`TransactionStore`] implementations and the helpers that
/// seed them.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    /// Opening the database failed.
    #[snafu(display("Failed to connect to {url}: {source}"))]
    Connect {
        url: String,
        source: diesel::ConnectionError,
        backtrace: Backtrace,
    },

    /// A statement failed to execute.
    #[snafu(display("Query failed: {source}"))]
    Query {
        source: diesel::result::Error,
        backtrace: Backtrace,
    },

    /// Embedded migrations could not be applied.
    #[snafu(display("Migration failed: {message}"))]
    Migration {
        message: String,
        backtrace: Backtrace,
    },

    /// A stored timestamp is not valid RFC 3339.
    #[snafu(display("Transaction {id} has an invalid timestamp {value:?}: {source}"))]
    Timestamp {
        id: String,
        value: String,
        source: chrono::ParseError,
        backtrace: Backtrace,
    },

    /// Stored line items could not be decoded.
    #[snafu(display("Transaction {id} has malformed line items: {source}"))]
    DecodeItems {
        id: String,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// Line items could not be encoded for storage.
    #[snafu(display("Transaction {id} line items could not be encoded: {source}"))]
    EncodeItems {
        id: String,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// A blocking database task panicked or was cancelled.
    #[snafu(display("Blocking store task failed: {source}"))]
    Blocking {
        source: tokio::task::JoinError,
        backtrace: Backtrace,
    },

    /// A fixture file could not be read.
    #[snafu(display("Failed to read fixture {}: {source}", path.display()))]
    FixtureRead {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A fixture file is not a JSON array of transactions.
    #[snafu(display("Fixture {} is not a valid transaction list: {source}", path.display()))]
    FixtureFormat {
        path: PathBuf,
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}
