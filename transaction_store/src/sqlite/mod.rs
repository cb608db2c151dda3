//! SQLite-backed transaction store.
//!
//! This module provides:
//! - [`connection::connect_sqlite`]: opens a connection with WAL, foreign_keys=ON, and a 5000ms busy_timeout.
//! - [`migrate::run_sqlite`]: applies the embedded Diesel migrations.
//! - [`SqliteStore`]: the [`TransactionStore`](crate::store::TransactionStore) implementation.
//! - [`insert_transactions`]: seeds rows for a caller (used by imports and tests).
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with nanosecond precision, so
//! range filters compare them lexicographically. Line items live in a JSON text
//! column next to the order they belong to.
//!
//! Example:
//! ```no_run
//! use transaction_store::sqlite::{migrate, SqliteStore};
//!
//! let db_path = std::env::temp_dir().join("sales_example.db");
//! let url = db_path.to_str().unwrap();
//! migrate::run_sqlite(url).expect("migrations");
//! let _store = SqliteStore::new(url);
//! ```

pub mod connection;
pub mod migrate;
mod rows;
pub mod schema;
mod store;

pub use store::{SqliteStore, insert_transactions};
