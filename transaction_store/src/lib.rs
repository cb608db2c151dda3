//! Caller-scoped access to the sales transaction log.
//!
//! The analytics core never talks to a database directly; it asks a
//! [`store::TransactionStore`] for the transactions in an inclusive time range.
//! This crate owns that seam, the [`models::Transaction`] shape it returns, and
//! two implementations: [`sqlite::SqliteStore`] and [`memory::InMemoryStore`].

pub mod fixture;
pub mod memory;
pub mod models;
pub mod sqlite;
pub mod store;

pub use store::{StoreError, TransactionStore};
