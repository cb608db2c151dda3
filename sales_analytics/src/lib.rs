//! Time-windowed sales analytics.
//!
//! A report is built in four steps:
//! 1. [`window::resolve`] turns a timeframe (or an explicit range) into the
//!    current span plus the span it is compared against.
//! 2. The caller's transactions for both spans are fetched concurrently from a
//!    [`transaction_store::TransactionStore`].
//! 3. [`bucket::generate_buckets`] lays out the trend series and
//!    [`aggregate::aggregate`] / [`items::aggregate_items`] fill it and compute
//!    the KPIs and line-item breakdowns.
//! 4. [`report::assemble`] combines the results into a [`report::SalesReport`].
//!
//! [`service::SalesReportService`] wires the steps together and maps failures
//! onto API error classes.

pub mod aggregate;
pub mod bucket;
pub mod calendar;
pub mod config;
pub mod env;
pub mod items;
pub mod report;
pub mod service;
pub mod timeframe;
pub mod tz;
pub mod window;
