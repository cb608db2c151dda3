//! Report assembly.
//!
//! [`compute`] runs the synchronous part of the pipeline over already-fetched
//! transactions: bucket generation, KPI aggregation, line-item breakdown and
//! finally [`assemble`], which only combines results.

use serde::{Deserialize, Serialize};
use transaction_store::models::Transaction;

use crate::{
    aggregate::{Aggregation, Metrics, aggregate},
    bucket::{TrendPoint, generate_buckets},
    calendar::Calendar,
    items::{CategoryRevenue, ItemBreakdown, TopProduct, aggregate_items},
    window::{Window, WindowError},
};

/// The complete analytics response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub metrics: Metrics,
    pub sales_trend: Vec<TrendPoint>,
    pub top_products: Vec<TopProduct>,
    pub revenue_by_category: Vec<CategoryRevenue>,
}

/// Combine aggregation results into a [`SalesReport`].
pub fn assemble(aggregation: Aggregation, items: &ItemBreakdown, top_products: usize) -> SalesReport {
    let metrics = aggregation.metrics;
    SalesReport {
        metrics,
        sales_trend: aggregation.trend.into_points(),
        top_products: items.top_products(top_products),
        revenue_by_category: items.category_distribution(metrics.total_revenue),
    }
}

/// Build a report for `window` from the transactions of its two spans.
pub fn compute(
    cal: &Calendar,
    window: &Window,
    current: &[Transaction],
    previous: &[Transaction],
    top_products: usize,
) -> Result<SalesReport, WindowError> {
    let trend = generate_buckets(cal, window.timeframe, window)?;
    let aggregation = aggregate(cal, current, previous, trend);
    let items = aggregate_items(current);
    Ok(assemble(aggregation, &items, top_products))
}
