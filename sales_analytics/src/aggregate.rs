//! Order-level KPIs and trend filling.

use serde::{Deserialize, Serialize};
use transaction_store::models::Transaction;

use crate::{bucket::TrendSeries, calendar::Calendar};

/// `numerator / denominator`, or `0.0` when the denominator is zero or the
/// quotient is not finite. Every ratio in a report goes through here.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Percentage change from `previous` to `current`; `0.0` when `previous` is zero.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    safe_ratio(current - previous, previous) * 100.0
}

/// Revenue, order count and average order value of one span.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeriodTotals {
    pub revenue: f64,
    pub orders: u64,
    pub avg_order_value: f64,
}

impl PeriodTotals {
    pub fn from_transactions(txs: &[Transaction]) -> Self {
        // f64::sum of nothing is -0.0
        let revenue = txs.iter().fold(0.0, |acc, tx| acc + tx.total_amount);
        let orders = txs.len() as u64;
        Self {
            revenue,
            orders,
            avg_order_value: safe_ratio(revenue, orders as f64),
        }
    }
}

/// Period-over-period percentage changes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    /// Revenue change.
    pub revenue: f64,
    /// Change in number of sales (order count).
    pub sales: f64,
    /// Average order value change.
    pub avg_order: f64,
    /// Order count change.
    pub orders: f64,
}

impl PeriodComparison {
    pub fn between(current: &PeriodTotals, previous: &PeriodTotals) -> Self {
        let orders = percent_change(current.orders as f64, previous.orders as f64);
        Self {
            revenue: percent_change(current.revenue, previous.revenue),
            sales: orders,
            avg_order: percent_change(current.avg_order_value, previous.avg_order_value),
            orders,
        }
    }
}

/// Headline KPIs of a report.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub avg_order_value: f64,
    pub previous_period_comparison: PeriodComparison,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub metrics: Metrics,
    /// The input series with every matched transaction added.
    pub trend: TrendSeries,
    /// Current-window transactions that fell outside every bucket.
    pub unmatched: usize,
}

/// Compute KPIs for both spans and fill `trend` with the current span.
pub fn aggregate(
    cal: &Calendar,
    current: &[Transaction],
    previous: &[Transaction],
    mut trend: TrendSeries,
) -> Aggregation {
    let now = PeriodTotals::from_transactions(current);
    let before = PeriodTotals::from_transactions(previous);

    let mut unmatched = 0;
    for tx in current {
        if !trend.add(cal.local(tx.created_at), tx.total_amount) {
            unmatched += 1;
        }
    }
    if unmatched > 0 {
        tracing::debug!(unmatched, "transactions outside the trend buckets");
    }

    Aggregation {
        metrics: Metrics {
            total_revenue: now.revenue,
            total_orders: now.orders,
            avg_order_value: now.avg_order_value,
            previous_period_comparison: PeriodComparison::between(&now, &before),
        },
        trend,
        unmatched,
    }
}
