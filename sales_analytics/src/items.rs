//! Line-item breakdowns: per-product and per-category totals.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use transaction_store::models::Transaction;

use crate::aggregate::safe_ratio;

/// Default length of the top-products list.
pub const DEFAULT_TOP_PRODUCTS: usize = 5;

/// Accumulated totals for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTotals {
    /// First name seen for the product id.
    pub name: String,
    pub quantity: u64,
    pub revenue: f64,
}

/// Ranked product entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub id: String,
    pub name: String,
    pub revenue: f64,
    pub quantity: u64,
}

/// Category share of revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
    pub percentage: f64,
}

/// Per-product and per-category accumulators, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ItemBreakdown {
    pub by_product: IndexMap<String, ProductTotals>,
    pub by_category: IndexMap<String, f64>,
}

/// Decompose every transaction's items into product and category totals.
pub fn aggregate_items(txs: &[Transaction]) -> ItemBreakdown {
    let mut out = ItemBreakdown::default();
    for item in txs.iter().flat_map(|tx| &tx.items) {
        let product = out
            .by_product
            .entry(item.product_id.clone())
            .or_insert_with(|| ProductTotals {
                name: item.product_name.clone(),
                quantity: 0,
                revenue: 0.0,
            });
        product.quantity += u64::from(item.quantity);
        product.revenue += item.total;

        *out.by_category
            .entry(item.category_label().to_string())
            .or_insert(0.0) += item.total;
    }
    out
}

impl ItemBreakdown {
    /// The `limit` highest-revenue products. Ties keep first-seen order.
    pub fn top_products(&self, limit: usize) -> Vec<TopProduct> {
        let mut ranked: Vec<(&String, &ProductTotals)> = self.by_product.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.revenue.total_cmp(&a.1.revenue));
        ranked
            .into_iter()
            .take(limit)
            .map(|(id, p)| TopProduct {
                id: id.clone(),
                name: p.name.clone(),
                revenue: p.revenue,
                quantity: p.quantity,
            })
            .collect()
    }

    /// Revenue per category with its share of `total_revenue` in percent.
    pub fn category_distribution(&self, total_revenue: f64) -> Vec<CategoryRevenue> {
        self.by_category
            .iter()
            .map(|(category, &revenue)| CategoryRevenue {
                category: category.clone(),
                revenue,
                percentage: safe_ratio(revenue, total_revenue) * 100.0,
            })
            .collect()
    }
}
