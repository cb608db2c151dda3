//! Canonical in-memory representation of a recorded sale.
//!
//! Every [`TransactionStore`](crate::store::TransactionStore) implementation
//! returns this shape, whatever the backing storage looks like.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category label used for line items that carry no category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A completed sale with its embedded line items.
///
/// `total_amount` is the order value captured when the sale was recorded. It is
/// never recomputed from `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Store-assigned identifier.
    pub id: String,

    /// Free-form customer label.
    pub customer: String,

    /// Order value in currency units.
    pub total_amount: f64,

    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,

    /// Ordered product lines.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// One product line within a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub product_name: String,

    /// Optional category; see [`LineItem::category_label`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    pub quantity: u32,

    /// Unit price.
    pub price: f64,

    /// Line total as recorded (normally `quantity * price`).
    pub total: f64,
}

impl LineItem {
    /// The category to aggregate under: the trimmed label, or
    /// [`UNCATEGORIZED`] when it is missing or blank.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label,
            _ => UNCATEGORIZED,
        }
    }
}
