#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sales_analytics::service::{ReportSettings, SalesReportService};
use transaction_store::{
    StoreError, TransactionStore,
    memory::InMemoryStore,
    models::{CallerId, DateRange, LineItem, Transaction},
    store::MigrationSnafu,
};

pub const OWNER: &str = "merchant-1";

pub fn owner() -> CallerId {
    CallerId::new(OWNER)
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn sale(id: &str, total: f64, created_at: DateTime<Utc>, items: Vec<LineItem>) -> Transaction {
    Transaction {
        id: id.into(),
        customer: format!("customer-{id}"),
        total_amount: total,
        created_at,
        items,
    }
}

pub fn line(product: &str, category: Option<&str>, quantity: u32, price: f64) -> LineItem {
    LineItem {
        product_id: product.into(),
        product_name: format!("Product {product}"),
        category: category.map(str::to_string),
        quantity,
        price,
        total: price * quantity as f64,
    }
}

/// Service over an in-memory store holding `txs` for [`OWNER`].
pub fn service_with(txs: Vec<Transaction>, settings: ReportSettings) -> SalesReportService {
    let mut store = InMemoryStore::new();
    store.extend(&owner(), txs);
    SalesReportService::new(Arc::new(store), settings)
}

/// A store whose every fetch fails.
#[derive(Default)]
pub struct FailingStore {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TransactionStore for FailingStore {
    async fn fetch_range(
        &self,
        _caller: &CallerId,
        _range: DateRange,
    ) -> Result<Vec<Transaction>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        MigrationSnafu {
            message: "store offline",
        }
        .fail()
    }
}
