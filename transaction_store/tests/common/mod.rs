#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use diesel::SqliteConnection;
use tempfile::TempDir;
use transaction_store::models::{LineItem, Transaction};
use transaction_store::sqlite::{connection, migrate};

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/sales.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("sales.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
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
