//! Shared test fixtures: in-memory store and CRM seed data.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use segmenta::interfaces::CrmStore;
use segmenta::model::{Customer, TransactionRow};
use segmenta::storage::sqlite::SqliteCrmStore;

/// Create a migrated in-memory store.
///
/// A single connection keeps every query on the same in-memory
/// database.
pub async fn test_store() -> Arc<dyn CrmStore> {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    let store = SqliteCrmStore::new(pool);
    store.migrate().await.unwrap();
    Arc::new(store)
}

pub fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// Insert a customer plus `invoices` purchases, evenly splitting
/// `total_spend` across them, all dated `last_purchase`.
pub async fn seed_customer(
    store: &Arc<dyn CrmStore>,
    id: i64,
    invoices: i64,
    last_purchase: DateTime<Utc>,
    total_spend: f64,
) {
    store
        .add_customer(&Customer {
            id,
            country: Some("United Kingdom".to_string()),
            name: None,
            email: None,
        })
        .await
        .unwrap();

    let per_invoice = total_spend / invoices as f64;
    let rows: Vec<TransactionRow> = (0..invoices)
        .map(|i| TransactionRow {
            invoice: id * 10_000 + i,
            stock_code: "SKU001".to_string(),
            invoice_date: Some(last_purchase),
            quantity: Some(1),
            price: Some(per_invoice),
            total_price: Some(per_invoice),
            customer_id: Some(id),
        })
        .collect();

    store.add_transactions(&rows).await.unwrap();
}

/// The reference population: four customers whose RFM profiles land in
/// four different segments as of 2024-06-01.
pub async fn seed_reference_population(store: &Arc<dyn CrmStore>) {
    seed_customer(store, 1, 30, date(2024, 5, 31), 5000.0).await;
    seed_customer(store, 2, 1, date(2024, 5, 27), 50.0).await;
    seed_customer(store, 3, 20, date(2023, 4, 28), 2000.0).await;
    seed_customer(store, 4, 5, date(2024, 4, 2), 300.0).await;
}

pub fn as_of() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}
