//! End-to-end segmentation tests against the store.

use segmenta::model::{Segment, TransactionRow};
use segmenta::segmentation::{compute_segments, SegmentationError};

use crate::common::{as_of, date, seed_customer, seed_reference_population, test_store};

#[tokio::test]
async fn test_reference_population_lands_in_four_segments() {
    let store = test_store().await;
    seed_reference_population(&store).await;

    let records = compute_segments(&store, as_of()).await.unwrap();
    assert_eq!(records.len(), 4);

    assert_eq!(records[0].customer_id, 1);
    assert_eq!(records[0].segment, Segment::Champion);
    assert_eq!(records[1].segment, Segment::RecentCustomer);
    assert_eq!(records[2].segment, Segment::AtRisk);
    assert_eq!(records[3].segment, Segment::Others);
}

#[tokio::test]
async fn test_records_are_persisted() {
    let store = test_store().await;
    seed_reference_population(&store).await;

    let records = compute_segments(&store, as_of()).await.unwrap();
    let stored = store.rfm_records().await.unwrap();
    assert_eq!(records, stored);
}

#[tokio::test]
async fn test_rerun_replaces_rather_than_accumulates() {
    let store = test_store().await;
    seed_reference_population(&store).await;

    let first = compute_segments(&store, as_of()).await.unwrap();
    let second = compute_segments(&store, as_of()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.rfm_records().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_raw_values_match_transactions() {
    let store = test_store().await;
    seed_reference_population(&store).await;

    let records = compute_segments(&store, as_of()).await.unwrap();
    let champion = &records[0];
    assert_eq!(champion.recency, 1);
    assert_eq!(champion.frequency, 30);
    assert!((champion.monetary - 5000.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_frequency_counts_distinct_invoices() {
    let store = test_store().await;
    seed_customer(&store, 1, 1, date(2024, 5, 30), 100.0).await;

    // A second line on the same invoice must not raise frequency.
    store
        .add_transactions(&[TransactionRow {
            invoice: 10_000,
            stock_code: "SKU002".to_string(),
            invoice_date: Some(date(2024, 5, 30)),
            quantity: Some(2),
            price: Some(5.0),
            total_price: Some(10.0),
            customer_id: Some(1),
        }])
        .await
        .unwrap();

    let rollups = store.transaction_rollups().await.unwrap();
    assert_eq!(rollups.len(), 1);
    assert_eq!(rollups[0].frequency, 1);
    assert!((rollups[0].monetary - 110.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_unattributed_transactions_are_ignored() {
    let store = test_store().await;
    seed_reference_population(&store).await;

    store
        .add_transactions(&[TransactionRow {
            invoice: 999_999,
            stock_code: "SKU001".to_string(),
            invoice_date: Some(date(2024, 5, 30)),
            quantity: Some(1),
            price: Some(1_000_000.0),
            total_price: Some(1_000_000.0),
            customer_id: None,
        }])
        .await
        .unwrap();

    let records = compute_segments(&store, as_of()).await.unwrap();
    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn test_empty_population_is_an_error() {
    let store = test_store().await;

    let err = compute_segments(&store, as_of()).await.unwrap_err();
    assert!(matches!(err, SegmentationError::EmptyPopulation));
}

#[tokio::test]
async fn test_failed_run_leaves_prior_table_intact() {
    let store = test_store().await;
    seed_reference_population(&store).await;
    let first = compute_segments(&store, as_of()).await.unwrap();

    // Customer 5's only transaction has no timestamp; the next run must
    // abort without touching the previously written records.
    store
        .add_customer(&segmenta::model::Customer {
            id: 5,
            country: None,
            name: None,
            email: None,
        })
        .await
        .unwrap();
    store
        .add_transactions(&[TransactionRow {
            invoice: 50_000,
            stock_code: "SKU001".to_string(),
            invoice_date: None,
            quantity: Some(1),
            price: Some(10.0),
            total_price: Some(10.0),
            customer_id: Some(5),
        }])
        .await
        .unwrap();

    let err = compute_segments(&store, as_of()).await.unwrap_err();
    assert!(matches!(
        err,
        SegmentationError::MissingTimestamp { customer_id: 5 }
    ));

    assert_eq!(store.rfm_records().await.unwrap(), first);
}
