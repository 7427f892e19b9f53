//! RFM customer segmentation.
//!
//! Scores every customer with at least one attributable transaction on
//! recency, frequency and monetary value, maps each dimension to a 1-5
//! quintile score, and classifies the customer into one of six segments.
//! A run fully replaces the rfm table; a failed run leaves the prior
//! table intact.

use chrono::{DateTime, NaiveDate, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::info;

use crate::interfaces::{CrmStore, StorageError};
use crate::model::{RfmRecord, Segment, TransactionRollup};

/// Errors that can occur during a segmentation run.
#[derive(Debug, thiserror::Error)]
pub enum SegmentationError {
    /// No customer has an attributable transaction; there is nothing to
    /// score and quintile boundaries would be undefined.
    #[error("no transactions with a customer id; cannot segment an empty population")]
    EmptyPopulation,

    #[error("customer {customer_id} has transactions but no purchase timestamp")]
    MissingTimestamp { customer_id: i64 },

    #[error("customer {customer_id} has unparseable purchase timestamp '{value}'")]
    InvalidTimestamp { customer_id: i64, value: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Quintile scores for one dimension, aligned with the input order.
///
/// Customers are ranked from worst to best; ties resolve by customer id
/// so reruns over the same data produce the same scores. Rank `k` of `n`
/// maps to `ceil(5k / n)`, so the best customer always scores 5 and a
/// population of one scores 5 across the board.
///
/// `invert` flips the value ordering for dimensions where smaller is
/// better (recency measured in days).
pub fn quintile_scores(pairs: &[(i64, f64)], invert: bool) -> Vec<u8> {
    let n = pairs.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let cmp = pairs[a]
            .1
            .partial_cmp(&pairs[b].1)
            .unwrap_or(Ordering::Equal);
        let cmp = if invert { cmp.reverse() } else { cmp };
        cmp.then_with(|| pairs[a].0.cmp(&pairs[b].0))
    });

    let mut scores = vec![0u8; n];
    for (rank, &idx) in order.iter().enumerate() {
        let k = rank as u64 + 1;
        scores[idx] = (5 * k).div_ceil(n as u64) as u8;
    }
    scores
}

/// Classify a customer from its quintile scores and raw frequency.
///
/// Rules are checked in priority order; the first match wins:
/// Champion (top quintile on all three), Big Spender (top monetary),
/// Frequent Buyer (top frequency), Recent Customer (single purchase,
/// recent), At Risk (stale repeat buyer), Others.
pub fn classify(r_score: u8, f_score: u8, m_score: u8, frequency: i64) -> Segment {
    if r_score == 5 && f_score == 5 && m_score == 5 {
        Segment::Champion
    } else if m_score == 5 {
        Segment::BigSpender
    } else if f_score == 5 {
        Segment::FrequentBuyer
    } else if frequency <= 1 && r_score >= 4 {
        Segment::RecentCustomer
    } else if r_score <= 2 && frequency >= 2 {
        Segment::AtRisk
    } else {
        Segment::Others
    }
}

/// Score one rollup set as of the given date.
///
/// Pure over its inputs; storage errors cannot occur here.
pub fn score_rollups(
    rollups: &[TransactionRollup],
    as_of: NaiveDate,
) -> Result<Vec<RfmRecord>, SegmentationError> {
    if rollups.is_empty() {
        return Err(SegmentationError::EmptyPopulation);
    }

    let mut recency = Vec::with_capacity(rollups.len());
    let mut frequency = Vec::with_capacity(rollups.len());
    let mut monetary = Vec::with_capacity(rollups.len());

    for rollup in rollups {
        let last = rollup
            .last_purchase
            .as_deref()
            .ok_or(SegmentationError::MissingTimestamp {
                customer_id: rollup.customer_id,
            })?;
        let last: DateTime<Utc> = DateTime::parse_from_rfc3339(last)
            .map_err(|_| SegmentationError::InvalidTimestamp {
                customer_id: rollup.customer_id,
                value: last.to_string(),
            })?
            .with_timezone(&Utc);

        // Purchases after the as-of date clamp to zero days rather than
        // going negative.
        let days = (as_of - last.date_naive()).num_days().max(0);
        recency.push((rollup.customer_id, days as f64));
        frequency.push((rollup.customer_id, rollup.frequency as f64));
        monetary.push((rollup.customer_id, rollup.monetary.max(0.0)));
    }

    let r_scores = quintile_scores(&recency, true);
    let f_scores = quintile_scores(&frequency, false);
    let m_scores = quintile_scores(&monetary, false);

    let mut records = Vec::with_capacity(rollups.len());
    for (i, rollup) in rollups.iter().enumerate() {
        let segment = classify(r_scores[i], f_scores[i], m_scores[i], rollup.frequency);
        records.push(RfmRecord {
            customer_id: rollup.customer_id,
            recency: recency[i].1 as i64,
            frequency: rollup.frequency,
            monetary: monetary[i].1,
            r_score: r_scores[i],
            f_score: f_scores[i],
            m_score: m_scores[i],
            segment,
        });
    }
    records.sort_by_key(|r| r.customer_id);

    Ok(records)
}

/// Run a full segmentation pass: aggregate, score, classify, and replace
/// the rfm table. Returns the records written, ordered by customer id.
pub async fn compute_segments(
    store: &Arc<dyn CrmStore>,
    as_of: NaiveDate,
) -> Result<Vec<RfmRecord>, SegmentationError> {
    let rollups = store.transaction_rollups().await?;
    let records = score_rollups(&rollups, as_of)?;
    store.replace_rfm(&records).await?;

    info!(customers = records.len(), %as_of, "segmentation complete");
    Ok(records)
}
