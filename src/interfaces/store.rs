//! CRM storage interface.

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{
    AudienceSummary, Campaign, CampaignEmail, CampaignStatus, Customer, Item, MarketingCampaign,
    Post, RfmRecord, Segment, TransactionRollup, TransactionRow,
};

use super::ChartTable;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A constraint violation, with the violated constraint named.
    #[error("integrity violation: {constraint}")]
    Integrity { constraint: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration {version} ({name}) failed: {source}")]
    Migration {
        version: i64,
        name: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid stored value: {0}")]
    InvalidStored(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported storage backend: {0}")]
    UnsupportedBackend(String),

    #[error("rejected query: {0}")]
    RejectedQuery(String),
}

impl StorageError {
    /// Map a sqlx error, surfacing constraint violations as `Integrity`
    /// with the violated constraint named.
    pub fn from_db(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            use sqlx::error::ErrorKind;
            let kind = db.kind();
            if matches!(
                kind,
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) {
                let constraint = db
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db.message().to_string());
                return StorageError::Integrity { constraint };
            }
        }
        StorageError::Database(err)
    }
}

/// Interface for CRM persistence.
///
/// Implemented by `SqlCrmStore` for SQLite and PostgreSQL. Every method is
/// a single transaction or a single atomic statement; there is no
/// cross-call state to corrupt.
#[async_trait]
pub trait CrmStore: Send + Sync + std::fmt::Debug {
    /// Apply pending schema migrations. Returns the number applied.
    async fn migrate(&self) -> Result<usize>;

    // -- ingest --------------------------------------------------------

    async fn add_customer(&self, customer: &Customer) -> Result<()>;

    async fn add_item(&self, item: &Item) -> Result<()>;

    /// Append transaction rows inside one transaction.
    async fn add_transactions(&self, rows: &[TransactionRow]) -> Result<()>;

    async fn customer(&self, id: i64) -> Result<Option<Customer>>;

    // -- segmentation --------------------------------------------------

    /// Per-customer aggregates over all transactions that carry a
    /// customer id, ordered by customer id.
    async fn transaction_rollups(&self) -> Result<Vec<TransactionRollup>>;

    /// Replace the whole rfm table with this run's records, inside one
    /// transaction so readers never observe a half-updated table.
    async fn replace_rfm(&self, records: &[RfmRecord]) -> Result<()>;

    /// All current rfm records, ordered by customer id.
    async fn rfm_records(&self) -> Result<Vec<RfmRecord>>;

    // -- social campaigns ----------------------------------------------

    async fn insert_social_campaign(&self, campaign: &Campaign) -> Result<()>;

    async fn social_campaign(&self, id: Uuid) -> Result<Option<Campaign>>;

    /// Returns false if the campaign did not exist. Posts and audience
    /// rows cascade with the parent.
    async fn delete_social_campaign(&self, id: Uuid) -> Result<bool>;

    /// Returns false if the campaign did not exist.
    async fn set_campaign_status(&self, id: Uuid, status: CampaignStatus) -> Result<bool>;

    /// Link every customer currently holding `segment` to the campaign,
    /// skipping pairs already present. One atomic INSERT .. SELECT with
    /// the unique constraint as the source of truth; returns rows added.
    async fn add_audience_from_rfm(
        &self,
        campaign_id: Uuid,
        segment: Segment,
        added_at: &str,
    ) -> Result<u64>;

    async fn audience_count(&self, campaign_id: Uuid) -> Result<i64>;

    async fn audience_summary(&self, campaign_id: Uuid) -> Result<Option<AudienceSummary>>;

    async fn insert_post(&self, post: &Post) -> Result<()>;

    async fn posts_for_campaign(&self, campaign_id: Uuid) -> Result<Vec<Post>>;

    // -- email campaigns -----------------------------------------------

    async fn insert_marketing_campaign(&self, campaign: &MarketingCampaign) -> Result<()>;

    async fn insert_campaign_email(&self, email: &CampaignEmail) -> Result<()>;

    // -- ad-hoc read-only queries (visualization) ----------------------

    /// Run a read-only SELECT and return it as a column/row table.
    /// Non-SELECT statements are rejected before execution.
    async fn select_table(&self, sql: &str) -> Result<ChartTable>;
}
