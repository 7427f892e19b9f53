//! Unified SQL CrmStore implementation.
//!
//! Statement building is shared (sea-query, rendered per backend through
//! the `SqlDatabase` trait); a macro generates the trait impl for each
//! SQL backend, keeping pool and row types concrete.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use sea_query::{Expr, Order, Query};
use uuid::Uuid;

use crate::interfaces::StorageError;
use crate::model::{
    Campaign, CampaignEmail, CampaignStatus, Customer, MarketingCampaign, Post, RfmRecord,
    Segment, TransactionRow,
};
use crate::storage::schema::{
    CampaignAudience, CampaignEmails, Customers, Items, MarketingCampaigns, Rfm,
    SchemaMigrations, SocialMediaCampaigns, SocialMediaPosts, Transactions,
};

use super::SqlDatabase;

/// SQL-based implementation of CrmStore.
///
/// Works with any SQL database that implements the `SqlDatabase` trait
/// (PostgreSQL, SQLite).
#[derive(Debug)]
pub struct SqlCrmStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlCrmStore<DB> {
    /// Create a new SQL CRM store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// Reject anything that is not a single SELECT (or WITH .. SELECT).
fn validate_select(sql: &str) -> Result<&str, StorageError> {
    let trimmed = sql.trim();
    let body = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    if body.contains(';') {
        return Err(StorageError::RejectedQuery(
            "multiple statements are not allowed".to_string(),
        ));
    }
    let lower = body.to_ascii_lowercase();
    if !(lower.starts_with("select") || lower.starts_with("with")) {
        return Err(StorageError::RejectedQuery(
            "only SELECT queries are allowed".to_string(),
        ));
    }
    // A CTE prefix is legal on DELETE/UPDATE/INSERT too; the statement
    // following the WITH list must still be a SELECT.
    if lower.starts_with("with") && has_top_level_write_keyword(&lower) {
        return Err(StorageError::RejectedQuery(
            "only SELECT queries are allowed".to_string(),
        ));
    }
    Ok(body)
}

/// Scan for a write keyword at parenthesis depth zero, outside string
/// literals. CTE bodies are parenthesized, so any top-level DELETE,
/// UPDATE, INSERT or REPLACE is the main statement.
fn has_top_level_write_keyword(lower: &str) -> bool {
    const WRITES: [&str; 4] = ["delete", "update", "insert", "replace"];

    let mut depth = 0u32;
    let mut quote: Option<char> = None;
    let mut word = String::new();

    for c in lower.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && quote.is_none() && (c.is_ascii_alphanumeric() || c == '_') {
            word.push(c);
        } else {
            if WRITES.contains(&word.as_str()) {
                return true;
            }
            word.clear();
        }
    }
    WRITES.contains(&word.as_str())
}

fn parse_uuid(s: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(s).map_err(|e| StorageError::InvalidStored(format!("uuid '{s}': {e}")))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidStored(format!("timestamp '{s}': {e}")))
}

fn parse_stored<T>(s: &str) -> Result<T, StorageError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    s.parse()
        .map_err(|e| StorageError::InvalidStored(format!("'{s}': {e}")))
}

/// Shared statement builders. Rendering to SQL text happens per backend.
mod stmts {
    use super::*;

    pub fn insert_customer(c: &Customer) -> sea_query::InsertStatement {
        Query::insert()
            .into_table(Customers::Table)
            .columns([
                Customers::CustomerId,
                Customers::Country,
                Customers::Name,
                Customers::Email,
            ])
            .values_panic([
                c.id.into(),
                c.country.clone().into(),
                c.name.clone().into(),
                c.email.clone().into(),
            ])
            .to_owned()
    }

    pub fn insert_item(i: &crate::model::Item) -> sea_query::InsertStatement {
        Query::insert()
            .into_table(Items::Table)
            .columns([Items::StockCode, Items::Description, Items::Price])
            .values_panic([
                i.stock_code.clone().into(),
                i.description.clone().into(),
                i.price.into(),
            ])
            .to_owned()
    }

    pub fn insert_transaction(t: &TransactionRow) -> sea_query::InsertStatement {
        Query::insert()
            .into_table(Transactions::Table)
            .columns([
                Transactions::Invoice,
                Transactions::StockCode,
                Transactions::InvoiceDate,
                Transactions::Quantity,
                Transactions::Price,
                Transactions::TotalPrice,
                Transactions::CustomerId,
            ])
            .values_panic([
                t.invoice.into(),
                t.stock_code.clone().into(),
                t.invoice_date.map(|d| d.to_rfc3339()).into(),
                t.quantity.into(),
                t.price.into(),
                t.total_price.into(),
                t.customer_id.into(),
            ])
            .to_owned()
    }

    pub fn select_customer(id: i64) -> sea_query::SelectStatement {
        Query::select()
            .columns([
                Customers::CustomerId,
                Customers::Country,
                Customers::Name,
                Customers::Email,
            ])
            .from(Customers::Table)
            .and_where(Expr::col(Customers::CustomerId).eq(id))
            .to_owned()
    }

    pub fn transaction_rollups() -> sea_query::SelectStatement {
        Query::select()
            .column(Transactions::CustomerId)
            .expr(Expr::col(Transactions::InvoiceDate).max())
            .expr(Expr::cust("COUNT(DISTINCT \"Invoice\")"))
            .expr(Expr::col(Transactions::TotalPrice).sum())
            .from(Transactions::Table)
            .and_where(Expr::col(Transactions::CustomerId).is_not_null())
            .group_by_col(Transactions::CustomerId)
            .order_by(Transactions::CustomerId, Order::Asc)
            .to_owned()
    }

    pub fn delete_rfm() -> sea_query::DeleteStatement {
        Query::delete().from_table(Rfm::Table).to_owned()
    }

    pub fn insert_rfm(r: &RfmRecord) -> sea_query::InsertStatement {
        Query::insert()
            .into_table(Rfm::Table)
            .columns([
                Rfm::CustomerId,
                Rfm::Recency,
                Rfm::Frequency,
                Rfm::Monetary,
                Rfm::RScore,
                Rfm::FScore,
                Rfm::MScore,
                Rfm::Segment,
            ])
            .values_panic([
                r.customer_id.into(),
                r.recency.into(),
                r.frequency.into(),
                r.monetary.into(),
                (r.r_score as i64).into(),
                (r.f_score as i64).into(),
                (r.m_score as i64).into(),
                r.segment.as_str().into(),
            ])
            .to_owned()
    }

    pub fn select_rfm() -> sea_query::SelectStatement {
        Query::select()
            .columns([
                Rfm::CustomerId,
                Rfm::Recency,
                Rfm::Frequency,
                Rfm::Monetary,
                Rfm::RScore,
                Rfm::FScore,
                Rfm::MScore,
                Rfm::Segment,
            ])
            .from(Rfm::Table)
            .order_by(Rfm::CustomerId, Order::Asc)
            .to_owned()
    }

    pub fn insert_campaign(c: &Campaign) -> sea_query::InsertStatement {
        Query::insert()
            .into_table(SocialMediaCampaigns::Table)
            .columns([
                SocialMediaCampaigns::Id,
                SocialMediaCampaigns::Name,
                SocialMediaCampaigns::Platform,
                SocialMediaCampaigns::TargetSegment,
                SocialMediaCampaigns::CampaignObjective,
                SocialMediaCampaigns::Status,
                SocialMediaCampaigns::CreatedAt,
            ])
            .values_panic([
                c.id.to_string().into(),
                c.name.clone().into(),
                c.platform.as_str().into(),
                c.target_segment.as_str().into(),
                c.objective.clone().into(),
                c.status.as_str().into(),
                c.created_at.to_rfc3339().into(),
            ])
            .to_owned()
    }

    pub fn select_campaign(id: Uuid) -> sea_query::SelectStatement {
        Query::select()
            .columns([
                SocialMediaCampaigns::Id,
                SocialMediaCampaigns::Name,
                SocialMediaCampaigns::Platform,
                SocialMediaCampaigns::TargetSegment,
                SocialMediaCampaigns::CampaignObjective,
                SocialMediaCampaigns::Status,
                SocialMediaCampaigns::CreatedAt,
            ])
            .from(SocialMediaCampaigns::Table)
            .and_where(Expr::col(SocialMediaCampaigns::Id).eq(id.to_string()))
            .to_owned()
    }

    pub fn delete_campaign(id: Uuid) -> sea_query::DeleteStatement {
        Query::delete()
            .from_table(SocialMediaCampaigns::Table)
            .and_where(Expr::col(SocialMediaCampaigns::Id).eq(id.to_string()))
            .to_owned()
    }

    pub fn update_campaign_status(id: Uuid, status: CampaignStatus) -> sea_query::UpdateStatement {
        Query::update()
            .table(SocialMediaCampaigns::Table)
            .value(SocialMediaCampaigns::Status, status.as_str())
            .and_where(Expr::col(SocialMediaCampaigns::Id).eq(id.to_string()))
            .to_owned()
    }

    /// INSERT .. SELECT from the rfm table, skipping pairs already
    /// present. The composite primary key is the conflict target.
    pub fn insert_audience_from_rfm(
        campaign_id: Uuid,
        segment: Segment,
        added_at: &str,
    ) -> sea_query::InsertStatement {
        let select = Query::select()
            .expr(Expr::val(campaign_id.to_string()))
            .column(Rfm::CustomerId)
            .column(Rfm::Segment)
            .expr(Expr::val(added_at))
            .from(Rfm::Table)
            .and_where(Expr::col(Rfm::Segment).eq(segment.as_str()))
            .to_owned();

        let mut insert = Query::insert();
        insert.into_table(CampaignAudience::Table).columns([
            CampaignAudience::CampaignId,
            CampaignAudience::CustomerId,
            CampaignAudience::Segment,
            CampaignAudience::AddedAt,
        ]);
        insert
            .select_from(select)
            .expect("audience select matches insert columns");
        insert.on_conflict(
            sea_query::OnConflict::columns([
                CampaignAudience::CampaignId,
                CampaignAudience::CustomerId,
            ])
            .do_nothing()
            .to_owned(),
        );
        insert.to_owned()
    }

    pub fn audience_count(campaign_id: Uuid) -> sea_query::SelectStatement {
        Query::select()
            .expr(Expr::col(CampaignAudience::CustomerId).count())
            .from(CampaignAudience::Table)
            .and_where(Expr::col(CampaignAudience::CampaignId).eq(campaign_id.to_string()))
            .to_owned()
    }

    pub fn audience_summary(campaign_id: Uuid) -> sea_query::SelectStatement {
        Query::select()
            .column((SocialMediaCampaigns::Table, SocialMediaCampaigns::Id))
            .column((SocialMediaCampaigns::Table, SocialMediaCampaigns::Name))
            .column((SocialMediaCampaigns::Table, SocialMediaCampaigns::Platform))
            .column((
                SocialMediaCampaigns::Table,
                SocialMediaCampaigns::TargetSegment,
            ))
            .column((SocialMediaCampaigns::Table, SocialMediaCampaigns::Status))
            .column((SocialMediaCampaigns::Table, SocialMediaCampaigns::CreatedAt))
            .expr(Expr::col((CampaignAudience::Table, CampaignAudience::CustomerId)).count())
            .from(SocialMediaCampaigns::Table)
            .left_join(
                CampaignAudience::Table,
                Expr::col((SocialMediaCampaigns::Table, SocialMediaCampaigns::Id))
                    .equals((CampaignAudience::Table, CampaignAudience::CampaignId)),
            )
            .and_where(
                Expr::col((SocialMediaCampaigns::Table, SocialMediaCampaigns::Id))
                    .eq(campaign_id.to_string()),
            )
            .group_by_columns([
                (SocialMediaCampaigns::Table, SocialMediaCampaigns::Id),
                (SocialMediaCampaigns::Table, SocialMediaCampaigns::Name),
                (SocialMediaCampaigns::Table, SocialMediaCampaigns::Platform),
                (
                    SocialMediaCampaigns::Table,
                    SocialMediaCampaigns::TargetSegment,
                ),
                (SocialMediaCampaigns::Table, SocialMediaCampaigns::Status),
                (SocialMediaCampaigns::Table, SocialMediaCampaigns::CreatedAt),
            ])
            .to_owned()
    }

    pub fn insert_post(p: &Post) -> sea_query::InsertStatement {
        Query::insert()
            .into_table(SocialMediaPosts::Table)
            .columns([
                SocialMediaPosts::Id,
                SocialMediaPosts::CampaignId,
                SocialMediaPosts::Platform,
                SocialMediaPosts::PostContent,
                SocialMediaPosts::PostTone,
                SocialMediaPosts::Hashtags,
                SocialMediaPosts::GeneratedAt,
            ])
            .values_panic([
                p.id.to_string().into(),
                p.campaign_id.to_string().into(),
                p.platform.as_str().into(),
                p.content.clone().into(),
                p.tone.map(|t| t.as_str()).into(),
                p.hashtags.clone().into(),
                p.generated_at.to_rfc3339().into(),
            ])
            .to_owned()
    }

    pub fn posts_for_campaign(campaign_id: Uuid) -> sea_query::SelectStatement {
        Query::select()
            .columns([
                SocialMediaPosts::Id,
                SocialMediaPosts::CampaignId,
                SocialMediaPosts::Platform,
                SocialMediaPosts::PostContent,
                SocialMediaPosts::PostTone,
                SocialMediaPosts::Hashtags,
                SocialMediaPosts::GeneratedAt,
            ])
            .from(SocialMediaPosts::Table)
            .and_where(Expr::col(SocialMediaPosts::CampaignId).eq(campaign_id.to_string()))
            .order_by(SocialMediaPosts::GeneratedAt, Order::Asc)
            .to_owned()
    }

    pub fn insert_marketing_campaign(c: &MarketingCampaign) -> sea_query::InsertStatement {
        Query::insert()
            .into_table(MarketingCampaigns::Table)
            .columns([
                MarketingCampaigns::Id,
                MarketingCampaigns::Name,
                MarketingCampaigns::CampaignType,
                MarketingCampaigns::Description,
                MarketingCampaigns::CreatedAt,
            ])
            .values_panic([
                c.id.to_string().into(),
                c.name.clone().into(),
                c.campaign_type.as_str().into(),
                c.description.clone().into(),
                c.created_at.to_rfc3339().into(),
            ])
            .to_owned()
    }

    pub fn insert_campaign_email(e: &CampaignEmail) -> sea_query::InsertStatement {
        Query::insert()
            .into_table(CampaignEmails::Table)
            .columns([
                CampaignEmails::Id,
                CampaignEmails::CampaignId,
                CampaignEmails::CustomerId,
                CampaignEmails::Subject,
                CampaignEmails::Body,
                CampaignEmails::Status,
                CampaignEmails::SentAt,
            ])
            .values_panic([
                e.id.to_string().into(),
                e.campaign_id.to_string().into(),
                e.customer_id.into(),
                e.subject.clone().into(),
                e.body.clone().into(),
                e.status.as_str().into(),
                e.sent_at.to_rfc3339().into(),
            ])
            .to_owned()
    }

    pub fn migration_applied(version: i64) -> sea_query::SelectStatement {
        Query::select()
            .column(SchemaMigrations::Version)
            .from(SchemaMigrations::Table)
            .and_where(Expr::col(SchemaMigrations::Version).eq(version))
            .to_owned()
    }

    pub fn record_migration(version: i64, name: &str) -> sea_query::InsertStatement {
        Query::insert()
            .into_table(SchemaMigrations::Table)
            .columns([
                SchemaMigrations::Version,
                SchemaMigrations::Name,
                SchemaMigrations::AppliedAt,
            ])
            .values_panic([
                version.into(),
                name.into(),
                Utc::now().to_rfc3339().into(),
            ])
            .to_owned()
    }
}

/// Macro to implement CrmStore for a specific SQL backend.
///
/// Pool and row types stay concrete inside each expansion, which keeps
/// sqlx's executor and decode machinery free of generic bounds.
macro_rules! impl_crm_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::CrmStore for SqlCrmStore<$db_type> {
            async fn migrate(&self) -> crate::interfaces::Result<usize> {
                use crate::storage::migrate::{CREATE_SCHEMA_MIGRATIONS, MIGRATIONS};

                sqlx::query(CREATE_SCHEMA_MIGRATIONS)
                    .execute(&self.pool)
                    .await?;

                let mut applied = 0;
                for migration in MIGRATIONS {
                    let check = <$db_type>::build_select(stmts::migration_applied(migration.version));
                    if sqlx::query(&check)
                        .fetch_optional(&self.pool)
                        .await?
                        .is_some()
                    {
                        continue;
                    }

                    let mut tx = self.pool.begin().await?;
                    for statement in migration.statements {
                        sqlx::query(statement).execute(&mut *tx).await.map_err(|e| {
                            StorageError::Migration {
                                version: migration.version,
                                name: migration.name,
                                source: e,
                            }
                        })?;
                    }

                    let record = <$db_type>::build_insert(stmts::record_migration(
                        migration.version,
                        migration.name,
                    ));
                    sqlx::query(&record).execute(&mut *tx).await?;
                    tx.commit().await?;

                    tracing::info!(
                        version = migration.version,
                        name = migration.name,
                        "applied migration"
                    );
                    applied += 1;
                }

                Ok(applied)
            }

            async fn add_customer(&self, customer: &Customer) -> crate::interfaces::Result<()> {
                let sql = <$db_type>::build_insert(stmts::insert_customer(customer));
                sqlx::query(&sql)
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::from_db)?;
                Ok(())
            }

            async fn add_item(&self, item: &crate::model::Item) -> crate::interfaces::Result<()> {
                let sql = <$db_type>::build_insert(stmts::insert_item(item));
                sqlx::query(&sql)
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::from_db)?;
                Ok(())
            }

            async fn add_transactions(
                &self,
                rows: &[TransactionRow],
            ) -> crate::interfaces::Result<()> {
                if rows.is_empty() {
                    return Ok(());
                }

                let mut tx = self.pool.begin().await?;
                for row in rows {
                    let sql = <$db_type>::build_insert(stmts::insert_transaction(row));
                    sqlx::query(&sql)
                        .execute(&mut *tx)
                        .await
                        .map_err(StorageError::from_db)?;
                }
                tx.commit().await?;
                Ok(())
            }

            async fn customer(&self, id: i64) -> crate::interfaces::Result<Option<Customer>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(stmts::select_customer(id));
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                Ok(row.map(|row| Customer {
                    id: row.get(0),
                    country: row.get(1),
                    name: row.get(2),
                    email: row.get(3),
                }))
            }

            async fn transaction_rollups(
                &self,
            ) -> crate::interfaces::Result<Vec<crate::model::TransactionRollup>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(stmts::transaction_rollups());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let mut rollups = Vec::with_capacity(rows.len());
                for row in rows {
                    let monetary: Option<f64> = row.get(3);
                    rollups.push(crate::model::TransactionRollup {
                        customer_id: row.get(0),
                        last_purchase: row.get(1),
                        frequency: row.get(2),
                        monetary: monetary.unwrap_or(0.0),
                    });
                }

                Ok(rollups)
            }

            async fn replace_rfm(&self, records: &[RfmRecord]) -> crate::interfaces::Result<()> {
                let mut tx = self.pool.begin().await?;

                let delete = <$db_type>::build_delete(stmts::delete_rfm());
                sqlx::query(&delete).execute(&mut *tx).await?;

                for record in records {
                    let sql = <$db_type>::build_insert(stmts::insert_rfm(record));
                    sqlx::query(&sql)
                        .execute(&mut *tx)
                        .await
                        .map_err(StorageError::from_db)?;
                }

                tx.commit().await?;
                Ok(())
            }

            async fn rfm_records(&self) -> crate::interfaces::Result<Vec<RfmRecord>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(stmts::select_rfm());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let mut records = Vec::with_capacity(rows.len());
                for row in rows {
                    let segment: String = row.get(7);
                    records.push(RfmRecord {
                        customer_id: row.get(0),
                        recency: row.get(1),
                        frequency: row.get(2),
                        monetary: row.get(3),
                        r_score: row.get::<i64, _>(4) as u8,
                        f_score: row.get::<i64, _>(5) as u8,
                        m_score: row.get::<i64, _>(6) as u8,
                        segment: parse_stored(&segment)?,
                    });
                }

                Ok(records)
            }

            async fn insert_social_campaign(
                &self,
                campaign: &Campaign,
            ) -> crate::interfaces::Result<()> {
                let sql = <$db_type>::build_insert(stmts::insert_campaign(campaign));
                sqlx::query(&sql)
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::from_db)?;
                Ok(())
            }

            async fn social_campaign(
                &self,
                id: Uuid,
            ) -> crate::interfaces::Result<Option<Campaign>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(stmts::select_campaign(id));
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                match row {
                    Some(row) => {
                        let id: String = row.get(0);
                        let platform: String = row.get(2);
                        let segment: String = row.get(3);
                        let status: String = row.get(5);
                        let created_at: String = row.get(6);
                        Ok(Some(Campaign {
                            id: parse_uuid(&id)?,
                            name: row.get(1),
                            platform: parse_stored(&platform)?,
                            target_segment: parse_stored(&segment)?,
                            objective: row.get(4),
                            status: parse_stored(&status)?,
                            created_at: parse_timestamp(&created_at)?,
                        }))
                    }
                    None => Ok(None),
                }
            }

            async fn delete_social_campaign(&self, id: Uuid) -> crate::interfaces::Result<bool> {
                let sql = <$db_type>::build_delete(stmts::delete_campaign(id));
                let result = sqlx::query(&sql).execute(&self.pool).await?;
                Ok(result.rows_affected() > 0)
            }

            async fn set_campaign_status(
                &self,
                id: Uuid,
                status: CampaignStatus,
            ) -> crate::interfaces::Result<bool> {
                let sql = <$db_type>::build_update(stmts::update_campaign_status(id, status));
                let result = sqlx::query(&sql)
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::from_db)?;
                Ok(result.rows_affected() > 0)
            }

            async fn add_audience_from_rfm(
                &self,
                campaign_id: Uuid,
                segment: Segment,
                added_at: &str,
            ) -> crate::interfaces::Result<u64> {
                let sql = <$db_type>::build_insert(stmts::insert_audience_from_rfm(
                    campaign_id,
                    segment,
                    added_at,
                ));
                let result = sqlx::query(&sql)
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::from_db)?;
                Ok(result.rows_affected())
            }

            async fn audience_count(&self, campaign_id: Uuid) -> crate::interfaces::Result<i64> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(stmts::audience_count(campaign_id));
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
                Ok(row.get(0))
            }

            async fn audience_summary(
                &self,
                campaign_id: Uuid,
            ) -> crate::interfaces::Result<Option<crate::model::AudienceSummary>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(stmts::audience_summary(campaign_id));
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                match row {
                    Some(row) => {
                        let id: String = row.get(0);
                        let platform: String = row.get(2);
                        let segment: String = row.get(3);
                        let status: String = row.get(4);
                        let created_at: String = row.get(5);
                        Ok(Some(crate::model::AudienceSummary {
                            campaign_id: parse_uuid(&id)?,
                            campaign_name: row.get(1),
                            platform: parse_stored(&platform)?,
                            target_segment: parse_stored(&segment)?,
                            status: parse_stored(&status)?,
                            created_at: parse_timestamp(&created_at)?,
                            audience_size: row.get(6),
                        }))
                    }
                    None => Ok(None),
                }
            }

            async fn insert_post(&self, post: &Post) -> crate::interfaces::Result<()> {
                let sql = <$db_type>::build_insert(stmts::insert_post(post));
                sqlx::query(&sql)
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::from_db)?;
                Ok(())
            }

            async fn posts_for_campaign(
                &self,
                campaign_id: Uuid,
            ) -> crate::interfaces::Result<Vec<Post>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(stmts::posts_for_campaign(campaign_id));
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let mut posts = Vec::with_capacity(rows.len());
                for row in rows {
                    let id: String = row.get(0);
                    let campaign: String = row.get(1);
                    let platform: String = row.get(2);
                    let tone: Option<String> = row.get(4);
                    let generated_at: String = row.get(6);
                    posts.push(Post {
                        id: parse_uuid(&id)?,
                        campaign_id: parse_uuid(&campaign)?,
                        platform: parse_stored(&platform)?,
                        content: row.get(3),
                        tone: tone.as_deref().map(parse_stored).transpose()?,
                        hashtags: row.get(5),
                        generated_at: parse_timestamp(&generated_at)?,
                    });
                }

                Ok(posts)
            }

            async fn insert_marketing_campaign(
                &self,
                campaign: &MarketingCampaign,
            ) -> crate::interfaces::Result<()> {
                let sql = <$db_type>::build_insert(stmts::insert_marketing_campaign(campaign));
                sqlx::query(&sql)
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::from_db)?;
                Ok(())
            }

            async fn insert_campaign_email(
                &self,
                email: &CampaignEmail,
            ) -> crate::interfaces::Result<()> {
                let sql = <$db_type>::build_insert(stmts::insert_campaign_email(email));
                sqlx::query(&sql)
                    .execute(&self.pool)
                    .await
                    .map_err(StorageError::from_db)?;
                Ok(())
            }

            async fn select_table(
                &self,
                sql: &str,
            ) -> crate::interfaces::Result<crate::interfaces::ChartTable> {
                use sqlx::{Column, Row};

                let body = validate_select(sql)?;
                let rows = sqlx::query(body).fetch_all(&self.pool).await?;

                let mut table = crate::interfaces::ChartTable::default();
                if let Some(first) = rows.first() {
                    table.columns = first
                        .columns()
                        .iter()
                        .map(|c| c.name().to_string())
                        .collect();
                }

                for row in &rows {
                    let mut values = Vec::with_capacity(row.len());
                    for i in 0..row.len() {
                        let value = if let Ok(v) = row.try_get::<Option<i64>, _>(i) {
                            v.map(serde_json::Value::from)
                                .unwrap_or(serde_json::Value::Null)
                        } else if let Ok(v) = row.try_get::<Option<f64>, _>(i) {
                            v.map(serde_json::Value::from)
                                .unwrap_or(serde_json::Value::Null)
                        } else if let Ok(v) = row.try_get::<Option<String>, _>(i) {
                            v.map(serde_json::Value::from)
                                .unwrap_or(serde_json::Value::Null)
                        } else {
                            serde_json::Value::Null
                        };
                        values.push(value);
                    }
                    table.rows.push(values);
                }

                Ok(table)
            }
        }
    };
}

#[cfg(feature = "postgres")]
impl_crm_store!(super::postgres::Postgres, "postgres");
#[cfg(feature = "sqlite")]
impl_crm_store!(super::sqlite::Sqlite, "sqlite");
