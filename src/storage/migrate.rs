//! Additive schema migrations.
//!
//! Each migration is an ordered list of DDL statements applied inside one
//! transaction and recorded in `schema_migrations`; applying the set is
//! idempotent. The DDL is written to the common subset SQLite and
//! PostgreSQL both accept (TEXT ids, RFC 3339 TEXT timestamps, CHECK
//! constraints with IN lists), so the same steps run on either backend.

/// One schema migration step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

/// Bootstrap SQL for the migration bookkeeping table.
pub const CREATE_SCHEMA_MIGRATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version BIGINT NOT NULL,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL,
    CONSTRAINT schema_migrations_pkey PRIMARY KEY (version)
)
"#;

/// All migrations, in application order. New steps are appended; prior
/// steps are never edited in place.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "core_crm_tables",
        statements: &[
            r#"
CREATE TABLE customers (
    "Customer ID" BIGINT NOT NULL,
    "Country" TEXT,
    "Name" TEXT,
    "Email" TEXT,
    CONSTRAINT customers_pkey PRIMARY KEY ("Customer ID")
)
"#,
            r#"
CREATE TABLE items (
    "StockCode" TEXT NOT NULL,
    "Description" TEXT,
    "Price" DOUBLE PRECISION,
    CONSTRAINT items_pkey PRIMARY KEY ("StockCode")
)
"#,
            r#"
CREATE TABLE transactions (
    "Invoice" BIGINT NOT NULL,
    "StockCode" TEXT NOT NULL,
    "InvoiceDate" TEXT,
    "Quantity" BIGINT,
    "Price" DOUBLE PRECISION,
    "TotalPrice" DOUBLE PRECISION,
    "Customer ID" BIGINT,
    CONSTRAINT transactions_pkey PRIMARY KEY ("Invoice", "StockCode"),
    CONSTRAINT transactions_customer_id_fkey
        FOREIGN KEY ("Customer ID") REFERENCES customers ("Customer ID") ON DELETE SET NULL
)
"#,
            r#"CREATE INDEX idx_transactions_customer_id ON transactions ("Customer ID")"#,
        ],
    },
    Migration {
        version: 2,
        name: "rfm_scores",
        statements: &[
            r#"
CREATE TABLE rfm (
    "Customer ID" BIGINT NOT NULL,
    recency BIGINT NOT NULL,
    frequency BIGINT NOT NULL,
    monetary DOUBLE PRECISION NOT NULL,
    r_score BIGINT NOT NULL,
    f_score BIGINT NOT NULL,
    m_score BIGINT NOT NULL,
    segment TEXT NOT NULL,
    CONSTRAINT rfm_pkey PRIMARY KEY ("Customer ID"),
    CONSTRAINT rfm_customer_id_fkey
        FOREIGN KEY ("Customer ID") REFERENCES customers ("Customer ID") ON DELETE CASCADE,
    CONSTRAINT rfm_recency_check CHECK (recency >= 0),
    CONSTRAINT rfm_frequency_check CHECK (frequency >= 0),
    CONSTRAINT rfm_monetary_check CHECK (monetary >= 0),
    CONSTRAINT rfm_segment_check CHECK (segment IN
        ('Champion', 'Recent Customer', 'Frequent Buyer', 'Big Spender', 'At Risk', 'Others'))
)
"#,
            r#"CREATE INDEX idx_rfm_segment ON rfm (segment)"#,
        ],
    },
    Migration {
        version: 3,
        name: "email_campaigns",
        statements: &[
            r#"
CREATE TABLE marketing_campaigns (
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    type TEXT,
    description TEXT,
    created_at TEXT NOT NULL,
    CONSTRAINT marketing_campaigns_pkey PRIMARY KEY (id),
    CONSTRAINT marketing_campaigns_type_check CHECK (type IN
        ('loyalty', 'referral', 're-engagement'))
)
"#,
            r#"
CREATE TABLE campaign_emails (
    id TEXT NOT NULL,
    campaign_id TEXT,
    customer_id BIGINT,
    subject TEXT,
    body TEXT,
    sent_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'sent',
    opened_at TEXT,
    clicked_at TEXT,
    CONSTRAINT campaign_emails_pkey PRIMARY KEY (id),
    CONSTRAINT campaign_emails_campaign_id_fkey
        FOREIGN KEY (campaign_id) REFERENCES marketing_campaigns (id) ON DELETE CASCADE,
    CONSTRAINT campaign_emails_customer_id_fkey
        FOREIGN KEY (customer_id) REFERENCES customers ("Customer ID") ON DELETE CASCADE,
    CONSTRAINT campaign_emails_status_check CHECK (status IN
        ('sent', 'bounced', 'opened', 'clicked'))
)
"#,
            r#"CREATE INDEX idx_campaign_emails_campaign_id ON campaign_emails (campaign_id)"#,
            r#"CREATE INDEX idx_campaign_emails_customer_id ON campaign_emails (customer_id)"#,
        ],
    },
    Migration {
        version: 4,
        name: "social_media_campaigns",
        statements: &[
            r#"
CREATE TABLE social_media_campaigns (
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    platform TEXT NOT NULL,
    target_segment TEXT NOT NULL,
    campaign_objective TEXT,
    status TEXT NOT NULL DEFAULT 'draft',
    created_at TEXT NOT NULL,
    CONSTRAINT social_media_campaigns_pkey PRIMARY KEY (id),
    CONSTRAINT social_media_campaigns_platform_check CHECK (platform IN
        ('facebook', 'linkedin', 'instagram', 'twitter')),
    CONSTRAINT social_media_campaigns_target_segment_check CHECK (target_segment IN
        ('Champion', 'Recent Customer', 'Frequent Buyer', 'Big Spender', 'At Risk', 'Others')),
    CONSTRAINT social_media_campaigns_status_check CHECK (status IN
        ('draft', 'active', 'paused', 'completed'))
)
"#,
            r#"CREATE INDEX idx_social_media_campaigns_platform ON social_media_campaigns (platform)"#,
            r#"CREATE INDEX idx_social_media_campaigns_target_segment ON social_media_campaigns (target_segment)"#,
            r#"CREATE INDEX idx_social_media_campaigns_status ON social_media_campaigns (status)"#,
            r#"
CREATE TABLE social_media_posts (
    id TEXT NOT NULL,
    campaign_id TEXT NOT NULL,
    platform TEXT NOT NULL,
    post_content TEXT NOT NULL,
    post_tone TEXT,
    hashtags TEXT,
    generated_at TEXT NOT NULL,
    CONSTRAINT social_media_posts_pkey PRIMARY KEY (id),
    CONSTRAINT social_media_posts_campaign_id_fkey
        FOREIGN KEY (campaign_id) REFERENCES social_media_campaigns (id) ON DELETE CASCADE,
    CONSTRAINT social_media_posts_tone_check CHECK (post_tone IN
        ('professional', 'casual', 'friendly', 'promotional', 'educational'))
)
"#,
            r#"CREATE INDEX idx_social_media_posts_campaign_id ON social_media_posts (campaign_id)"#,
            r#"
CREATE TABLE campaign_audience (
    campaign_id TEXT NOT NULL,
    customer_id BIGINT NOT NULL,
    segment TEXT NOT NULL,
    added_at TEXT NOT NULL,
    CONSTRAINT campaign_audience_pkey PRIMARY KEY (campaign_id, customer_id),
    CONSTRAINT campaign_audience_campaign_id_fkey
        FOREIGN KEY (campaign_id) REFERENCES social_media_campaigns (id) ON DELETE CASCADE,
    CONSTRAINT campaign_audience_customer_id_fkey
        FOREIGN KEY (customer_id) REFERENCES customers ("Customer ID") ON DELETE CASCADE
)
"#,
            r#"CREATE INDEX idx_campaign_audience_customer_id ON campaign_audience (customer_id)"#,
            r#"CREATE INDEX idx_campaign_audience_segment ON campaign_audience (segment)"#,
        ],
    },
];
