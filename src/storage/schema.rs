//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query
//! building. Quoted mixed-case column names ("Customer ID", "InvoiceDate")
//! are kept for compatibility with the existing CRM data load.

use sea_query::Iden;

/// Customers table schema.
#[derive(Iden)]
pub enum Customers {
    Table,
    #[iden = "Customer ID"]
    CustomerId,
    #[iden = "Country"]
    Country,
    #[iden = "Name"]
    Name,
    #[iden = "Email"]
    Email,
}

/// Transactions table schema.
#[derive(Iden)]
pub enum Transactions {
    Table,
    #[iden = "Invoice"]
    Invoice,
    #[iden = "StockCode"]
    StockCode,
    #[iden = "InvoiceDate"]
    InvoiceDate,
    #[iden = "Quantity"]
    Quantity,
    #[iden = "Price"]
    Price,
    #[iden = "TotalPrice"]
    TotalPrice,
    #[iden = "Customer ID"]
    CustomerId,
}

/// Items table schema.
#[derive(Iden)]
pub enum Items {
    Table,
    #[iden = "StockCode"]
    StockCode,
    #[iden = "Description"]
    Description,
    #[iden = "Price"]
    Price,
}

/// RFM scores table schema. One row per scored customer, fully replaced
/// on each segmentation run.
#[derive(Iden)]
pub enum Rfm {
    Table,
    #[iden = "Customer ID"]
    CustomerId,
    #[iden = "recency"]
    Recency,
    #[iden = "frequency"]
    Frequency,
    #[iden = "monetary"]
    Monetary,
    #[iden = "r_score"]
    RScore,
    #[iden = "f_score"]
    FScore,
    #[iden = "m_score"]
    MScore,
    #[iden = "segment"]
    Segment,
}

/// Email marketing campaigns table schema.
#[derive(Iden)]
pub enum MarketingCampaigns {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "type"]
    CampaignType,
    #[iden = "description"]
    Description,
    #[iden = "created_at"]
    CreatedAt,
}

/// Campaign emails table schema.
#[derive(Iden)]
pub enum CampaignEmails {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "campaign_id"]
    CampaignId,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "subject"]
    Subject,
    #[iden = "body"]
    Body,
    #[iden = "sent_at"]
    SentAt,
    #[iden = "status"]
    Status,
    #[iden = "opened_at"]
    OpenedAt,
    #[iden = "clicked_at"]
    ClickedAt,
}

/// Social media campaigns table schema.
#[derive(Iden)]
pub enum SocialMediaCampaigns {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "platform"]
    Platform,
    #[iden = "target_segment"]
    TargetSegment,
    #[iden = "campaign_objective"]
    CampaignObjective,
    #[iden = "status"]
    Status,
    #[iden = "created_at"]
    CreatedAt,
}

/// Social media posts table schema.
#[derive(Iden)]
pub enum SocialMediaPosts {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "campaign_id"]
    CampaignId,
    #[iden = "platform"]
    Platform,
    #[iden = "post_content"]
    PostContent,
    #[iden = "post_tone"]
    PostTone,
    #[iden = "hashtags"]
    Hashtags,
    #[iden = "generated_at"]
    GeneratedAt,
}

/// Campaign audience join table schema. The composite primary key
/// (campaign_id, customer_id) is the uniqueness invariant.
#[derive(Iden)]
pub enum CampaignAudience {
    Table,
    #[iden = "campaign_id"]
    CampaignId,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "segment"]
    Segment,
    #[iden = "added_at"]
    AddedAt,
}

/// Migration bookkeeping table schema.
#[derive(Iden)]
pub enum SchemaMigrations {
    Table,
    #[iden = "version"]
    Version,
    #[iden = "name"]
    Name,
    #[iden = "applied_at"]
    AppliedAt,
}
