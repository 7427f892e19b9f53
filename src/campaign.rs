//! Campaign lifecycle operations.
//!
//! The `Materializer` sits between untyped request input (CLI args, tool
//! calls) and the store: it parses and validates against the fixed
//! enumerations, enforces the status transition graph, and delegates
//! content generation to the injected `ContentGenerator`.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::interfaces::{ContentGenerator, CrmStore, ExternalServiceError, StorageError};
use crate::model::{
    AudienceSummary, Campaign, CampaignEmail, CampaignStatus, CampaignType, InvalidEnumValue,
    MarketingCampaign, Platform, Post, PostTone, Segment,
};

/// Errors from campaign operations.
#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    /// Input failed enumeration validation before any SQL ran.
    #[error(transparent)]
    Validation(#[from] InvalidEnumValue),

    #[error("campaign {0} not found")]
    NotFound(Uuid),

    #[error("cannot transition campaign from {from} to {to}")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },

    #[error(transparent)]
    External(#[from] ExternalServiceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Executes campaign operations against the store.
pub struct Materializer {
    store: Arc<dyn CrmStore>,
    generator: Arc<dyn ContentGenerator>,
}

impl Materializer {
    pub fn new(store: Arc<dyn CrmStore>, generator: Arc<dyn ContentGenerator>) -> Self {
        Self { store, generator }
    }

    /// Create a social media campaign in `draft` status.
    ///
    /// Platform and segment strings are validated against the fixed
    /// enumerations before anything is written.
    pub async fn create_campaign(
        &self,
        name: &str,
        platform: &str,
        target_segment: &str,
        objective: Option<&str>,
    ) -> Result<Campaign, CampaignError> {
        let platform: Platform = platform.parse()?;
        let target_segment: Segment = target_segment.parse()?;

        let campaign = Campaign {
            id: Uuid::new_v4(),
            name: name.to_string(),
            platform,
            target_segment,
            objective: objective.map(str::to_string),
            status: CampaignStatus::Draft,
            created_at: Utc::now(),
        };

        self.store.insert_social_campaign(&campaign).await?;
        info!(campaign_id = %campaign.id, %platform, segment = %target_segment, "campaign created");

        Ok(campaign)
    }

    /// Link every customer currently in the campaign's target segment to
    /// the campaign. Idempotent: customers already linked are skipped, so
    /// the returned count is the number of newly added members.
    pub async fn populate_audience(&self, campaign_id: Uuid) -> Result<u64, CampaignError> {
        let campaign = self
            .store
            .social_campaign(campaign_id)
            .await?
            .ok_or(CampaignError::NotFound(campaign_id))?;

        let added = self
            .store
            .add_audience_from_rfm(
                campaign_id,
                campaign.target_segment,
                &Utc::now().to_rfc3339(),
            )
            .await?;

        info!(campaign_id = %campaign_id, added, "audience populated");
        Ok(added)
    }

    /// Generate and persist one post for the campaign. The tone defaults
    /// to friendly when not given.
    pub async fn generate_post(
        &self,
        campaign_id: Uuid,
        tone: Option<&str>,
    ) -> Result<Post, CampaignError> {
        let tone: PostTone = match tone {
            Some(t) => t.parse()?,
            None => PostTone::Friendly,
        };

        let campaign = self
            .store
            .social_campaign(campaign_id)
            .await?
            .ok_or(CampaignError::NotFound(campaign_id))?;

        let generated = self.generator.generate(&campaign, tone).await?;

        let post = Post {
            id: Uuid::new_v4(),
            campaign_id,
            platform: campaign.platform,
            content: generated.content,
            tone: Some(tone),
            hashtags: generated.hashtags,
            generated_at: Utc::now(),
        };

        self.store.insert_post(&post).await?;
        info!(campaign_id = %campaign_id, post_id = %post.id, %tone, "post generated");

        Ok(post)
    }

    /// Move a campaign along the status graph. Transitions outside
    /// draft -> active -> {paused, completed}, paused -> active are
    /// rejected without touching the store.
    pub async fn update_status(
        &self,
        campaign_id: Uuid,
        status: &str,
    ) -> Result<Campaign, CampaignError> {
        let next: CampaignStatus = status.parse()?;

        let campaign = self
            .store
            .social_campaign(campaign_id)
            .await?
            .ok_or(CampaignError::NotFound(campaign_id))?;

        if !campaign.status.can_transition_to(next) {
            return Err(CampaignError::InvalidTransition {
                from: campaign.status,
                to: next,
            });
        }

        self.store.set_campaign_status(campaign_id, next).await?;
        info!(campaign_id = %campaign_id, from = %campaign.status, to = %next, "status updated");

        Ok(Campaign {
            status: next,
            ..campaign
        })
    }

    /// Campaign details plus the current audience size.
    pub async fn audience_summary(
        &self,
        campaign_id: Uuid,
    ) -> Result<AudienceSummary, CampaignError> {
        self.store
            .audience_summary(campaign_id)
            .await?
            .ok_or(CampaignError::NotFound(campaign_id))
    }

    /// Create an email marketing campaign.
    pub async fn create_marketing_campaign(
        &self,
        name: &str,
        campaign_type: &str,
        description: Option<&str>,
    ) -> Result<MarketingCampaign, CampaignError> {
        let campaign_type: CampaignType = campaign_type.parse()?;

        let campaign = MarketingCampaign {
            id: Uuid::new_v4(),
            name: name.to_string(),
            campaign_type,
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };

        self.store.insert_marketing_campaign(&campaign).await?;
        info!(campaign_id = %campaign.id, %campaign_type, "marketing campaign created");

        Ok(campaign)
    }

    /// Record that an email was sent for a marketing campaign.
    pub async fn record_campaign_email(
        &self,
        campaign_id: Uuid,
        customer_id: i64,
        subject: &str,
        body: &str,
    ) -> Result<CampaignEmail, CampaignError> {
        let email = CampaignEmail {
            id: Uuid::new_v4(),
            campaign_id,
            customer_id,
            subject: subject.to_string(),
            body: body.to_string(),
            status: crate::model::EmailStatus::Sent,
            sent_at: Utc::now(),
        };

        self.store.insert_campaign_email(&email).await?;
        info!(campaign_id = %campaign_id, customer_id, "campaign email recorded");

        Ok(email)
    }
}
