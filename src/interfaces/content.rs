//! Post content generation interface.
//!
//! Content generation is an external collaborator (in production an LLM);
//! the campaign layer only validates the tone and persists the result.

use async_trait::async_trait;

use crate::model::{Campaign, PostTone};

/// Failure of an external collaborator (content generator, chart
/// renderer). Logged and surfaced as a degraded response, never a panic.
#[derive(Debug, thiserror::Error)]
#[error("external service failure: {0}")]
pub struct ExternalServiceError(pub String);

/// Content produced for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedContent {
    pub content: String,
    pub hashtags: Option<String>,
}

/// Produces post copy for a campaign.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        campaign: &Campaign,
        tone: PostTone,
    ) -> Result<GeneratedContent, ExternalServiceError>;
}
