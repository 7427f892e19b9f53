//! Tool registry: a uniform JSON surface over the engine's operations.
//!
//! Requests are tagged by tool name and dispatched to the segmentation,
//! campaign, and chart layers. External collaborator failures (content
//! generation, chart rendering) come back as a `degraded` response with
//! the error logged, never as a panic or a lost request.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::campaign::{CampaignError, Materializer};
use crate::interfaces::{ChartKind, ChartSink, CrmStore, SavedChart, StorageError};
use crate::model::{
    AudienceSummary, Campaign, CampaignEmail, InvalidEnumValue, MarketingCampaign, Post,
};
use crate::segmentation::{self, SegmentationError};

/// A tool invocation, tagged by tool name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolRequest {
    /// Run a full segmentation pass. Defaults to today when no as-of
    /// date is given.
    SegmentCustomers { as_of_date: Option<NaiveDate> },
    CreateSocialCampaign {
        name: String,
        platform: String,
        target_segment: String,
        objective: Option<String>,
    },
    PopulateAudience { campaign_id: Uuid },
    GeneratePost {
        campaign_id: Uuid,
        tone: Option<String>,
    },
    CampaignAudience { campaign_id: Uuid },
    UpdateCampaignStatus { campaign_id: Uuid, status: String },
    CreateMarketingCampaign {
        name: String,
        campaign_type: String,
        description: Option<String>,
    },
    RecordCampaignEmail {
        campaign_id: Uuid,
        customer_id: i64,
        subject: String,
        body: String,
    },
    GenerateVisualization {
        name: String,
        chart: String,
        query: String,
    },
}

/// A tool result, tagged by outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ToolResponse {
    Segmented {
        customers: usize,
        segments: BTreeMap<String, usize>,
    },
    CampaignCreated { campaign: Campaign },
    AudiencePopulated { campaign_id: Uuid, added: u64 },
    PostGenerated { post: Post },
    Audience { summary: AudienceSummary },
    StatusUpdated { campaign: Campaign },
    MarketingCampaignCreated { campaign: MarketingCampaign },
    EmailRecorded { email: CampaignEmail },
    ChartSaved { chart: SavedChart },
    /// An external collaborator failed; the request itself was valid.
    Degraded { message: String },
}

/// Errors a tool call can fail with. Collaborator failures are not
/// here; they become [`ToolResponse::Degraded`].
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Validation(#[from] InvalidEnumValue),

    #[error(transparent)]
    Campaign(CampaignError),

    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<CampaignError> for ToolError {
    fn from(err: CampaignError) -> Self {
        match err {
            CampaignError::Validation(e) => ToolError::Validation(e),
            CampaignError::Storage(e) => ToolError::Storage(e),
            other => ToolError::Campaign(other),
        }
    }
}

/// The tool registry. Owns the layers a request can reach.
pub struct Tools {
    store: Arc<dyn CrmStore>,
    materializer: Materializer,
    sink: Arc<dyn ChartSink>,
}

impl Tools {
    pub fn new(store: Arc<dyn CrmStore>, materializer: Materializer, sink: Arc<dyn ChartSink>) -> Self {
        Self {
            store,
            materializer,
            sink,
        }
    }

    /// Dispatch one request to its operation.
    pub async fn dispatch(&self, request: ToolRequest) -> Result<ToolResponse, ToolError> {
        match request {
            ToolRequest::SegmentCustomers { as_of_date } => {
                let as_of = as_of_date.unwrap_or_else(|| Utc::now().date_naive());
                let records = segmentation::compute_segments(&self.store, as_of).await?;

                let mut segments: BTreeMap<String, usize> = BTreeMap::new();
                for record in &records {
                    *segments.entry(record.segment.as_str().to_string()).or_default() += 1;
                }

                Ok(ToolResponse::Segmented {
                    customers: records.len(),
                    segments,
                })
            }

            ToolRequest::CreateSocialCampaign {
                name,
                platform,
                target_segment,
                objective,
            } => {
                let campaign = self
                    .materializer
                    .create_campaign(&name, &platform, &target_segment, objective.as_deref())
                    .await?;
                Ok(ToolResponse::CampaignCreated { campaign })
            }

            ToolRequest::PopulateAudience { campaign_id } => {
                let added = self.materializer.populate_audience(campaign_id).await?;
                Ok(ToolResponse::AudiencePopulated { campaign_id, added })
            }

            ToolRequest::GeneratePost { campaign_id, tone } => {
                match self
                    .materializer
                    .generate_post(campaign_id, tone.as_deref())
                    .await
                {
                    Ok(post) => Ok(ToolResponse::PostGenerated { post }),
                    Err(CampaignError::External(e)) => {
                        error!(campaign_id = %campaign_id, error = %e, "content generation failed");
                        Ok(ToolResponse::Degraded {
                            message: e.to_string(),
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            }

            ToolRequest::CampaignAudience { campaign_id } => {
                let summary = self.materializer.audience_summary(campaign_id).await?;
                Ok(ToolResponse::Audience { summary })
            }

            ToolRequest::UpdateCampaignStatus {
                campaign_id,
                status,
            } => {
                let campaign = self.materializer.update_status(campaign_id, &status).await?;
                Ok(ToolResponse::StatusUpdated { campaign })
            }

            ToolRequest::CreateMarketingCampaign {
                name,
                campaign_type,
                description,
            } => {
                let campaign = self
                    .materializer
                    .create_marketing_campaign(&name, &campaign_type, description.as_deref())
                    .await?;
                Ok(ToolResponse::MarketingCampaignCreated { campaign })
            }

            ToolRequest::RecordCampaignEmail {
                campaign_id,
                customer_id,
                subject,
                body,
            } => {
                let email = self
                    .materializer
                    .record_campaign_email(campaign_id, customer_id, &subject, &body)
                    .await?;
                Ok(ToolResponse::EmailRecorded { email })
            }

            ToolRequest::GenerateVisualization { name, chart, query } => {
                let kind: ChartKind = chart.parse()?;
                let table = self.store.select_table(&query).await?;

                match self.sink.save(&name, kind, &table).await {
                    Ok(saved) => Ok(ToolResponse::ChartSaved { chart: saved }),
                    Err(e) => {
                        error!(chart = %name, error = %e, "chart rendering failed");
                        Ok(ToolResponse::Degraded {
                            message: e.to_string(),
                        })
                    }
                }
            }
        }
    }
}
