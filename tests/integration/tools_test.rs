//! Tool registry dispatch tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use segmenta::campaign::Materializer;
use segmenta::charts::FileChartSink;
use segmenta::content::TemplateContentGenerator;
use segmenta::interfaces::{
    ChartSink, ContentGenerator, CrmStore, ExternalServiceError, GeneratedContent, StorageError,
};
use segmenta::model::{Campaign, PostTone};
use segmenta::tools::{ToolError, ToolRequest, ToolResponse, Tools};

use crate::common::{seed_reference_population, test_store};

fn tools_with(
    store: Arc<dyn CrmStore>,
    generator: Arc<dyn ContentGenerator>,
    sink: Arc<dyn ChartSink>,
) -> Tools {
    let materializer = Materializer::new(store.clone(), generator);
    Tools::new(store, materializer, sink)
}

async fn tools(dir: &tempfile::TempDir) -> Tools {
    let store = test_store().await;
    seed_reference_population(&store).await;
    tools_with(
        store,
        Arc::new(TemplateContentGenerator),
        Arc::new(FileChartSink::new(dir.path())),
    )
}

fn request(value: serde_json::Value) -> ToolRequest {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_segment_customers_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools(&dir).await;

    let response = tools
        .dispatch(request(json!({
            "tool": "segment_customers",
            "as_of_date": "2024-06-01",
        })))
        .await
        .unwrap();

    match response {
        ToolResponse::Segmented {
            customers,
            segments,
        } => {
            assert_eq!(customers, 4);
            assert_eq!(segments.values().sum::<usize>(), 4);
            assert_eq!(segments.get("Champion"), Some(&1));
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_campaign_round_trip_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools(&dir).await;

    tools
        .dispatch(request(json!({
            "tool": "segment_customers",
            "as_of_date": "2024-06-01",
        })))
        .await
        .unwrap();

    let response = tools
        .dispatch(request(json!({
            "tool": "create_social_campaign",
            "name": "Win back",
            "platform": "facebook",
            "target_segment": "At Risk",
        })))
        .await
        .unwrap();
    let campaign_id = match response {
        ToolResponse::CampaignCreated { campaign } => campaign.id,
        other => panic!("unexpected response: {other:?}"),
    };

    let response = tools
        .dispatch(request(json!({
            "tool": "populate_audience",
            "campaign_id": campaign_id,
        })))
        .await
        .unwrap();
    assert!(matches!(
        response,
        ToolResponse::AudiencePopulated { added: 1, .. }
    ));

    let response = tools
        .dispatch(request(json!({
            "tool": "campaign_audience",
            "campaign_id": campaign_id,
        })))
        .await
        .unwrap();
    match response {
        ToolResponse::Audience { summary } => assert_eq!(summary.audience_size, 1),
        other => panic!("unexpected response: {other:?}"),
    }

    let response = tools
        .dispatch(request(json!({
            "tool": "update_campaign_status",
            "campaign_id": campaign_id,
            "status": "active",
        })))
        .await
        .unwrap();
    assert!(matches!(response, ToolResponse::StatusUpdated { .. }));
}

struct FailingGenerator;

#[async_trait]
impl ContentGenerator for FailingGenerator {
    async fn generate(
        &self,
        _campaign: &Campaign,
        _tone: PostTone,
    ) -> Result<GeneratedContent, ExternalServiceError> {
        Err(ExternalServiceError("model endpoint unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_generator_failure_degrades_instead_of_erroring() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store().await;
    let tools = tools_with(
        store,
        Arc::new(FailingGenerator),
        Arc::new(FileChartSink::new(dir.path())),
    );

    let response = tools
        .dispatch(request(json!({
            "tool": "create_social_campaign",
            "name": "Doomed posts",
            "platform": "twitter",
            "target_segment": "Others",
        })))
        .await
        .unwrap();
    let campaign_id = match response {
        ToolResponse::CampaignCreated { campaign } => campaign.id,
        other => panic!("unexpected response: {other:?}"),
    };

    let response = tools
        .dispatch(request(json!({
            "tool": "generate_post",
            "campaign_id": campaign_id,
        })))
        .await
        .unwrap();
    match response {
        ToolResponse::Degraded { message } => {
            assert!(message.contains("model endpoint unreachable"));
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_visualization_writes_chart_files() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools(&dir).await;

    tools
        .dispatch(request(json!({
            "tool": "segment_customers",
            "as_of_date": "2024-06-01",
        })))
        .await
        .unwrap();

    let response = tools
        .dispatch(request(json!({
            "tool": "generate_visualization",
            "name": "segment_counts",
            "chart": "bar",
            "query": "SELECT segment, COUNT(*) FROM rfm GROUP BY segment",
        })))
        .await
        .unwrap();

    match response {
        ToolResponse::ChartSaved { chart } => {
            assert!(chart.json_path.exists());
            assert!(chart.html_path.exists());
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_visualization_rejects_writes() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools(&dir).await;

    let err = tools
        .dispatch(request(json!({
            "tool": "generate_visualization",
            "name": "evil",
            "chart": "bar",
            "query": "DELETE FROM rfm",
        })))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ToolError::Storage(StorageError::RejectedQuery(_))
    ));
}

#[tokio::test]
async fn test_visualization_rejects_cte_prefixed_writes() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools(&dir).await;

    tools
        .dispatch(request(json!({
            "tool": "segment_customers",
            "as_of_date": "2024-06-01",
        })))
        .await
        .unwrap();

    let err = tools
        .dispatch(request(json!({
            "tool": "generate_visualization",
            "name": "sneaky",
            "chart": "bar",
            "query": "WITH t AS (SELECT 1) DELETE FROM rfm",
        })))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ToolError::Storage(StorageError::RejectedQuery(_))
    ));

    // The segmentation table is untouched.
    let response = tools
        .dispatch(request(json!({
            "tool": "generate_visualization",
            "name": "rfm_count",
            "chart": "bar",
            "query": "SELECT COUNT(*) AS n FROM rfm",
        })))
        .await
        .unwrap();
    match response {
        ToolResponse::ChartSaved { chart } => {
            let saved = std::fs::read_to_string(&chart.json_path).unwrap();
            let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
            assert_eq!(value["table"]["rows"][0][0], 4);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_chart_kind_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let tools = tools(&dir).await;

    let err = tools
        .dispatch(request(json!({
            "tool": "generate_visualization",
            "name": "x",
            "chart": "hologram",
            "query": "SELECT 1",
        })))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
}
