//! Campaign lifecycle integration tests.

use std::sync::Arc;

use segmenta::campaign::{CampaignError, Materializer};
use segmenta::content::TemplateContentGenerator;
use segmenta::interfaces::CrmStore;
use segmenta::model::{CampaignStatus, Platform, Segment};
use segmenta::segmentation::compute_segments;

use crate::common::{as_of, seed_reference_population, test_store};

fn materializer(store: &Arc<dyn CrmStore>) -> Materializer {
    Materializer::new(store.clone(), Arc::new(TemplateContentGenerator))
}

async fn segmented_store() -> Arc<dyn CrmStore> {
    let store = test_store().await;
    seed_reference_population(&store).await;
    compute_segments(&store, as_of()).await.unwrap();
    store
}

#[tokio::test]
async fn test_create_campaign_starts_as_draft() {
    let store = test_store().await;
    let m = materializer(&store);

    let campaign = m
        .create_campaign("Summer VIP", "instagram", "Champion", Some("20% off"))
        .await
        .unwrap();

    assert_eq!(campaign.status, CampaignStatus::Draft);
    assert_eq!(campaign.platform, Platform::Instagram);
    assert_eq!(campaign.target_segment, Segment::Champion);

    let stored = store.social_campaign(campaign.id).await.unwrap().unwrap();
    assert_eq!(stored, campaign);
}

#[tokio::test]
async fn test_invalid_platform_rejected_before_any_write() {
    let store = test_store().await;
    let m = materializer(&store);

    let err = m
        .create_campaign("Bad", "pinterest", "Champion", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CampaignError::Validation(_)));

    let table = store
        .select_table("SELECT id FROM social_media_campaigns")
        .await
        .unwrap();
    assert!(table.rows.is_empty());
}

#[tokio::test]
async fn test_populate_audience_is_idempotent() {
    let store = segmented_store().await;
    let m = materializer(&store);

    let campaign = m
        .create_campaign("Win back", "facebook", "At Risk", None)
        .await
        .unwrap();

    let added = m.populate_audience(campaign.id).await.unwrap();
    assert_eq!(added, 1);

    let again = m.populate_audience(campaign.id).await.unwrap();
    assert_eq!(again, 0);

    assert_eq!(store.audience_count(campaign.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_audience_summary_reports_size() {
    let store = segmented_store().await;
    let m = materializer(&store);

    let campaign = m
        .create_campaign("VIP", "linkedin", "Champion", None)
        .await
        .unwrap();
    m.populate_audience(campaign.id).await.unwrap();

    let summary = m.audience_summary(campaign.id).await.unwrap();
    assert_eq!(summary.campaign_id, campaign.id);
    assert_eq!(summary.target_segment, Segment::Champion);
    assert_eq!(summary.audience_size, 1);
}

#[tokio::test]
async fn test_empty_segment_populates_nothing() {
    let store = segmented_store().await;
    let m = materializer(&store);

    // Nobody in the reference population is a Big Spender.
    let campaign = m
        .create_campaign("Premium", "twitter", "Big Spender", None)
        .await
        .unwrap();
    assert_eq!(m.populate_audience(campaign.id).await.unwrap(), 0);

    let summary = m.audience_summary(campaign.id).await.unwrap();
    assert_eq!(summary.audience_size, 0);
}

#[tokio::test]
async fn test_status_transitions_follow_the_graph() {
    let store = test_store().await;
    let m = materializer(&store);

    let campaign = m
        .create_campaign("Lifecycle", "facebook", "Others", None)
        .await
        .unwrap();

    // draft -> completed is not an edge.
    let err = m.update_status(campaign.id, "completed").await.unwrap_err();
    assert!(matches!(err, CampaignError::InvalidTransition { .. }));

    let active = m.update_status(campaign.id, "active").await.unwrap();
    assert_eq!(active.status, CampaignStatus::Active);

    let paused = m.update_status(campaign.id, "paused").await.unwrap();
    assert_eq!(paused.status, CampaignStatus::Paused);

    let resumed = m.update_status(campaign.id, "active").await.unwrap();
    assert_eq!(resumed.status, CampaignStatus::Active);

    let done = m.update_status(campaign.id, "completed").await.unwrap();
    assert_eq!(done.status, CampaignStatus::Completed);
}

#[tokio::test]
async fn test_generate_post_persists_with_campaign_platform() {
    let store = test_store().await;
    let m = materializer(&store);

    let campaign = m
        .create_campaign("Posts", "twitter", "Frequent Buyer", None)
        .await
        .unwrap();

    let post = m.generate_post(campaign.id, Some("promotional")).await.unwrap();
    assert_eq!(post.platform, Platform::Twitter);
    assert!(post.hashtags.is_some());

    let posts = store.posts_for_campaign(campaign.id).await.unwrap();
    assert_eq!(posts, vec![post]);
}

#[tokio::test]
async fn test_unknown_campaign_is_not_found() {
    let store = test_store().await;
    let m = materializer(&store);

    let err = m.populate_audience(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CampaignError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_cascades_to_posts_and_audience() {
    let store = segmented_store().await;
    let m = materializer(&store);

    let campaign = m
        .create_campaign("Ephemeral", "instagram", "Champion", None)
        .await
        .unwrap();
    m.populate_audience(campaign.id).await.unwrap();
    m.generate_post(campaign.id, None).await.unwrap();

    assert!(store.delete_social_campaign(campaign.id).await.unwrap());

    let audience = store
        .select_table("SELECT campaign_id FROM campaign_audience")
        .await
        .unwrap();
    assert!(audience.rows.is_empty());

    let posts = store
        .select_table("SELECT id FROM social_media_posts")
        .await
        .unwrap();
    assert!(posts.rows.is_empty());

    // Customers are untouched by campaign deletion.
    assert!(store.customer(1).await.unwrap().is_some());
}

#[tokio::test]
async fn test_marketing_campaign_and_email() {
    let store = segmented_store().await;
    let m = materializer(&store);

    let campaign = m
        .create_marketing_campaign("Welcome back", "re-engagement", Some("quarterly"))
        .await
        .unwrap();

    let email = m
        .record_campaign_email(campaign.id, 3, "We miss you", "Come see what's new")
        .await
        .unwrap();
    assert_eq!(email.campaign_id, campaign.id);

    let err = m
        .create_marketing_campaign("Bad", "spam", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CampaignError::Validation(_)));
}
