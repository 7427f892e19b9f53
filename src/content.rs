//! Template-based post content generation.
//!
//! The default `ContentGenerator`: deterministic segment- and
//! platform-keyed templates, no network. A model-backed generator can be
//! swapped in behind the same trait.

use async_trait::async_trait;

use crate::interfaces::{ContentGenerator, ExternalServiceError, GeneratedContent};
use crate::model::{Campaign, Platform, PostTone, Segment};

/// Deterministic template generator.
#[derive(Debug, Default)]
pub struct TemplateContentGenerator;

fn base_message(segment: Segment) -> &'static str {
    match segment {
        Segment::Champion => "Thank you for being our most valued customer!",
        Segment::RecentCustomer => "Welcome to our community!",
        Segment::FrequentBuyer => "We appreciate your continued loyalty!",
        Segment::BigSpender => "Exclusive offers for our premium customers",
        Segment::AtRisk => "We miss you! Come back and see what's new",
        Segment::Others => "Discover what makes us special",
    }
}

fn segment_tags(segment: Segment) -> [&'static str; 2] {
    match segment {
        Segment::Champion => ["#VIP", "#Loyalty"],
        Segment::RecentCustomer => ["#Welcome", "#NewCustomer"],
        Segment::FrequentBuyer => ["#Loyalty", "#ThankYou"],
        Segment::BigSpender => ["#Premium", "#Exclusive"],
        Segment::AtRisk => ["#ComeBack", "#WeNeedYou"],
        Segment::Others => ["#JoinUs", "#Discover"],
    }
}

fn platform_tags(platform: Platform) -> [&'static str; 2] {
    match platform {
        Platform::Linkedin => ["#Business", "#Professional"],
        Platform::Facebook => ["#Social", "#Community"],
        Platform::Instagram => ["#Lifestyle", "#Visual"],
        Platform::Twitter => ["#Updates", "#News"],
    }
}

/// Compose the post body for a platform.
fn render_content(campaign: &Campaign, tone: PostTone) -> String {
    let base = base_message(campaign.target_segment);
    let objective = campaign.objective.as_deref();

    match campaign.platform {
        Platform::Linkedin => {
            if tone == PostTone::Professional {
                format!(
                    "{base}\n\nWe believe in building lasting relationships with our clients. {}",
                    objective.unwrap_or("Join us in our journey of excellence.")
                )
            } else {
                format!(
                    "{base}\n\n{}",
                    objective
                        .unwrap_or("We value every customer and strive to provide the best experience.")
                )
            }
        }
        Platform::Facebook => format!(
            "{base}\n\n{}\n\nWhat do you love most about our products? Let us know in the comments!",
            objective.unwrap_or("Share this post with friends who might be interested!")
        ),
        Platform::Instagram => format!(
            "{base}\n\n{}\n\nShare your experience with us!",
            objective.unwrap_or("Tag a friend who needs to see this!")
        ),
        Platform::Twitter => format!(
            "{base} {}",
            objective.unwrap_or("Follow us for more updates!")
        ),
    }
}

/// Compose hashtags: two community tags, two segment tags, two platform
/// tags. Twitter is capped at three to leave room in the post.
fn render_hashtags(platform: Platform, segment: Segment) -> String {
    let mut tags = vec!["#CustomerLove", "#Community"];
    tags.extend(segment_tags(segment));
    tags.extend(platform_tags(platform));

    if platform == Platform::Twitter {
        tags.truncate(3);
    }
    tags.join(" ")
}

#[async_trait]
impl ContentGenerator for TemplateContentGenerator {
    async fn generate(
        &self,
        campaign: &Campaign,
        tone: PostTone,
    ) -> Result<GeneratedContent, ExternalServiceError> {
        Ok(GeneratedContent {
            content: render_content(campaign, tone),
            hashtags: Some(render_hashtags(campaign.platform, campaign.target_segment)),
        })
    }
}
