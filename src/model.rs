//! Domain model: fixed enumerations and persisted record types.
//!
//! The enumerations here are the validation boundary for everything that
//! reaches the database — invalid values are rejected before any SQL runs,
//! so a bad platform or segment never surfaces as a raw constraint error.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error for a value outside one of the fixed enumerations.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid {field}: '{value}' (expected one of: {expected})")]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, $expected:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// All values, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The persisted string form.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(InvalidEnumValue {
                        field: $field,
                        value: s.to_string(),
                        expected: $expected,
                    }),
                }
            }
        }
    };
}

string_enum! {
    /// One of the six fixed RFM customer segments.
    Segment, "segment", "Champion, Recent Customer, Frequent Buyer, Big Spender, At Risk, Others" {
        Champion => "Champion",
        RecentCustomer => "Recent Customer",
        FrequentBuyer => "Frequent Buyer",
        BigSpender => "Big Spender",
        AtRisk => "At Risk",
        Others => "Others",
    }
}

string_enum! {
    /// Supported social media platforms.
    Platform, "platform", "facebook, linkedin, instagram, twitter" {
        Facebook => "facebook",
        Linkedin => "linkedin",
        Instagram => "instagram",
        Twitter => "twitter",
    }
}

string_enum! {
    /// Social campaign lifecycle status.
    CampaignStatus, "status", "draft, active, paused, completed" {
        Draft => "draft",
        Active => "active",
        Paused => "paused",
        Completed => "completed",
    }
}

string_enum! {
    /// Tone for generated social media posts.
    PostTone, "tone", "professional, casual, friendly, promotional, educational" {
        Professional => "professional",
        Casual => "casual",
        Friendly => "friendly",
        Promotional => "promotional",
        Educational => "educational",
    }
}

string_enum! {
    /// Email campaign type.
    CampaignType, "campaign type", "loyalty, referral, re-engagement" {
        Loyalty => "loyalty",
        Referral => "referral",
        ReEngagement => "re-engagement",
    }
}

string_enum! {
    /// Delivery status of a campaign email.
    EmailStatus, "email status", "sent, bounced, opened, clicked" {
        Sent => "sent",
        Bounced => "bounced",
        Opened => "opened",
        Clicked => "clicked",
    }
}

impl CampaignStatus {
    /// Whether a status change along this edge is allowed.
    ///
    /// Transitions are externally triggered; this layer only enforces the
    /// graph: draft -> active -> {paused, completed}, paused -> active.
    pub fn can_transition_to(&self, next: CampaignStatus) -> bool {
        use CampaignStatus::*;
        matches!(
            (self, next),
            (Draft, Active) | (Active, Paused) | (Active, Completed) | (Paused, Active)
        )
    }
}

/// A CRM customer. Identity is immutable and referenced by all
/// downstream tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub country: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A purchase line item. Append-only; the source of truth for RFM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub invoice: i64,
    pub stock_code: String,
    pub invoice_date: Option<DateTime<Utc>>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub total_price: Option<f64>,
    pub customer_id: Option<i64>,
}

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub stock_code: String,
    pub description: Option<String>,
    pub price: Option<f64>,
}

/// Per-customer aggregate over the transaction table for one RFM run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRollup {
    pub customer_id: i64,
    /// RFC 3339 timestamp of the most recent purchase, if any row had one.
    pub last_purchase: Option<String>,
    pub frequency: i64,
    pub monetary: f64,
}

/// One customer's RFM scores and segment for the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmRecord {
    pub customer_id: i64,
    /// Days since the customer's last transaction.
    pub recency: i64,
    /// Number of transactions.
    pub frequency: i64,
    /// Total spend across all transactions.
    pub monetary: f64,
    /// Quintile scores, 1 (worst) to 5 (best).
    pub r_score: u8,
    pub f_score: u8,
    pub m_score: u8,
    pub segment: Segment,
}

/// A platform-scoped social media campaign targeting one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub platform: Platform,
    pub target_segment: Segment,
    pub objective: Option<String>,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
}

/// A generated social media post belonging to one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub platform: Platform,
    pub content: String,
    pub tone: Option<PostTone>,
    pub hashtags: Option<String>,
    pub generated_at: DateTime<Utc>,
}

/// An email marketing campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingCampaign {
    pub id: Uuid,
    pub name: String,
    pub campaign_type: CampaignType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Record of an email sent as part of a marketing campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignEmail {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub customer_id: i64,
    pub subject: String,
    pub body: String,
    pub status: EmailStatus,
    pub sent_at: DateTime<Utc>,
}

/// Audience overview for one social campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudienceSummary {
    pub campaign_id: Uuid,
    pub campaign_name: String,
    pub platform: Platform,
    pub target_segment: Segment,
    pub status: CampaignStatus,
    pub audience_size: i64,
    pub created_at: DateTime<Utc>,
}
