//! Wire DTOs for the client/backend boundary.
//!
//! DESIGN
//! ======
//! These types mirror backend response bodies. Unknown fields are ignored and
//! most metrics are optional because the backend omits them until a profile
//! has been scraped.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// USERS & AUTH
// =============================================================================

/// The authenticated account as returned by `/auth/verify` and `/users/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Absent until onboarding completes.
    #[serde(default)]
    pub tiktok_username: Option<String>,
    #[serde(default)]
    pub offer_description: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub weekly_updates_enabled: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl User {
    /// Whether the user still has to complete onboarding.
    ///
    /// A missing, null, or blank `tiktok_username` all count as incomplete.
    #[must_use]
    pub fn needs_onboarding(&self) -> bool {
        self.tiktok_username.as_deref().is_none_or(|name| name.trim().is_empty())
    }
}

/// Token + user pair returned by `/auth/login` and `/auth/google/callback`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoogleAuthUrl {
    pub auth_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OnboardingRequest {
    pub tiktok_username: String,
    pub offer_description: String,
    pub target_audience: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OnboardingResponse {
    pub message: String,
    pub user: User,
}

/// Partial update for `PUT /users/me`. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiktok_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_updates_enabled: Option<bool>,
}

impl UserUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiktok_username.is_none()
            && self.offer_description.is_none()
            && self.target_audience.is_none()
            && self.weekly_updates_enabled.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// TIKTOK
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TikTokProfile {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    pub tiktok_username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub follower_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub following_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub likes_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub video_count: Option<i64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub last_scraped_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TikTokVideo {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    pub video_id: String,
    pub video_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub view_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub like_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub comment_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub share_count: Option<i64>,
    #[serde(default)]
    pub engagement_rate: Option<f64>,
    #[serde(default)]
    pub posted_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub message: String,
    pub profile: TikTokProfile,
}

// =============================================================================
// ANALYTICS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub total_followers: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub total_videos: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub total_likes: Option<i64>,
    #[serde(default)]
    pub avg_engagement_rate: Option<f64>,
    #[serde(default)]
    pub follower_growth_7d: Option<f64>,
    #[serde(default)]
    pub follower_growth_30d: Option<f64>,
    #[serde(default)]
    pub top_performing_video: Option<TopVideo>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopVideo {
    pub video_id: String,
    pub video_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub view_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub like_count: Option<i64>,
    #[serde(default)]
    pub engagement_rate: Option<f64>,
}

/// Row of `/analytics/videos/performance`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoPerformance {
    pub video_id: String,
    pub video_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub view_count: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub like_count: Option<i64>,
    #[serde(default)]
    pub engagement_rate: Option<f64>,
    #[serde(default)]
    pub posted_at: Option<String>,
}

/// Sort key accepted by `/analytics/videos/performance`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSort {
    #[default]
    ViewCount,
    LikeCount,
    EngagementRate,
    PostedAt,
}

impl VideoSort {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewCount => "view_count",
            Self::LikeCount => "like_count",
            Self::EngagementRate => "engagement_rate",
            Self::PostedAt => "posted_at",
        }
    }
}

impl std::str::FromStr for VideoSort {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "view_count" | "views" => Ok(Self::ViewCount),
            "like_count" | "likes" => Ok(Self::LikeCount),
            "engagement_rate" | "engagement" => Ok(Self::EngagementRate),
            "posted_at" | "recent" => Ok(Self::PostedAt),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub followers: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub following: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub videos: Option<i64>,
    #[serde(default)]
    pub avg_views: Option<f64>,
    #[serde(default)]
    pub avg_engagement: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Warning,
    #[serde(other)]
    Info,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightMetrics {
    #[serde(default)]
    pub avg_views: f64,
    #[serde(default)]
    pub avg_likes: f64,
    #[serde(default)]
    pub avg_engagement_rate: f64,
    #[serde(default)]
    pub total_videos_analyzed: u32,
}

/// Body of `/analytics/insights`. `metrics` is omitted when no videos exist.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceInsights {
    #[serde(default)]
    pub insights: Vec<PerformanceInsight>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub metrics: Option<InsightMetrics>,
}

// =============================================================================
// RECOMMENDATIONS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatorRecommendation {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    pub recommended_username: String,
    #[serde(default)]
    pub recommended_display_name: Option<String>,
    #[serde(default)]
    pub recommended_avatar_url: Option<String>,
    #[serde(default)]
    pub similarity_score: Option<f64>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
    #[serde(default)]
    pub growth_score: Option<f64>,
    #[serde(default)]
    pub success_factors: Vec<String>,
    #[serde(default)]
    pub content_themes: Vec<String>,
    #[serde(default)]
    pub posting_frequency: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationInsight {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub actionable_tip: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub message: String,
    #[serde(default)]
    pub count: u32,
}

// =============================================================================
// ENGAGED LEADS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngagedLead {
    pub username: String,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    pub follower_count: Option<i64>,
    #[serde(default)]
    pub engagement_rate: f64,
    #[serde(default)]
    pub interaction_frequency: f64,
    #[serde(default)]
    pub collaboration_score: f64,
    #[serde(default)]
    pub last_interaction: Option<String>,
    #[serde(default)]
    pub bio_snippet: Option<String>,
    #[serde(default)]
    pub recommended_action: Option<String>,
    #[serde(default)]
    pub contact_priority: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagedLeadsReport {
    #[serde(default)]
    pub engaged_leads: Vec<EngagedLead>,
    #[serde(default)]
    pub total_analyzed: u32,
    #[serde(default)]
    pub target_audience: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactMethod {
    pub method: String,
    pub template: String,
    #[serde(default)]
    pub success_rate: Option<String>,
    #[serde(default)]
    pub best_time: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactSuggestions {
    pub username: String,
    #[serde(default)]
    pub contact_methods: Vec<ContactMethod>,
    #[serde(default)]
    pub collaboration_ideas: Vec<String>,
}

// =============================================================================
// BEST PRACTICES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestPracticeRecommendation {
    pub category: String,
    pub title: String,
    pub description: String,
    pub action: String,
    pub priority: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestPracticesReport {
    /// Free-form analysis keyed by practice area.
    #[serde(default)]
    pub best_practices: serde_json::Value,
    #[serde(default)]
    pub recommendations: Vec<BestPracticeRecommendation>,
    #[serde(default)]
    pub analyzed_creators: u32,
    pub target_audience: String,
    #[serde(default)]
    pub note: Option<String>,
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

fn default_true() -> bool {
    true
}

fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    number_to_i64(&value).ok_or_else(|| D::Error::custom("expected integer-compatible number"))
}

/// Counts arrive as ints, integral floats, or null depending on the scrape source.
fn deserialize_opt_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => number_to_i64(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected integer-compatible number")),
    }
}

fn number_to_i64(value: &serde_json::Value) -> Option<i64> {
    let serde_json::Value::Number(number) = value else {
        return None;
    };
    if let Some(int) = number.as_i64() {
        return Some(int);
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    if let Some(float) = number.as_f64()
        && float.is_finite()
        && float.fract() == 0.0
        && float >= i64::MIN as f64
        && float <= i64::MAX as f64
    {
        return Some(float as i64);
    }
    None
}
