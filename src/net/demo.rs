//! Canned backend for demo mode.
//!
//! Selected only by `COMPASS_DEMO_MODE`; never mixed with real calls. The
//! demo account is already onboarded, so the gate goes straight to the
//! dashboard once a demo token is stored.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::api::{ApiError, CompassApi};
use super::types::{
    AnalyticsOverview, AuthResponse, BestPracticeRecommendation, BestPracticesReport, ContactMethod,
    ContactSuggestions, CreatorRecommendation, EngagedLead, EngagedLeadsReport, GoogleAuthUrl, GrowthMetrics,
    InsightKind, InsightMetrics, LoginRequest, MessageResponse, OnboardingRequest, OnboardingResponse,
    PerformanceInsight, PerformanceInsights, Recommendation, RecommendationInsight, RefreshResponse, ScrapeResponse,
    TikTokProfile, TikTokVideo, User, UserUpdate, VideoPerformance, VideoSort,
};

pub const DEMO_TOKEN: &str = "demo_token_12345";
pub const DEMO_AUTH_URL: &str = "#demo";

#[must_use]
pub fn demo_user() -> User {
    User {
        id: 1,
        email: "demo@example.com".to_owned(),
        name: "Demo User".to_owned(),
        avatar_url: None,
        tiktok_username: Some("demo_creator".to_owned()),
        offer_description: Some("1:1 styling sessions".to_owned()),
        target_audience: Some("fashion".to_owned()),
        weekly_updates_enabled: true,
        is_active: true,
    }
}

/// Figures shown when the overview endpoint is unavailable.
#[must_use]
pub fn fallback_overview() -> AnalyticsOverview {
    AnalyticsOverview {
        total_followers: Some(125_000),
        total_likes: Some(2_500_000),
        total_videos: Some(89),
        avg_engagement_rate: Some(4.2),
        follower_growth_7d: Some(12.5),
        ..AnalyticsOverview::default()
    }
}

pub struct DemoApi {
    user: Mutex<User>,
}

impl Default for DemoApi {
    fn default() -> Self {
        Self { user: Mutex::new(demo_user()) }
    }
}

impl DemoApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> User {
        self.user.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn update(&self, apply: impl FnOnce(&mut User)) -> User {
        let mut guard = self.user.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut guard);
        guard.clone()
    }

    fn auth_response(&self) -> AuthResponse {
        AuthResponse { access_token: DEMO_TOKEN.to_owned(), token_type: Some("bearer".to_owned()), user: self.snapshot() }
    }

    fn profile(&self) -> TikTokProfile {
        let user = self.snapshot();
        TikTokProfile {
            id: 1,
            tiktok_username: user.tiktok_username.unwrap_or_else(|| "demo_creator".to_owned()),
            display_name: Some("Demo Creator".to_owned()),
            bio: Some("Everyday outfits and styling tips".to_owned()),
            follower_count: Some(125_000),
            following_count: Some(310),
            likes_count: Some(2_500_000),
            video_count: Some(89),
            avatar_url: None,
            is_verified: false,
            last_scraped_at: None,
        }
    }
}

fn demo_videos(limit: u32) -> Vec<TikTokVideo> {
    (1..=i64::from(limit.min(5)))
        .map(|n| TikTokVideo {
            id: n,
            video_id: format!("demo{n}"),
            video_url: format!("https://www.tiktok.com/@demo_creator/video/demo{n}"),
            description: Some(format!("Outfit idea #{n}")),
            view_count: Some(40_000 / n),
            like_count: Some(2_000 / n),
            comment_count: Some(120 / n),
            share_count: Some(60 / n),
            engagement_rate: Some(5.0),
            posted_at: None,
        })
        .collect()
}

#[async_trait]
impl CompassApi for DemoApi {
    async fn google_auth_url(&self) -> Result<GoogleAuthUrl, ApiError> {
        Ok(GoogleAuthUrl { auth_url: DEMO_AUTH_URL.to_owned() })
    }

    async fn google_callback(&self, _code: &str) -> Result<AuthResponse, ApiError> {
        Ok(self.auth_response())
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.update(|user| {
            user.email.clone_from(&request.email);
            user.name.clone_from(&request.name);
        });
        Ok(self.auth_response())
    }

    async fn verify(&self) -> Result<User, ApiError> {
        Ok(self.snapshot())
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        Ok(self.snapshot())
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<User, ApiError> {
        Ok(self.update(|user| {
            if let Some(name) = &update.tiktok_username {
                user.tiktok_username = Some(name.trim_start_matches('@').to_owned());
            }
            if let Some(offer) = &update.offer_description {
                user.offer_description = Some(offer.clone());
            }
            if let Some(audience) = &update.target_audience {
                user.target_audience = Some(audience.clone());
            }
            if let Some(weekly) = update.weekly_updates_enabled {
                user.weekly_updates_enabled = weekly;
            }
        }))
    }

    async fn complete_onboarding(&self, request: &OnboardingRequest) -> Result<OnboardingResponse, ApiError> {
        let user = self.update(|user| {
            user.tiktok_username = Some(request.tiktok_username.trim_start_matches('@').to_owned());
            user.offer_description = Some(request.offer_description.clone());
            user.target_audience = Some(request.target_audience.clone());
        });
        Ok(OnboardingResponse { message: "Onboarding completed successfully".to_owned(), user })
    }

    async fn scrape_profile(&self, username: &str) -> Result<ScrapeResponse, ApiError> {
        let mut profile = self.profile();
        profile.tiktok_username = username.trim_start_matches('@').to_owned();
        Ok(ScrapeResponse { message: "Profile scraped successfully".to_owned(), profile })
    }

    async fn tiktok_profile(&self) -> Result<TikTokProfile, ApiError> {
        Ok(self.profile())
    }

    async fn tiktok_videos(&self, limit: u32) -> Result<Vec<TikTokVideo>, ApiError> {
        Ok(demo_videos(limit))
    }

    async fn refresh_profile(&self) -> Result<MessageResponse, ApiError> {
        Ok(MessageResponse { message: "Profile refresh started".to_owned() })
    }

    async fn analytics_overview(&self) -> Result<AnalyticsOverview, ApiError> {
        Ok(fallback_overview())
    }

    async fn video_performance(&self, limit: u32, sort_by: VideoSort) -> Result<Vec<VideoPerformance>, ApiError> {
        let mut rows: Vec<VideoPerformance> = demo_videos(limit)
            .into_iter()
            .map(|v| VideoPerformance {
                video_id: v.video_id,
                video_url: v.video_url,
                description: v.description,
                view_count: v.view_count,
                like_count: v.like_count,
                engagement_rate: v.engagement_rate,
                posted_at: v.posted_at,
            })
            .collect();
        if sort_by == VideoSort::LikeCount {
            rows.sort_by_key(|row| std::cmp::Reverse(row.like_count));
        }
        Ok(rows)
    }

    async fn growth_metrics(&self, days: u32) -> Result<Vec<GrowthMetrics>, ApiError> {
        Ok((0..days.min(7))
            .map(|d| GrowthMetrics {
                date: format!("day-{d}"),
                followers: Some(123_000 + i64::from(d) * 300),
                following: Some(310),
                videos: Some(89),
                avg_views: Some(18_000.0),
                avg_engagement: Some(4.2),
            })
            .collect())
    }

    async fn performance_insights(&self) -> Result<PerformanceInsights, ApiError> {
        Ok(PerformanceInsights {
            insights: vec![PerformanceInsight {
                kind: InsightKind::Positive,
                title: "Strong Engagement Rate".to_owned(),
                description: "Your average engagement rate is above the typical TikTok average of 3-5%.".to_owned(),
            }],
            recommendations: vec![Recommendation {
                title: "Post Consistently".to_owned(),
                description: "Aim for 1-3 posts per day at the same times.".to_owned(),
            }],
            metrics: Some(InsightMetrics {
                avg_views: 18_000.0,
                avg_likes: 900.0,
                avg_engagement_rate: 0.05,
                total_videos_analyzed: 10,
            }),
        })
    }

    async fn creator_recommendations(&self, limit: u32) -> Result<Vec<CreatorRecommendation>, ApiError> {
        let all = vec![
            CreatorRecommendation {
                id: 1,
                recommended_username: "style_by_sam".to_owned(),
                recommended_display_name: Some("Sam".to_owned()),
                recommended_avatar_url: None,
                similarity_score: Some(0.87),
                engagement_score: Some(0.72),
                growth_score: Some(0.64),
                success_factors: vec!["Daily posting".to_owned(), "Trending sounds".to_owned()],
                content_themes: vec!["outfits".to_owned(), "thrift".to_owned()],
                posting_frequency: Some("daily".to_owned()),
            },
            CreatorRecommendation {
                id: 2,
                recommended_username: "closet_cleanout".to_owned(),
                recommended_display_name: None,
                recommended_avatar_url: None,
                similarity_score: Some(0.74),
                engagement_score: Some(0.81),
                growth_score: Some(0.59),
                success_factors: vec!["Strong hooks".to_owned()],
                content_themes: vec!["capsule wardrobe".to_owned()],
                posting_frequency: Some("3x weekly".to_owned()),
            },
        ];
        Ok(all.into_iter().take(limit as usize).collect())
    }

    async fn recommendation_insights(&self) -> Result<Vec<RecommendationInsight>, ApiError> {
        Ok(vec![RecommendationInsight {
            title: "Hook in the first second".to_owned(),
            description: "Top creators in your niche open with the finished outfit.".to_owned(),
            actionable_tip: "Start your next video with the final look, then rewind.".to_owned(),
        }])
    }

    async fn refresh_recommendations(&self) -> Result<RefreshResponse, ApiError> {
        Ok(RefreshResponse { message: "Recommendations refreshed".to_owned(), count: 2 })
    }

    async fn engaged_leads(&self, limit: u32) -> Result<EngagedLeadsReport, ApiError> {
        let lead = EngagedLead {
            username: "fashionista_jane".to_owned(),
            follower_count: Some(12_400),
            engagement_rate: 6.3,
            interaction_frequency: 0.8,
            collaboration_score: 0.91,
            last_interaction: Some("2 days ago".to_owned()),
            bio_snippet: Some("Vintage finds and styling".to_owned()),
            recommended_action: Some("Propose a style swap video".to_owned()),
            contact_priority: Some("high".to_owned()),
        };
        Ok(EngagedLeadsReport {
            engaged_leads: std::iter::once(lead).take(limit as usize).collect(),
            total_analyzed: 150,
            target_audience: self.snapshot().target_audience,
        })
    }

    async fn contact_suggestions(&self, username: &str) -> Result<ContactSuggestions, ApiError> {
        let username = username.trim_start_matches('@').to_owned();
        Ok(ContactSuggestions {
            contact_methods: vec![
                ContactMethod {
                    method: "Direct Message".to_owned(),
                    template: format!("Hi @{username}! I love your content and think we'd be great collaboration partners."),
                    success_rate: Some("75%".to_owned()),
                    best_time: Some("Weekday evenings".to_owned()),
                },
                ContactMethod {
                    method: "Comment Engagement".to_owned(),
                    template: "Engage with their recent posts, then follow up with a DM.".to_owned(),
                    success_rate: Some("85%".to_owned()),
                    best_time: Some("Within 2 hours of their posts".to_owned()),
                },
            ],
            collaboration_ideas: vec!["Style swap content series".to_owned(), "Joint outfit challenge".to_owned()],
            username,
        })
    }

    async fn best_practices(&self, target_audience: &str) -> Result<BestPracticesReport, ApiError> {
        Ok(BestPracticesReport {
            best_practices: serde_json::json!({ "posting_times": ["7-9 PM"], "video_length": "15-30s" }),
            recommendations: self.best_practice_recommendations().await?,
            analyzed_creators: 12,
            target_audience: target_audience.to_owned(),
            note: Some("Demo data".to_owned()),
        })
    }

    async fn best_practice_recommendations(&self) -> Result<Vec<BestPracticeRecommendation>, ApiError> {
        Ok(vec![BestPracticeRecommendation {
            category: "timing".to_owned(),
            title: "Post in the evening".to_owned(),
            description: "Audience activity peaks between 7 and 9 PM.".to_owned(),
            action: "Schedule your next three posts for 7 PM.".to_owned(),
            priority: "high".to_owned(),
        }])
    }
}
