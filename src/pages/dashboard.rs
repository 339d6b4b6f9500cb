//! Dashboard overview: headline analytics next to the scraped profile.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use serde::Serialize;

use super::format::{Trend, format_growth, format_number, format_percent};
use super::{PageContext, Section};
use crate::net::demo::fallback_overview;
use crate::net::types::{AnalyticsOverview, TikTokProfile, TikTokVideo};
use crate::notify::Notice;

pub const RECENT_VIDEO_LIMIT: u32 = 10;

/// One headline figure on the overview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverviewPage {
    pub overview: Section<AnalyticsOverview>,
    pub profile: Section<TikTokProfile>,
    pub recent_videos: Section<Vec<TikTokVideo>>,
}

impl OverviewPage {
    /// Fetch overview, profile and recent videos concurrently.
    pub async fn load(ctx: &PageContext) -> Option<Self> {
        let overview = ctx.fetch(|api| async move { api.analytics_overview().await });
        let profile = ctx.fetch(|api| async move { api.tiktok_profile().await });
        let videos = ctx.fetch(|api| async move { api.tiktok_videos(RECENT_VIDEO_LIMIT).await });
        let (overview, profile, recent_videos) =
            tokio::join!(overview.resolve(), profile.resolve(), ctx.settle(videos, "recent videos"));
        let (overview, profile, recent_videos) = (overview?, profile?, recent_videos?);

        let overview = match overview {
            Ok(overview) => Section::Loaded(overview),
            Err(e) => {
                ctx.report("dashboard data", &e);
                Section::Fallback(fallback_overview())
            }
        };
        let profile = match profile {
            Ok(profile) => Section::Loaded(profile),
            Err(e) => {
                ctx.report("profile", &e);
                Section::Failed(e.detail())
            }
        };
        Some(Self { overview, profile, recent_videos: recent_videos.non_empty() })
    }

    /// Ask the backend to re-scrape, then reload in place.
    ///
    /// Returns `false` when the refresh failed or the page closed meanwhile.
    pub async fn refresh_profile(&mut self, ctx: &PageContext) -> bool {
        let refreshed = ctx.fetch(|api| async move { api.refresh_profile().await });
        match refreshed.resolve().await {
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::warn!(error = %e, "profile refresh failed");
                ctx.notify(Notice::error("Failed to refresh profile data"));
                return false;
            }
            None => return false,
        }
        let Some(reloaded) = Self::load(ctx).await else {
            return false;
        };
        *self = reloaded;
        ctx.notify(Notice::success("Profile data refreshed successfully"));
        true
    }
}

impl OverviewPage {
    /// Headline figures, formatted for display. Empty when the overview failed.
    #[must_use]
    pub fn stat_cards(&self) -> Vec<StatCard> {
        let Some(overview) = self.overview.value() else {
            return Vec::new();
        };
        vec![
            StatCard {
                label: "Followers",
                value: format_number(overview.total_followers),
                trend: Some(Trend::of(overview.follower_growth_7d)),
            },
            StatCard { label: "Total likes", value: format_number(overview.total_likes), trend: None },
            StatCard { label: "Videos", value: format_number(overview.total_videos), trend: None },
            StatCard { label: "Avg engagement", value: format_percent(overview.avg_engagement_rate), trend: None },
            StatCard { label: "Growth (7d)", value: format_growth(overview.follower_growth_7d), trend: None },
        ]
    }
}
