//! Analytics: growth series, per-video performance and generated insights.

#[cfg(test)]
#[path = "analytics_test.rs"]
mod analytics_test;

use serde::Serialize;

use super::{PageContext, Section};
use crate::net::types::{GrowthMetrics, PerformanceInsights, VideoPerformance, VideoSort};

pub const DEFAULT_GROWTH_DAYS: u32 = 30;
pub const DEFAULT_VIDEO_LIMIT: u32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalyticsQuery {
    pub days: u32,
    pub limit: u32,
    pub sort_by: VideoSort,
}

impl Default for AnalyticsQuery {
    fn default() -> Self {
        Self { days: DEFAULT_GROWTH_DAYS, limit: DEFAULT_VIDEO_LIMIT, sort_by: VideoSort::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticsPage {
    pub growth: Section<Vec<GrowthMetrics>>,
    pub videos: Section<Vec<VideoPerformance>>,
    pub insights: Section<PerformanceInsights>,
}

impl AnalyticsPage {
    pub async fn load(ctx: &PageContext, query: AnalyticsQuery) -> Option<Self> {
        let AnalyticsQuery { days, limit, sort_by } = query;
        let growth = ctx.fetch(move |api| async move { api.growth_metrics(days).await });
        let videos = ctx.fetch(move |api| async move { api.video_performance(limit, sort_by).await });
        let insights = ctx.fetch(|api| async move { api.performance_insights().await });

        let (growth, videos, insights) = tokio::join!(
            ctx.settle(growth, "growth metrics"),
            ctx.settle(videos, "video performance"),
            ctx.settle(insights, "performance insights"),
        );
        Some(Self { growth: growth?.non_empty(), videos: videos?.non_empty(), insights: insights? })
    }

    /// Latest point of the growth series, if any.
    #[must_use]
    pub fn latest_growth(&self) -> Option<&GrowthMetrics> {
        self.growth.items().last()
    }
}
