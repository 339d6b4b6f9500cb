//! Similar-creator recommendations and the insights drawn from them.

#[cfg(test)]
#[path = "recommendations_test.rs"]
mod recommendations_test;

use serde::Serialize;

use super::{PageContext, Section};
use crate::net::types::{CreatorRecommendation, RecommendationInsight};
use crate::notify::Notice;

pub const DEFAULT_CREATOR_LIMIT: u32 = 10;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationsPage {
    pub creators: Section<Vec<CreatorRecommendation>>,
    pub insights: Section<Vec<RecommendationInsight>>,
}

impl RecommendationsPage {
    pub async fn load(ctx: &PageContext, limit: u32) -> Option<Self> {
        let creators = ctx.fetch(move |api| async move { api.creator_recommendations(limit).await });
        let insights = ctx.fetch(|api| async move { api.recommendation_insights().await });

        let (creators, insights) = tokio::join!(
            ctx.settle(creators, "recommendations"),
            ctx.settle(insights, "recommendation insights"),
        );
        Some(Self { creators: creators?.non_empty(), insights: insights?.non_empty() })
    }

    /// Regenerate recommendations on the backend, then reload.
    pub async fn refresh(ctx: &PageContext, limit: u32) -> Option<Self> {
        let refreshed = ctx.fetch(|api| async move { api.refresh_recommendations().await });
        match refreshed.resolve().await? {
            Ok(response) => {
                tracing::info!(count = response.count, "recommendations refreshed");
                ctx.notify(Notice::success(response.message));
            }
            Err(e) => {
                tracing::warn!(error = %e, "recommendation refresh failed");
                ctx.notify(Notice::error("Failed to refresh recommendations"));
            }
        }
        Self::load(ctx, limit).await
    }
}
