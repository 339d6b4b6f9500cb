//! Best practices distilled from top creators in the user's niche.

#[cfg(test)]
#[path = "best_practices_test.rs"]
mod best_practices_test;

use serde::Serialize;

use super::{PageContext, Section};
use crate::net::types::{BestPracticeRecommendation, BestPracticesReport, User};

pub const DEFAULT_AUDIENCE: &str = "fashion";

/// Audience to analyze: an explicit choice, else the user's, else `fashion`.
#[must_use]
pub fn audience_for(user: &User, requested: Option<&str>) -> String {
    [requested, user.target_audience.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|audience| !audience.is_empty())
        .unwrap_or(DEFAULT_AUDIENCE)
        .to_owned()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BestPracticesPage {
    pub target_audience: String,
    pub report: Section<BestPracticesReport>,
    pub recommendations: Section<Vec<BestPracticeRecommendation>>,
}

impl BestPracticesPage {
    pub async fn load(ctx: &PageContext, audience: Option<&str>) -> Option<Self> {
        let target_audience = audience_for(ctx.user(), audience);
        let query = target_audience.clone();
        let report = ctx.fetch(move |api| async move { api.best_practices(&query).await });
        let recommendations = ctx.fetch(|api| async move { api.best_practice_recommendations().await });

        let (report, recommendations) = tokio::join!(
            ctx.settle(report, "best practices"),
            ctx.settle(recommendations, "best-practice recommendations"),
        );
        Some(Self { target_audience, report: report?, recommendations: recommendations?.non_empty() })
    }
}
