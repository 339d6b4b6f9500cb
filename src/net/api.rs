//! REST client for the Creator Compass backend.
//!
//! The `CompassApi` trait is the seam every session and page component talks
//! through; `HttpApi` is the reqwest-backed implementation and `DemoApi`
//! serves canned data.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>` and never panics. Callers decide
//! whether a failure means logout (verify), a failed exchange (callback), or
//! a degraded section (dashboard pages). No call is retried.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use super::types::{
    AnalyticsOverview, AuthResponse, BestPracticeRecommendation, BestPracticesReport, ContactSuggestions,
    CreatorRecommendation, EngagedLeadsReport, GoogleAuthUrl, GrowthMetrics, LoginRequest, MessageResponse,
    OnboardingRequest, OnboardingResponse, PerformanceInsights, RecommendationInsight, RefreshResponse,
    ScrapeResponse, TikTokProfile, TikTokVideo, User, UserUpdate, VideoPerformance, VideoSort,
};
use crate::config::{CompassConfig, HttpTimeouts};
use crate::session::token::TokenStore;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by Creator Compass API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, TLS).
    #[error("API request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("API response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected schema.
    #[error("API response parse failed: {0}")]
    Parse(String),

    /// A protected endpoint was called with no stored token.
    #[error("no session token stored")]
    MissingToken,
}

impl ApiError {
    /// Whether the backend rejected the credential itself.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::MissingToken | Self::Status { status: 401 | 403, .. })
    }

    /// Human-readable reason, preferring the backend's `detail` field.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Status { status, body } => backend_detail(body).unwrap_or_else(|| format!("status {status}")),
            other => other.to_string(),
        }
    }
}

fn backend_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(str::to_owned)
}

// =============================================================================
// TRAIT
// =============================================================================

/// Every backend call the client makes. Paths are relative to `/api/v1`.
#[async_trait]
pub trait CompassApi: Send + Sync {
    /// `GET /auth/google/url`
    async fn google_auth_url(&self) -> Result<GoogleAuthUrl, ApiError>;
    /// `POST /auth/google/callback`
    async fn google_callback(&self, code: &str) -> Result<AuthResponse, ApiError>;
    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;
    /// `POST /auth/verify`
    async fn verify(&self) -> Result<User, ApiError>;

    async fn current_user(&self) -> Result<User, ApiError>;
    async fn update_user(&self, update: &UserUpdate) -> Result<User, ApiError>;
    async fn complete_onboarding(&self, request: &OnboardingRequest) -> Result<OnboardingResponse, ApiError>;

    async fn scrape_profile(&self, username: &str) -> Result<ScrapeResponse, ApiError>;
    async fn tiktok_profile(&self) -> Result<TikTokProfile, ApiError>;
    async fn tiktok_videos(&self, limit: u32) -> Result<Vec<TikTokVideo>, ApiError>;
    async fn refresh_profile(&self) -> Result<MessageResponse, ApiError>;

    async fn analytics_overview(&self) -> Result<AnalyticsOverview, ApiError>;
    async fn video_performance(&self, limit: u32, sort_by: VideoSort) -> Result<Vec<VideoPerformance>, ApiError>;
    async fn growth_metrics(&self, days: u32) -> Result<Vec<GrowthMetrics>, ApiError>;
    async fn performance_insights(&self) -> Result<PerformanceInsights, ApiError>;

    async fn creator_recommendations(&self, limit: u32) -> Result<Vec<CreatorRecommendation>, ApiError>;
    async fn recommendation_insights(&self) -> Result<Vec<RecommendationInsight>, ApiError>;
    async fn refresh_recommendations(&self) -> Result<RefreshResponse, ApiError>;

    async fn engaged_leads(&self, limit: u32) -> Result<EngagedLeadsReport, ApiError>;
    async fn contact_suggestions(&self, username: &str) -> Result<ContactSuggestions, ApiError>;

    async fn best_practices(&self, target_audience: &str) -> Result<BestPracticesReport, ApiError>;
    async fn best_practice_recommendations(&self) -> Result<Vec<BestPracticeRecommendation>, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// Whether a request must carry the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Public,
    Bearer,
}

pub struct HttpApi {
    http: reqwest::Client,
    /// Base URL including `/api/v1`, no trailing slash.
    base: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApi {
    pub fn new(config: &CompassConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::with_base(config.api_base(), config.timeouts, tokens)
    }

    pub fn with_base(base: impl Into<String>, timeouts: HttpTimeouts, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let base = base.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base, tokens })
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> Result<RequestBuilder, ApiError> {
        let url = format!("{}{path}", self.base);
        let builder = self.http.request(method, url);
        match (auth, self.tokens.token()) {
            (_, Some(token)) => Ok(builder.bearer_auth(token)),
            (Auth::Public, None) => Ok(builder),
            (Auth::Bearer, None) => Err(ApiError::MissingToken),
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder, path: &str) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            tracing::debug!(path, status, "compass api returned error status");
            return Err(ApiError::Status { status, body: text });
        }

        parse_body(&text)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path, Auth::Bearer)?.query(query);
        self.send(builder, path).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let mut builder = self.request(Method::POST, path, auth)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder, path).await
    }
}

fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

pub(crate) fn contact_suggestions_path(username: &str) -> String {
    format!("/engaged-leads/contact-suggestions/{}", urlencoding::encode(username.trim_start_matches('@')))
}

#[async_trait]
impl CompassApi for HttpApi {
    async fn google_auth_url(&self) -> Result<GoogleAuthUrl, ApiError> {
        let builder = self.request(Method::GET, "/auth/google/url", Auth::Public)?;
        self.send(builder, "/auth/google/url").await
    }

    async fn google_callback(&self, code: &str) -> Result<AuthResponse, ApiError> {
        let body = serde_json::json!({ "code": code });
        self.post("/auth/google/callback", Some(&body), Auth::Public).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let body = to_body(request)?;
        self.post("/auth/login", Some(&body), Auth::Public).await
    }

    async fn verify(&self) -> Result<User, ApiError> {
        self.post("/auth/verify", None, Auth::Bearer).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/users/me", &[]).await
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<User, ApiError> {
        let builder = self.request(Method::PUT, "/users/me", Auth::Bearer)?.json(update);
        self.send(builder, "/users/me").await
    }

    async fn complete_onboarding(&self, request: &OnboardingRequest) -> Result<OnboardingResponse, ApiError> {
        let body = to_body(request)?;
        self.post("/users/onboarding", Some(&body), Auth::Bearer).await
    }

    async fn scrape_profile(&self, username: &str) -> Result<ScrapeResponse, ApiError> {
        let body = serde_json::json!({ "username": username });
        self.post("/tiktok/scrape-profile", Some(&body), Auth::Bearer).await
    }

    async fn tiktok_profile(&self) -> Result<TikTokProfile, ApiError> {
        self.get("/tiktok/profile", &[]).await
    }

    async fn tiktok_videos(&self, limit: u32) -> Result<Vec<TikTokVideo>, ApiError> {
        self.get("/tiktok/videos", &[("limit", limit.to_string())]).await
    }

    async fn refresh_profile(&self) -> Result<MessageResponse, ApiError> {
        self.post("/tiktok/refresh-profile", None, Auth::Bearer).await
    }

    async fn analytics_overview(&self) -> Result<AnalyticsOverview, ApiError> {
        self.get("/analytics/overview", &[]).await
    }

    async fn video_performance(&self, limit: u32, sort_by: VideoSort) -> Result<Vec<VideoPerformance>, ApiError> {
        let query = [("limit", limit.to_string()), ("sort_by", sort_by.as_str().to_owned())];
        self.get("/analytics/videos/performance", &query).await
    }

    async fn growth_metrics(&self, days: u32) -> Result<Vec<GrowthMetrics>, ApiError> {
        self.get("/analytics/growth", &[("days", days.to_string())]).await
    }

    async fn performance_insights(&self) -> Result<PerformanceInsights, ApiError> {
        self.get("/analytics/insights", &[]).await
    }

    async fn creator_recommendations(&self, limit: u32) -> Result<Vec<CreatorRecommendation>, ApiError> {
        self.get("/recommendations/creators", &[("limit", limit.to_string())]).await
    }

    async fn recommendation_insights(&self) -> Result<Vec<RecommendationInsight>, ApiError> {
        self.get("/recommendations/insights", &[]).await
    }

    async fn refresh_recommendations(&self) -> Result<RefreshResponse, ApiError> {
        self.post("/recommendations/refresh", None, Auth::Bearer).await
    }

    async fn engaged_leads(&self, limit: u32) -> Result<EngagedLeadsReport, ApiError> {
        self.get("/engaged-leads/analyze", &[("limit", limit.to_string())]).await
    }

    async fn contact_suggestions(&self, username: &str) -> Result<ContactSuggestions, ApiError> {
        self.get(&contact_suggestions_path(username), &[]).await
    }

    async fn best_practices(&self, target_audience: &str) -> Result<BestPracticesReport, ApiError> {
        self.get("/best-practices/analyze", &[("target_audience", target_audience.to_owned())]).await
    }

    async fn best_practice_recommendations(&self) -> Result<Vec<BestPracticeRecommendation>, ApiError> {
        self.get("/best-practices/recommendations", &[]).await
    }
}
