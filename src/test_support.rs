//! Shared fakes for session and page tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::net::api::{ApiError, CompassApi};
use crate::net::demo::{DemoApi, demo_user};
use crate::net::types::*;
use crate::notify::NoticeLog;
use crate::session::token::{MemoryTokenStore, RevocableTokenStore, TokenStore, TokenStoreError};

pub(crate) const LOGIN_TOKEN: &str = "login-token";
pub(crate) const EXCHANGE_TOKEN: &str = "exchange-token";

pub(crate) fn user(tiktok_username: Option<&str>) -> User {
    User { tiktok_username: tiktok_username.map(str::to_owned), ..demo_user() }
}

/// Scriptable `CompassApi`: auth endpoints are controlled per test, data
/// endpoints serve demo data unless marked failing.
#[derive(Default)]
pub(crate) struct FakeApi {
    demo: DemoApi,
    account: Mutex<Option<User>>,
    exchange_ok: Mutex<bool>,
    failing: Mutex<HashSet<&'static str>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeApi {
    /// `account` is what verify returns; `None` makes verify reject with 401.
    pub(crate) fn new(account: Option<User>) -> Self {
        Self { account: Mutex::new(account), exchange_ok: Mutex::new(true), ..Self::default() }
    }

    pub(crate) fn reject_exchange(self) -> Self {
        *self.exchange_ok.lock().unwrap() = false;
        self
    }

    pub(crate) fn failing(self, endpoint: &'static str) -> Self {
        self.failing.lock().unwrap().insert(endpoint);
        self
    }

    pub(crate) fn slow(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub(crate) fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == endpoint).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn hit(&self, endpoint: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(endpoint);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(endpoint) {
            return Err(ApiError::Status { status: 500, body: r#"{"detail":"backend exploded"}"#.to_owned() });
        }
        Ok(())
    }

    fn account(&self) -> Option<User> {
        self.account.lock().unwrap().clone()
    }

    fn set_account(&self, user: User) {
        *self.account.lock().unwrap() = Some(user);
    }
}

#[async_trait]
impl CompassApi for FakeApi {
    async fn google_auth_url(&self) -> Result<GoogleAuthUrl, ApiError> {
        self.hit("google_auth_url").await?;
        Ok(GoogleAuthUrl { auth_url: "https://accounts.example.com/o/oauth2/auth".to_owned() })
    }

    async fn google_callback(&self, _code: &str) -> Result<AuthResponse, ApiError> {
        self.hit("google_callback").await?;
        let ok = *self.exchange_ok.lock().unwrap();
        match self.account() {
            Some(user) if ok => Ok(AuthResponse { access_token: EXCHANGE_TOKEN.to_owned(), token_type: None, user }),
            _ => Err(ApiError::Status { status: 400, body: r#"{"detail":"invalid_grant"}"#.to_owned() }),
        }
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.hit("login").await?;
        let user = self.account().unwrap_or_else(|| user(None));
        let user = User { email: request.email.clone(), name: request.name.clone(), ..user };
        self.set_account(user.clone());
        Ok(AuthResponse { access_token: LOGIN_TOKEN.to_owned(), token_type: Some("bearer".to_owned()), user })
    }

    async fn verify(&self) -> Result<User, ApiError> {
        self.hit("verify").await?;
        self.account()
            .ok_or_else(|| ApiError::Status { status: 401, body: r#"{"detail":"Invalid token"}"#.to_owned() })
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.hit("current_user").await?;
        self.account().ok_or(ApiError::Status { status: 401, body: String::new() })
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.hit("update_user").await?;
        let mut user = self.account().ok_or(ApiError::Status { status: 401, body: String::new() })?;
        if let Some(name) = &update.tiktok_username {
            user.tiktok_username = Some(name.clone());
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
        self.set_account(user.clone());
        Ok(user)
    }

    async fn complete_onboarding(&self, request: &OnboardingRequest) -> Result<OnboardingResponse, ApiError> {
        self.hit("complete_onboarding").await?;
        let mut user = self.account().ok_or(ApiError::Status { status: 401, body: String::new() })?;
        user.tiktok_username = Some(request.tiktok_username.clone());
        user.offer_description = Some(request.offer_description.clone());
        user.target_audience = Some(request.target_audience.clone());
        self.set_account(user.clone());
        Ok(OnboardingResponse { message: "Onboarding completed successfully".to_owned(), user })
    }

    async fn scrape_profile(&self, username: &str) -> Result<ScrapeResponse, ApiError> {
        self.hit("scrape_profile").await?;
        self.demo.scrape_profile(username).await
    }

    async fn tiktok_profile(&self) -> Result<TikTokProfile, ApiError> {
        self.hit("tiktok_profile").await?;
        self.demo.tiktok_profile().await
    }

    async fn tiktok_videos(&self, limit: u32) -> Result<Vec<TikTokVideo>, ApiError> {
        self.hit("tiktok_videos").await?;
        self.demo.tiktok_videos(limit).await
    }

    async fn refresh_profile(&self) -> Result<MessageResponse, ApiError> {
        self.hit("refresh_profile").await?;
        self.demo.refresh_profile().await
    }

    async fn analytics_overview(&self) -> Result<AnalyticsOverview, ApiError> {
        self.hit("analytics_overview").await?;
        Ok(AnalyticsOverview { total_followers: Some(42), ..AnalyticsOverview::default() })
    }

    async fn video_performance(&self, limit: u32, sort_by: VideoSort) -> Result<Vec<VideoPerformance>, ApiError> {
        self.hit("video_performance").await?;
        self.demo.video_performance(limit, sort_by).await
    }

    async fn growth_metrics(&self, days: u32) -> Result<Vec<GrowthMetrics>, ApiError> {
        self.hit("growth_metrics").await?;
        self.demo.growth_metrics(days).await
    }

    async fn performance_insights(&self) -> Result<PerformanceInsights, ApiError> {
        self.hit("performance_insights").await?;
        self.demo.performance_insights().await
    }

    async fn creator_recommendations(&self, limit: u32) -> Result<Vec<CreatorRecommendation>, ApiError> {
        self.hit("creator_recommendations").await?;
        self.demo.creator_recommendations(limit).await
    }

    async fn recommendation_insights(&self) -> Result<Vec<RecommendationInsight>, ApiError> {
        self.hit("recommendation_insights").await?;
        self.demo.recommendation_insights().await
    }

    async fn refresh_recommendations(&self) -> Result<RefreshResponse, ApiError> {
        self.hit("refresh_recommendations").await?;
        self.demo.refresh_recommendations().await
    }

    async fn engaged_leads(&self, limit: u32) -> Result<EngagedLeadsReport, ApiError> {
        self.hit("engaged_leads").await?;
        self.demo.engaged_leads(limit).await
    }

    async fn contact_suggestions(&self, username: &str) -> Result<ContactSuggestions, ApiError> {
        self.hit("contact_suggestions").await?;
        self.demo.contact_suggestions(username).await
    }

    async fn best_practices(&self, target_audience: &str) -> Result<BestPracticesReport, ApiError> {
        self.hit("best_practices").await?;
        self.demo.best_practices(target_audience).await
    }

    async fn best_practice_recommendations(&self) -> Result<Vec<BestPracticeRecommendation>, ApiError> {
        self.hit("best_practice_recommendations").await?;
        self.demo.best_practice_recommendations().await
    }
}

/// Token store whose `clear` always fails, leaving the token on disk.
pub(crate) struct StickyStore {
    token: Mutex<String>,
}

impl StickyStore {
    pub(crate) fn holding(token: &str) -> Self {
        Self { token: Mutex::new(token.to_owned()) }
    }
}

impl TokenStore for StickyStore {
    fn token(&self) -> Option<String> {
        Some(self.token.lock().unwrap().clone())
    }

    fn store(&self, access_token: &str) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap() = access_token.to_owned();
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        Err(TokenStoreError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "session file locked")))
    }
}

/// Fake API, token store and notice log wired together.
pub(crate) struct Harness {
    pub api: Arc<FakeApi>,
    pub tokens: Arc<MemoryTokenStore>,
    pub notices: Arc<NoticeLog>,
}

impl Harness {
    pub(crate) fn new(api: FakeApi, token: Option<&str>) -> Self {
        let tokens = Arc::new(MemoryTokenStore::new());
        if let Some(token) = token {
            tokens.store(token).unwrap();
        }
        Self { api: Arc::new(api), tokens, notices: Arc::new(NoticeLog::new()) }
    }

    /// Harness holding a token for an onboarded `@creator` account.
    pub(crate) fn signed_in(api: FakeApi) -> Self {
        Self::new(api, Some("tok"))
    }

    pub(crate) fn onboarded_api() -> FakeApi {
        FakeApi::new(Some(user(Some("creator"))))
    }

    /// Mount a dashboard page, panicking if the gate redirects.
    pub(crate) async fn page(&self, page: crate::session::gate::DashboardPage) -> crate::pages::PageContext {
        let route = crate::session::gate::Route::Dashboard(page);
        match crate::pages::mount(&self.provider(), route, "test").await {
            Ok(ctx) => ctx,
            Err(to) => panic!("gate redirected {route} to {to}"),
        }
    }

    pub(crate) fn gate(&self) -> crate::session::gate::SessionGate {
        let tokens = Arc::new(RevocableTokenStore::new(self.tokens.clone()));
        crate::session::gate::SessionGate::new(self.api.clone(), tokens, self.notices.clone())
    }

    pub(crate) fn provider(&self) -> crate::session::provider::SessionProvider {
        crate::session::provider::SessionProvider::new(self.api.clone(), self.tokens.clone(), self.notices.clone())
    }
}
