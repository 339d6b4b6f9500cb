use super::*;
use crate::notify::NoticeLevel;
use crate::session::token::RevocableTokenStore;
use crate::test_support::{FakeApi, Harness, user};

// =============================================================================
// Route
// =============================================================================

#[test]
fn route_parses_every_path_it_renders() {
    let routes = [
        Route::Landing,
        Route::AuthCallback,
        Route::Onboarding,
        Route::DASHBOARD,
        Route::Dashboard(DashboardPage::Analytics),
        Route::Dashboard(DashboardPage::Recommendations),
        Route::Dashboard(DashboardPage::BestPractices),
        Route::Dashboard(DashboardPage::EngagedLeads),
        Route::Dashboard(DashboardPage::Settings),
    ];
    for route in routes {
        assert_eq!(route.path().parse::<Route>(), Ok(route), "{route}");
    }
}

#[test]
fn route_ignores_query_fragment_and_trailing_slash() {
    assert_eq!("/auth/callback?code=abc".parse::<Route>(), Ok(Route::AuthCallback));
    assert_eq!("/dashboard/#top".parse::<Route>(), Ok(Route::DASHBOARD));
    assert_eq!("".parse::<Route>(), Ok(Route::Landing));
}

#[test]
fn route_rejects_unknown_path() {
    assert!("/admin".parse::<Route>().is_err());
}

#[test]
fn only_dashboard_routes_are_dashboard() {
    assert!(Route::Dashboard(DashboardPage::Settings).is_dashboard());
    assert!(!Route::Onboarding.is_dashboard());
    assert!(!Route::Landing.is_dashboard());
}

// =============================================================================
// decide
// =============================================================================

#[test]
fn decide_unknown_renders_nothing() {
    assert_eq!(decide(SessionStatus::Unknown, Route::DASHBOARD), None);
}

#[test]
fn decide_unauthenticated_goes_to_landing() {
    assert_eq!(
        decide(SessionStatus::Unauthenticated, Route::DASHBOARD),
        Some(Navigation::Redirect(Route::Landing))
    );
    assert_eq!(decide(SessionStatus::Unauthenticated, Route::Landing), Some(Navigation::Stay));
}

#[test]
fn decide_onboarding_required_goes_to_onboarding() {
    assert_eq!(
        decide(SessionStatus::OnboardingRequired, Route::Dashboard(DashboardPage::Analytics)),
        Some(Navigation::Redirect(Route::Onboarding))
    );
    assert_eq!(decide(SessionStatus::OnboardingRequired, Route::Onboarding), Some(Navigation::Stay));
}

#[test]
fn decide_authenticated_leaves_landing_and_onboarding() {
    for from in [Route::Landing, Route::Onboarding, Route::AuthCallback] {
        assert_eq!(
            decide(SessionStatus::Authenticated, from),
            Some(Navigation::Redirect(Route::DASHBOARD)),
            "{from}"
        );
    }
}

#[test]
fn decide_authenticated_stays_on_any_dashboard_page() {
    let page = Route::Dashboard(DashboardPage::EngagedLeads);
    assert_eq!(decide(SessionStatus::Authenticated, page), Some(Navigation::Stay));
}

#[test]
fn status_for_blank_username_requires_onboarding() {
    assert_eq!(SessionStatus::for_user(&user(Some("  "))), SessionStatus::OnboardingRequired);
    assert_eq!(SessionStatus::for_user(&user(None)), SessionStatus::OnboardingRequired);
    assert_eq!(SessionStatus::for_user(&user(Some("creator"))), SessionStatus::Authenticated);
}

#[test]
fn landing_for_matches_username_presence() {
    assert_eq!(landing_for(&user(None)), Route::Onboarding);
    assert_eq!(landing_for(&user(Some("creator"))), Route::DASHBOARD);
}

// =============================================================================
// SessionGate::check
// =============================================================================

#[tokio::test]
async fn no_token_redirects_without_calling_verify() {
    let h = Harness::new(FakeApi::new(Some(user(Some("creator")))), None);

    let outcome = h.gate().check(Route::DASHBOARD).await;

    assert_eq!(outcome.status, SessionStatus::Unauthenticated);
    assert_eq!(outcome.redirect(), Some(Route::Landing));
    assert!(outcome.session().is_none());
    assert_eq!(h.api.total_calls(), 0);
    let notice = h.notices.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.message, "Please sign in to continue");
}

#[tokio::test]
async fn no_token_on_landing_renders_quietly() {
    let h = Harness::new(FakeApi::new(None), None);

    let outcome = h.gate().check(Route::Landing).await;

    assert_eq!(outcome.navigation, Navigation::Stay);
    assert!(h.notices.drain().is_empty());
}

#[tokio::test]
async fn verify_failure_clears_token_and_redirects() {
    let h = Harness::new(FakeApi::new(None), Some("stale"));

    let outcome = h.gate().check(Route::Dashboard(DashboardPage::Analytics)).await;

    assert_eq!(outcome.status, SessionStatus::Unauthenticated);
    assert_eq!(outcome.redirect(), Some(Route::Landing));
    assert!(outcome.user.is_none());
    assert!(h.tokens.token().is_none());
    assert_eq!(h.api.calls("verify"), 1);
    let notice = h.notices.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Authentication failed: Invalid token");
}

#[tokio::test]
async fn verify_transport_failure_also_clears_token() {
    let h = Harness::new(FakeApi::new(Some(user(Some("creator")))).failing("verify"), Some("tok"));

    let outcome = h.gate().check(Route::DASHBOARD).await;

    assert_eq!(outcome.redirect(), Some(Route::Landing));
    assert!(h.tokens.token().is_none());
}

#[tokio::test]
async fn empty_username_goes_to_onboarding_never_dashboard() {
    let h = Harness::new(FakeApi::new(Some(user(Some("")))), Some("tok"));

    for page in [Route::DASHBOARD, Route::Dashboard(DashboardPage::Settings), Route::Landing] {
        let outcome = h.gate().check(page).await;
        assert_eq!(outcome.status, SessionStatus::OnboardingRequired);
        assert_eq!(outcome.redirect(), Some(Route::Onboarding));
        assert!(outcome.session().is_none());
    }
    assert_eq!(h.tokens.token().as_deref(), Some("tok"));
}

#[tokio::test]
async fn onboarding_required_renders_onboarding_in_place() {
    let h = Harness::new(FakeApi::new(Some(user(None))), Some("tok"));

    let outcome = h.gate().check(Route::Onboarding).await;

    assert_eq!(outcome.navigation, Navigation::Stay);
    assert!(outcome.session().is_none());
    assert!(outcome.user.is_some());
}

#[tokio::test]
async fn onboarded_user_is_sent_from_landing_and_onboarding_to_dashboard() {
    let h = Harness::new(FakeApi::new(Some(user(Some("creator")))), Some("tok"));

    for from in [Route::Landing, Route::Onboarding] {
        let outcome = h.gate().check(from).await;
        assert_eq!(outcome.status, SessionStatus::Authenticated);
        assert_eq!(outcome.destination(from), Route::DASHBOARD);
        assert!(outcome.session().is_none());
    }
}

#[tokio::test]
async fn onboarded_user_renders_dashboard_page_with_session() {
    let h = Harness::new(FakeApi::new(Some(user(Some("creator")))), Some("tok"));
    let page = Route::Dashboard(DashboardPage::BestPractices);

    let outcome = h.gate().check(page).await;

    assert_eq!(outcome.navigation, Navigation::Stay);
    assert_eq!(outcome.destination(page), page);
    let session = outcome.into_session().unwrap();
    assert_eq!(session.user().tiktok_username.as_deref(), Some("creator"));
    assert_eq!(h.api.calls("verify"), 1);
}

#[tokio::test]
async fn resolve_reports_status_without_navigation() {
    let h = Harness::new(FakeApi::new(Some(user(None))), Some("tok"));

    let (status, user) = h.gate().resolve().await;

    assert_eq!(status, SessionStatus::OnboardingRequired);
    assert_eq!(user.unwrap().email, "demo@example.com");
}

#[test]
fn route_serializes_as_path() {
    let json = serde_json::to_value(Route::Dashboard(DashboardPage::EngagedLeads)).unwrap();
    assert_eq!(json, serde_json::json!("/dashboard/engaged-leads"));
}

#[tokio::test]
async fn verify_failure_with_unclearable_store_still_drops_token() {
    let h = Harness::new(FakeApi::new(None), None);
    let tokens: Arc<dyn TokenStore> =
        Arc::new(RevocableTokenStore::new(Arc::new(crate::test_support::StickyStore::holding("stale"))));
    let gate = SessionGate::new(h.api.clone(), tokens.clone(), h.notices.clone());

    let outcome = gate.check(Route::DASHBOARD).await;

    assert_eq!(outcome.redirect(), Some(Route::Landing));
    assert!(tokens.token().is_none());

    // The next mount sees no token and never reaches verify.
    gate.check(Route::DASHBOARD).await;
    assert_eq!(h.api.calls("verify"), 1);
}
