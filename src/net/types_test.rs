use super::*;

// =============================================================
// Helpers
// =============================================================

fn user_json(tiktok_username: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "id": 7,
        "email": "creator@example.com",
        "name": "Creator",
        "avatar_url": null,
        "tiktok_username": tiktok_username,
        "offer_description": "Styling sessions",
        "target_audience": "fashion",
        "weekly_updates_enabled": true,
        "is_active": true
    })
}

// =============================================================
// User
// =============================================================

#[test]
fn user_with_username_does_not_need_onboarding() {
    let user: User = serde_json::from_value(user_json(serde_json::json!("stylist"))).unwrap();
    assert_eq!(user.id, 7);
    assert!(!user.needs_onboarding());
}

#[test]
fn user_with_null_username_needs_onboarding() {
    let user: User = serde_json::from_value(user_json(serde_json::Value::Null)).unwrap();
    assert!(user.needs_onboarding());
}

#[test]
fn user_with_blank_username_needs_onboarding() {
    let user: User = serde_json::from_value(user_json(serde_json::json!("   "))).unwrap();
    assert!(user.needs_onboarding());
}

#[test]
fn login_response_user_defaults_missing_flags() {
    // `/auth/login` omits the weekly/active flags.
    let json = serde_json::json!({
        "access_token": "tok",
        "token_type": "bearer",
        "user": { "id": 1, "email": "a@b.c", "name": "A" }
    });
    let resp: AuthResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.access_token, "tok");
    assert!(!resp.user.weekly_updates_enabled);
    assert!(resp.user.is_active);
    assert!(resp.user.needs_onboarding());
}

#[test]
fn user_id_accepts_integral_float() {
    let mut json = user_json(serde_json::json!("x"));
    json["id"] = serde_json::json!(7.0);
    let user: User = serde_json::from_value(json).unwrap();
    assert_eq!(user.id, 7);
}

#[test]
fn user_id_rejects_fractional_float() {
    let mut json = user_json(serde_json::json!("x"));
    json["id"] = serde_json::json!(7.5);
    assert!(serde_json::from_value::<User>(json).is_err());
}

// =============================================================
// UserUpdate
// =============================================================

#[test]
fn user_update_skips_unset_fields() {
    let update = UserUpdate { weekly_updates_enabled: Some(false), ..UserUpdate::default() };
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json, serde_json::json!({ "weekly_updates_enabled": false }));
}

#[test]
fn user_update_default_is_empty() {
    assert!(UserUpdate::default().is_empty());
    assert!(!UserUpdate { target_audience: Some("fitness".into()), ..UserUpdate::default() }.is_empty());
}

// =============================================================
// Analytics
// =============================================================

#[test]
fn overview_counts_accept_null_and_floats() {
    let json = serde_json::json!({
        "total_followers": 125000.0,
        "total_videos": null,
        "total_likes": 2_500_000,
        "avg_engagement_rate": 4.2
    });
    let overview: AnalyticsOverview = serde_json::from_value(json).unwrap();
    assert_eq!(overview.total_followers, Some(125_000));
    assert_eq!(overview.total_videos, None);
    assert_eq!(overview.total_likes, Some(2_500_000));
    assert_eq!(overview.follower_growth_30d, None);
    assert!(overview.top_performing_video.is_none());
}

#[test]
fn insights_without_videos_have_no_metrics() {
    let json = serde_json::json!({ "insights": [], "recommendations": [] });
    let insights: PerformanceInsights = serde_json::from_value(json).unwrap();
    assert!(insights.metrics.is_none());
    assert!(insights.insights.is_empty());
}

#[test]
fn insight_kind_unknown_maps_to_info() {
    let json = serde_json::json!({ "type": "celebration", "title": "t", "description": "d" });
    let insight: PerformanceInsight = serde_json::from_value(json).unwrap();
    assert_eq!(insight.kind, InsightKind::Info);
}

#[test]
fn insight_kind_warning_roundtrips_lowercase() {
    let json = serde_json::json!({ "type": "warning", "title": "Low Engagement Rate", "description": "d" });
    let insight: PerformanceInsight = serde_json::from_value(json).unwrap();
    assert_eq!(insight.kind, InsightKind::Warning);
    assert_eq!(serde_json::to_value(insight.kind).unwrap(), serde_json::json!("warning"));
}

// =============================================================
// Leads & best practices
// =============================================================

#[test]
fn engaged_leads_report_defaults_when_empty() {
    let report: EngagedLeadsReport = serde_json::from_value(serde_json::json!({})).unwrap();
    assert!(report.engaged_leads.is_empty());
    assert_eq!(report.total_analyzed, 0);
}

#[test]
fn best_practices_report_keeps_free_form_section() {
    let json = serde_json::json!({
        "best_practices": { "posting_times": ["7-9 PM"] },
        "recommendations": [{
            "category": "timing",
            "title": "Post in the evening",
            "description": "Peak activity is 7-9 PM",
            "action": "Schedule posts",
            "priority": "high"
        }],
        "analyzed_creators": 12,
        "target_audience": "fashion"
    });
    let report: BestPracticesReport = serde_json::from_value(json).unwrap();
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.best_practices["posting_times"][0], "7-9 PM");
    assert!(report.note.is_none());
}

// =============================================================
// VideoSort
// =============================================================

#[test]
fn video_sort_parses_aliases() {
    assert_eq!("views".parse::<VideoSort>().unwrap(), VideoSort::ViewCount);
    assert_eq!("engagement_rate".parse::<VideoSort>().unwrap(), VideoSort::EngagementRate);
    assert!("shares".parse::<VideoSort>().is_err());
}

#[test]
fn video_sort_query_value_matches_serde() {
    for sort in [VideoSort::ViewCount, VideoSort::LikeCount, VideoSort::EngagementRate, VideoSort::PostedAt] {
        assert_eq!(serde_json::to_value(sort).unwrap(), serde_json::json!(sort.as_str()));
    }
}
