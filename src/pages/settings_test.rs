use super::*;
use crate::notify::NoticeLevel;
use crate::session::gate::DashboardPage;
use crate::test_support::Harness;

#[test]
fn empty_form_has_nothing_to_update() {
    assert!(matches!(SettingsForm::default().to_update(), Err(SettingsError::NothingToUpdate)));

    let blank = SettingsForm { offer_description: Some("  ".to_owned()), ..SettingsForm::default() };
    assert!(matches!(blank.to_update(), Err(SettingsError::NothingToUpdate)));
}

#[test]
fn handle_is_normalized() {
    let form = SettingsForm { tiktok_username: Some(" @renamed ".to_owned()), ..SettingsForm::default() };
    assert_eq!(form.to_update().unwrap().tiktok_username.as_deref(), Some("renamed"));
}

#[test]
fn blank_handle_is_rejected() {
    let form = SettingsForm { tiktok_username: Some("@".to_owned()), ..SettingsForm::default() };
    assert!(matches!(form.to_update(), Err(SettingsError::Invalid(_))));
}

#[tokio::test]
async fn loads_current_account() {
    let h = Harness::signed_in(Harness::onboarded_api());
    let ctx = h.page(DashboardPage::Settings).await;

    let page = SettingsPage::load(&ctx).await.unwrap();

    assert_eq!(page.account.value().unwrap().tiktok_username.as_deref(), Some("creator"));
}

#[tokio::test]
async fn toggling_weekly_updates_skips_scrape() {
    let h = Harness::signed_in(Harness::onboarded_api());
    let mut ctx = h.page(DashboardPage::Settings).await;
    let mut page = SettingsPage::load(&ctx).await.unwrap();

    let form = SettingsForm { weekly_updates_enabled: Some(false), ..SettingsForm::default() };
    let user = page.save(&mut ctx, &form).await.unwrap();

    assert!(!user.weekly_updates_enabled);
    assert_eq!(page.account, Section::Loaded(user));
    assert_eq!(h.api.calls("scrape_profile"), 0);
    assert_eq!(h.notices.last().unwrap().level, NoticeLevel::Success);
}

#[tokio::test]
async fn changing_handle_scrapes_new_profile() {
    let h = Harness::signed_in(Harness::onboarded_api());
    let mut ctx = h.page(DashboardPage::Settings).await;
    let mut page = SettingsPage::load(&ctx).await.unwrap();

    let form = SettingsForm { tiktok_username: Some("@renamed".to_owned()), ..SettingsForm::default() };
    page.save(&mut ctx, &form).await.unwrap();

    assert_eq!(h.api.calls("scrape_profile"), 1);
    assert_eq!(ctx.user().tiktok_username.as_deref(), Some("renamed"));
}

#[tokio::test]
async fn failed_save_reports_and_keeps_account() {
    let h = Harness::signed_in(Harness::onboarded_api().failing("update_user"));
    let mut ctx = h.page(DashboardPage::Settings).await;
    let mut page = SettingsPage::load(&ctx).await.unwrap();
    let before = page.clone();

    let form = SettingsForm { target_audience: Some("beauty".to_owned()), ..SettingsForm::default() };
    let result = page.save(&mut ctx, &form).await;

    assert!(matches!(result, Err(SettingsError::Api(_))));
    assert_eq!(page, before);
    assert_eq!(h.notices.last().unwrap().message, "Failed to save settings: backend exploded");
}
