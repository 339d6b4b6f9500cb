use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use compass::config::ConfigError;
use compass::net::types::VideoSort;
use compass::pages::analytics::{AnalyticsPage, AnalyticsQuery, DEFAULT_GROWTH_DAYS, DEFAULT_VIDEO_LIMIT};
use compass::pages::best_practices::BestPracticesPage;
use compass::pages::dashboard::OverviewPage;
use compass::pages::engaged_leads::{DEFAULT_LEAD_LIMIT, EngagedLeadsPage};
use compass::pages::login::{LoginForm, google_sign_in};
use compass::pages::onboarding::{OnboardingError, OnboardingForm, OnboardingPage};
use compass::pages::recommendations::{DEFAULT_CREATOR_LIMIT, RecommendationsPage};
use compass::pages::settings::{SettingsError, SettingsForm, SettingsPage};
use compass::pages::{PageContext, mount};
use compass::session::callback::CallbackParams;
use compass::session::gate::DashboardPage;
use compass::session::provider::SessionError;
use compass::{ApiError, CompassConfig, FileTokenStore, Notice, NoticeLevel, Notifier, Route, SessionProvider};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Onboarding(#[from] OnboardingError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("{}", redirect_hint(.0))]
    Redirected(Route),
    #[error("sign-in did not complete")]
    SignInFailed,
    #[error("page closed before its data arrived")]
    Interrupted,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

fn redirect_hint(route: &Route) -> String {
    match route {
        Route::Landing => "not signed in; run `compass login` first".to_owned(),
        Route::Onboarding => "onboarding incomplete; run `compass onboard` first".to_owned(),
        other => format!("continue at {other}"),
    }
}

#[derive(Parser, Debug)]
#[command(name = "compass", about = "Creator Compass command-line client")]
struct Cli {
    /// Backend origin, e.g. http://localhost:8000
    #[arg(long, env = "COMPASS_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "COMPASS_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Serve canned demo data instead of calling the backend.
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Print raw page JSON instead of a summary where one exists.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with email and display name.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
    },
    /// Print the Google sign-in URL.
    GoogleUrl,
    /// Finish Google sign-in from the callback URL or its query string.
    Callback { url: String },
    /// Complete the onboarding profile.
    Onboard(OnboardArgs),
    Logout,
    /// Verify the stored session and show the signed-in user.
    Status,
    Dashboard {
        /// Re-scrape the TikTok profile before showing it.
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    Analytics {
        #[arg(long, default_value_t = DEFAULT_GROWTH_DAYS)]
        days: u32,
        #[arg(long, default_value_t = DEFAULT_VIDEO_LIMIT)]
        limit: u32,
        #[arg(long, default_value = "view_count")]
        sort: VideoSort,
    },
    Recommendations {
        #[arg(long, default_value_t = DEFAULT_CREATOR_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },
    BestPractices {
        #[arg(long)]
        audience: Option<String>,
    },
    Leads {
        #[arg(long, default_value_t = DEFAULT_LEAD_LIMIT)]
        limit: u32,
    },
    /// Outreach templates for one lead.
    Contacts { username: String },
    /// Show settings, or update them when any flag is given.
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
struct OnboardArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    offer: String,
    #[arg(long)]
    audience: String,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    offer: Option<String>,
    #[arg(long)]
    audience: Option<String>,
    #[arg(long)]
    weekly_updates: Option<bool>,
}

impl SettingsArgs {
    fn into_form(self) -> Option<SettingsForm> {
        let form = SettingsForm {
            tiktok_username: self.username,
            offer_description: self.offer,
            target_audience: self.audience,
            weekly_updates_enabled: self.weekly_updates,
        };
        (form != SettingsForm::default()).then_some(form)
    }
}

/// Writes notices to stderr so stdout stays machine-readable.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notice: Notice) {
        let mark = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{mark}] {}", notice.message);
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    let mut config = CompassConfig::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url)?;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }
    config.demo_mode |= cli.demo;

    let tokens = Arc::new(FileTokenStore::new(config.session_file.clone()));
    let provider = SessionProvider::from_config(&config, tokens, Arc::new(StderrNotifier))?;

    run(&provider, cli.command, cli.json).await
}

async fn run(provider: &SessionProvider, command: Command, json: bool) -> Result<(), CliError> {
    match command {
        Command::Login { email, name } => {
            let route = LoginForm::new(email, name).submit(provider).await?;
            print_json(&serde_json::json!({ "next": route.path() }))
        }
        Command::GoogleUrl => {
            let url = google_sign_in(provider).await.ok_or(CliError::SignInFailed)?;
            println!("{url}");
            Ok(())
        }
        Command::Callback { url } => {
            let result = provider.handle_callback(&CallbackParams::parse(&url)).await;
            if result.user.is_none() {
                return Err(CliError::SignInFailed);
            }
            print_json(&serde_json::json!({ "next": result.route.path(), "user": result.user }))
        }
        Command::Onboard(args) => {
            let page = OnboardingPage::mount(provider).await.map_err(CliError::Redirected)?;
            let form = OnboardingForm {
                tiktok_username: args.username,
                offer_description: args.offer,
                target_audience: args.audience,
            };
            let route = page.submit(provider, &form).await?;
            print_json(&serde_json::json!({ "next": route.path() }))
        }
        Command::Logout => {
            let route = provider.logout().await;
            print_json(&serde_json::json!({ "next": route.path() }))
        }
        Command::Status => {
            let status = provider.refresh().await;
            let user = provider.user().await;
            print_json(&serde_json::json!({ "status": format!("{status:?}"), "user": user }))
        }
        Command::Dashboard { refresh } => {
            let ctx = open(provider, DashboardPage::Overview, "overview").await?;
            let mut page = OverviewPage::load(&ctx).await.ok_or(CliError::Interrupted)?;
            if refresh {
                page.refresh_profile(&ctx).await;
            }
            if json {
                return print_json(&page);
            }
            for card in page.stat_cards() {
                println!("{:<16} {}", card.label, card.value);
            }
            if let Some(profile) = page.profile.value() {
                println!("{:<16} @{}", "Profile", profile.tiktok_username);
            }
            println!("{:<16} {}", "Recent videos", page.recent_videos.items().len());
            Ok(())
        }
        Command::Analytics { days, limit, sort } => {
            let ctx = open(provider, DashboardPage::Analytics, "analytics").await?;
            let query = AnalyticsQuery { days, limit, sort_by: sort };
            print_page(AnalyticsPage::load(&ctx, query).await)
        }
        Command::Recommendations { limit, refresh } => {
            let ctx = open(provider, DashboardPage::Recommendations, "recommendations").await?;
            let page = if refresh {
                RecommendationsPage::refresh(&ctx, limit).await
            } else {
                RecommendationsPage::load(&ctx, limit).await
            };
            print_page(page)
        }
        Command::BestPractices { audience } => {
            let ctx = open(provider, DashboardPage::BestPractices, "best-practices").await?;
            print_page(BestPracticesPage::load(&ctx, audience.as_deref()).await)
        }
        Command::Leads { limit } => {
            let ctx = open(provider, DashboardPage::EngagedLeads, "engaged-leads").await?;
            print_page(EngagedLeadsPage::load(&ctx, limit).await)
        }
        Command::Contacts { username } => {
            let ctx = open(provider, DashboardPage::EngagedLeads, "engaged-leads").await?;
            print_page(EngagedLeadsPage::contact_suggestions(&ctx, &username).await)
        }
        Command::Settings(args) => {
            let mut ctx = open(provider, DashboardPage::Settings, "settings").await?;
            let mut page = SettingsPage::load(&ctx).await.ok_or(CliError::Interrupted)?;
            if let Some(form) = args.into_form() {
                page.save(&mut ctx, &form).await?;
            }
            print_json(&page)
        }
    }
}

async fn open(provider: &SessionProvider, page: DashboardPage, name: &'static str) -> Result<PageContext, CliError> {
    mount(provider, Route::Dashboard(page), name).await.map_err(CliError::Redirected)
}

fn print_page<T: Serialize>(page: Option<T>) -> Result<(), CliError> {
    print_json(&page.ok_or(CliError::Interrupted)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
