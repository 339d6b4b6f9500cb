//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_PREFIX: &str = "/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompassConfig {
    /// Backend origin without the `/api/v1` prefix or a trailing slash.
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeouts: HttpTimeouts,
    /// Serve canned data instead of calling the backend.
    pub demo_mode: bool,
}

impl CompassConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `COMPASS_API_URL`: default `http://localhost:8000`
    /// - `COMPASS_SESSION_FILE`: default `$HOME/.compass/session.json`
    /// - `COMPASS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `COMPASS_CONNECT_TIMEOUT_SECS`: default 10
    /// - `COMPASS_DEMO_MODE`: `1`/`true`/`yes` enables demo data
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(
            &std::env::var("COMPASS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned()),
        )?;
        let session_file = std::env::var("COMPASS_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file(std::env::var("HOME").ok().as_deref()));
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("COMPASS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("COMPASS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let demo_mode = parse_flag(std::env::var("COMPASS_DEMO_MODE").ok().as_deref())?;

        Ok(Self { api_url, session_file, timeouts, demo_mode })
    }

    /// Override the backend origin, normalized the same way as `COMPASS_API_URL`.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(raw)?;
        Ok(self)
    }

    /// Full base URL for REST calls, including the version prefix.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}{API_PREFIX}", self.api_url)
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Parse(format!("COMPASS_API_URL must be http(s): {raw}")));
    }
    Ok(trimmed.trim_end_matches(API_PREFIX).to_owned())
}

pub(crate) fn parse_flag(raw: Option<&str>) -> Result<bool, ConfigError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("" | "0" | "false" | "no" | "off") => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some(other) => Err(ConfigError::Parse(format!("invalid COMPASS_DEMO_MODE: {other}"))),
    }
}

pub(crate) fn default_session_file(home: Option<&str>) -> PathBuf {
    let base = home.map_or_else(|| PathBuf::from("."), PathBuf::from);
    base.join(".compass").join(SESSION_FILE_NAME)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
