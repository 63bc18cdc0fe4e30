//! Client settings loaded via OrthoConfig (`DOCTRACK_*` environment
//! variables and config file).

use std::fmt;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::stats::DEFAULT_TOP_DEPARTMENTS;
use crate::domain::{
    AccessToken, DEFAULT_DUE_SOON_DAYS, DueSoonThreshold, ParseUnlistedRoutePolicyError,
    UnlistedRoutePolicy,
};

const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("api_url is not a valid URL: {input}")]
    InvalidApiUrl { input: String },
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
    #[error("trend_days must be greater than zero")]
    ZeroTrendDays,
    #[error(transparent)]
    UnlistedRoutes(#[from] ParseUnlistedRoutePolicyError),
}

/// Settings for the `doctrack` client.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DOCTRACK")]
pub struct ClientSettings {
    /// Base URL of the REST backend.
    pub api_url: Option<String>,
    /// Per-request timeout in seconds.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// Width of the due-soon window in days.
    pub due_soon_days: Option<u32>,
    /// `allow` or `deny` for routes no rule covers.
    pub unlisted_routes: Option<String>,
    /// Days shown in the dashboard trend.
    #[ortho_config(default = 7)]
    pub trend_days: u32,
    pub top_departments: Option<usize>,
    /// Bearer token for authenticated commands.
    pub token: Option<String>,
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_url", &self.api_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("due_soon_days", &self.due_soon_days)
            .field("unlisted_routes", &self.unlisted_routes)
            .field("trend_days", &self.trend_days)
            .field("top_departments", &self.top_departments)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ClientSettings {
    pub fn api_url(&self) -> Result<Url, SettingsError> {
        let raw = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Url::parse(raw.trim()).map_err(|_| SettingsError::InvalidApiUrl {
            input: raw.to_owned(),
        })
    }

    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    pub fn due_soon_threshold(&self) -> DueSoonThreshold {
        DueSoonThreshold::days(self.due_soon_days.unwrap_or(DEFAULT_DUE_SOON_DAYS))
    }

    /// Policy for routes without a rule; `allow` when unset.
    pub fn unlisted_routes(&self) -> Result<UnlistedRoutePolicy, SettingsError> {
        match self.unlisted_routes.as_deref() {
            None => Ok(UnlistedRoutePolicy::default()),
            Some(raw) => Ok(raw.parse()?),
        }
    }

    pub fn trend_days(&self) -> Result<u32, SettingsError> {
        match self.trend_days {
            0 => Err(SettingsError::ZeroTrendDays),
            days => Ok(days),
        }
    }

    pub fn top_departments(&self) -> usize {
        self.top_departments.unwrap_or(DEFAULT_TOP_DEPARTMENTS)
    }

    /// Configured bearer token; blank values count as absent.
    pub fn token(&self) -> Option<AccessToken> {
        self.token.clone().and_then(AccessToken::new)
    }
}
