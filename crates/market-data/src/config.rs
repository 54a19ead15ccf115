//! Client configuration.
//!
//! Defaults match the exchange's website behaviour. [`NseConfig::from_env`]
//! overrides them from `NSE_*` environment variables (a `.env` file is
//! loaded first if present).

use std::str::FromStr;
use std::time::Duration;

use crate::endpoints::EndpointCatalog;
use crate::errors::NseError;
use crate::normalize::NormalizePolicy;

const DEFAULT_SESSION_REFRESH_SECS: u64 = 120;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT: &str = "*/*";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
pub const DEFAULT_X_REQUESTED_WITH: &str = "XMLHttpRequest";

/// Everything the client needs besides the transport itself.
#[derive(Clone, Debug)]
pub struct NseConfig {
    /// A session older than this is rebuilt on the next call.
    pub session_refresh_interval: Duration,
    /// Total time allowed for one request.
    pub request_timeout: Duration,
    /// Time allowed to establish a connection.
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub x_requested_with: String,
    /// Rewrites applied to quote, index and gainer/loser records.
    pub normalize: NormalizePolicy,
    pub endpoints: EndpointCatalog,
}

impl Default for NseConfig {
    fn default() -> Self {
        Self {
            session_refresh_interval: Duration::from_secs(DEFAULT_SESSION_REFRESH_SECS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            x_requested_with: DEFAULT_X_REQUESTED_WITH.to_string(),
            normalize: NormalizePolicy::baseline(),
            endpoints: EndpointCatalog::default(),
        }
    }
}

impl NseConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, NseError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64, _>(&lookup, "NSE_SESSION_REFRESH_SECS")? {
            config.session_refresh_interval = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "NSE_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "NSE_CONNECT_TIMEOUT_MS")? {
            config.connect_timeout = Duration::from_millis(ms);
        }
        if let Some(agent) = lookup("NSE_USER_AGENT").filter(|s| !s.trim().is_empty()) {
            config.user_agent = agent;
        }
        if let Some(lang) = lookup("NSE_ACCEPT_LANGUAGE").filter(|s| !s.trim().is_empty()) {
            config.accept_language = lang;
        }
        if let Some(home) = lookup("NSE_HOME_URL").filter(|s| !s.trim().is_empty()) {
            config.endpoints.home = home.trim_end_matches('/').to_string();
        }
        if let Some(flag) = parse_flag(&lookup, "NSE_NORMALIZE_STRIP_COMMAS")? {
            config.normalize.strip_commas = flag;
        }
        if let Some(flag) = parse_flag(&lookup, "NSE_NORMALIZE_DASH_AS_NULL")? {
            config.normalize.dash_as_null = flag;
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, NseError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| NseError::Config(format!("{}: {}", key, e))),
    }
}

fn parse_flag<F>(lookup: &F, key: &str) -> Result<Option<bool>, NseError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(None),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(NseError::Config(format!("{}: expected a boolean, got `{}`", key, v))),
        },
    }
}
