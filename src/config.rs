//! Client configuration.
//!
//! Values come from the environment first and are then overridden by
//! command-line flags in `main`.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_LOG_FILE: &str = "quiz-progress.log";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_BASE_URL: &str = "QUIZ_BASE_URL";
pub const ENV_SESSION_COOKIE: &str = "QUIZ_SESSION_COOKIE";
pub const ENV_LOG: &str = "QUIZ_LOG";

/// Settings for talking to the quiz backend.
///
/// # Example
///
/// ```
/// use quiz_progress::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://quiz.local:5000/")
///     .with_session_cookie("session=abc");
/// assert_eq!(config.base_url, "http://quiz.local:5000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash.
    pub base_url: String,
    /// Sent verbatim as the `Cookie` header when set.
    pub session_cookie: Option<String>,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
    /// `tracing-subscriber` filter directive.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            request_timeout: DEFAULT_TIMEOUT,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `QUIZ_BASE_URL`, `QUIZ_SESSION_COOKIE` and `QUIZ_LOG`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(cookie) = lookup(ENV_SESSION_COOKIE).filter(|v| !v.trim().is_empty()) {
            config = config.with_session_cookie(cookie);
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = path.into();
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
        assert!(config.session_cookie.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(|name| match name {
            ENV_BASE_URL => Some("http://example.test:8080/".to_string()),
            ENV_SESSION_COOKIE => Some("session=xyz".to_string()),
            ENV_LOG => Some("quiz_progress=debug".to_string()),
            _ => None,
        });
        assert_eq!(config.base_url, "http://example.test:8080");
        assert_eq!(config.session_cookie.as_deref(), Some("session=xyz"));
        assert_eq!(config.log_filter, "quiz_progress=debug");
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let config = ClientConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, ClientConfig::default());
    }
}
