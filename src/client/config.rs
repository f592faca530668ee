//! Configuration management for Jira client

use std::{path::PathBuf, time::Duration};

use compact_str::{format_compact, CompactString};

use super::error::{ClientError, Result};
use crate::config::JiraConfig;

/// Main configuration for Jira client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Jira instance base URL, always ending in `/`
    pub base_url: CompactString,
    /// Basic-auth user name
    pub username: CompactString,
    /// Basic-auth password or API token
    pub password: CompactString,
    /// Request configuration
    pub request: RequestConfig,
    /// Debug configuration
    pub debug: DebugConfig,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Request timeout, `None` leaves the transport default in place
    pub timeout: Option<Duration>,
    /// Upper bound on pages fetched by a single pagination run
    pub max_pages: u32,
}

/// Debug and logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Write every response body to `log_directory`
    pub log_responses: bool,
    /// Directory for storing response dumps
    pub log_directory: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            max_pages: 10_000,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_responses: false,
            log_directory: Some(PathBuf::from("jira-fetch-logs")),
        }
    }
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(
        base_url: impl Into<CompactString>,
        username: impl Into<CompactString>,
        password: impl Into<CompactString>,
    ) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            username: username.into(),
            password: password.into(),
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::config("Base URL cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::config("Base URL must start with http:// or https://"));
        }

        if self.username.is_empty() {
            return Err(ClientError::config_validation("username", "cannot be empty"));
        }

        if self.request.timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(ClientError::config("Timeout must be greater than zero"));
        }

        if self.request.max_pages == 0 {
            return Err(ClientError::config_validation("max_pages", "must be at least 1"));
        }

        Ok(())
    }

    /// Set request configuration
    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Set debug configuration
    pub fn with_debug(mut self, debug: DebugConfig) -> Self {
        self.debug = debug;
        self
    }

    /// Enable response dumps
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        self
    }
}

impl From<JiraConfig> for ClientConfig {
    fn from(config: JiraConfig) -> Self {
        Self::new(config.jira_url, config.username, config.api_token)
    }
}

fn normalize_base_url(url: CompactString) -> CompactString {
    if url.is_empty() || url.ends_with('/') {
        url
    } else {
        format_compact!("{url}/")
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<CompactString>,
    username: Option<CompactString>,
    password: Option<CompactString>,
    request: Option<RequestConfig>,
    debug: Option<DebugConfig>,
}

impl ClientConfigBuilder {
    /// Set base URL
    pub fn base_url(mut self, url: impl Into<CompactString>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set basic-auth user name
    pub fn username(mut self, username: impl Into<CompactString>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set basic-auth password or API token
    pub fn password(mut self, password: impl Into<CompactString>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set request configuration
    pub fn request(mut self, request: RequestConfig) -> Self {
        self.request = Some(request);
        self
    }

    /// Set debug configuration
    pub fn debug(mut self, debug: DebugConfig) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Enable response dumps
    pub fn debug_logging(mut self, enabled: bool) -> Self {
        let mut debug = self.debug.unwrap_or_default();
        debug.log_responses = enabled;
        self.debug = Some(debug);
        self
    }

    /// Set directory receiving response dumps
    pub fn log_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        let mut debug = self.debug.unwrap_or_default();
        debug.log_directory = Some(dir.into());
        self.debug = Some(debug);
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let mut request = self.request.unwrap_or_default();
        request.timeout = Some(timeout);
        self.request = Some(request);
        self
    }

    /// Set the page limit of a single pagination run
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        let mut request = self.request.unwrap_or_default();
        request.max_pages = max_pages;
        self.request = Some(request);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::config("Base URL is required"))?;
        let username = self
            .username
            .ok_or_else(|| ClientError::config("Username is required"))?;

        let config = ClientConfig {
            base_url: normalize_base_url(base_url),
            username,
            password: self.password.unwrap_or_default(),
            request: self.request.unwrap_or_default(),
            debug: self.debug.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
