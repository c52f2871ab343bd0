//! Configuration for the reqwest client.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default server the client talks to.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8085/";

/// Configuration for the reqwest HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Base URL of the notifications server.
    #[cfg_attr(
        feature = "config",
        arg(long = "base-url", env = "BEACON_BASE_URL", default_value = DEFAULT_BASE_URL)
    )]
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Request timeout in seconds.
    #[cfg_attr(feature = "config", arg(long = "http-timeout", env = "BEACON_HTTP_TIMEOUT"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// User-Agent header to send with requests.
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "BEACON_HTTP_USER_AGENT")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Identity header value forwarded to the server.
    #[cfg_attr(
        feature = "config",
        arg(long = "identity", env = "BEACON_IDENTITY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            user_agent: None,
            identity: None,
        }
    }
}

impl ReqwestConfig {
    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("beacon/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Creates a new configuration for the given server.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Sets the request timeout, rounded up to whole seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout
            .as_secs()
            .saturating_add(u64::from(timeout.subsec_nanos() > 0));
        self.timeout_secs = Some(secs);
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the identity header value.
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Returns the effective timeout, using default if unset or zero.
    pub fn effective_timeout(&self) -> Duration {
        match self.timeout_secs {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => DEFAULT_TIMEOUT,
        }
    }

    /// Returns the effective user agent, using default if unset or empty.
    pub fn effective_user_agent(&self) -> String {
        match &self.user_agent {
            Some(user_agent) if !user_agent.is_empty() => user_agent.clone(),
            _ => Self::default_user_agent(),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base url must use http or https, got '{}'",
                self.base_url.scheme()
            )));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(Error::Config("base url cannot be a base".into()));
        }
        Ok(())
    }
}
