//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── client: ReqwestConfig   # Server URL, timeout, user agent, identity
//! └── command: Command        # list, actions, enable, disable, ...
//! ```
//!
//! Transport options can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! beacon --base-url "https://console.example.com/" list --enabled enabled
//!
//! # Or via environment variables
//! BEACON_BASE_URL="https://console.example.com/" beacon list --category Webhooks
//! ```

mod command;

use anyhow::Context;
use beacon_reqwest::ReqwestConfig;
use clap::Parser;
pub use command::{ActionsArgs, Command, FileArgs, ListArgs};

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "beacon")]
#[command(about = "Manage notification integrations")]
#[command(version)]
pub struct Cli {
    /// HTTP client configuration.
    #[command(flatten)]
    pub client: ReqwestConfig,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so its values
    /// can be used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.client
            .validate()
            .context("invalid client configuration")?;
        Ok(())
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            base_url = %self.client.base_url,
            timeout_secs = self.client.effective_timeout().as_secs(),
            user_agent = %self.client.effective_user_agent(),
            has_identity = self.client.identity.is_some(),
            command = self.command.name(),
            "Client configuration"
        );
    }
}
