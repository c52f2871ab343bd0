#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod notifier;
mod shutdown;

use std::process;

use anyhow::Context;
use beacon_core::api::IntegrationsService;
use beacon_reqwest::ReqwestClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Cli;
use crate::notifier::ConsoleNotifier;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "beacon_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "beacon_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "beacon_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "command completed successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "command terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    init_tracing();
    log_startup_info();

    cli.validate()?;
    cli.log();

    let client = ReqwestClient::new(cli.client.clone()).context("failed to create http client")?;
    let service: IntegrationsService = client.into_service();
    let notifier = ConsoleNotifier::new();

    let shutdown = CancellationToken::new();
    let signal = tokio::spawn(shutdown::cancel_on_signal(shutdown.clone()));

    let result = tokio::select! {
        result = commands::execute(cli.command, &service, &notifier) => result,
        () = shutdown.cancelled() => Err(anyhow::anyhow!("interrupted before the command completed")),
    };

    signal.abort();
    result
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info() {
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        features = ?enabled_features(),
        "build information"
    );
}

/// Returns a list of enabled compile-time features.
fn enabled_features() -> Vec<&'static str> {
    [cfg!(feature = "dotenv").then_some("dotenv")]
        .into_iter()
        .flatten()
        .collect()
}
