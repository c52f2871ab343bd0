//! Subcommand handlers.

mod actions;
mod list;
mod submit;

use beacon_core::actions::ActionKind;
use beacon_core::api::IntegrationsService;

use crate::config::Command;
use crate::notifier::ConsoleNotifier;

/// Tracing target for command output.
pub const TRACING_TARGET: &str = "beacon_cli::commands";

/// Runs a parsed subcommand against the integrations service.
pub async fn execute(
    command: Command,
    service: &IntegrationsService,
    notifier: &ConsoleNotifier,
) -> anyhow::Result<()> {
    match command {
        Command::List(args) => list::run(&args, service).await,
        Command::Actions(args) => actions::show(&args, service).await,
        Command::Enable { id } => actions::run(ActionKind::Enable, id, service, notifier).await,
        Command::Disable { id } => actions::run(ActionKind::Disable, id, service, notifier).await,
        Command::Delete { id } => actions::run(ActionKind::Delete, id, service, notifier).await,
        Command::Test { id } => actions::run(ActionKind::Test, id, service, notifier).await,
        Command::Create(file) => submit::create(&file, service, notifier).await,
        Command::Update { id, file } => submit::update(id, &file, service, notifier).await,
    }
}
