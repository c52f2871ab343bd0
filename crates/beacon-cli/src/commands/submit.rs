//! The `create` and `update` subcommands.

use std::path::Path;

use anyhow::Context;
use beacon_core::api::{IntegrationsService, RequestOptions};
use beacon_core::notify::{Notification, notify_result};
use beacon_core::types::{Endpoint, NewIntegration, NewUserIntegration};
use uuid::Uuid;

use super::TRACING_TARGET;
use crate::config::FileArgs;
use crate::notifier::ConsoleNotifier;

/// Reads a user integration from a JSON endpoint document.
async fn read_integration(path: &Path) -> anyhow::Result<NewIntegration> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let endpoint: Endpoint = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not an endpoint document", path.display()))?;
    let integration = NewUserIntegration::try_from(NewIntegration::try_from(endpoint)?)?;

    tracing::debug!(
        target: TRACING_TARGET,
        path = %path.display(),
        integration_type = %integration.user_type(),
        "Integration document loaded"
    );

    Ok(integration.into_inner())
}

/// Creates an integration.
pub async fn create(
    args: &FileArgs,
    service: &IntegrationsService,
    notifier: &ConsoleNotifier,
) -> anyhow::Result<()> {
    let integration = read_integration(&args.file).await?;

    let result = service.create_integration(&integration).await;
    let notification = Notification::create_result(&integration.name, &result);
    notify_result(notifier, &notification, &result);

    let created = result?;
    tracing::info!(target: TRACING_TARGET, id = %created.id, "Integration id");
    Ok(())
}

/// Replaces the integration `id`.
pub async fn update(
    id: Uuid,
    args: &FileArgs,
    service: &IntegrationsService,
    notifier: &ConsoleNotifier,
) -> anyhow::Result<()> {
    let integration = read_integration(&args.file).await?;

    let result = service
        .update_integration(id, &integration, &RequestOptions::new())
        .await;
    let notification = Notification::update_result(&integration.name, &result);
    notify_result(notifier, &notification, &result);

    result?;
    Ok(())
}
