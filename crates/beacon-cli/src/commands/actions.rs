//! Row action subcommands: `actions`, `enable`, `disable`, `delete`, `test`.

use beacon_core::actions::{ActionHandler, ActionKind, ActionResolver, Capabilities};
use beacon_core::api::IntegrationsService;
use beacon_core::flags::{StaticFlags, TEST_ACTION_FLAG};
use beacon_core::notify::{Notification, notify_result};
use beacon_core::types::{Endpoint, Integration};
use beacon_core::{Error, Result};
use uuid::Uuid;

use super::TRACING_TARGET;
use crate::config::ActionsArgs;
use crate::notifier::ConsoleNotifier;

/// Performs row actions through the integrations service.
struct ServiceActions<'a> {
    service: &'a IntegrationsService,
    notifier: &'a ConsoleNotifier,
}

#[async_trait::async_trait]
impl ActionHandler<Integration> for ServiceActions<'_> {
    async fn on_edit(&self, row: &Integration) -> Result<()> {
        let document = serde_json::to_string_pretty(&Endpoint::try_from(row)?)?;
        tracing::info!(
            target: TRACING_TARGET,
            id = %row.id,
            "Submit an edited copy with `beacon update {} --file <path>`:\n{}",
            row.id,
            document
        );
        Ok(())
    }

    async fn on_test(&self, row: &Integration) -> Result<()> {
        let result = self.service.test_integration(row.id).await;
        let notification = match &result {
            Ok(()) => Notification::success(
                "Test notification sent",
                format!("A test notification was sent through {}.", row.name),
            ),
            Err(error) => Notification::from_error("Failed to send test notification", error),
        };
        notify_result(self.notifier, &notification, &result);
        result
    }

    async fn on_delete(&self, row: &Integration) -> Result<()> {
        let groups = self.service.affected_behavior_groups(row.id).await?;
        for group in &groups {
            tracing::warn!(
                target: TRACING_TARGET,
                behavior_group = %group.display_name,
                "Behavior group loses this integration"
            );
        }

        let result = self.service.delete_integration(row.id).await;
        let notification = match &result {
            Ok(()) => Notification::success(
                "Integration deleted",
                format!("The integration {} was deleted.", row.name),
            ),
            Err(error) => Notification::from_error("Failed to delete integration", error),
        };
        notify_result(self.notifier, &notification, &result);
        result
    }

    async fn on_enable(&self, row: &Integration, index: usize, enable: bool) -> Result<()> {
        let result = self.service.set_enabled(row, enable).await;
        let state = if enable { "enabled" } else { "disabled" };
        let notification = match &result {
            Ok(updated) => Notification::success(
                format!("Integration {state}"),
                format!("The integration {} is now {state}.", updated.name),
            ),
            Err(error) => Notification::from_error(format!("Failed to {state} integration"), error),
        };

        tracing::debug!(target: TRACING_TARGET, index, enable, "Row toggled");
        notify_result(self.notifier, &notification, &result);
        result.map(|_| ())
    }
}

/// Shows the actions a caller with the given capabilities has on a row.
pub async fn show(args: &ActionsArgs, service: &IntegrationsService) -> anyhow::Result<()> {
    let integration = service.get_integration(args.id).await?;

    let mut flags = StaticFlags::new();
    if args.test_flag {
        flags = flags.with_flag(TEST_ACTION_FLAG);
    }
    let resolver = ActionResolver::new(Capabilities::new(args.can_read, args.can_write), &flags);

    for action in resolver.resolve(&integration, 0) {
        tracing::info!(
            target: TRACING_TARGET,
            action = action.title(),
            disabled = action.is_disabled,
            "action"
        );
    }

    Ok(())
}

/// Resolves and invokes one action on the integration `id`.
pub async fn run(
    kind: ActionKind,
    id: Uuid,
    service: &IntegrationsService,
    notifier: &ConsoleNotifier,
) -> anyhow::Result<()> {
    let integration = service.get_integration(id).await?;
    let resolver = ActionResolver::new(Capabilities::new(true, true), &StaticFlags::new())
        .with_test_action(kind == ActionKind::Test);

    let actions = resolver.resolve(&integration, 0);
    let action = actions
        .iter()
        .find(|action| action.kind == kind)
        .ok_or_else(|| unavailable(kind, &integration))?;

    let handler = ServiceActions { service, notifier };
    action.invoke(&handler).await?;
    Ok(())
}

fn unavailable(kind: ActionKind, integration: &Integration) -> Error {
    let reason = match kind {
        ActionKind::Enable => "is already enabled",
        ActionKind::Disable => "is already disabled",
        _ => "does not offer this action",
    };

    Error::invalid_input().with_message(format!(
        "cannot {} integration {}: it {reason}",
        kind.as_ref().to_lowercase(),
        integration.name
    ))
}

#[cfg(test)]
mod tests {
    use beacon_core::ErrorKind;
    use beacon_core::api::mock::MockIntegrations;
    use beacon_core::notify::ApiProblem;
    use beacon_core::types::{
        BehaviorGroup, HttpProperties, IntegrationProperties, NewIntegration,
    };

    use super::*;

    async fn setup() -> (MockIntegrations, IntegrationsService, Integration) {
        let mock = MockIntegrations::new();
        let service = IntegrationsService::new(mock.clone());
        let url = "https://hooks.example.com/ops".parse().unwrap();
        let new = NewIntegration::new("ops", IntegrationProperties::Webhook(HttpProperties::new(url)));
        let created = service.create_integration(&new).await.unwrap();
        (mock, service, created)
    }

    #[tokio::test]
    async fn test_disable_then_enable() {
        let (_, service, created) = setup().await;
        let notifier = ConsoleNotifier::new();
        assert!(created.is_enabled);

        run(ActionKind::Disable, created.id, &service, &notifier).await.unwrap();
        assert!(!service.get_integration(created.id).await.unwrap().is_enabled);

        let error = run(ActionKind::Disable, created.id, &service, &notifier)
            .await
            .unwrap_err();
        assert!(error.to_string().contains("already disabled"));

        run(ActionKind::Enable, created.id, &service, &notifier).await.unwrap();
        assert!(service.get_integration(created.id).await.unwrap().is_enabled);
        assert!(notifier.last_danger().is_none());
    }

    #[tokio::test]
    async fn test_test_action_reaches_transport() {
        let (mock, service, created) = setup().await;
        let notifier = ConsoleNotifier::new();

        run(ActionKind::Test, created.id, &service, &notifier).await.unwrap();
        assert_eq!(mock.tested().await, vec![created.id]);
    }

    #[tokio::test]
    async fn test_failed_test_action_notifies_danger() {
        let (mock, service, created) = setup().await;
        let notifier = ConsoleNotifier::new();
        let handler = ServiceActions {
            service: &service,
            notifier: &notifier,
        };

        mock.fail_next(ApiProblem::new("Endpoint is locked")).await;
        let error = handler.on_test(&created).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Transport);
        assert_eq!(
            notifier.last_danger().as_deref(),
            Some("Failed to send test notification")
        );
        assert!(mock.tested().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_with_affected_groups() {
        let (mock, service, created) = setup().await;
        let notifier = ConsoleNotifier::new();
        let group = BehaviorGroup {
            id: Uuid::now_v7(),
            display_name: "Ops alerts".into(),
            bundle_id: None,
        };
        mock.set_behavior_groups(created.id, vec![group]).await;

        run(ActionKind::Delete, created.id, &service, &notifier).await.unwrap();
        assert!(mock.endpoints().await.is_empty());
        assert!(notifier.ensure_no_danger().is_ok());
    }

    #[tokio::test]
    async fn test_edit_prints_document() {
        let (_, service, created) = setup().await;
        let notifier = ConsoleNotifier::new();
        let handler = ServiceActions {
            service: &service,
            notifier: &notifier,
        };

        let resolver = ActionResolver::new(Capabilities::new(true, true), &StaticFlags::new());
        let actions = resolver.resolve(&created, 0);
        assert_eq!(actions[0].kind, ActionKind::Edit);
        actions[0].invoke(&handler).await.unwrap();
    }
}
