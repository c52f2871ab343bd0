//! Row actions of the integrations list.
//!
//! [`ActionResolver`] computes the ordered actions available for one row from
//! the caller's capabilities and the test action flag. Resolution has no side
//! effects; invoking an action hands its own row and index to an
//! [`ActionHandler`].

use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};

use crate::flags::{FeatureFlags, TEST_ACTION_FLAG};
use crate::types::{Integration, UserIntegration};
use crate::{Error, Result};

/// Tracing target for row actions.
pub const TRACING_TARGET: &str = "beacon_core::actions";

/// Read and write capabilities of the current caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    pub can_read: bool,
    pub can_write: bool,
}

impl Capabilities {
    /// Returns new capabilities.
    #[inline]
    pub fn new(can_read: bool, can_write: bool) -> Self {
        Self {
            can_read,
            can_write,
        }
    }
}

/// Kind of a row action; displays as its menu label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumIter, IntoStaticStr)]
pub enum ActionKind {
    Edit,
    Test,
    Delete,
    Enable,
    Disable,
}

/// A row an action can be resolved for.
pub trait ActionRow: Send + Sync {
    /// Returns whether the row is currently enabled.
    fn is_enabled(&self) -> bool;
}

impl ActionRow for Integration {
    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

impl ActionRow for UserIntegration {
    fn is_enabled(&self) -> bool {
        self.is_enabled
    }
}

/// Caller-supplied handlers invoked by row actions.
#[async_trait::async_trait]
pub trait ActionHandler<R: ActionRow>: Send + Sync {
    /// Opens the row for editing.
    async fn on_edit(&self, row: &R) -> Result<()>;

    /// Sends a test notification through the row.
    async fn on_test(&self, row: &R) -> Result<()>;

    /// Deletes the row.
    async fn on_delete(&self, row: &R) -> Result<()>;

    /// Enables or disables the row at `index`.
    async fn on_enable(&self, row: &R, index: usize, enable: bool) -> Result<()>;
}

/// An action available for one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAction<'a, R> {
    pub kind: ActionKind,
    pub is_disabled: bool,
    row: &'a R,
    index: usize,
}

impl<'a, R: ActionRow> RowAction<'a, R> {
    /// Returns the menu label.
    #[inline]
    pub fn title(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns the row this action was resolved for.
    #[inline]
    pub fn row(&self) -> &'a R {
        self.row
    }

    /// Returns the index of the row this action was resolved for.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Runs the action through `handler`.
    ///
    /// Disabled actions are rejected without calling the handler.
    pub async fn invoke(&self, handler: &dyn ActionHandler<R>) -> Result<()> {
        if self.is_disabled {
            return Err(Error::invalid_input()
                .with_message(format!("action '{}' is disabled", self.kind)));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            action = %self.kind,
            index = self.index,
            "Invoking row action"
        );

        match self.kind {
            ActionKind::Edit => handler.on_edit(self.row).await,
            ActionKind::Test => handler.on_test(self.row).await,
            ActionKind::Delete => handler.on_delete(self.row).await,
            ActionKind::Enable => handler.on_enable(self.row, self.index, true).await,
            ActionKind::Disable => handler.on_enable(self.row, self.index, false).await,
        }
    }
}

/// Resolves the ordered actions of a row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActionResolver {
    capabilities: Capabilities,
    test_action: bool,
}

impl ActionResolver {
    /// Creates a resolver, reading the test action flag from `flags`.
    pub fn new(capabilities: Capabilities, flags: &dyn FeatureFlags) -> Self {
        Self {
            capabilities,
            test_action: flags.is_enabled(TEST_ACTION_FLAG),
        }
    }

    /// Overrides whether the test action is offered.
    pub fn with_test_action(mut self, test_action: bool) -> Self {
        self.test_action = test_action;
        self
    }

    /// Returns the actions of the row at `index`, in menu order.
    ///
    /// Edit, Delete and Enable/Disable require write capability; Test is only
    /// offered when its flag is on and requires read capability.
    pub fn resolve<'a, R: ActionRow>(&self, row: &'a R, index: usize) -> Vec<RowAction<'a, R>> {
        let write_disabled = !self.capabilities.can_write;
        let action = |kind, is_disabled| RowAction {
            kind,
            is_disabled,
            row,
            index,
        };

        let mut actions = Vec::with_capacity(4);
        actions.push(action(ActionKind::Edit, write_disabled));
        if self.test_action {
            actions.push(action(ActionKind::Test, !self.capabilities.can_read));
        }
        actions.push(action(ActionKind::Delete, write_disabled));

        let toggle = if row.is_enabled() {
            ActionKind::Disable
        } else {
            ActionKind::Enable
        };
        actions.push(action(toggle, write_disabled));

        actions
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use url::Url;
    use uuid::Uuid;

    use super::*;
    use crate::flags::StaticFlags;
    use crate::types::{HttpProperties, IntegrationProperties};

    fn row(is_enabled: bool) -> Integration {
        Integration {
            id: Uuid::now_v7(),
            name: "hook".into(),
            is_enabled,
            status: None,
            server_errors: 0,
            properties: IntegrationProperties::Webhook(HttpProperties::new(
                Url::parse("https://example.com/hook").unwrap(),
            )),
        }
    }

    fn summary(actions: &[RowAction<'_, Integration>]) -> Vec<(&'static str, bool)> {
        actions.iter().map(|a| (a.title(), a.is_disabled)).collect()
    }

    #[derive(Default)]
    struct RecordingHandler {
        calls: Mutex<Vec<(ActionKind, Uuid, Option<(usize, bool)>)>>,
    }

    #[async_trait::async_trait]
    impl ActionHandler<Integration> for RecordingHandler {
        async fn on_edit(&self, row: &Integration) -> Result<()> {
            self.calls.lock().unwrap().push((ActionKind::Edit, row.id, None));
            Ok(())
        }

        async fn on_test(&self, row: &Integration) -> Result<()> {
            self.calls.lock().unwrap().push((ActionKind::Test, row.id, None));
            Ok(())
        }

        async fn on_delete(&self, row: &Integration) -> Result<()> {
            self.calls.lock().unwrap().push((ActionKind::Delete, row.id, None));
            Ok(())
        }

        async fn on_enable(&self, row: &Integration, index: usize, enable: bool) -> Result<()> {
            let kind = if enable {
                ActionKind::Enable
            } else {
                ActionKind::Disable
            };
            self.calls.lock().unwrap().push((kind, row.id, Some((index, enable))));
            Ok(())
        }
    }

    #[test]
    fn test_read_only_with_test_flag() {
        let flags = StaticFlags::new().with_flag(TEST_ACTION_FLAG);
        let resolver = ActionResolver::new(Capabilities::new(true, false), &flags);

        let row = row(true);
        let actions = resolver.resolve(&row, 0);
        assert_eq!(
            summary(&actions),
            vec![
                ("Edit", true),
                ("Test", false),
                ("Delete", true),
                ("Disable", true),
            ]
        );
    }

    #[test]
    fn test_flag_off_hides_test() {
        let resolver = ActionResolver::new(Capabilities::new(true, true), &StaticFlags::new());

        let row = row(false);
        let actions = resolver.resolve(&row, 3);
        assert_eq!(
            summary(&actions),
            vec![("Edit", false), ("Delete", false), ("Enable", false)]
        );
    }

    #[test]
    fn test_test_disabled_without_read() {
        let resolver = ActionResolver::default().with_test_action(true);

        let row = row(true);
        let actions = resolver.resolve(&row, 0);
        assert_eq!(actions[1].kind, ActionKind::Test);
        assert!(actions[1].is_disabled);
    }

    #[tokio::test]
    async fn test_invoke_passes_own_row_and_index() {
        let resolver = ActionResolver::new(Capabilities::new(true, true), &StaticFlags::new());
        let handler = RecordingHandler::default();

        let rows = [row(true), row(false)];
        let actions: Vec<_> = rows
            .iter()
            .enumerate()
            .map(|(index, row)| resolver.resolve(row, index))
            .collect();

        actions[1][2].invoke(&handler).await.unwrap();
        actions[0][2].invoke(&handler).await.unwrap();
        actions[1][1].invoke(&handler).await.unwrap();

        let calls = handler.calls.lock().unwrap();
        assert_eq!(calls[0], (ActionKind::Enable, rows[1].id, Some((1, true))));
        assert_eq!(calls[1], (ActionKind::Disable, rows[0].id, Some((0, false))));
        assert_eq!(calls[2], (ActionKind::Delete, rows[1].id, None));
    }

    #[tokio::test]
    async fn test_disabled_action_is_not_invoked() {
        let resolver = ActionResolver::new(Capabilities::new(true, false), &StaticFlags::new());
        let handler = RecordingHandler::default();

        let row = row(true);
        let actions = resolver.resolve(&row, 0);
        assert!(actions[0].invoke(&handler).await.is_err());
        assert!(handler.calls.lock().unwrap().is_empty());
    }
}
