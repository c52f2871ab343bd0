//! Console notifications.

use std::sync::{Mutex, PoisonError};

use beacon_core::notify::{Notification, Notifier};

/// Tracing target for notifications shown to the user.
pub const TRACING_TARGET: &str = "beacon_cli::notify";

/// Writes notifications to the log and remembers the last danger title.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    last_danger: Mutex<Option<String>>,
}

impl ConsoleNotifier {
    /// Creates a new console notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the title of the most recent danger notification.
    pub fn last_danger(&self) -> Option<String> {
        self.last_danger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fails with the last danger title, if any was shown.
    pub fn ensure_no_danger(&self) -> anyhow::Result<()> {
        match self.last_danger() {
            Some(title) => Err(anyhow::anyhow!(title)),
            None => Ok(()),
        }
    }

    /// Sends `notification` through this notifier.
    pub fn show(&self, notification: &Notification) {
        notification.send(self);
    }
}

impl Notifier for ConsoleNotifier {
    fn add_success_notification(&self, title: &str, body: &str) {
        tracing::info!(target: TRACING_TARGET, title, body, "success");
    }

    fn add_danger_notification(&self, title: &str, body: &str) {
        tracing::warn!(target: TRACING_TARGET, title, body, "danger");
        *self.last_danger.lock().unwrap_or_else(PoisonError::into_inner) = Some(title.to_owned());
    }
}
