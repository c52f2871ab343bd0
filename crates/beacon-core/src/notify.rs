//! User-facing notifications and server problem formatting.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

use crate::{Error, ErrorKind, Result};

/// Tracing target for notification delivery.
pub const TRACING_TARGET: &str = "beacon_core::notify";

/// A single field-level violation reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Problem document returned by the integrations API on failure.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProblem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl ApiProblem {
    /// Creates a problem with the given title and no violations.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            violations: Vec::new(),
        }
    }

    /// Appends a violation.
    pub fn with_violation(mut self, violation: Violation) -> Self {
        self.violations.push(violation);
        self
    }
}

/// Renders a problem as `"<title>[ - field: message; field: message...]"`.
///
/// The separator and suffix are omitted entirely when there are no
/// violations.
pub fn format_error(problem: &ApiProblem) -> String {
    let title = problem.title.as_deref().unwrap_or_default();
    if problem.violations.is_empty() {
        return title.to_owned();
    }

    let violations = problem
        .violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    format!("{title} - {violations}")
}

/// Display collaborator for success and danger notifications.
pub trait Notifier: Send + Sync {
    /// Shows a success notification.
    fn add_success_notification(&self, title: &str, body: &str);

    /// Shows a danger notification.
    fn add_danger_notification(&self, title: &str, body: &str);
}

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum NotificationVariant {
    Success,
    Danger,
}

/// A notification derived from the outcome of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub title: String,
    pub body: String,
    pub created_at: Timestamp,
}

impl Notification {
    /// Creates a success notification.
    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Success,
            title: title.into(),
            body: body.into(),
            created_at: Timestamp::now(),
        }
    }

    /// Creates a danger notification.
    pub fn danger(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Danger,
            title: title.into(),
            body: body.into(),
            created_at: Timestamp::now(),
        }
    }

    /// Creates a danger notification whose body is the formatted error.
    pub fn from_error(title: impl Into<String>, error: &Error) -> Self {
        Self::danger(title, format_error(&error.to_problem()))
    }

    /// Maps the outcome of creating an integration named `name`.
    pub fn create_result<T>(name: &str, result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::success(
                "Integration created",
                format!("The integration {}was created successfully.", name_prefix(name)),
            ),
            Err(error) => Self::from_error("Failed to create integration", error),
        }
    }

    /// Maps the outcome of updating an integration named `name`.
    pub fn update_result<T>(name: &str, result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::success(
                "Integration updated",
                format!("The integration {}was updated successfully.", name_prefix(name)),
            ),
            Err(error) => Self::from_error("Failed to update integration", error),
        }
    }

    /// Returns whether this is a danger notification.
    #[inline]
    pub fn is_danger(&self) -> bool {
        self.variant == NotificationVariant::Danger
    }

    /// Hands this notification to the display collaborator.
    pub fn send(&self, notifier: &dyn Notifier) {
        match self.variant {
            NotificationVariant::Success => {
                notifier.add_success_notification(&self.title, &self.body);
            }
            NotificationVariant::Danger => {
                notifier.add_danger_notification(&self.title, &self.body);
            }
        }
    }
}

fn name_prefix(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!("{name} ")
    }
}

/// Sends the notification for a submission outcome and logs transport failures.
pub fn notify_result<T>(notifier: &dyn Notifier, notification: &Notification, result: &Result<T>) {
    if let Err(error) = result
        && error.kind != ErrorKind::Validation
    {
        tracing::error!(
            target: TRACING_TARGET,
            kind = %error.kind,
            error = %error,
            title = %notification.title,
            "Integration submission failed"
        );
    }

    notification.send(notifier);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(NotificationVariant, String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn add_success_notification(&self, title: &str, body: &str) {
            let mut sent = self.sent.lock().unwrap();
            sent.push((NotificationVariant::Success, title.into(), body.into()));
        }

        fn add_danger_notification(&self, title: &str, body: &str) {
            let mut sent = self.sent.lock().unwrap();
            sent.push((NotificationVariant::Danger, title.into(), body.into()));
        }
    }

    #[test]
    fn test_format_error_with_violations() {
        let problem = ApiProblem::new("Bad request").with_violation(Violation::new("name", "too long"));
        assert_eq!(format_error(&problem), "Bad request - name: too long");
    }

    #[test]
    fn test_format_error_joins_violations() {
        let problem = ApiProblem::new("Bad request")
            .with_violation(Violation::new("name", "too long"))
            .with_violation(Violation::new("url", "must be https"));
        assert_eq!(
            format_error(&problem),
            "Bad request - name: too long; url: must be https"
        );
    }

    #[test]
    fn test_format_error_without_violations() {
        assert_eq!(format_error(&ApiProblem::new("Server error")), "Server error");
        assert_eq!(format_error(&ApiProblem::default()), "");
    }

    #[test]
    fn test_problem_deserializes_without_violations() {
        let problem: ApiProblem = serde_json::from_str(r#"{"title":"Server error"}"#).unwrap();
        assert_eq!(problem, ApiProblem::new("Server error"));
    }

    #[test]
    fn test_create_result_notifications() {
        let ok: Result<()> = Ok(());
        let notification = Notification::create_result("Ops", &ok);
        assert_eq!(notification.title, "Integration created");
        assert_eq!(notification.body, "The integration Ops was created successfully.");

        let unnamed = Notification::create_result("", &ok);
        assert_eq!(unnamed.body, "The integration was created successfully.");

        let failed: Result<()> = Err(Error::from_problem(
            ApiProblem::new("Bad request").with_violation(Violation::new("name", "too long")),
        ));
        let notification = Notification::create_result("Ops", &failed);
        assert!(notification.is_danger());
        assert_eq!(notification.title, "Failed to create integration");
        assert_eq!(notification.body, "Bad request - name: too long");
    }

    #[test]
    fn test_update_result_notifications() {
        let ok: Result<()> = Ok(());
        let notification = Notification::update_result("Ops", &ok);
        assert_eq!(notification.title, "Integration updated");
        assert_eq!(notification.body, "The integration Ops was updated successfully.");

        let failed: Result<()> = Err(Error::transport().with_message("connection reset"));
        let notification = Notification::update_result("Ops", &failed);
        assert_eq!(notification.title, "Failed to update integration");
        assert_eq!(notification.body, "connection reset");
    }

    #[test]
    fn test_notify_result_routes_by_variant() {
        let notifier = RecordingNotifier::default();
        let failed: Result<()> = Err(Error::transport());
        let notification = Notification::create_result("Ops", &failed);
        notify_result(&notifier, &notification, &failed);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, NotificationVariant::Danger);
        assert_eq!(sent[0].1, "Failed to create integration");
    }
}
