//! Structured error handling for integration operations.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

use crate::notify::ApiProblem;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur in integration operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The server rejected a create or update with field-level violations.
    Validation,
    /// Network or server failure without structured violations.
    Transport,
    /// A type tag outside the closed (or user-facing) enumeration.
    UnsupportedType,
    /// Client-side input validation failed.
    InvalidInput,
    /// Resource not found.
    NotFound,
    /// Timeout occurred.
    Timeout,
    /// Serialization/deserialization error.
    Serialization,
    /// Configuration error.
    Configuration,
    /// Unknown error occurred.
    #[default]
    Unknown,
}

/// Structured error type with classification and an optional server problem.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}]{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Primary error message.
    pub message: Option<String>,
    /// Structured problem reported by the server, if any.
    pub problem: Option<ApiProblem>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            problem: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self::new(kind).with_source(source)
    }

    /// Creates an error from a server problem document.
    ///
    /// Problems carrying violations are classified as [`ErrorKind::Validation`],
    /// everything else as [`ErrorKind::Transport`].
    pub fn from_problem(problem: ApiProblem) -> Self {
        let kind = if problem.violations.is_empty() {
            ErrorKind::Transport
        } else {
            ErrorKind::Validation
        };

        Self {
            kind,
            message: problem.title.clone(),
            problem: Some(problem),
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attaches a server problem document.
    pub fn with_problem(mut self, problem: ApiProblem) -> Self {
        self.problem = Some(problem);
        self
    }

    /// Creates a new transport error.
    pub fn transport() -> Self {
        Self::new(ErrorKind::Transport)
    }

    /// Creates a new unsupported type error.
    pub fn unsupported_type() -> Self {
        Self::new(ErrorKind::UnsupportedType)
    }

    /// Creates a new invalid input error.
    pub fn invalid_input() -> Self {
        Self::new(ErrorKind::InvalidInput)
    }

    /// Creates a new not found error.
    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Returns the problem to display for this error.
    ///
    /// Errors without a server problem fall back to their message as the title
    /// and an empty violation list.
    pub fn to_problem(&self) -> ApiProblem {
        match &self.problem {
            Some(problem) => problem.clone(),
            None => ApiProblem {
                title: self.message.clone(),
                violations: Vec::new(),
            },
        }
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::Serialization, error).with_message("Invalid JSON document")
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::invalid_input()
            .with_message(errors.to_string())
            .with_source(errors)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::notify::Violation;

    #[test]
    fn test_error_new() {
        let error = Error::new(ErrorKind::Unknown);
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert!(error.message.is_none());
        assert!(error.problem.is_none());
        assert!(error.source.is_none());
    }

    #[test]
    fn test_error_display() {
        let error = Error::transport().with_message("connection reset");

        let display_str = error.to_string();
        assert!(display_str.contains("transport"));
        assert!(display_str.contains("connection reset"));
    }

    #[test]
    fn test_from_problem_with_violations_is_validation() {
        let problem =
            ApiProblem::new("Bad request").with_violation(Violation::new("name", "too long"));
        let error = Error::from_problem(problem);

        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.message.as_deref(), Some("Bad request"));
    }

    #[test]
    fn test_from_problem_without_violations_is_transport() {
        let error = Error::from_problem(ApiProblem::new("Server error"));
        assert_eq!(error.kind, ErrorKind::Transport);
    }

    #[test]
    fn test_to_problem_falls_back_to_message() {
        let error = Error::timeout().with_message("Request timed out");
        let problem = error.to_problem();

        assert_eq!(problem.title.as_deref(), Some("Request timed out"));
        assert!(problem.violations.is_empty());
    }

    #[test]
    fn test_from_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::from(json_error);

        assert_eq!(error.kind, ErrorKind::Serialization);
        assert!(error.source.is_some());
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            ErrorKind::from_str("unsupported_type").unwrap(),
            ErrorKind::UnsupportedType
        );
        assert_eq!(ErrorKind::from_str("validation").unwrap(), ErrorKind::Validation);
        assert!(ErrorKind::from_str("invalid").is_err());
    }

    #[test]
    fn test_default() {
        assert_eq!(ErrorKind::default(), ErrorKind::Unknown);
    }
}
