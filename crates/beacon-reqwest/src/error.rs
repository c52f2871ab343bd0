//! Internal error types for beacon-reqwest.

use beacon_core::notify::ApiProblem;
use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for beacon-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for beacon-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
    /// The server answered with a non-success status.
    #[error("Server responded with {status}")]
    Status {
        status: StatusCode,
        problem: Option<ApiProblem>,
    },
}

impl Error {
    /// Builds a status error from a response body.
    ///
    /// JSON problem documents are decoded; any other non-empty body becomes the
    /// problem title.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        let problem = serde_json::from_str::<ApiProblem>(body)
            .ok()
            .filter(|problem| problem.title.is_some() || !problem.violations.is_empty())
            .or_else(|| {
                let text = body.trim();
                (!text.is_empty()).then(|| ApiProblem::new(text.chars().take(1024).collect::<String>()))
            });

        Self::Status { status, problem }
    }
}

impl From<Error> for beacon_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    beacon_core::Error::timeout()
                        .with_message("Request timed out")
                        .with_source(e)
                } else if e.is_connect() {
                    beacon_core::Error::transport()
                        .with_message("Connection failed")
                        .with_source(e)
                } else {
                    beacon_core::Error::transport()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => beacon_core::Error::from(e),
            Error::Config(message) => beacon_core::Error::configuration().with_message(message),
            Error::Status { status, problem } => {
                let fallback = status
                    .canonical_reason()
                    .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned);

                match problem {
                    _ if status == StatusCode::NOT_FOUND => beacon_core::Error::not_found()
                        .with_message(fallback),
                    Some(problem) => beacon_core::Error::from_problem(problem),
                    None => beacon_core::Error::transport().with_message(fallback),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use beacon_core::ErrorKind;

    use super::*;

    #[test]
    fn test_problem_body_with_violations() {
        let body = r#"{"title":"Constraint Violation","violations":[{"field":"name","message":"must not be blank"}]}"#;
        let error: beacon_core::Error = Error::from_response(StatusCode::BAD_REQUEST, body).into();

        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.message.as_deref(), Some("Constraint Violation"));
    }

    #[test]
    fn test_plain_text_body_becomes_title() {
        let error: beacon_core::Error =
            Error::from_response(StatusCode::INTERNAL_SERVER_ERROR, "boom\n").into();

        assert_eq!(error.kind, ErrorKind::Transport);
        assert_eq!(error.message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_empty_body_uses_reason() {
        let error: beacon_core::Error =
            Error::from_response(StatusCode::BAD_GATEWAY, "").into();

        assert_eq!(error.kind, ErrorKind::Transport);
        assert_eq!(error.message.as_deref(), Some("Bad Gateway"));
    }

    #[test]
    fn test_not_found() {
        let error: beacon_core::Error = Error::from_response(StatusCode::NOT_FOUND, "").into();
        assert_eq!(error.kind, ErrorKind::NotFound);
    }
}
