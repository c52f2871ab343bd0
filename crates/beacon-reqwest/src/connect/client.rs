//! Reqwest-based HTTP client for the integrations API.

use std::sync::Arc;

use beacon_core::api::IntegrationsService;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use super::ReqwestConfig;
use crate::error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "beacon_reqwest::client";

/// Header carrying the caller identity.
pub const IDENTITY_HEADER: &str = "x-rh-identity";

/// Path of the integrations API, relative to the base URL.
const INTEGRATIONS_PATH: [&str; 3] = ["api", "integrations", "v1.0"];

/// Path of the notifications API, relative to the base URL.
const NOTIFICATIONS_PATH: [&str; 3] = ["api", "notifications", "v1.0"];

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-based HTTP client for the integrations API.
///
/// This client implements the [`IntegrationsProvider`] trait.
///
/// # Examples
///
/// ```rust,ignore
/// use beacon_reqwest::{ReqwestClient, ReqwestConfig};
///
/// let client = ReqwestClient::new(ReqwestConfig::default())?;
/// let service = client.into_service();
/// let page = service.list_integrations(&request).await?;
/// ```
///
/// [`IntegrationsProvider`]: beacon_core::api::IntegrationsProvider
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("has_identity", &self.inner.config.identity.is_some())
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        config.validate()?;

        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()?;

        let inner = ReqwestClientInner { http, config };
        let client = Self {
            inner: Arc::new(inner),
        };

        tracing::info!(
            target: TRACING_TARGET,
            "Reqwest client created successfully"
        );

        Ok(client)
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into an [`IntegrationsService`] for use with
    /// dependency injection.
    pub fn into_service(self) -> IntegrationsService {
        IntegrationsService::new(self)
    }

    fn url(&self, prefix: &[&str], segments: &[&str]) -> Result<Url> {
        let mut url = self.inner.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config("base url cannot be a base".into()))?
            .pop_if_empty()
            .extend(prefix)
            .extend(segments);
        Ok(url)
    }

    /// Returns an integrations API URL under `endpoints`.
    pub(crate) fn endpoints_url(&self, segments: &[&str]) -> Result<Url> {
        let mut path = vec!["endpoints"];
        path.extend_from_slice(segments);
        self.url(&INTEGRATIONS_PATH, &path)
    }

    /// Returns a notifications API URL.
    pub(crate) fn notifications_url(&self, segments: &[&str]) -> Result<Url> {
        self.url(&NOTIFICATIONS_PATH, segments)
    }

    /// Sends a request, attaching the identity header and turning
    /// non-success statuses into errors.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.inner.config.identity {
            Some(identity) => request.header(IDENTITY_HEADER, identity),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(
            target: TRACING_TARGET,
            status = status.as_u16(),
            body_len = body.len(),
            "Request rejected by server"
        );

        Err(Error::from_response(status, &body))
    }
}
