//! Integrations transport abstraction.

use std::collections::BTreeMap;
use std::time::Duration;

use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
mod service;

pub use service::{IntegrationPage, IntegrationsService};

use crate::Result;
use crate::query::GetIntegrationsRequest;
use crate::types::{BehaviorGroup, Endpoint, EndpointPage};

/// Tracing target for integrations API operations.
pub const TRACING_TARGET: &str = "beacon_core::api";

/// Per-request overrides passed to the transport.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Overrides the transport's request timeout.
    pub timeout: Option<Duration>,
    /// Additional headers sent with the request.
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    /// Creates empty request options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Core trait for the integrations transport.
///
/// Implementations speak the server's endpoint wire format. Errors carry the
/// server's problem document when one was returned.
#[async_trait::async_trait]
pub trait IntegrationsProvider: Send + Sync {
    /// Creates an endpoint and returns it as stored.
    async fn create_endpoint(&self, endpoint: &Endpoint) -> Result<Endpoint>;

    /// Replaces the endpoint with the given id.
    async fn update_endpoint(
        &self,
        id: Uuid,
        endpoint: &Endpoint,
        options: &RequestOptions,
    ) -> Result<()>;

    /// Lists one page of endpoints.
    async fn get_integrations(&self, request: &GetIntegrationsRequest) -> Result<EndpointPage>;

    /// Fetches a single endpoint.
    async fn get_endpoint(&self, id: Uuid) -> Result<Endpoint>;

    /// Deletes an endpoint.
    async fn delete_endpoint(&self, id: Uuid) -> Result<()>;

    /// Enables an endpoint.
    async fn enable_endpoint(&self, id: Uuid) -> Result<()>;

    /// Disables an endpoint.
    async fn disable_endpoint(&self, id: Uuid) -> Result<()>;

    /// Sends a test notification through an endpoint.
    async fn test_endpoint(&self, id: Uuid) -> Result<()>;

    /// Lists the behavior groups that would be affected by deleting an endpoint.
    async fn get_behavior_groups_affected_by_removal(&self, id: Uuid)
    -> Result<Vec<BehaviorGroup>>;
}
