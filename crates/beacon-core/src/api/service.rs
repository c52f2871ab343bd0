//! Integrations service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use super::{IntegrationsProvider, RequestOptions, TRACING_TARGET};
use crate::Result;
use crate::query::GetIntegrationsRequest;
use crate::types::{
    BehaviorGroup, Endpoint, Integration, NewIntegration, TypedIntegration, UserIntegration,
    is_user_integration_type,
};

/// One page of user integrations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IntegrationPage {
    /// Integrations of user-facing types, in server order.
    pub integrations: Vec<UserIntegration>,
    /// Total number of endpoints matching the request, as reported by the
    /// server.
    ///
    /// This includes records that are excluded from `integrations`, so page
    /// arithmetic based on it matches the server's offsets rather than the
    /// number of user integrations.
    pub count: u64,
    /// Records on this page excluded because their type is not user-facing
    /// or could not be decoded.
    pub skipped: usize,
    /// Records of `skipped` that have a user-facing type but could not be
    /// decoded.
    pub invalid: usize,
}

/// Integrations service wrapper with observability.
///
/// Converts between the typed model and the wire format and adds structured
/// logging to any transport. The inner provider is wrapped in `Arc` for
/// cheap cloning.
#[derive(Clone)]
pub struct IntegrationsService {
    inner: Arc<dyn IntegrationsProvider>,
}

impl fmt::Debug for IntegrationsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationsService").finish_non_exhaustive()
    }
}

impl IntegrationsService {
    /// Create a new integrations service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: IntegrationsProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Creates a service over an already shared provider.
    pub fn from_shared(provider: Arc<dyn IntegrationsProvider>) -> Self {
        Self { inner: provider }
    }

    /// Validates and submits a new integration.
    ///
    /// Nothing is sent when client-side validation fails.
    pub async fn create_integration(&self, integration: &NewIntegration) -> Result<Integration> {
        integration.check()?;
        let endpoint = Endpoint::try_from(integration)?;
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            name = %integration.name,
            integration_type = %integration.integration_type(),
            "Creating integration"
        );

        let result = self
            .inner
            .create_endpoint(&endpoint)
            .await
            .and_then(Integration::try_from);

        match &result {
            Ok(created) => tracing::info!(
                target: TRACING_TARGET,
                integration_id = %created.id,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Integration created"
            ),
            Err(error) => tracing::warn!(
                target: TRACING_TARGET,
                kind = %error.kind,
                error = %error,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Failed to create integration"
            ),
        }

        result
    }

    /// Validates and submits a replacement for the integration `id`.
    pub async fn update_integration(
        &self,
        id: Uuid,
        integration: &NewIntegration,
        options: &RequestOptions,
    ) -> Result<()> {
        integration.check()?;
        let endpoint = Endpoint::try_from(integration)?;
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            integration_id = %id,
            name = %integration.name,
            has_timeout = options.timeout.is_some(),
            "Updating integration"
        );

        let result = self.inner.update_endpoint(id, &endpoint, options).await;

        match &result {
            Ok(()) => tracing::info!(
                target: TRACING_TARGET,
                integration_id = %id,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Integration updated"
            ),
            Err(error) => tracing::warn!(
                target: TRACING_TARGET,
                integration_id = %id,
                kind = %error.kind,
                error = %error,
                elapsed_ms = started_at.elapsed().as_millis(),
                "Failed to update integration"
            ),
        }

        result
    }

    /// Lists one page of user integrations.
    ///
    /// Records whose type is outside the user allow-list are excluded.
    /// Records of a user type that fail to decode are excluded with a warning.
    pub async fn list_integrations(&self, request: &GetIntegrationsRequest) -> Result<IntegrationPage> {
        let started_at = Instant::now();
        let page = self.inner.get_integrations(request).await?;

        let mut integrations = Vec::with_capacity(page.data.len());
        let mut skipped = 0;
        let mut invalid = 0;
        for endpoint in page.data {
            let name = endpoint.name.clone();
            let is_user_type = is_user_integration_type(endpoint.type_tag().as_ref());
            match Integration::try_from(endpoint).and_then(UserIntegration::try_from) {
                Ok(integration) => integrations.push(integration),
                Err(error) if is_user_type => {
                    skipped += 1;
                    invalid += 1;
                    tracing::warn!(
                        target: TRACING_TARGET,
                        name = %name,
                        kind = %error.kind,
                        error = %error,
                        "Dropping user integration that could not be decoded"
                    );
                }
                Err(error) => {
                    skipped += 1;
                    tracing::debug!(
                        target: TRACING_TARGET,
                        name = %name,
                        error = %error,
                        "Excluding endpoint from user integrations"
                    );
                }
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            offset = request.offset,
            limit = request.limit,
            returned = integrations.len(),
            skipped = skipped,
            invalid = invalid,
            count = page.meta.count,
            elapsed_ms = started_at.elapsed().as_millis(),
            "Integrations listed"
        );

        Ok(IntegrationPage {
            integrations,
            count: page.meta.count,
            skipped,
            invalid,
        })
    }

    /// Fetches a single integration.
    pub async fn get_integration(&self, id: Uuid) -> Result<Integration> {
        let endpoint = self.inner.get_endpoint(id).await?;
        Integration::try_from(endpoint)
    }

    /// Enables or disables an integration and returns its updated copy.
    ///
    /// The given integration is left untouched on failure.
    pub async fn set_enabled(&self, integration: &Integration, enabled: bool) -> Result<Integration> {
        tracing::debug!(
            target: TRACING_TARGET,
            integration_id = %integration.id,
            enabled = enabled,
            "Toggling integration"
        );

        let result = if enabled {
            self.inner.enable_endpoint(integration.id).await
        } else {
            self.inner.disable_endpoint(integration.id).await
        };

        if let Err(error) = &result {
            tracing::warn!(
                target: TRACING_TARGET,
                integration_id = %integration.id,
                error = %error,
                "Failed to toggle integration"
            );
        }

        result.map(|()| integration.with_enabled(enabled))
    }

    /// Deletes an integration.
    pub async fn delete_integration(&self, id: Uuid) -> Result<()> {
        tracing::debug!(target: TRACING_TARGET, integration_id = %id, "Deleting integration");
        self.inner.delete_endpoint(id).await
    }

    /// Sends a test notification through an integration.
    pub async fn test_integration(&self, id: Uuid) -> Result<()> {
        tracing::debug!(target: TRACING_TARGET, integration_id = %id, "Testing integration");
        self.inner.test_endpoint(id).await
    }

    /// Lists the behavior groups that reference an integration.
    pub async fn affected_behavior_groups(&self, id: Uuid) -> Result<Vec<BehaviorGroup>> {
        let groups = self.inner.get_behavior_groups_affected_by_removal(id).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            integration_id = %id,
            groups = groups.len(),
            "Affected behavior groups fetched"
        );

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::ErrorKind;
    use crate::api::mock::MockIntegrations;
    use crate::filter::Filters;
    use crate::notify::{ApiProblem, Violation};
    use crate::query::{Pagination, build_list_request};
    use crate::types::{
        CamelProperties, CamelSubtype, HttpProperties, IntegrationProperties, SystemProperties,
    };

    fn webhook(name: &str) -> NewIntegration {
        NewIntegration::new(
            name,
            IntegrationProperties::Webhook(HttpProperties::new(
                Url::parse("https://example.com/hook").unwrap(),
            )),
        )
        .with_enabled(true)
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let mock = MockIntegrations::new();
        let service = IntegrationsService::new(mock.clone());

        let created = service.create_integration(&webhook("first")).await.unwrap();
        assert_eq!(created.name, "first");

        let slack = NewIntegration::new(
            "chat",
            IntegrationProperties::Camel(CamelProperties::new(
                CamelSubtype::Slack,
                Url::parse("https://hooks.slack.com/x").unwrap(),
            )),
        );
        service.create_integration(&slack).await.unwrap();

        let request = build_list_request(&Filters::new(), &Pagination::default(), None, None);
        let page = service.list_integrations(&request).await.unwrap();
        assert_eq!(page.count, 2);
        assert_eq!(page.integrations.len(), 2);
        assert_eq!(page.skipped, 0);
    }

    #[tokio::test]
    async fn test_list_excludes_system_types() {
        let mock = MockIntegrations::new();
        let service = IntegrationsService::new(mock.clone());

        let drawer = NewIntegration::new(
            "drawer",
            IntegrationProperties::Drawer(SystemProperties::default()),
        );
        service.create_integration(&drawer).await.unwrap();
        service.create_integration(&webhook("hook")).await.unwrap();

        let request = build_list_request(&Filters::new(), &Pagination::default(), None, None);
        let page = service.list_integrations(&request).await.unwrap();
        assert_eq!(page.integrations.len(), 1);
        assert_eq!(page.skipped, 1);
        assert_eq!(page.invalid, 0);
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn test_list_counts_undecodable_user_records() {
        let mock = MockIntegrations::new();
        let service = IntegrationsService::new(mock.clone());

        let broken = Endpoint {
            name: "broken".into(),
            endpoint_type: "webhook".into(),
            enabled: Some(true),
            ..Default::default()
        };
        mock.create_endpoint(&broken).await.unwrap();
        service.create_integration(&webhook("hook")).await.unwrap();

        let request = build_list_request(&Filters::new(), &Pagination::default(), None, None);
        let page = service.list_integrations(&request).await.unwrap();
        assert_eq!(page.integrations.len(), 1);
        assert_eq!(page.integrations[0].name, "hook");
        assert_eq!(page.skipped, 1);
        assert_eq!(page.invalid, 1);
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn test_invalid_integration_is_not_sent() {
        let mock = MockIntegrations::new();
        let service = IntegrationsService::new(mock.clone());

        let error = service.create_integration(&webhook("")).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidInput);
        assert!(mock.endpoints().await.is_empty());
    }

    #[tokio::test]
    async fn test_server_rejection_surfaces_problem() {
        let mock = MockIntegrations::new();
        mock.fail_next(ApiProblem::new("Bad request").with_violation(Violation::new("name", "taken")))
            .await;
        let service = IntegrationsService::new(mock.clone());

        let error = service.create_integration(&webhook("dup")).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Validation);
        assert_eq!(error.problem.as_ref().map(|p| p.violations.len()), Some(1));
        assert!(mock.endpoints().await.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_keeps_original_on_failure() {
        let mock = MockIntegrations::new();
        let service = IntegrationsService::new(mock.clone());

        let created = service.create_integration(&webhook("hook")).await.unwrap();
        let disabled = service.set_enabled(&created, false).await.unwrap();
        assert!(!disabled.is_enabled);
        assert!(created.is_enabled);

        mock.fail_next(ApiProblem::new("Server error")).await;
        let error = service.set_enabled(&disabled, true).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::Transport);

        let stored = service.get_integration(created.id).await.unwrap();
        assert!(!stored.is_enabled);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let mock = MockIntegrations::new();
        let service = IntegrationsService::new(mock.clone());

        let created = service.create_integration(&webhook("hook")).await.unwrap();
        let mut renamed = NewIntegration::from(created.clone());
        renamed.name = "renamed".into();
        service
            .update_integration(created.id, &renamed, &RequestOptions::new())
            .await
            .unwrap();
        assert_eq!(service.get_integration(created.id).await.unwrap().name, "renamed");

        assert!(service.affected_behavior_groups(created.id).await.unwrap().is_empty());
        service.test_integration(created.id).await.unwrap();
        service.delete_integration(created.id).await.unwrap();

        let error = service.get_integration(created.id).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::NotFound);
    }
}
