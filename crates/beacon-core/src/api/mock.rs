//! In-memory integrations transport for testing.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! beacon-core = { version = "...", features = ["test-utils"] }
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use jiff::Zoned;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{IntegrationsProvider, RequestOptions, TRACING_TARGET};
use crate::notify::ApiProblem;
use crate::query::{GetIntegrationsRequest, IntegrationSortBy, IntegrationSortField, SortOrder};
use crate::types::{BehaviorGroup, Endpoint, EndpointPage, EndpointStatus, PageMeta};
use crate::{Error, Result};

#[derive(Debug, Default)]
struct MockState {
    endpoints: BTreeMap<Uuid, Endpoint>,
    behavior_groups: BTreeMap<Uuid, Vec<BehaviorGroup>>,
    failures: VecDeque<ApiProblem>,
    tested: Vec<Uuid>,
}

impl MockState {
    fn fail_if_scheduled(&mut self) -> Result<()> {
        match self.failures.pop_front() {
            Some(problem) => Err(Error::from_problem(problem)),
            None => Ok(()),
        }
    }

    fn endpoint_mut(&mut self, id: Uuid) -> Result<&mut Endpoint> {
        self.endpoints
            .get_mut(&id)
            .ok_or_else(|| Error::not_found().with_message(format!("endpoint {id} not found")))
    }
}

/// In-memory [`IntegrationsProvider`].
///
/// Clones share the same store. Failures scheduled with
/// [`MockIntegrations::fail_next`] are returned by the next operations, in
/// order, without touching the store.
#[derive(Debug, Default, Clone)]
pub struct MockIntegrations {
    state: Arc<RwLock<MockState>>,
}

impl MockIntegrations {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next operation fail with `problem`.
    pub async fn fail_next(&self, problem: ApiProblem) {
        self.state.write().await.failures.push_back(problem);
    }

    /// Registers the behavior groups that reference an endpoint.
    pub async fn set_behavior_groups(&self, id: Uuid, groups: Vec<BehaviorGroup>) {
        self.state.write().await.behavior_groups.insert(id, groups);
    }

    /// Returns every stored endpoint.
    pub async fn endpoints(&self) -> Vec<Endpoint> {
        self.state.read().await.endpoints.values().cloned().collect()
    }

    /// Returns the ids of the endpoints tested so far, in order.
    pub async fn tested(&self) -> Vec<Uuid> {
        self.state.read().await.tested.clone()
    }

    fn matches(endpoint: &Endpoint, request: &GetIntegrationsRequest) -> bool {
        if let Some(active) = request.active
            && endpoint.enabled.unwrap_or(false) != active
        {
            return false;
        }

        if let Some(name) = &request.name
            && !endpoint.name.to_lowercase().contains(&name.to_lowercase())
        {
            return false;
        }

        request.types.is_empty()
            || endpoint
                .integration_type()
                .is_ok_and(|ty| request.types.contains(&ty))
    }

    fn sort(endpoints: &mut [Endpoint], sort_by: &str) {
        let Ok(sort) = sort_by.parse::<IntegrationSortBy>() else {
            return;
        };

        endpoints.sort_by(|a, b| {
            let ordering = match sort.field {
                IntegrationSortField::Name => a.name.cmp(&b.name),
                IntegrationSortField::Type => a
                    .integration_type()
                    .ok()
                    .cmp(&b.integration_type().ok()),
                IntegrationSortField::Enabled => a.enabled.cmp(&b.enabled),
                IntegrationSortField::Created => a.created.cmp(&b.created),
            };

            match sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

#[async_trait::async_trait]
impl IntegrationsProvider for MockIntegrations {
    async fn create_endpoint(&self, endpoint: &Endpoint) -> Result<Endpoint> {
        let mut state = self.state.write().await;
        state.fail_if_scheduled()?;

        let mut stored = endpoint.clone();
        let id = Uuid::now_v7();
        stored.id = Some(id);
        stored.status = Some(EndpointStatus::Ready);
        stored.server_errors = Some(0);
        stored.created = Some(Zoned::now().datetime());
        state.endpoints.insert(id, stored.clone());

        tracing::trace!(target: TRACING_TARGET, endpoint_id = %id, "Mock endpoint created");
        Ok(stored)
    }

    async fn update_endpoint(
        &self,
        id: Uuid,
        endpoint: &Endpoint,
        _options: &RequestOptions,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        state.fail_if_scheduled()?;

        let stored = state.endpoint_mut(id)?;
        let created = stored.created;
        *stored = endpoint.clone();
        stored.id = Some(id);
        stored.created = created;
        stored.updated = Some(Zoned::now().datetime());
        Ok(())
    }

    async fn get_integrations(&self, request: &GetIntegrationsRequest) -> Result<EndpointPage> {
        let mut state = self.state.write().await;
        state.fail_if_scheduled()?;

        let mut matching: Vec<Endpoint> = state
            .endpoints
            .values()
            .filter(|endpoint| Self::matches(endpoint, request))
            .cloned()
            .collect();
        Self::sort(&mut matching, &request.sort_by);

        let count = matching.len() as u64;
        let offset = usize::try_from(request.offset).unwrap_or(usize::MAX);
        let data = matching
            .into_iter()
            .skip(offset)
            .take(request.limit as usize)
            .collect();

        Ok(EndpointPage {
            data,
            links: BTreeMap::new(),
            meta: PageMeta { count },
        })
    }

    async fn get_endpoint(&self, id: Uuid) -> Result<Endpoint> {
        let mut state = self.state.write().await;
        state.fail_if_scheduled()?;
        state.endpoint_mut(id).map(|endpoint| endpoint.clone())
    }

    async fn delete_endpoint(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state.fail_if_scheduled()?;

        state
            .endpoints
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found().with_message(format!("endpoint {id} not found")))
    }

    async fn enable_endpoint(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state.fail_if_scheduled()?;
        state.endpoint_mut(id)?.enabled = Some(true);
        Ok(())
    }

    async fn disable_endpoint(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state.fail_if_scheduled()?;
        state.endpoint_mut(id)?.enabled = Some(false);
        Ok(())
    }

    async fn test_endpoint(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        state.fail_if_scheduled()?;
        state.endpoint_mut(id)?;
        state.tested.push(id);
        Ok(())
    }

    async fn get_behavior_groups_affected_by_removal(
        &self,
        id: Uuid,
    ) -> Result<Vec<BehaviorGroup>> {
        let mut state = self.state.write().await;
        state.fail_if_scheduled()?;
        state.endpoint_mut(id)?;
        Ok(state.behavior_groups.get(&id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::IntegrationSortBy;

    fn endpoint(name: &str, ty: &str, sub_type: Option<&str>, enabled: bool) -> Endpoint {
        Endpoint {
            name: name.into(),
            endpoint_type: ty.into(),
            sub_type: sub_type.map(str::to_owned),
            enabled: Some(enabled),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let mock = MockIntegrations::new();
        mock.create_endpoint(&endpoint("Alpha", "webhook", None, true)).await.unwrap();
        mock.create_endpoint(&endpoint("beta", "camel", Some("slack"), false)).await.unwrap();
        mock.create_endpoint(&endpoint("Gamma", "ansible", None, true)).await.unwrap();

        let request = GetIntegrationsRequest {
            limit: 10,
            active: Some(true),
            sort_by: IntegrationSortBy::desc(IntegrationSortField::Name).token(),
            ..Default::default()
        };
        let page = mock.get_integrations(&request).await.unwrap();
        let names: Vec<_> = page.data.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Alpha"]);
        assert_eq!(page.meta.count, 2);

        let request = GetIntegrationsRequest {
            limit: 1,
            offset: 1,
            ..Default::default()
        };
        let page = mock.get_integrations(&request).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.count, 3);

        let request = GetIntegrationsRequest {
            limit: 10,
            name: Some("ET".into()),
            ..Default::default()
        };
        let page = mock.get_integrations(&request).await.unwrap();
        assert_eq!(page.data[0].name, "beta");
    }

    #[tokio::test]
    async fn test_scheduled_failure_is_consumed() {
        let mock = MockIntegrations::new();
        mock.fail_next(ApiProblem::new("Server error")).await;

        let error = mock.enable_endpoint(Uuid::now_v7()).await.unwrap_err();
        assert_eq!(error.message.as_deref(), Some("Server error"));

        let error = mock.enable_endpoint(Uuid::now_v7()).await.unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::NotFound);
    }
}
