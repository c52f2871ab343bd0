//! Integrations provider implementation.
//!
//! This module implements the [`IntegrationsProvider`] trait for
//! [`ReqwestClient`].

use std::time::Instant;

use beacon_core::api::{IntegrationsProvider, RequestOptions};
use beacon_core::query::GetIntegrationsRequest;
use beacon_core::types::{BehaviorGroup, Endpoint, EndpointPage};
use reqwest::Method;
use uuid::Uuid;

use crate::connect::{ReqwestClient, TRACING_TARGET};
use crate::error::Error;

impl ReqwestClient {
    async fn call(&self, method: Method, url: url::Url) -> Result<(), Error> {
        let started_at = Instant::now();
        tracing::debug!(target: TRACING_TARGET, %method, url = %url, "Sending request");

        self.send(self.http().request(method.clone(), url)).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            %method,
            elapsed_ms = started_at.elapsed().as_millis(),
            "Request completed"
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl IntegrationsProvider for ReqwestClient {
    async fn create_endpoint(&self, endpoint: &Endpoint) -> beacon_core::Result<Endpoint> {
        let url = self.endpoints_url(&[])?;

        tracing::debug!(
            target: TRACING_TARGET,
            endpoint_type = %endpoint.endpoint_type,
            "Creating endpoint"
        );

        let response = self.send(self.http().post(url).json(endpoint)).await?;
        let created = response.json::<Endpoint>().await.map_err(Error::from)?;
        Ok(created)
    }

    async fn update_endpoint(
        &self,
        id: Uuid,
        endpoint: &Endpoint,
        options: &RequestOptions,
    ) -> beacon_core::Result<()> {
        let url = self.endpoints_url(&[id.to_string().as_str()])?;

        let mut request = self.http().put(url).json(endpoint);
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }

        tracing::debug!(target: TRACING_TARGET, endpoint_id = %id, "Updating endpoint");
        self.send(request).await?;
        Ok(())
    }

    async fn get_integrations(
        &self,
        request: &GetIntegrationsRequest,
    ) -> beacon_core::Result<EndpointPage> {
        let started_at = Instant::now();
        let url = self.endpoints_url(&[])?;

        let response = self
            .send(self.http().get(url).query(&request.query_pairs()))
            .await?;
        let page = response.json::<EndpointPage>().await.map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            returned = page.data.len(),
            count = page.meta.count,
            elapsed_ms = started_at.elapsed().as_millis(),
            "Endpoints listed"
        );

        Ok(page)
    }

    async fn get_endpoint(&self, id: Uuid) -> beacon_core::Result<Endpoint> {
        let url = self.endpoints_url(&[id.to_string().as_str()])?;
        let response = self.send(self.http().get(url)).await?;
        let endpoint = response.json::<Endpoint>().await.map_err(Error::from)?;
        Ok(endpoint)
    }

    async fn delete_endpoint(&self, id: Uuid) -> beacon_core::Result<()> {
        let url = self.endpoints_url(&[id.to_string().as_str()])?;
        self.call(Method::DELETE, url).await?;
        Ok(())
    }

    async fn enable_endpoint(&self, id: Uuid) -> beacon_core::Result<()> {
        let url = self.endpoints_url(&[id.to_string().as_str(), "enable"])?;
        self.call(Method::PUT, url).await?;
        Ok(())
    }

    async fn disable_endpoint(&self, id: Uuid) -> beacon_core::Result<()> {
        let url = self.endpoints_url(&[id.to_string().as_str(), "enable"])?;
        self.call(Method::DELETE, url).await?;
        Ok(())
    }

    async fn test_endpoint(&self, id: Uuid) -> beacon_core::Result<()> {
        let url = self.endpoints_url(&[id.to_string().as_str(), "test"])?;
        self.call(Method::POST, url).await?;
        Ok(())
    }

    async fn get_behavior_groups_affected_by_removal(
        &self,
        id: Uuid,
    ) -> beacon_core::Result<Vec<BehaviorGroup>> {
        let url = self.notifications_url(&[
            "notifications",
            "behaviorGroups",
            "affectedByRemovalOfEndpoint",
            id.to_string().as_str(),
        ])?;

        let response = self.send(self.http().get(url)).await?;
        let groups = response
            .json::<Vec<BehaviorGroup>>()
            .await
            .map_err(Error::from)?;
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use beacon_core::ErrorKind;
    use url::Url;

    use super::*;
    use crate::connect::ReqwestConfig;

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let config = ReqwestConfig::new(Url::parse("http://127.0.0.1:9/").unwrap())
            .with_timeout(std::time::Duration::from_secs(2));
        let client = ReqwestClient::new(config).unwrap();

        let error = client.enable_endpoint(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(error.kind, ErrorKind::Transport | ErrorKind::Timeout));
    }
}
