//! The `list` subcommand.

use beacon_core::api::IntegrationsService;
use beacon_core::filter::{
    DEFAULT_DEBOUNCE, FilterComposer, FilterContent, Filters, IntegrationFilterColumn,
    UrlQueryState, state_factory,
};
use beacon_core::query::build_list_request;

use super::TRACING_TARGET;
use crate::config::ListArgs;

/// Location the list filters are persisted in.
const LIST_LOCATION: &str = "http://localhost/settings/integrations";

/// Composes the list filters from the arguments.
///
/// Values go through the same composer an interactive list uses and are
/// flushed into a query string location before being read back.
pub fn compose_filters(args: &ListArgs) -> anyhow::Result<Filters<IntegrationFilterColumn>> {
    let query = UrlQueryState::parse(LIST_LOCATION)?;
    let composer = FilterComposer::new(DEFAULT_DEBOUNCE, |column| state_factory(column, &query))?;

    composer.set_filter_value(
        IntegrationFilterColumn::Name,
        args.name.clone().map(FilterContent::from),
    );
    composer.set_filter_value(
        IntegrationFilterColumn::Enabled,
        args.enabled.clone().map(FilterContent::from),
    );
    composer.flush();

    tracing::debug!(target: TRACING_TARGET, location = %query.url(), "Filters composed");
    Ok(composer.persisted_filters())
}

/// Lists one page of integrations.
pub async fn run(args: &ListArgs, service: &IntegrationsService) -> anyhow::Result<()> {
    let filters = compose_filters(args)?;
    let request = build_list_request(&filters, &args.pagination(), args.sort.as_ref(), args.category);
    let page = service.list_integrations(&request).await?;

    for integration in &page.integrations {
        tracing::info!(
            target: TRACING_TARGET,
            id = %integration.id,
            name = %integration.name,
            integration_type = %integration.user_type(),
            enabled = integration.is_enabled,
            status = ?integration.status,
            "integration"
        );
    }

    tracing::info!(
        target: TRACING_TARGET,
        page = args.pagination().page(),
        shown = page.integrations.len(),
        skipped = page.skipped,
        invalid = page.invalid,
        total = page.count,
        "Integrations listed"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use beacon_core::api::mock::MockIntegrations;
    use beacon_core::query::Pagination;
    use beacon_core::types::{HttpProperties, IntegrationProperties, NewIntegration};

    use super::*;

    fn args(name: Option<&str>, enabled: Option<&str>) -> ListArgs {
        ListArgs {
            name: name.map(str::to_owned),
            enabled: enabled.map(str::to_owned),
            page: 1,
            per_page: Pagination::DEFAULT_PAGE_SIZE,
            sort: None,
            category: None,
        }
    }

    #[tokio::test]
    async fn test_compose_filters() {
        let filters = compose_filters(&args(Some("ops"), Some("disabled"))).unwrap();
        assert_eq!(filters.name(), Some("ops"));
        assert_eq!(filters.active(), Some(false));

        let filters = compose_filters(&args(None, None)).unwrap();
        assert!(filters.is_empty());
    }

    #[tokio::test]
    async fn test_list_against_mock() {
        let service = IntegrationsService::new(MockIntegrations::new());
        let url = "https://hooks.example.com/ops".parse().unwrap();
        let new = NewIntegration::new("ops", IntegrationProperties::Webhook(HttpProperties::new(url)));
        service.create_integration(&new).await.unwrap();

        run(&args(Some("ops"), None), &service).await.unwrap();
    }
}
