//! Convenient re-exports for common use.

pub use crate::actions::{ActionHandler, ActionKind, ActionResolver, Capabilities, RowAction};
pub use crate::api::{IntegrationPage, IntegrationsProvider, IntegrationsService, RequestOptions};
pub use crate::filter::{
    DEFAULT_DEBOUNCE, FilterComposer, FilterContent, Filters, IntegrationFilterColumn,
    UrlQueryState, state_factory,
};
pub use crate::flags::{FeatureFlags, StaticFlags, TEST_ACTION_FLAG};
pub use crate::notify::{ApiProblem, Notification, Notifier, Violation, format_error};
pub use crate::query::{
    GetIntegrationsRequest, IntegrationSortBy, IntegrationSortField, Pagination, SortOrder,
    build_list_request,
};
pub use crate::types::{
    Integration, IntegrationCategory, IntegrationProperties, IntegrationType, NewIntegration,
    UserIntegration, UserIntegrationType, is_camel_integration_type, is_camel_type,
    is_user_integration_type,
};
pub use crate::{Error, ErrorKind, Result};
