//! Integration data model.

mod endpoint;
mod enums;
mod integration;
mod integration_type;
mod user;

pub use endpoint::{BehaviorGroup, Endpoint, EndpointPage, PageMeta};
pub use enums::{EndpointStatus, HttpType, PagerDutySeverity};
pub use integration::{
    BasicAuth, CamelProperties, HttpProperties, Integration, IntegrationProperties,
    MAX_INTEGRATION_NAME_LENGTH, NewIntegration, PagerDutyProperties, SystemProperties,
    TypedIntegration,
};
pub use integration_type::{
    CAMEL_PREFIX, CamelSubtype, IntegrationBaseType, IntegrationCategory, IntegrationSubType,
    IntegrationType, UserIntegrationSubType, UserIntegrationType, is_camel_tag, is_camel_type,
    is_user_integration_type,
};
pub use user::{NewUserIntegration, UserIntegration};

/// Returns whether the integration carries a Camel-family type.
///
/// Records with an absent or unrecognized type are never Camel integrations.
#[inline]
pub fn is_camel_integration_type(value: &impl TypedIntegration) -> bool {
    is_camel_type(value.type_tag().as_ref())
}
