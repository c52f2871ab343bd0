//! The integration tagged union.
//!
//! Every integration shares the same base fields; the channel-specific fields
//! live in [`IntegrationProperties`], whose variant determines the type tag.
//! Code that narrows on the tag therefore can only see the fields that tag
//! defines.

use std::borrow::Cow;
use std::collections::BTreeMap;

use url::Url;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{CamelSubtype, EndpointStatus, HttpType, IntegrationType, PagerDutySeverity};

/// Maximum number of characters in an integration name.
pub const MAX_INTEGRATION_NAME_LENGTH: u64 = 150;

/// Fields of webhook and Event-Driven Ansible integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProperties {
    /// Target URL.
    pub url: Url,
    /// Whether the TLS certificate of the target is verified.
    pub ssl_verification_enabled: bool,
    /// Token sent along with every delivery.
    pub secret_token: Option<String>,
    /// HTTP method used for deliveries.
    pub method: HttpType,
}

impl HttpProperties {
    /// Creates properties that POST to `url` with TLS verification enabled.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            ssl_verification_enabled: true,
            secret_token: None,
            method: HttpType::default(),
        }
    }

    /// Sets the secret token.
    pub fn with_secret_token(mut self, secret_token: impl Into<String>) -> Self {
        self.secret_token = Some(secret_token.into());
        self
    }

    /// Sets the HTTP method.
    pub fn with_method(mut self, method: HttpType) -> Self {
        self.method = method;
        self
    }
}

/// Fields of PagerDuty integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerDutyProperties {
    /// Integration key; required by PagerDuty.
    pub secret_token: String,
    /// Severity of the generated events.
    pub severity: PagerDutySeverity,
}

/// Basic authentication credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub pass: String,
}

impl BasicAuth {
    /// Creates a new credential pair.
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Fields of integrations in the Camel family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CamelProperties {
    /// Which Camel connector handles the integration.
    pub subtype: CamelSubtype,
    /// Target URL.
    pub url: Url,
    /// Whether the TLS certificate of the target is verified.
    pub ssl_verification_enabled: bool,
    /// Token sent along with every delivery.
    pub secret_token: Option<String>,
    /// Optional basic authentication credentials.
    pub basic_auth: Option<BasicAuth>,
    /// Connector-specific settings.
    pub extras: Option<BTreeMap<String, String>>,
}

impl CamelProperties {
    /// Creates properties for the given connector with TLS verification enabled.
    pub fn new(subtype: CamelSubtype, url: Url) -> Self {
        Self {
            subtype,
            url,
            ssl_verification_enabled: true,
            secret_token: None,
            basic_auth: None,
            extras: None,
        }
    }

    /// Sets basic authentication credentials.
    pub fn with_basic_auth(mut self, basic_auth: BasicAuth) -> Self {
        self.basic_auth = Some(basic_auth);
        self
    }

    /// Adds a connector-specific setting.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Fields of the system-managed drawer and email subscription integrations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SystemProperties {
    /// Deliver only to organization administrators.
    pub only_admin: Option<bool>,
    /// Deliver regardless of user preferences.
    pub ignore_preferences: Option<bool>,
    /// Owning user group.
    pub group_id: Option<Uuid>,
}

/// Channel-specific fields, keyed by integration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationProperties {
    Webhook(HttpProperties),
    EmailSubscription(SystemProperties),
    Camel(CamelProperties),
    Ansible(HttpProperties),
    Drawer(SystemProperties),
    PagerDuty(PagerDutyProperties),
}

impl IntegrationProperties {
    /// Returns the type tag determined by this variant.
    pub fn integration_type(&self) -> IntegrationType {
        match self {
            Self::Webhook(_) => IntegrationType::Webhook,
            Self::EmailSubscription(_) => IntegrationType::EmailSubscription,
            Self::Camel(props) => IntegrationType::Camel(props.subtype),
            Self::Ansible(_) => IntegrationType::Ansible,
            Self::Drawer(_) => IntegrationType::Drawer,
            Self::PagerDuty(_) => IntegrationType::PagerDuty,
        }
    }
}

impl Validate for IntegrationProperties {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let url = match self {
            Self::Webhook(props) | Self::Ansible(props) => Some(&props.url),
            Self::Camel(props) => Some(&props.url),
            _ => None,
        };
        if url.is_some_and(|url| !is_http_url(url)) {
            errors.add("url", scheme_error());
        }

        match self {
            Self::PagerDuty(props) if props.secret_token.trim().is_empty() => {
                errors.add("secret_token", required_error());
            }
            Self::Camel(CamelProperties {
                basic_auth: Some(auth),
                ..
            }) if auth.user.is_empty() => {
                errors.add("basic_auth", required_error());
            }
            _ => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_http_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn required_error() -> ValidationError {
    ValidationError::new("required").with_message(Cow::Borrowed("This field is required"))
}

fn scheme_error() -> ValidationError {
    ValidationError::new("url").with_message(Cow::Borrowed("URL must use http or https"))
}

/// Anything that may carry an integration type tag.
pub trait TypedIntegration {
    /// Returns the type tag, if present and recognized.
    fn type_tag(&self) -> Option<IntegrationType>;
}

impl TypedIntegration for IntegrationType {
    fn type_tag(&self) -> Option<IntegrationType> {
        Some(*self)
    }
}

impl<T: TypedIntegration> TypedIntegration for Option<T> {
    fn type_tag(&self) -> Option<IntegrationType> {
        self.as_ref().and_then(TypedIntegration::type_tag)
    }
}

/// A persisted integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integration {
    /// Server-assigned identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Whether deliveries are enabled.
    pub is_enabled: bool,
    /// Provisioning status, when the server reports one.
    pub status: Option<EndpointStatus>,
    /// Count of recent delivery errors.
    pub server_errors: u32,
    /// Channel-specific fields.
    pub properties: IntegrationProperties,
}

impl Integration {
    /// Returns the type tag of this integration.
    #[inline]
    pub fn integration_type(&self) -> IntegrationType {
        self.properties.integration_type()
    }

    /// Narrows to the Camel family.
    pub fn as_camel(&self) -> Option<&CamelProperties> {
        match &self.properties {
            IntegrationProperties::Camel(props) => Some(props),
            _ => None,
        }
    }

    /// Narrows to webhook and Ansible integrations.
    pub fn as_http(&self) -> Option<&HttpProperties> {
        match &self.properties {
            IntegrationProperties::Webhook(props) | IntegrationProperties::Ansible(props) => {
                Some(props)
            }
            _ => None,
        }
    }

    /// Narrows to PagerDuty integrations.
    pub fn as_pagerduty(&self) -> Option<&PagerDutyProperties> {
        match &self.properties {
            IntegrationProperties::PagerDuty(props) => Some(props),
            _ => None,
        }
    }

    /// Narrows to the system-managed drawer and email subscription integrations.
    pub fn as_system(&self) -> Option<&SystemProperties> {
        match &self.properties {
            IntegrationProperties::Drawer(props)
            | IntegrationProperties::EmailSubscription(props) => Some(props),
            _ => None,
        }
    }

    /// Returns a copy of this integration with the enabled flag replaced.
    #[must_use]
    pub fn with_enabled(&self, is_enabled: bool) -> Self {
        Self {
            is_enabled,
            ..self.clone()
        }
    }
}

impl TypedIntegration for Integration {
    fn type_tag(&self) -> Option<IntegrationType> {
        Some(self.integration_type())
    }
}

/// An integration before persistence.
///
/// Identical to [`Integration`] except that the server-assigned identifier and
/// error count are optional.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewIntegration {
    /// Identifier, present when editing an existing integration.
    pub id: Option<Uuid>,
    /// Display name.
    #[validate(length(min = 1, max = MAX_INTEGRATION_NAME_LENGTH))]
    pub name: String,
    /// Whether deliveries are enabled.
    pub is_enabled: bool,
    /// Provisioning status.
    pub status: Option<EndpointStatus>,
    /// Count of recent delivery errors.
    pub server_errors: Option<u32>,
    /// Channel-specific fields.
    pub properties: IntegrationProperties,
}

impl NewIntegration {
    /// Creates an enabled integration with the given name and fields.
    pub fn new(name: impl Into<String>, properties: IntegrationProperties) -> Self {
        Self {
            id: None,
            name: name.into(),
            is_enabled: true,
            status: None,
            server_errors: None,
            properties,
        }
    }

    /// Returns the type tag of this integration.
    #[inline]
    pub fn integration_type(&self) -> IntegrationType {
        self.properties.integration_type()
    }

    /// Validates the name and the channel-specific fields.
    pub fn check(&self) -> crate::Result<()> {
        self.validate()?;
        self.properties.validate()?;
        Ok(())
    }

    /// Sets the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }

    /// Completes this integration with the server-assigned fields.
    pub fn into_integration(self, id: Uuid, server_errors: u32) -> Integration {
        Integration {
            id: self.id.unwrap_or(id),
            name: self.name,
            is_enabled: self.is_enabled,
            status: self.status,
            server_errors: self.server_errors.unwrap_or(server_errors),
            properties: self.properties,
        }
    }
}

impl From<Integration> for NewIntegration {
    fn from(integration: Integration) -> Self {
        Self {
            id: Some(integration.id),
            name: integration.name,
            is_enabled: integration.is_enabled,
            status: integration.status,
            server_errors: Some(integration.server_errors),
            properties: integration.properties,
        }
    }
}

impl TypedIntegration for NewIntegration {
    fn type_tag(&self) -> Option<IntegrationType> {
        Some(self.integration_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::is_camel_integration_type;

    fn slack() -> Integration {
        Integration {
            id: Uuid::now_v7(),
            name: "alerts".into(),
            is_enabled: true,
            status: Some(EndpointStatus::Ready),
            server_errors: 0,
            properties: IntegrationProperties::Camel(
                CamelProperties::new(
                    CamelSubtype::Slack,
                    Url::parse("https://hooks.slack.com/services/T0").unwrap(),
                )
                .with_extra("channel", "#ops"),
            ),
        }
    }

    #[test]
    fn test_type_is_derived_from_properties() {
        let integration = slack();
        assert_eq!(integration.integration_type(), IntegrationType::SLACK);
        assert!(integration.as_camel().is_some());
        assert!(integration.as_http().is_none());
        assert!(integration.as_pagerduty().is_none());
    }

    #[test]
    fn test_is_camel_integration_type() {
        assert!(is_camel_integration_type(&slack()));

        let webhook = NewIntegration::new(
            "hook",
            IntegrationProperties::Webhook(HttpProperties::new(
                Url::parse("https://example.com/hook").unwrap(),
            )),
        );
        assert!(!is_camel_integration_type(&webhook));
        assert!(!is_camel_integration_type(&None::<IntegrationType>));
    }

    #[test]
    fn test_with_enabled_leaves_original_untouched() {
        let integration = slack();
        let disabled = integration.with_enabled(false);

        assert!(integration.is_enabled);
        assert!(!disabled.is_enabled);
        assert_eq!(disabled.id, integration.id);
    }

    #[test]
    fn test_new_integration_round_trip() {
        let integration = slack();
        let id = integration.id;
        let new: NewIntegration = integration.clone().into();

        assert_eq!(new.id, Some(id));
        assert_eq!(new.into_integration(Uuid::now_v7(), 7), integration);
    }

    #[test]
    fn test_validate_name_length() {
        let props = IntegrationProperties::Webhook(HttpProperties::new(
            Url::parse("https://example.com").unwrap(),
        ));

        assert!(NewIntegration::new("ok", props.clone()).check().is_ok());
        assert!(NewIntegration::new("", props.clone()).check().is_err());

        let long_name = "x".repeat(MAX_INTEGRATION_NAME_LENGTH as usize + 1);
        assert!(NewIntegration::new(long_name, props).check().is_err());
    }

    #[test]
    fn test_validate_pagerduty_secret() {
        let props = IntegrationProperties::PagerDuty(PagerDutyProperties {
            secret_token: "  ".into(),
            severity: PagerDutySeverity::Critical,
        });

        let error = NewIntegration::new("pd", props).check().unwrap_err();
        assert_eq!(error.kind, crate::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_validate_url_scheme() {
        let props = IntegrationProperties::Ansible(HttpProperties::new(
            Url::parse("ftp://example.com/").unwrap(),
        ));

        assert!(NewIntegration::new("eda", props).check().is_err());
    }

    #[test]
    fn test_basic_auth_debug_hides_password() {
        let auth = BasicAuth::new("admin", "hunter2");
        assert!(!format!("{auth:?}").contains("hunter2"));
    }
}
