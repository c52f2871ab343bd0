//! Wire representation of integrations as the server stores them.
//!
//! The server calls a persisted integration an *endpoint*. It splits the type
//! tag into `type` and `sub_type` and keeps the channel-specific fields in an
//! untyped `properties` object whose shape depends on the type.

use std::collections::BTreeMap;

use jiff::civil::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::{
    BasicAuth, CamelProperties, EndpointStatus, HttpProperties, HttpType, Integration,
    IntegrationProperties, IntegrationType, NewIntegration, PagerDutyProperties,
    PagerDutySeverity, SystemProperties, TypedIntegration,
};
use crate::{Error, Result};

/// An endpoint as exchanged with the integrations API.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EndpointStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_errors: Option<u32>,
    #[serde(rename = "type")]
    pub endpoint_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

impl Endpoint {
    /// Parses the type tag carried by this endpoint.
    pub fn integration_type(&self) -> Result<IntegrationType> {
        IntegrationType::from_parts(&self.endpoint_type, self.sub_type.as_deref())
    }
}

impl TypedIntegration for Endpoint {
    fn type_tag(&self) -> Option<IntegrationType> {
        self.integration_type().ok()
    }
}

/// A page of endpoints returned by the list operation.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointPage {
    pub data: Vec<Endpoint>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// Metadata attached to a page of results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of records matching the query, across all pages.
    pub count: u64,
}

/// A behavior group that references an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorGroup {
    pub id: Uuid,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct BasicAuthentication {
    username: String,
    password: String,
}

impl From<BasicAuthentication> for BasicAuth {
    fn from(auth: BasicAuthentication) -> Self {
        Self::new(auth.username, auth.password)
    }
}

impl From<&BasicAuth> for BasicAuthentication {
    fn from(auth: &BasicAuth) -> Self {
        Self {
            username: auth.user.clone(),
            password: auth.pass.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct WebhookWire {
    url: Url,
    #[serde(default)]
    method: HttpType,
    #[serde(default)]
    disable_ssl_verification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secret_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CamelWire {
    url: Url,
    #[serde(default)]
    disable_ssl_verification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secret_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    basic_authentication: Option<BasicAuthentication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extras: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SystemWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    only_admins: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ignore_preferences: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PagerDutyWire {
    secret_token: String,
    #[serde(default)]
    severity: PagerDutySeverity,
}

fn decode<T: DeserializeOwned>(ty: IntegrationType, properties: Option<serde_json::Value>) -> Result<T> {
    let properties = properties.ok_or_else(|| {
        Error::invalid_input().with_message(format!("endpoint of type '{ty}' has no properties"))
    })?;

    serde_json::from_value(properties).map_err(|error| {
        Error::from(error).with_message(format!("invalid properties for endpoint of type '{ty}'"))
    })
}

fn decode_system(ty: IntegrationType, properties: Option<serde_json::Value>) -> Result<SystemProperties> {
    let wire: SystemWire = match properties {
        None | Some(serde_json::Value::Null) => SystemWire::default(),
        properties => decode(ty, properties)?,
    };

    Ok(SystemProperties {
        only_admin: wire.only_admins,
        ignore_preferences: wire.ignore_preferences,
        group_id: wire.group_id,
    })
}

fn decode_http(ty: IntegrationType, properties: Option<serde_json::Value>) -> Result<HttpProperties> {
    let wire: WebhookWire = decode(ty, properties)?;

    Ok(HttpProperties {
        url: wire.url,
        ssl_verification_enabled: !wire.disable_ssl_verification,
        secret_token: wire.secret_token,
        method: wire.method,
    })
}

impl IntegrationProperties {
    /// Decodes the untyped `properties` object of an endpoint of type `ty`.
    pub fn from_wire(ty: IntegrationType, properties: Option<serde_json::Value>) -> Result<Self> {
        let properties = match ty {
            IntegrationType::Webhook => Self::Webhook(decode_http(ty, properties)?),
            IntegrationType::Ansible => Self::Ansible(decode_http(ty, properties)?),
            IntegrationType::EmailSubscription => {
                Self::EmailSubscription(decode_system(ty, properties)?)
            }
            IntegrationType::Drawer => Self::Drawer(decode_system(ty, properties)?),
            IntegrationType::Camel(subtype) => {
                let wire: CamelWire = decode(ty, properties)?;
                Self::Camel(CamelProperties {
                    subtype,
                    url: wire.url,
                    ssl_verification_enabled: !wire.disable_ssl_verification,
                    secret_token: wire.secret_token,
                    basic_auth: wire.basic_authentication.map(Into::into),
                    extras: wire.extras,
                })
            }
            IntegrationType::PagerDuty => {
                let wire: PagerDutyWire = decode(ty, properties)?;
                Self::PagerDuty(PagerDutyProperties {
                    secret_token: wire.secret_token,
                    severity: wire.severity,
                })
            }
        };

        Ok(properties)
    }

    /// Encodes these fields as the untyped `properties` object of an endpoint.
    pub fn to_wire(&self) -> Result<serde_json::Value> {
        let value = match self {
            Self::Webhook(props) | Self::Ansible(props) => serde_json::to_value(WebhookWire {
                url: props.url.clone(),
                method: props.method,
                disable_ssl_verification: !props.ssl_verification_enabled,
                secret_token: props.secret_token.clone(),
            })?,
            Self::EmailSubscription(props) | Self::Drawer(props) => {
                serde_json::to_value(SystemWire {
                    only_admins: props.only_admin,
                    ignore_preferences: props.ignore_preferences,
                    group_id: props.group_id,
                })?
            }
            Self::Camel(props) => serde_json::to_value(CamelWire {
                url: props.url.clone(),
                disable_ssl_verification: !props.ssl_verification_enabled,
                secret_token: props.secret_token.clone(),
                basic_authentication: props.basic_auth.as_ref().map(Into::into),
                extras: props.extras.clone(),
            })?,
            Self::PagerDuty(props) => serde_json::to_value(PagerDutyWire {
                secret_token: props.secret_token.clone(),
                severity: props.severity,
            })?,
        };

        Ok(value)
    }
}

impl TryFrom<Endpoint> for NewIntegration {
    type Error = Error;

    fn try_from(endpoint: Endpoint) -> Result<Self> {
        let ty = endpoint.integration_type()?;

        Ok(Self {
            id: endpoint.id,
            name: endpoint.name,
            is_enabled: endpoint.enabled.unwrap_or(false),
            status: endpoint.status,
            server_errors: endpoint.server_errors,
            properties: IntegrationProperties::from_wire(ty, endpoint.properties)?,
        })
    }
}

impl TryFrom<Endpoint> for Integration {
    type Error = Error;

    fn try_from(endpoint: Endpoint) -> Result<Self> {
        let id = endpoint.id.ok_or_else(|| {
            Error::invalid_input().with_message(format!("endpoint '{}' has no id", endpoint.name))
        })?;

        let integration = NewIntegration::try_from(endpoint)?;
        let server_errors = integration.server_errors.unwrap_or_default();
        Ok(integration.into_integration(id, server_errors))
    }
}

impl TryFrom<&NewIntegration> for Endpoint {
    type Error = Error;

    fn try_from(integration: &NewIntegration) -> Result<Self> {
        let ty = integration.integration_type();

        Ok(Self {
            id: integration.id,
            name: integration.name.clone(),
            description: String::new(),
            enabled: Some(integration.is_enabled),
            status: integration.status,
            server_errors: integration.server_errors,
            endpoint_type: ty.server_type().to_owned(),
            sub_type: ty.server_sub_type().map(str::to_owned),
            created: None,
            updated: None,
            properties: Some(integration.properties.to_wire()?),
        })
    }
}

impl TryFrom<&Integration> for Endpoint {
    type Error = Error;

    fn try_from(integration: &Integration) -> Result<Self> {
        Self::try_from(&NewIntegration::from(integration.clone()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;
    use crate::types::{CamelSubtype, is_camel_integration_type};

    fn slack_endpoint() -> Endpoint {
        serde_json::from_value(json!({
            "id": "0190a6c4-8a2b-7cc3-9a43-1f3c0c9a4b11",
            "name": "Ops channel",
            "description": "",
            "enabled": true,
            "status": "READY",
            "server_errors": 2,
            "type": "camel",
            "sub_type": "slack",
            "created": "2024-03-01T10:15:00.123",
            "properties": {
                "url": "https://hooks.slack.com/services/T0/B0/X",
                "disable_ssl_verification": false,
                "extras": { "channel": "#ops" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_endpoint_to_camel_integration() {
        let endpoint = slack_endpoint();
        assert!(is_camel_integration_type(&endpoint));

        let integration = Integration::try_from(endpoint).unwrap();
        assert_eq!(integration.integration_type(), IntegrationType::SLACK);
        assert_eq!(integration.server_errors, 2);

        let camel = integration.as_camel().unwrap();
        assert_eq!(camel.subtype, CamelSubtype::Slack);
        assert!(camel.ssl_verification_enabled);
        assert_eq!(
            camel.extras.as_ref().and_then(|e| e.get("channel")).map(String::as_str),
            Some("#ops")
        );
    }

    #[test]
    fn test_ssl_flag_is_inverted_on_the_wire() {
        let new = NewIntegration::new(
            "hook",
            IntegrationProperties::Webhook(HttpProperties {
                url: Url::parse("https://example.com/hook").unwrap(),
                ssl_verification_enabled: false,
                secret_token: Some("s3cr3t".into()),
                method: HttpType::Put,
            }),
        );

        let endpoint = Endpoint::try_from(&new).unwrap();
        assert_eq!(endpoint.endpoint_type, "webhook");
        assert!(endpoint.sub_type.is_none());

        let properties = endpoint.properties.unwrap();
        assert_eq!(properties["disable_ssl_verification"], json!(true));
        assert_eq!(properties["method"], json!("PUT"));
    }

    #[test]
    fn test_camel_endpoint_splits_type() {
        let new = NewIntegration::new(
            "teams",
            IntegrationProperties::Camel(
                CamelProperties::new(
                    CamelSubtype::Teams,
                    Url::parse("https://example.webhook.office.com/").unwrap(),
                )
                .with_basic_auth(BasicAuth::new("user", "pass")),
            ),
        );

        let endpoint = Endpoint::try_from(&new).unwrap();
        assert_eq!(endpoint.endpoint_type, "camel");
        assert_eq!(endpoint.sub_type.as_deref(), Some("teams"));

        let properties = endpoint.properties.as_ref().unwrap();
        assert_eq!(properties["basic_authentication"]["username"], json!("user"));

        let decoded = NewIntegration::try_from(endpoint).unwrap();
        assert_eq!(decoded.properties, new.properties);
    }

    #[test]
    fn test_system_endpoint_without_properties() {
        let endpoint = Endpoint {
            id: Some(Uuid::now_v7()),
            name: "Email".into(),
            endpoint_type: "email_subscription".into(),
            ..Default::default()
        };

        let integration = Integration::try_from(endpoint).unwrap();
        let system = integration.as_system().unwrap();
        assert!(system.only_admin.is_none());
        assert!(!integration.is_enabled);
    }

    #[test]
    fn test_unknown_type_fails_closed() {
        let endpoint = Endpoint {
            id: Some(Uuid::now_v7()),
            name: "Mystery".into(),
            endpoint_type: "camel".into(),
            sub_type: Some("carrier_pigeon".into()),
            ..Default::default()
        };

        assert!(!is_camel_integration_type(&endpoint));
        let error = Integration::try_from(endpoint).unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnsupportedType);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let mut endpoint = slack_endpoint();
        endpoint.id = None;

        let error = Integration::try_from(endpoint).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidInput);
    }

    #[test]
    fn test_pagerduty_requires_properties() {
        let endpoint = Endpoint {
            id: Some(Uuid::now_v7()),
            name: "Pager".into(),
            endpoint_type: "pagerduty".into(),
            ..Default::default()
        };

        assert!(Integration::try_from(endpoint).is_err());
    }
}
