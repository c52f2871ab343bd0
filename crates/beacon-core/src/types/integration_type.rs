//! Integration type tags and the user-facing allow-list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result};

/// Prefix shared by every member of the Camel family.
pub const CAMEL_PREFIX: &str = "camel:";

/// Base types that group several sub types under one `type:sub_type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntegrationBaseType {
    /// Integrations dispatched through the shared Camel connector.
    Camel,
}

/// Sub types of the Camel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CamelSubtype {
    Splunk,
    Slack,
    #[serde(rename = "servicenow")]
    #[strum(serialize = "servicenow")]
    ServiceNow,
    Teams,
    GoogleChat,
}

/// Every sub type, regardless of whether it belongs to a base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntegrationSubType {
    Webhook,
    EmailSubscription,
    Splunk,
    Slack,
    #[serde(rename = "servicenow")]
    #[strum(serialize = "servicenow")]
    ServiceNow,
    Teams,
    GoogleChat,
    Ansible,
    Drawer,
    #[serde(rename = "pagerduty")]
    #[strum(serialize = "pagerduty")]
    PagerDuty,
}

impl From<CamelSubtype> for IntegrationSubType {
    fn from(subtype: CamelSubtype) -> Self {
        match subtype {
            CamelSubtype::Splunk => Self::Splunk,
            CamelSubtype::Slack => Self::Slack,
            CamelSubtype::ServiceNow => Self::ServiceNow,
            CamelSubtype::Teams => Self::Teams,
            CamelSubtype::GoogleChat => Self::GoogleChat,
        }
    }
}

/// Closed enumeration of integration kinds.
///
/// The string form is either `type` or `type:sub_type`. Every value of the
/// shape `camel:<subtype>` is a member of the Camel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IntegrationType {
    Webhook,
    EmailSubscription,
    Camel(CamelSubtype),
    /// Event-Driven Ansible.
    Ansible,
    Drawer,
    PagerDuty,
}

impl IntegrationType {
    /// Splunk, routed through Camel.
    pub const SPLUNK: Self = Self::Camel(CamelSubtype::Splunk);
    /// Slack, routed through Camel.
    pub const SLACK: Self = Self::Camel(CamelSubtype::Slack);
    /// ServiceNow, routed through Camel.
    pub const SERVICE_NOW: Self = Self::Camel(CamelSubtype::ServiceNow);
    /// Microsoft Teams, routed through Camel.
    pub const TEAMS: Self = Self::Camel(CamelSubtype::Teams);
    /// Google Chat, routed through Camel.
    pub const GOOGLE_CHAT: Self = Self::Camel(CamelSubtype::GoogleChat);

    /// Every integration type, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Webhook,
        Self::EmailSubscription,
        Self::SPLUNK,
        Self::SLACK,
        Self::SERVICE_NOW,
        Self::TEAMS,
        Self::GOOGLE_CHAT,
        Self::Ansible,
        Self::Drawer,
        Self::PagerDuty,
    ];

    /// Returns an iterator over every integration type.
    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    /// Returns the base type, if this type is part of a family.
    #[inline]
    pub const fn base_type(self) -> Option<IntegrationBaseType> {
        match self {
            Self::Camel(_) => Some(IntegrationBaseType::Camel),
            _ => None,
        }
    }

    /// Returns the sub type of this integration type.
    pub fn sub_type(self) -> IntegrationSubType {
        match self {
            Self::Webhook => IntegrationSubType::Webhook,
            Self::EmailSubscription => IntegrationSubType::EmailSubscription,
            Self::Camel(subtype) => subtype.into(),
            Self::Ansible => IntegrationSubType::Ansible,
            Self::Drawer => IntegrationSubType::Drawer,
            Self::PagerDuty => IntegrationSubType::PagerDuty,
        }
    }

    /// Returns the Camel sub type when this is a Camel integration.
    #[inline]
    pub const fn camel_subtype(self) -> Option<CamelSubtype> {
        match self {
            Self::Camel(subtype) => Some(subtype),
            _ => None,
        }
    }

    /// Returns the `type` field as the server stores it.
    pub fn server_type(self) -> &'static str {
        match self {
            Self::Webhook => "webhook",
            Self::EmailSubscription => "email_subscription",
            Self::Camel(_) => IntegrationBaseType::Camel.into(),
            Self::Ansible => "ansible",
            Self::Drawer => "drawer",
            Self::PagerDuty => "pagerduty",
        }
    }

    /// Returns the `sub_type` field as the server stores it.
    pub fn server_sub_type(self) -> Option<&'static str> {
        self.camel_subtype().map(Into::into)
    }

    /// Rebuilds a type from the server's separate `type` and `sub_type` fields.
    pub fn from_parts(server_type: &str, sub_type: Option<&str>) -> Result<Self> {
        match (server_type, sub_type) {
            ("camel", Some(sub_type)) => CamelSubtype::from_str(sub_type)
                .map(Self::Camel)
                .map_err(|_| unsupported(&format!("camel:{sub_type}"))),
            ("camel", None) => Err(unsupported("camel")),
            (server_type, _) => server_type.parse(),
        }
    }
}

impl fmt::Display for IntegrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camel(subtype) => write!(f, "{CAMEL_PREFIX}{subtype}"),
            other => f.write_str(other.server_type()),
        }
    }
}

impl FromStr for IntegrationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(subtype) = s.strip_prefix(CAMEL_PREFIX) {
            return CamelSubtype::from_str(subtype)
                .map(Self::Camel)
                .map_err(|_| unsupported(s));
        }

        match s {
            "webhook" => Ok(Self::Webhook),
            "email_subscription" => Ok(Self::EmailSubscription),
            "ansible" => Ok(Self::Ansible),
            "drawer" => Ok(Self::Drawer),
            "pagerduty" => Ok(Self::PagerDuty),
            other => Err(unsupported(other)),
        }
    }
}

impl TryFrom<String> for IntegrationType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<IntegrationType> for String {
    fn from(value: IntegrationType) -> Self {
        value.to_string()
    }
}

fn unsupported(tag: &str) -> Error {
    Error::unsupported_type().with_message(format!("unrecognized integration type '{tag}'"))
}

/// Integration types end users may create directly.
///
/// This is an allow-list: a type added to [`IntegrationType`] stays out of
/// user-facing flows until it is listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "IntegrationType", into = "IntegrationType")]
pub enum UserIntegrationType {
    Webhook,
    Ansible,
    Splunk,
    ServiceNow,
    Slack,
    Teams,
    GoogleChat,
    PagerDuty,
}

impl UserIntegrationType {
    /// Every user integration type, in presentation order.
    pub const ALL: [Self; 8] = [
        Self::Webhook,
        Self::Ansible,
        Self::Splunk,
        Self::ServiceNow,
        Self::Slack,
        Self::Teams,
        Self::GoogleChat,
        Self::PagerDuty,
    ];

    /// Returns the matching user sub type.
    pub const fn sub_type(self) -> UserIntegrationSubType {
        match self {
            Self::Webhook => UserIntegrationSubType::Webhook,
            Self::Ansible => UserIntegrationSubType::Ansible,
            Self::Splunk => UserIntegrationSubType::Splunk,
            Self::ServiceNow => UserIntegrationSubType::ServiceNow,
            Self::Slack => UserIntegrationSubType::Slack,
            Self::Teams => UserIntegrationSubType::Teams,
            Self::GoogleChat => UserIntegrationSubType::GoogleChat,
            Self::PagerDuty => UserIntegrationSubType::PagerDuty,
        }
    }
}

impl From<UserIntegrationType> for IntegrationType {
    fn from(value: UserIntegrationType) -> Self {
        match value {
            UserIntegrationType::Webhook => Self::Webhook,
            UserIntegrationType::Ansible => Self::Ansible,
            UserIntegrationType::Splunk => Self::SPLUNK,
            UserIntegrationType::ServiceNow => Self::SERVICE_NOW,
            UserIntegrationType::Slack => Self::SLACK,
            UserIntegrationType::Teams => Self::TEAMS,
            UserIntegrationType::GoogleChat => Self::GOOGLE_CHAT,
            UserIntegrationType::PagerDuty => Self::PagerDuty,
        }
    }
}

impl TryFrom<IntegrationType> for UserIntegrationType {
    type Error = Error;

    fn try_from(value: IntegrationType) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| IntegrationType::from(*candidate) == value)
            .ok_or_else(|| {
                Error::unsupported_type()
                    .with_message(format!("integration type '{value}' is not user-creatable"))
            })
    }
}

impl fmt::Display for UserIntegrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        IntegrationType::from(*self).fmt(f)
    }
}

/// Sub types matching [`UserIntegrationType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserIntegrationSubType {
    Webhook,
    Ansible,
    Splunk,
    #[serde(rename = "servicenow")]
    #[strum(serialize = "servicenow")]
    ServiceNow,
    Slack,
    Teams,
    GoogleChat,
    #[serde(rename = "pagerduty")]
    #[strum(serialize = "pagerduty")]
    PagerDuty,
}

impl From<UserIntegrationSubType> for IntegrationSubType {
    fn from(value: UserIntegrationSubType) -> Self {
        match value {
            UserIntegrationSubType::Webhook => Self::Webhook,
            UserIntegrationSubType::Ansible => Self::Ansible,
            UserIntegrationSubType::Splunk => Self::Splunk,
            UserIntegrationSubType::ServiceNow => Self::ServiceNow,
            UserIntegrationSubType::Slack => Self::Slack,
            UserIntegrationSubType::Teams => Self::Teams,
            UserIntegrationSubType::GoogleChat => Self::GoogleChat,
            UserIntegrationSubType::PagerDuty => Self::PagerDuty,
        }
    }
}

/// Grouping of user integration types shown as tabs of the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum IntegrationCategory {
    Communications,
    Reporting,
    Webhooks,
}

impl IntegrationCategory {
    /// Returns the user integration types that belong to this category.
    pub const fn types(self) -> &'static [UserIntegrationType] {
        match self {
            Self::Communications => &[
                UserIntegrationType::Slack,
                UserIntegrationType::Teams,
                UserIntegrationType::GoogleChat,
            ],
            Self::Reporting => &[
                UserIntegrationType::Splunk,
                UserIntegrationType::ServiceNow,
                UserIntegrationType::PagerDuty,
            ],
            Self::Webhooks => &[UserIntegrationType::Webhook, UserIntegrationType::Ansible],
        }
    }

    /// Returns the category a user integration type is listed under.
    pub fn of(ty: UserIntegrationType) -> Self {
        Self::iter()
            .find(|category| category.types().contains(&ty))
            .unwrap_or(Self::Webhooks)
    }
}

/// Returns whether the type belongs to the Camel family.
///
/// Absent input is never a Camel type.
#[inline]
pub fn is_camel_type(ty: Option<&IntegrationType>) -> bool {
    matches!(ty, Some(IntegrationType::Camel(_)))
}

/// Returns whether a raw type tag has the `camel:<subtype>` shape.
#[inline]
pub fn is_camel_tag(tag: &str) -> bool {
    tag.starts_with(CAMEL_PREFIX)
}

/// Returns whether the type is on the user integration allow-list.
pub fn is_user_integration_type(ty: Option<&IntegrationType>) -> bool {
    ty.is_some_and(|ty| UserIntegrationType::try_from(*ty).is_ok())
}
