//! Small enumerations shared by integration variants.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Provisioning status the server reports for an endpoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointStatus {
    Ready,
    #[default]
    Unknown,
    New,
    Provisioning,
    Deleting,
    Failed,
}

impl EndpointStatus {
    /// Returns whether the endpoint is still being set up or torn down.
    #[inline]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::New | Self::Provisioning | Self::Deleting)
    }
}

/// HTTP method used by webhook-style integrations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpType {
    Get,
    #[default]
    Post,
    Put,
}

/// Severity attached to PagerDuty events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PagerDutySeverity {
    Critical,
    #[default]
    Error,
    Warning,
    Info,
}
