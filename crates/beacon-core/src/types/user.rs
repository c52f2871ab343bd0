//! Integrations restricted to the user-creatable types.

use derive_more::{AsRef, Deref};

use super::{Integration, IntegrationType, NewIntegration, TypedIntegration, UserIntegrationType};
use crate::{Error, Result};

/// An [`Integration`] whose type is on the user allow-list.
#[derive(Debug, Clone, PartialEq, Eq, AsRef, Deref)]
pub struct UserIntegration {
    #[deref]
    #[as_ref]
    integration: Integration,
    user_type: UserIntegrationType,
}

impl UserIntegration {
    /// Returns the user-facing type of this integration.
    #[inline]
    pub fn user_type(&self) -> UserIntegrationType {
        self.user_type
    }

    /// Returns the wrapped integration.
    #[inline]
    pub fn into_inner(self) -> Integration {
        self.integration
    }
}

impl TryFrom<Integration> for UserIntegration {
    type Error = Error;

    fn try_from(integration: Integration) -> Result<Self> {
        let user_type = UserIntegrationType::try_from(integration.integration_type())?;
        Ok(Self {
            integration,
            user_type,
        })
    }
}

impl From<UserIntegration> for Integration {
    fn from(integration: UserIntegration) -> Self {
        integration.integration
    }
}

impl TypedIntegration for UserIntegration {
    fn type_tag(&self) -> Option<IntegrationType> {
        Some(self.integration.integration_type())
    }
}

/// A [`NewIntegration`] whose type is on the user allow-list.
#[derive(Debug, Clone, PartialEq, Eq, AsRef, Deref)]
pub struct NewUserIntegration {
    #[deref]
    #[as_ref]
    integration: NewIntegration,
    user_type: UserIntegrationType,
}

impl NewUserIntegration {
    /// Returns the user-facing type of this integration.
    #[inline]
    pub fn user_type(&self) -> UserIntegrationType {
        self.user_type
    }

    /// Returns the wrapped integration.
    #[inline]
    pub fn into_inner(self) -> NewIntegration {
        self.integration
    }
}

impl TryFrom<NewIntegration> for NewUserIntegration {
    type Error = Error;

    fn try_from(integration: NewIntegration) -> Result<Self> {
        let user_type = UserIntegrationType::try_from(integration.integration_type())?;
        Ok(Self {
            integration,
            user_type,
        })
    }
}

impl From<UserIntegration> for NewUserIntegration {
    fn from(integration: UserIntegration) -> Self {
        Self {
            integration: integration.integration.into(),
            user_type: integration.user_type,
        }
    }
}

impl From<NewUserIntegration> for NewIntegration {
    fn from(integration: NewUserIntegration) -> Self {
        integration.integration
    }
}

impl TypedIntegration for NewUserIntegration {
    fn type_tag(&self) -> Option<IntegrationType> {
        Some(self.integration.integration_type())
    }
}

#[cfg(test)]
mod tests {
    use url::Url;
    use uuid::Uuid;

    use super::*;
    use crate::ErrorKind;
    use crate::types::{HttpProperties, IntegrationProperties, SystemProperties};

    fn integration(properties: IntegrationProperties) -> Integration {
        Integration {
            id: Uuid::now_v7(),
            name: "integration".into(),
            is_enabled: true,
            status: None,
            server_errors: 0,
            properties,
        }
    }

    #[test]
    fn test_webhook_is_user_integration() {
        let webhook = integration(IntegrationProperties::Webhook(HttpProperties::new(
            Url::parse("https://example.com").unwrap(),
        )));

        let user = UserIntegration::try_from(webhook).unwrap();
        assert_eq!(user.user_type(), UserIntegrationType::Webhook);
        assert_eq!(user.name, "integration");
    }

    #[test]
    fn test_drawer_is_rejected() {
        let drawer = integration(IntegrationProperties::Drawer(SystemProperties::default()));

        let error = UserIntegration::try_from(drawer).unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnsupportedType);
    }

    #[test]
    fn test_email_subscription_is_rejected() {
        let email = NewIntegration::new(
            "email",
            IntegrationProperties::EmailSubscription(SystemProperties::default()),
        );

        assert!(NewUserIntegration::try_from(email).is_err());
    }
}
