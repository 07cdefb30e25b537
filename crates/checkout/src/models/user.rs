//! User and authentication-method domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use user_checkout_core::{RoleId, UserId};

/// An identity record owned by the external identity subsystem.
///
/// This crate only reads users and, when provisioning a customer, appends
/// the customer role and persists the update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Roles granted to the user.
    pub roles: Vec<Role>,
    /// All authentication methods registered for the user.
    pub authentication_methods: Vec<AuthenticationMethod>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A role grantable to users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role ID.
    pub id: RoleId,
    /// Machine-readable role code (e.g. `"customer"`).
    pub code: String,
}

/// One way a user can authenticate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuthenticationMethod {
    /// Locally held credentials (password, passkey).
    Local(LocalAuthenticationMethod),
    /// An identity asserted by a third-party identity provider.
    External(ExternalAuthenticationMethod),
}

impl AuthenticationMethod {
    /// Statically typed projection onto the external shape.
    ///
    /// Returns `None` for local methods.
    #[must_use]
    pub const fn as_external(&self) -> Option<&ExternalAuthenticationMethod> {
        match self {
            Self::External(method) => Some(method),
            Self::Local(_) => None,
        }
    }
}

/// Locally held credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalAuthenticationMethod {
    /// The identifier the user logs in with (usually an email address).
    pub identifier: String,
}

/// A link between a user and a third-party identity, restricted to the
/// fields provisioning cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalAuthenticationMethod {
    /// Name of the authentication strategy (e.g. `"google"`).
    pub strategy: String,
    /// Identifier asserted by the provider.
    pub external_identifier: String,
    /// Profile metadata supplied by the provider, if any.
    pub metadata: Option<ExternalProfile>,
    /// When this method was registered.
    pub created_at: DateTime<Utc>,
    /// When this method was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Profile fields an identity provider may supply.
///
/// Provider payloads arrive as JSON with any subset of these fields
/// present; empty strings are treated as absent during field resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalProfile {
    /// Email address on file with the provider.
    #[serde(default)]
    pub email_address: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Honorific or title.
    #[serde(default)]
    pub title: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn external(strategy: &str, identifier: &str) -> AuthenticationMethod {
        AuthenticationMethod::External(ExternalAuthenticationMethod {
            strategy: strategy.to_string(),
            external_identifier: identifier.to_string(),
            metadata: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_as_external_projection() {
        let local = AuthenticationMethod::Local(LocalAuthenticationMethod {
            identifier: "jane@example.com".to_string(),
        });
        assert!(local.as_external().is_none());

        let method = external("google", "ext-1");
        let projected = method.as_external().unwrap();
        assert_eq!(projected.strategy, "google");
        assert_eq!(projected.external_identifier, "ext-1");
    }

    #[test]
    fn test_external_profile_tolerates_missing_fields() {
        let profile: ExternalProfile =
            serde_json::from_str(r#"{"email_address":"a@b.com"}"#).unwrap();
        assert_eq!(profile.email_address.as_deref(), Some("a@b.com"));
        assert!(profile.first_name.is_none());
        assert!(profile.title.is_none());
    }

    #[test]
    fn test_method_serde_is_tagged() {
        let json = serde_json::to_value(external("google", "ext-1")).unwrap();
        assert_eq!(json["type"], "external");
        assert_eq!(json["strategy"], "google");
    }
}
