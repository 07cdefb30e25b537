//! Lazy customer provisioning.

use std::sync::Arc;

use tracing::instrument;

use user_checkout_core::Email;

use crate::config::CheckoutOptions;
use crate::models::{
    AuthenticationMethod, Customer, CustomerHistoryEntry, ExternalAuthenticationMethod,
    ExternalProfile, HistoryEntryKind, NewCustomer, RequestContext, Session, User,
};
use crate::obfuscator;
use crate::store::{RepositoryError, RoleRepository, UnitOfWork};

use super::CheckoutError;

/// Creates a customer profile for a user who authenticated externally but
/// has never completed checkout.
///
/// Field values come from the matching external authentication method's
/// metadata or from obfuscated placeholders, per [`CheckoutOptions`]. All
/// writes go through the unit of work handed in by the caller, who owns
/// commit and rollback.
pub struct CustomerProvisioner {
    roles: Arc<dyn RoleRepository>,
    options: CheckoutOptions,
}

impl CustomerProvisioner {
    /// Create a provisioner with its collaborator and policy.
    #[must_use]
    pub fn new(roles: Arc<dyn RoleRepository>, options: CheckoutOptions) -> Self {
        Self { roles, options }
    }

    /// Provision a customer for `user` from the current session's
    /// external authentication method.
    ///
    /// Appends the customer role to the user, resolves each profile field
    /// per policy, then stages (in order): the user update, the customer
    /// insert, the channel assignment, and a "customer registered"
    /// history entry.
    ///
    /// # Errors
    ///
    /// - `AuthMethodMismatch` if no external authentication method
    ///   matches the session's strategy and external identifier,
    ///   including when the context carries no session at all.
    /// - `IncompleteProfile` if email, first name or last name stays
    ///   empty after policy resolution.
    /// - `InvalidEmail` if the winning email value is malformed.
    /// - `Obfuscation` if the obfuscated phone digit count is zero.
    /// - `ProvisioningConflict` if the user already has a customer.
    /// - `Store` for any other collaborator failure.
    #[instrument(skip(self, ctx, user, uow), fields(user_id = %user.id))]
    pub async fn create_customer_from_user(
        &self,
        ctx: &RequestContext,
        user: &User,
        uow: &mut dyn UnitOfWork,
    ) -> Result<Customer, CheckoutError> {
        let customer_role = self
            .roles
            .customer_role()
            .await
            .map_err(CheckoutError::Store)?;

        // Additive: existing roles stay untouched.
        let mut user = user.clone();
        user.roles.push(customer_role);

        let method = matching_external_method(&user, ctx.session.as_ref())
            .ok_or(CheckoutError::AuthMethodMismatch)?;
        let strategy = method.strategy.clone();
        let metadata = method.metadata.clone().unwrap_or_default();

        let fields = self.resolve_fields(&metadata)?;
        let email_address = fields
            .email
            .ok_or(CheckoutError::IncompleteProfile { missing: "email" })?;
        let email_address = Email::parse(&email_address)?;
        let first_name = fields.first_name.ok_or(CheckoutError::IncompleteProfile {
            missing: "first name",
        })?;
        let last_name = fields.last_name.ok_or(CheckoutError::IncompleteProfile {
            missing: "last name",
        })?;

        let saved_user = uow.save_user(&user).await.map_err(CheckoutError::Store)?;

        let customer = uow
            .insert_customer(NewCustomer {
                email_address,
                first_name,
                last_name,
                phone_number: fields.phone_number,
                title: metadata.title.clone(),
                user_id: saved_user.id,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CheckoutError::ProvisioningConflict,
                other => CheckoutError::Store(other),
            })?;

        uow.assign_to_channel(customer.id, ctx.channel_id)
            .await
            .map_err(CheckoutError::Store)?;

        uow.append_history(CustomerHistoryEntry {
            customer_id: customer.id,
            kind: HistoryEntryKind::CustomerRegistered,
            strategy: strategy.clone(),
        })
        .await
        .map_err(CheckoutError::Store)?;

        tracing::info!(
            customer_id = %customer.id,
            strategy = %strategy,
            "provisioned customer from external authentication method"
        );

        Ok(customer)
    }

    /// Resolve email, names and phone number per policy.
    ///
    /// For each field the obfuscation toggle generates a placeholder
    /// first; the external toggle then overwrites it when the provider
    /// supplied a non-empty value. Generating placeholders that may be
    /// overwritten is deliberate waste: this path is low-throughput and
    /// the ordering keeps the precedence rule obvious.
    fn resolve_fields(
        &self,
        metadata: &ExternalProfile,
    ) -> Result<ResolvedFields, CheckoutError> {
        let opts = &self.options;
        let mut fields = ResolvedFields::default();

        if opts.use_obfuscated_email {
            fields.email = Some(obfuscator::obfuscated_email(&opts.obfuscated_email_domain));
        }
        if opts.use_external_email_if_exists {
            if let Some(value) = non_empty(metadata.email_address.as_deref()) {
                fields.email = Some(value.to_owned());
            }
        }

        if opts.use_obfuscated_name {
            fields.first_name = Some(obfuscator::obfuscated_name("first"));
            fields.last_name = Some(obfuscator::obfuscated_name("last"));
        }
        if opts.use_external_name_if_exists {
            if let Some(value) = non_empty(metadata.first_name.as_deref()) {
                fields.first_name = Some(value.to_owned());
            }
            if let Some(value) = non_empty(metadata.last_name.as_deref()) {
                fields.last_name = Some(value.to_owned());
            }
        }

        if opts.use_obfuscated_phone_number {
            fields.phone_number =
                Some(obfuscator::phone_number(opts.obfuscated_phone_number_digits)?);
        }
        if opts.use_external_phone_number_if_exists {
            if let Some(value) = non_empty(metadata.phone_number.as_deref()) {
                fields.phone_number = Some(value.to_owned());
            }
        }

        Ok(fields)
    }
}

#[derive(Debug, Default)]
struct ResolvedFields {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
}

/// Select the external authentication method matching the session's
/// provenance. Guards against provisioning from an unrelated or stale
/// session; an absent session matches nothing.
fn matching_external_method<'a>(
    user: &'a User,
    session: Option<&Session>,
) -> Option<&'a ExternalAuthenticationMethod> {
    let session = session?;
    let external_identifier = session.external_identifier.as_deref()?;
    user.authentication_methods
        .iter()
        .filter_map(AuthenticationMethod::as_external)
        .find(|m| {
            m.strategy == session.authentication_strategy
                && m.external_identifier == external_identifier
        })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use user_checkout_core::{SessionId, UserId};

    use crate::models::Session;

    use super::*;

    fn user_with_method(strategy: &str, identifier: &str) -> User {
        User {
            id: UserId::new(),
            roles: Vec::new(),
            authentication_methods: vec![AuthenticationMethod::External(
                ExternalAuthenticationMethod {
                    strategy: strategy.to_string(),
                    external_identifier: identifier.to_string(),
                    metadata: None,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                },
            )],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn session(strategy: &str, identifier: Option<&str>) -> Session {
        Session {
            id: SessionId::new(),
            active_order_id: None,
            authentication_strategy: strategy.to_string(),
            external_identifier: identifier.map(ToString::to_string),
        }
    }

    #[test]
    fn test_matching_method_requires_strategy_and_identifier() {
        let user = user_with_method("google", "ext-1");

        assert!(matching_external_method(&user, Some(&session("google", Some("ext-1")))).is_some());
        assert!(matching_external_method(&user, Some(&session("facebook", Some("ext-1")))).is_none());
        assert!(matching_external_method(&user, Some(&session("google", Some("ext-2")))).is_none());
        assert!(matching_external_method(&user, Some(&session("google", None))).is_none());
    }

    #[test]
    fn test_matching_method_requires_a_session() {
        let user = user_with_method("google", "ext-1");
        assert!(matching_external_method(&user, None).is_none());
    }

    #[test]
    fn test_non_empty_filters_blank_values() {
        assert_eq!(non_empty(Some("x")), Some("x"));
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(None), None);
    }
}
