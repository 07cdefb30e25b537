//! Active-order resolution and checkout initiation.

mod error;
mod provisioner;

pub use error::CheckoutError;
pub use provisioner::CustomerProvisioner;

use std::sync::Arc;

use tracing::instrument;

use crate::models::{Order, RequestContext};
use crate::store::{
    CustomerRepository, OrderRepository, RepositoryError, SessionStore, TransactionSource,
    UserRepository,
};

/// Resolves which order is "active" for a request and creates fresh
/// active orders on checkout initiation, provisioning a customer profile
/// on the way when the user has none.
///
/// Constructed with already-resolved collaborator references; performs no
/// runtime lookup of its dependencies.
pub struct CheckoutService {
    users: Arc<dyn UserRepository>,
    customers: Arc<dyn CustomerRepository>,
    orders: Arc<dyn OrderRepository>,
    sessions: Arc<dyn SessionStore>,
    transactions: Arc<dyn TransactionSource>,
    provisioner: CustomerProvisioner,
}

impl CheckoutService {
    /// Create a checkout service with its collaborators.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        customers: Arc<dyn CustomerRepository>,
        orders: Arc<dyn OrderRepository>,
        sessions: Arc<dyn SessionStore>,
        transactions: Arc<dyn TransactionSource>,
        provisioner: CustomerProvisioner,
    ) -> Self {
        Self {
            users,
            customers,
            orders,
            sessions,
            transactions,
            provisioner,
        }
    }

    /// Determine the single active order for this request, if any.
    ///
    /// The session's active-order reference is honored only when the
    /// referenced order is still flagged active and visible in the
    /// request's channel. A reference to a deactivated order is stale
    /// state (an interrupted checkout left the session behind) and is
    /// cleared as a side effect rather than reported as an error. With no
    /// usable reference, an authenticated user's active order is looked
    /// up directly. Never creates an order.
    ///
    /// # Errors
    ///
    /// - `SessionMissing` if the context carries no session.
    /// - `Store` if a collaborator fails.
    #[instrument(skip(self, ctx), fields(channel_id = %ctx.channel_id))]
    pub async fn determine_active_order(
        &self,
        ctx: &RequestContext,
    ) -> Result<Option<Order>, CheckoutError> {
        let session = ctx.session.as_ref().ok_or(CheckoutError::SessionMissing)?;

        let mut resolved = None;
        if let Some(order_id) = session.active_order_id {
            let found = self
                .orders
                .find_by_id_for_channel(order_id, ctx.channel_id)
                .await
                .map_err(CheckoutError::Store)?;

            match found {
                Some(order) if order.active => resolved = Some(order),
                Some(order) => {
                    // Deactivated but still referenced: self-heal.
                    tracing::debug!(
                        order_id = %order.id,
                        "clearing stale active-order reference from session"
                    );
                    self.sessions
                        .clear_active_order(session)
                        .await
                        .map_err(CheckoutError::Store)?;
                }
                None => {}
            }
        }

        if resolved.is_none() {
            if let Some(user_id) = ctx.active_user_id {
                resolved = self
                    .orders
                    .find_active_for_user(user_id)
                    .await
                    .map_err(CheckoutError::Store)?;
            }
        }

        Ok(resolved)
    }

    /// Create a fresh active order for the authenticated user,
    /// provisioning a customer profile first when none exists.
    ///
    /// Provisioning runs inside its own unit of work: the user-role
    /// update, customer insert, channel assignment and history entry all
    /// commit together or not at all. A commit-time conflict means a
    /// concurrent request provisioned the same user and is surfaced as
    /// `ProvisioningConflict` so the caller can retry order creation.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` if the request carries no user identity or the
    ///   identity does not resolve.
    /// - Any provisioning error from
    ///   [`CustomerProvisioner::create_customer_from_user`].
    /// - `ProvisioningConflict` if a concurrent request won the
    ///   provisioning race.
    /// - `Store` if a collaborator fails.
    #[instrument(skip(self, ctx), fields(channel_id = %ctx.channel_id))]
    pub async fn create_active_order(&self, ctx: &RequestContext) -> Result<Order, CheckoutError> {
        let user_id = ctx.active_user_id.ok_or(CheckoutError::Unauthenticated)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(CheckoutError::Store)?
            .ok_or(CheckoutError::Unauthenticated)?;

        // Deleted customers count: provisioning happens at most once per
        // user, ever.
        let existing = self
            .customers
            .find_by_user_id(user_id, true)
            .await
            .map_err(CheckoutError::Store)?;

        if existing.is_none() {
            let mut uow = self
                .transactions
                .begin()
                .await
                .map_err(CheckoutError::Store)?;

            match self
                .provisioner
                .create_customer_from_user(ctx, &user, uow.as_mut())
                .await
            {
                Ok(customer) => {
                    uow.commit().await.map_err(|e| match e {
                        RepositoryError::Conflict(_) => CheckoutError::ProvisioningConflict,
                        other => CheckoutError::Store(other),
                    })?;
                    tracing::info!(
                        user_id = %user_id,
                        customer_id = %customer.id,
                        "creating active order for newly provisioned customer"
                    );
                }
                Err(err) => {
                    if let Err(rollback_err) = uow.rollback().await {
                        tracing::warn!(
                            error = %rollback_err,
                            "rollback failed after provisioning error"
                        );
                    }
                    return Err(err);
                }
            }
        }

        self.orders
            .create_for_user(user_id, ctx.channel_id)
            .await
            .map_err(CheckoutError::Store)
    }
}
