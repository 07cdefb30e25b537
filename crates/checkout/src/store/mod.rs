//! Collaborator interfaces consumed by the checkout services.
//!
//! This crate has no persistence of its own; everything it needs from the
//! outside world is expressed as one of the narrow traits below. The
//! services are constructed with already-resolved `Arc<dyn …>` references
//! to each collaborator.
//!
//! The provisioning writes (user update, customer insert, channel
//! assignment, history entry) all go through a [`UnitOfWork`] so the
//! backing store can make them atomic: either all four land or none do.
//! Uniqueness of "one customer per user" is the store's job; a
//! [`RepositoryError::Conflict`] from the customer insert or the commit
//! means another request provisioned the same user concurrently.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use user_checkout_core::{ChannelId, CustomerId, OrderId, UserId};

use crate::models::{Customer, CustomerHistoryEntry, NewCustomer, Order, Role, Session, User};

pub use memory::InMemoryStore;

/// Errors surfaced by the collaborator interfaces.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Constraint violation (e.g. one customer per user).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backing store failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Resolve users by id.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
}

/// Resolve customers by owning user.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Look up the customer owned by `user_id`.
    ///
    /// With `include_deleted`, soft-deleted customers are returned too;
    /// provisioning passes `true` so a deleted profile still blocks a
    /// duplicate.
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        include_deleted: bool,
    ) -> Result<Option<Customer>, RepositoryError>;
}

/// Resolve the canonical customer role.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// The role granted to every provisioned customer.
    async fn customer_role(&self) -> Result<Role, RepositoryError>;
}

/// Order lookup and creation.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Look up an order by id, visible in the given channel.
    async fn find_by_id_for_channel(
        &self,
        id: OrderId,
        channel_id: ChannelId,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Look up the user's currently active order, independent of session
    /// state.
    async fn find_active_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Create a fresh active order for the user in the given channel.
    async fn create_for_user(
        &self,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<Order, RepositoryError>;
}

/// Session mutation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Drop the session's active-order reference.
    async fn clear_active_order(&self, session: &Session) -> Result<(), RepositoryError>;
}

/// Hands out units of work.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Begin a transactional unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError>;
}

/// A transactional scope over the provisioning writes.
///
/// Writes are only visible to other requests after [`commit`]. Dropping a
/// unit of work without committing must leave the store untouched, same
/// as [`rollback`].
///
/// [`commit`]: UnitOfWork::commit
/// [`rollback`]: UnitOfWork::rollback
#[async_trait]
pub trait UnitOfWork: Send {
    /// Persist an updated user.
    async fn save_user(&mut self, user: &User) -> Result<User, RepositoryError>;

    /// Insert a new customer, assigning id and timestamps.
    ///
    /// Fails with [`RepositoryError::Conflict`] if the owning user already
    /// has a customer.
    async fn insert_customer(
        &mut self,
        customer: NewCustomer,
    ) -> Result<Customer, RepositoryError>;

    /// Associate a customer with a sales channel.
    async fn assign_to_channel(
        &mut self,
        customer_id: CustomerId,
        channel_id: ChannelId,
    ) -> Result<(), RepositoryError>;

    /// Record an audit-history event.
    async fn append_history(
        &mut self,
        entry: CustomerHistoryEntry,
    ) -> Result<(), RepositoryError>;

    /// Make all staged writes durable.
    ///
    /// Fails with [`RepositoryError::Conflict`] if a concurrent unit of
    /// work committed a customer for the same user first.
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    /// Discard all staged writes.
    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}
