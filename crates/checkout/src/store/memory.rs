//! In-memory implementation of the collaborator interfaces.
//!
//! Reference implementation used by the test suite and by hosts that want
//! to exercise the checkout services without a database. Unit-of-work
//! semantics are real: writes are staged and only become visible at
//! commit, and the one-customer-per-user constraint is re-checked at
//! commit time so a lost provisioning race surfaces as a conflict.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use user_checkout_core::{ChannelId, CustomerId, OrderId, SessionId, UserId};

use crate::models::{Customer, CustomerHistoryEntry, NewCustomer, Order, Role, Session, User};

use super::{
    CustomerRepository, OrderRepository, RepositoryError, RoleRepository, SessionStore,
    TransactionSource, UnitOfWork, UserRepository,
};

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    customers: Vec<Customer>,
    orders: Vec<Order>,
    sessions: HashMap<SessionId, Session>,
    customer_role: Option<Role>,
    channel_assignments: Vec<(CustomerId, ChannelId)>,
    history: Vec<CustomerHistoryEntry>,
}

/// Shared in-memory store implementing every collaborator trait.
///
/// Cloning is cheap and clones share state, so a single store can be
/// handed to the service as all of its collaborators at once.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Backend("store lock poisoned".to_string()))
    }

    // =========================================================================
    // Seed helpers
    // =========================================================================

    /// Seed a user.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn add_user(&self, user: User) {
        let mut state = self.state.lock().expect("store lock poisoned");
        state.users.insert(user.id, user);
    }

    /// Seed an order.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn add_order(&self, order: Order) {
        let mut state = self.state.lock().expect("store lock poisoned");
        state.orders.push(order);
    }

    /// Seed a session so [`SessionStore`] mutations have a row to hit.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn add_session(&self, session: Session) {
        let mut state = self.state.lock().expect("store lock poisoned");
        state.sessions.insert(session.id, session);
    }

    /// Seed an existing customer.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn add_customer(&self, customer: Customer) {
        let mut state = self.state.lock().expect("store lock poisoned");
        state.customers.push(customer);
    }

    /// Set the canonical customer role.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    pub fn set_customer_role(&self, role: Role) {
        let mut state = self.state.lock().expect("store lock poisoned");
        state.customer_role = Some(role);
    }

    // =========================================================================
    // Inspection helpers
    // =========================================================================

    /// All customers owned by `user_id`, deleted ones included.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn customers_for_user(&self, user_id: UserId) -> Vec<Customer> {
        let state = self.state.lock().expect("store lock poisoned");
        state
            .customers
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    /// The current state of a session.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<Session> {
        let state = self.state.lock().expect("store lock poisoned");
        state.sessions.get(&id).cloned()
    }

    /// The stored user, reflecting committed updates.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<User> {
        let state = self.state.lock().expect("store lock poisoned");
        state.users.get(&id).cloned()
    }

    /// All committed history entries.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn history(&self) -> Vec<CustomerHistoryEntry> {
        let state = self.state.lock().expect("store lock poisoned");
        state.history.clone()
    }

    /// Channels a customer has been assigned to.
    ///
    /// # Panics
    ///
    /// Panics if the store lock is poisoned.
    #[must_use]
    pub fn channels_of(&self, customer_id: CustomerId) -> Vec<ChannelId> {
        let state = self.state.lock().expect("store lock poisoned");
        state
            .channel_assignments
            .iter()
            .filter(|(c, _)| *c == customer_id)
            .map(|(_, ch)| *ch)
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.users.get(&id).cloned())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn find_by_user_id(
        &self,
        user_id: UserId,
        include_deleted: bool,
    ) -> Result<Option<Customer>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .customers
            .iter()
            .find(|c| c.user_id == user_id && (include_deleted || !c.is_deleted()))
            .cloned())
    }
}

#[async_trait]
impl RoleRepository for InMemoryStore {
    async fn customer_role(&self) -> Result<Role, RepositoryError> {
        let state = self.lock()?;
        state
            .customer_role
            .clone()
            .ok_or_else(|| RepositoryError::NotFound("customer role".to_string()))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find_by_id_for_channel(
        &self,
        id: OrderId,
        channel_id: ChannelId,
    ) -> Result<Option<Order>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .orders
            .iter()
            .find(|o| o.id == id && o.channels.contains(&channel_id))
            .cloned())
    }

    async fn find_active_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .orders
            .iter()
            .find(|o| o.active && o.user_id == Some(user_id))
            .cloned())
    }

    async fn create_for_user(
        &self,
        user_id: UserId,
        channel_id: ChannelId,
    ) -> Result<Order, RepositoryError> {
        let order = Order {
            id: OrderId::new(),
            active: true,
            channels: vec![channel_id],
            user_id: Some(user_id),
            created_at: Utc::now(),
        };

        let mut state = self.lock()?;
        state.orders.push(order.clone());
        Ok(order)
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn clear_active_order(&self, session: &Session) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let stored = state
            .sessions
            .get_mut(&session.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("session {}", session.id)))?;
        stored.active_order_id = None;
        Ok(())
    }
}

#[async_trait]
impl TransactionSource for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        Ok(Box::new(InMemoryUnitOfWork {
            state: Arc::clone(&self.state),
            staged_user: None,
            staged_customer: None,
            staged_channels: Vec::new(),
            staged_history: Vec::new(),
        }))
    }
}

/// Staged writes against an [`InMemoryStore`].
///
/// Nothing touches shared state until `commit`, which re-validates the
/// one-customer-per-user constraint under the store lock and applies all
/// staged writes in one critical section.
struct InMemoryUnitOfWork {
    state: Arc<Mutex<StoreState>>,
    staged_user: Option<User>,
    staged_customer: Option<Customer>,
    staged_channels: Vec<(CustomerId, ChannelId)>,
    staged_history: Vec<CustomerHistoryEntry>,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn save_user(&mut self, user: &User) -> Result<User, RepositoryError> {
        let mut saved = user.clone();
        saved.updated_at = Utc::now();
        self.staged_user = Some(saved.clone());
        Ok(saved)
    }

    async fn insert_customer(
        &mut self,
        customer: NewCustomer,
    ) -> Result<Customer, RepositoryError> {
        {
            let state = self
                .state
                .lock()
                .map_err(|_| RepositoryError::Backend("store lock poisoned".to_string()))?;
            if state.customers.iter().any(|c| c.user_id == customer.user_id) {
                return Err(RepositoryError::Conflict(format!(
                    "customer already exists for user {}",
                    customer.user_id
                )));
            }
        }

        let customer = Customer {
            id: CustomerId::new(),
            email_address: customer.email_address,
            first_name: customer.first_name,
            last_name: customer.last_name,
            phone_number: customer.phone_number,
            title: customer.title,
            user_id: customer.user_id,
            deleted_at: None,
            created_at: Utc::now(),
        };
        self.staged_customer = Some(customer.clone());
        Ok(customer)
    }

    async fn assign_to_channel(
        &mut self,
        customer_id: CustomerId,
        channel_id: ChannelId,
    ) -> Result<(), RepositoryError> {
        self.staged_channels.push((customer_id, channel_id));
        Ok(())
    }

    async fn append_history(
        &mut self,
        entry: CustomerHistoryEntry,
    ) -> Result<(), RepositoryError> {
        self.staged_history.push(entry);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| RepositoryError::Backend("store lock poisoned".to_string()))?;

        // Re-check under the lock: a concurrent unit of work may have
        // committed a customer for the same user since our insert.
        if let Some(customer) = &self.staged_customer {
            if state.customers.iter().any(|c| c.user_id == customer.user_id) {
                return Err(RepositoryError::Conflict(format!(
                    "customer already exists for user {}",
                    customer.user_id
                )));
            }
        }

        if let Some(user) = self.staged_user {
            state.users.insert(user.id, user);
        }
        if let Some(customer) = self.staged_customer {
            state.customers.push(customer);
        }
        state.channel_assignments.extend(self.staged_channels);
        state.history.extend(self.staged_history);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        // Staged writes die with the unit of work.
        Ok(())
    }
}
