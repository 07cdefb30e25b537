//! Shared fixtures for the checkout integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;

use user_checkout::config::CheckoutOptions;
use user_checkout::models::{
    AuthenticationMethod, ExternalAuthenticationMethod, ExternalProfile, Order, RequestContext,
    Role, Session, User,
};
use user_checkout::services::checkout::{CheckoutService, CustomerProvisioner};
use user_checkout::store::InMemoryStore;
use user_checkout_core::{ChannelId, OrderId, RoleId, SessionId, UserId};

/// Install a test subscriber; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A store pre-seeded with the canonical customer role.
pub fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.set_customer_role(Role {
        id: RoleId::new(),
        code: "customer".to_string(),
    });
    store
}

/// Wire a [`CheckoutService`] entirely against one shared store.
pub fn service(store: &InMemoryStore, options: CheckoutOptions) -> CheckoutService {
    let store = Arc::new(store.clone());
    CheckoutService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        CustomerProvisioner::new(store, options),
    )
}

/// A user whose only authentication method is the given external one.
pub fn external_user(strategy: &str, identifier: &str, metadata: Option<ExternalProfile>) -> User {
    User {
        id: UserId::new(),
        roles: Vec::new(),
        authentication_methods: vec![AuthenticationMethod::External(
            ExternalAuthenticationMethod {
                strategy: strategy.to_string(),
                external_identifier: identifier.to_string(),
                metadata,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        )],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Provider metadata with a full name and email on file.
pub fn jane_profile() -> ExternalProfile {
    ExternalProfile {
        email_address: Some("a@b.com".to_string()),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        phone_number: None,
        title: None,
    }
}

/// A session established through the given external strategy.
pub fn external_session(strategy: &str, identifier: &str) -> Session {
    Session {
        id: SessionId::new(),
        active_order_id: None,
        authentication_strategy: strategy.to_string(),
        external_identifier: Some(identifier.to_string()),
    }
}

/// A request context.
pub fn ctx(
    user_id: Option<UserId>,
    channel_id: ChannelId,
    session: Option<Session>,
) -> RequestContext {
    RequestContext {
        active_user_id: user_id,
        channel_id,
        session,
    }
}

/// An order visible in one channel.
pub fn order(channel_id: ChannelId, user_id: Option<UserId>, active: bool) -> Order {
    Order {
        id: OrderId::new(),
        active,
        channels: vec![channel_id],
        user_id,
        created_at: Utc::now(),
    }
}
