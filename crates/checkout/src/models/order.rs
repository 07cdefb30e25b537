//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use user_checkout_core::{ChannelId, OrderId, UserId};

/// A cart/checkout aggregate.
///
/// A session's active-order reference is only honored when the referenced
/// order is still flagged active and associated with the request's
/// channel; anything else is stale state to be cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Whether this order is still the in-progress one.
    pub active: bool,
    /// Sales channels the order is visible in.
    pub channels: Vec<ChannelId>,
    /// The owning user, once known.
    pub user_id: Option<UserId>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
}
