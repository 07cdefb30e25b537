//! Session domain types.

use serde::{Deserialize, Serialize};

use user_checkout_core::{OrderId, SessionId};

/// A checkout session as seen by this crate.
///
/// Sessions are owned by an external session layer; this crate reads the
/// active-order reference and the authentication provenance, and asks the
/// session store to clear the reference when it turns out to be stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Session key, needed by the session store to apply mutations.
    pub id: SessionId,
    /// The order this session considers active, if any.
    pub active_order_id: Option<OrderId>,
    /// Name of the authentication strategy used to establish the session.
    pub authentication_strategy: String,
    /// Identifier asserted by the external identity provider, if the
    /// session was established through one.
    pub external_identifier: Option<String>,
}
