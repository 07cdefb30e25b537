//! Per-request context.

use user_checkout_core::{ChannelId, UserId};

use super::Session;

/// Everything the checkout services need to know about the current
/// request.
///
/// Constructed fresh per request by the host; never stored.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user, if any.
    pub active_user_id: Option<UserId>,
    /// The sales channel this request arrived on.
    pub channel_id: ChannelId,
    /// The request's session. Order resolution requires one; its absence
    /// is treated as an upstream fault.
    pub session: Option<Session>,
}
