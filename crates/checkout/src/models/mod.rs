//! Domain types for the checkout flow.
//!
//! These are validated domain objects, separate from whatever row or wire
//! shapes the collaborating persistence layer uses.

pub mod context;
pub mod customer;
pub mod order;
pub mod session;
pub mod user;

pub use context::RequestContext;
pub use customer::{Customer, CustomerHistoryEntry, HistoryEntryKind, NewCustomer};
pub use order::Order;
pub use session::Session;
pub use user::{
    AuthenticationMethod, ExternalAuthenticationMethod, ExternalProfile,
    LocalAuthenticationMethod, Role, User,
};
