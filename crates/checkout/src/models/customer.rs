//! Customer domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use user_checkout_core::{CustomerId, Email, UserId};

/// A customer profile.
///
/// Created at most once per user; a missing customer for an authenticated
/// user is the sole trigger for provisioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Email address (required).
    pub email_address: Email,
    /// Given name (required).
    pub first_name: String,
    /// Family name (required).
    pub last_name: String,
    /// Phone number, if known.
    pub phone_number: Option<String>,
    /// Honorific or title, if known.
    pub title: Option<String>,
    /// The owning user.
    pub user_id: UserId,
    /// Soft-delete marker. A deleted customer still blocks re-provisioning.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Whether the customer has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Insert shape for a new customer; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    /// Email address (required).
    pub email_address: Email,
    /// Given name (required).
    pub first_name: String,
    /// Family name (required).
    pub last_name: String,
    /// Phone number, if resolved.
    pub phone_number: Option<String>,
    /// Honorific or title, if supplied by the provider.
    pub title: Option<String>,
    /// The owning user.
    pub user_id: UserId,
}

/// An audit-history event recorded against a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerHistoryEntry {
    /// The customer the event belongs to.
    pub customer_id: CustomerId,
    /// What happened.
    pub kind: HistoryEntryKind,
    /// Name of the authentication strategy that sourced the event.
    pub strategy: String,
}

/// Kinds of customer history events this crate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryEntryKind {
    /// A customer profile was provisioned for the user.
    CustomerRegistered,
}
