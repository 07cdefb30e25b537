//! Checkout error types.

use thiserror::Error;

use user_checkout_core::EmailError;

use crate::obfuscator::ObfuscatorError;
use crate::store::RepositoryError;

/// Errors that can occur during order resolution and provisioning.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No user identity on the request, or the identity does not resolve
    /// to a known user. The caller must authenticate.
    #[error("invalid credentials")]
    Unauthenticated,

    /// The request carried no session. Session presence is guaranteed
    /// upstream, so this is a server-side fault rather than a client
    /// error.
    #[error("no session found on request")]
    SessionMissing,

    /// No authentication method on the user matches the session's
    /// strategy and external identifier. Points at tampered or stale
    /// session state; surfaced as an authentication failure.
    #[error("no authentication method matches the current session")]
    AuthMethodMismatch,

    /// A required customer field could not be resolved by any enabled
    /// policy. A configuration or upstream-data problem, not a
    /// credential failure.
    #[error("could not resolve required customer field: {missing}")]
    IncompleteProfile {
        /// The field that stayed empty.
        missing: &'static str,
    },

    /// The winning email value is not structurally valid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Obfuscation parameters are unusable (non-positive phone digit
    /// count).
    #[error("obfuscation failed: {0}")]
    Obfuscation(#[from] ObfuscatorError),

    /// A concurrent request provisioned the same user first. Callers can
    /// retry order creation; the customer now exists.
    #[error("customer was provisioned concurrently")]
    ProvisioningConflict,

    /// A collaborator failed.
    #[error("storage error: {0}")]
    Store(RepositoryError),
}
