//! Active-order resolution and customer auto-provisioning.
//!
//! This crate augments a checkout flow with two cooperating behaviors:
//!
//! - [`CheckoutService`] resolves which open order is "active" for a
//!   request, self-healing stale session references along the way, and
//!   creates a fresh active order on checkout initiation.
//! - [`CustomerProvisioner`] lazily creates a customer profile for a user
//!   who authenticated through an external identity provider but has never
//!   completed checkout, filling personal-data fields from provider
//!   metadata or from obfuscated placeholders per [`CheckoutOptions`].
//!
//! Persistence, session storage and audit logging are consumed through the
//! narrow traits in [`store`]; the service is constructed with
//! already-resolved collaborator references and performs no runtime lookup
//! of its dependencies.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod models;
pub mod obfuscator;
pub mod services;
pub mod store;

pub use config::{CheckoutOptions, CheckoutOptionsOverrides, ConfigError};
pub use services::checkout::{CheckoutError, CheckoutService, CustomerProvisioner};
