//! User Checkout Core - Shared types library.
//!
//! This crate provides the common types used across the `user-checkout`
//! workspace.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no
//! knowledge of the checkout collaborators. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and email addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
