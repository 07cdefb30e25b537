//! Business-logic services.

pub mod checkout;
