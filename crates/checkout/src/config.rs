//! Checkout provisioning policy, loadable from environment variables.
//!
//! # Environment Variables
//!
//! All optional; absent variables fall through to the defaults below.
//!
//! - `CHECKOUT_USE_EXTERNAL_EMAIL_IF_EXISTS` - prefer provider email (default: true)
//! - `CHECKOUT_USE_EXTERNAL_NAME_IF_EXISTS` - prefer provider name (default: true)
//! - `CHECKOUT_USE_EXTERNAL_PHONE_NUMBER_IF_EXISTS` - prefer provider phone (default: true)
//! - `CHECKOUT_USE_OBFUSCATED_EMAIL` - generate a placeholder email (default: true)
//! - `CHECKOUT_USE_OBFUSCATED_NAME` - generate placeholder names (default: true)
//! - `CHECKOUT_USE_OBFUSCATED_PHONE_NUMBER` - generate a placeholder phone (default: true)
//! - `CHECKOUT_OBFUSCATED_EMAIL_DOMAIN` - placeholder email domain (default: obfuscated.com)
//! - `CHECKOUT_OBFUSCATED_PHONE_NUMBER_DIGITS` - placeholder phone length (default: 10)

use thiserror::Error;

/// Default domain for obfuscated email addresses.
const DEFAULT_EMAIL_DOMAIN: &str = "obfuscated.com";

/// Default digit count for obfuscated phone numbers.
const DEFAULT_PHONE_DIGITS: usize = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was set but unparseable.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Policy governing how customer fields are filled during provisioning.
///
/// For each of email, name, and phone number there are two toggles:
/// `use_obfuscated_*` generates a placeholder first, and
/// `use_external_*_if_exists` overwrites it with the identity provider's
/// value when one is present. With both enabled, an existing external
/// value wins; obfuscation is the fallback.
///
/// Immutable once constructed; apply overrides via
/// [`CheckoutOptionsOverrides::apply_to`] before handing the value to a
/// service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOptions {
    /// Use the provider's email address when it carries one.
    pub use_external_email_if_exists: bool,
    /// Use the provider's first/last name when it carries them.
    pub use_external_name_if_exists: bool,
    /// Use the provider's phone number when it carries one.
    pub use_external_phone_number_if_exists: bool,
    /// Generate an obfuscated placeholder email.
    pub use_obfuscated_email: bool,
    /// Generate obfuscated placeholder first/last names.
    pub use_obfuscated_name: bool,
    /// Generate an obfuscated placeholder phone number.
    pub use_obfuscated_phone_number: bool,
    /// Domain for obfuscated email addresses.
    pub obfuscated_email_domain: String,
    /// Digit count for obfuscated phone numbers.
    pub obfuscated_phone_number_digits: usize,
}

impl Default for CheckoutOptions {
    fn default() -> Self {
        Self {
            use_external_email_if_exists: true,
            use_external_name_if_exists: true,
            use_external_phone_number_if_exists: true,
            use_obfuscated_email: true,
            use_obfuscated_name: true,
            use_obfuscated_phone_number: true,
            obfuscated_email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            obfuscated_phone_number_digits: DEFAULT_PHONE_DIGITS,
        }
    }
}

/// Partial [`CheckoutOptions`]; unset fields keep the defaults.
#[derive(Debug, Clone, Default)]
pub struct CheckoutOptionsOverrides {
    /// Override for [`CheckoutOptions::use_external_email_if_exists`].
    pub use_external_email_if_exists: Option<bool>,
    /// Override for [`CheckoutOptions::use_external_name_if_exists`].
    pub use_external_name_if_exists: Option<bool>,
    /// Override for [`CheckoutOptions::use_external_phone_number_if_exists`].
    pub use_external_phone_number_if_exists: Option<bool>,
    /// Override for [`CheckoutOptions::use_obfuscated_email`].
    pub use_obfuscated_email: Option<bool>,
    /// Override for [`CheckoutOptions::use_obfuscated_name`].
    pub use_obfuscated_name: Option<bool>,
    /// Override for [`CheckoutOptions::use_obfuscated_phone_number`].
    pub use_obfuscated_phone_number: Option<bool>,
    /// Override for [`CheckoutOptions::obfuscated_email_domain`].
    pub obfuscated_email_domain: Option<String>,
    /// Override for [`CheckoutOptions::obfuscated_phone_number_digits`].
    pub obfuscated_phone_number_digits: Option<usize>,
}

impl CheckoutOptionsOverrides {
    /// Read overrides from `CHECKOUT_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but does
    /// not parse as the expected type.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            use_external_email_if_exists: get_bool_env("CHECKOUT_USE_EXTERNAL_EMAIL_IF_EXISTS")?,
            use_external_name_if_exists: get_bool_env("CHECKOUT_USE_EXTERNAL_NAME_IF_EXISTS")?,
            use_external_phone_number_if_exists: get_bool_env(
                "CHECKOUT_USE_EXTERNAL_PHONE_NUMBER_IF_EXISTS",
            )?,
            use_obfuscated_email: get_bool_env("CHECKOUT_USE_OBFUSCATED_EMAIL")?,
            use_obfuscated_name: get_bool_env("CHECKOUT_USE_OBFUSCATED_NAME")?,
            use_obfuscated_phone_number: get_bool_env("CHECKOUT_USE_OBFUSCATED_PHONE_NUMBER")?,
            obfuscated_email_domain: get_optional_env("CHECKOUT_OBFUSCATED_EMAIL_DOMAIN"),
            obfuscated_phone_number_digits: get_usize_env(
                "CHECKOUT_OBFUSCATED_PHONE_NUMBER_DIGITS",
            )?,
        })
    }

    /// Merge these overrides into `defaults`, producing the final options.
    ///
    /// Evaluated once before service construction; the result is never
    /// mutated afterwards.
    #[must_use]
    pub fn apply_to(self, defaults: CheckoutOptions) -> CheckoutOptions {
        CheckoutOptions {
            use_external_email_if_exists: self
                .use_external_email_if_exists
                .unwrap_or(defaults.use_external_email_if_exists),
            use_external_name_if_exists: self
                .use_external_name_if_exists
                .unwrap_or(defaults.use_external_name_if_exists),
            use_external_phone_number_if_exists: self
                .use_external_phone_number_if_exists
                .unwrap_or(defaults.use_external_phone_number_if_exists),
            use_obfuscated_email: self
                .use_obfuscated_email
                .unwrap_or(defaults.use_obfuscated_email),
            use_obfuscated_name: self
                .use_obfuscated_name
                .unwrap_or(defaults.use_obfuscated_name),
            use_obfuscated_phone_number: self
                .use_obfuscated_phone_number
                .unwrap_or(defaults.use_obfuscated_phone_number),
            obfuscated_email_domain: self
                .obfuscated_email_domain
                .unwrap_or(defaults.obfuscated_email_domain),
            obfuscated_phone_number_digits: self
                .obfuscated_phone_number_digits
                .unwrap_or(defaults.obfuscated_phone_number_digits),
        }
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an optional boolean environment variable.
fn get_bool_env(key: &str) -> Result<Option<bool>, ConfigError> {
    get_optional_env(key)
        .map(|value| {
            value
                .parse::<bool>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

/// Parse an optional unsigned-integer environment variable.
fn get_usize_env(key: &str) -> Result<Option<usize>, ConfigError> {
    get_optional_env(key)
        .map(|value| {
            value
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(unsafe_code)] // env::set_var is unsafe in edition 2024; test-only
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// `from_env` reads process-global state; serialize the tests that
    /// touch it.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_enable_every_toggle() {
        let options = CheckoutOptions::default();
        assert!(options.use_external_email_if_exists);
        assert!(options.use_external_name_if_exists);
        assert!(options.use_external_phone_number_if_exists);
        assert!(options.use_obfuscated_email);
        assert!(options.use_obfuscated_name);
        assert!(options.use_obfuscated_phone_number);
        assert_eq!(options.obfuscated_email_domain, "obfuscated.com");
        assert_eq!(options.obfuscated_phone_number_digits, 10);
    }

    #[test]
    fn test_empty_overrides_keep_defaults() {
        let merged = CheckoutOptionsOverrides::default().apply_to(CheckoutOptions::default());
        assert_eq!(merged, CheckoutOptions::default());
    }

    #[test]
    fn test_overrides_replace_only_set_fields() {
        let overrides = CheckoutOptionsOverrides {
            use_obfuscated_email: Some(false),
            obfuscated_phone_number_digits: Some(7),
            ..CheckoutOptionsOverrides::default()
        };

        let merged = overrides.apply_to(CheckoutOptions::default());
        assert!(!merged.use_obfuscated_email);
        assert_eq!(merged.obfuscated_phone_number_digits, 7);
        // Everything else untouched.
        assert!(merged.use_external_email_if_exists);
        assert_eq!(merged.obfuscated_email_domain, "obfuscated.com");
    }

    #[test]
    fn test_from_env_parses_set_variables() {
        let _guard = ENV_LOCK.lock().unwrap();

        // SAFETY: test-only env mutation, serialized by ENV_LOCK.
        unsafe {
            std::env::set_var("CHECKOUT_USE_OBFUSCATED_NAME", "false");
            std::env::set_var("CHECKOUT_OBFUSCATED_PHONE_NUMBER_DIGITS", "12");
        }

        let overrides = CheckoutOptionsOverrides::from_env().unwrap();
        assert_eq!(overrides.use_obfuscated_name, Some(false));
        assert_eq!(overrides.obfuscated_phone_number_digits, Some(12));

        unsafe {
            std::env::remove_var("CHECKOUT_USE_OBFUSCATED_NAME");
            std::env::remove_var("CHECKOUT_OBFUSCATED_PHONE_NUMBER_DIGITS");
        }
    }

    #[test]
    fn test_from_env_rejects_garbage() {
        let _guard = ENV_LOCK.lock().unwrap();

        // SAFETY: test-only env mutation, serialized by ENV_LOCK.
        unsafe {
            std::env::set_var("CHECKOUT_USE_OBFUSCATED_PHONE_NUMBER", "maybe");
        }

        let err = CheckoutOptionsOverrides::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _)
            if key == "CHECKOUT_USE_OBFUSCATED_PHONE_NUMBER"));

        unsafe {
            std::env::remove_var("CHECKOUT_USE_OBFUSCATED_PHONE_NUMBER");
        }
    }
}
