//! Validated email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input exceeds the RFC 5321 length limit.
    #[error("email must be at most {} characters", Email::MAX_LENGTH)]
    TooLong,
    /// The input has no `@` separator.
    #[error("email must contain an @ separator")]
    MissingSeparator,
    /// Nothing before the `@`.
    #[error("email local part cannot be empty")]
    MissingLocalPart,
    /// Nothing after the `@`.
    #[error("email domain cannot be empty")]
    MissingDomain,
}

/// A structurally valid email address.
///
/// Validation is deliberately shallow: a bounded length and a non-empty
/// local part and domain around a single `@` separator. Anything stricter
/// belongs to the identity provider that issued the address.
///
/// ```
/// use user_checkout_core::Email;
///
/// let email = Email::parse("jane@example.com")?;
/// assert_eq!(email.local_part(), "jane");
/// assert_eq!(email.domain(), "example.com");
/// # Ok::<(), user_checkout_core::EmailError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first structural problem
    /// found: empty input, over-long input, a missing `@`, or an empty
    /// local part or domain.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        if input.is_empty() {
            return Err(EmailError::Empty);
        }
        if input.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong);
        }

        let (local, domain) = input.split_once('@').ok_or(EmailError::MissingSeparator)?;
        if local.is_empty() {
            return Err(EmailError::MissingLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::MissingDomain);
        }

        Ok(Self(input.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the part before the `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or("", |(local, _)| local)
    }

    /// Returns the part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_addresses() {
        for input in [
            "jane@example.com",
            "jane.doe+tag@sub.example.co.uk",
            "user_x2Fh9QkL@obfuscated.com",
            "a@b",
        ] {
            assert!(Email::parse(input).is_ok(), "expected valid: {input}");
        }
    }

    #[test]
    fn test_parse_rejects_structure_errors() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("no-separator"), Err(EmailError::MissingSeparator));
        assert_eq!(Email::parse("@example.com"), Err(EmailError::MissingLocalPart));
        assert_eq!(Email::parse("jane@"), Err(EmailError::MissingDomain));
    }

    #[test]
    fn test_parse_rejects_over_long_input() {
        let long = format!("{}@example.com", "a".repeat(Email::MAX_LENGTH));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong));
    }

    #[test]
    fn test_accessors() {
        let email = Email::parse("jane@example.com").unwrap();
        assert_eq!(email.as_str(), "jane@example.com");
        assert_eq!(email.local_part(), "jane");
        assert_eq!(email.domain(), "example.com");
        assert_eq!(format!("{email}"), "jane@example.com");
    }

    #[test]
    fn test_from_str_and_as_ref() {
        let email: Email = "jane@example.com".parse().unwrap();
        let s: &str = email.as_ref();
        assert_eq!(s, "jane@example.com");
    }

    #[test]
    fn test_serde_transparent() {
        let email = Email::parse("jane@example.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"jane@example.com\"");

        let parsed: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, email);
    }
}
