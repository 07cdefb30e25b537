//! Obfuscated placeholder identity data.
//!
//! Pure generation functions for plausible but non-identifying personal
//! data, used when provider data is unavailable or policy prefers
//! privacy-preserving placeholders. Every call seeds fresh randomness from
//! the thread-local RNG; outputs carry no mapping back to a real identity
//! and are safe for concurrent independent use.

use std::fmt::Write as _;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng as _;
use sha2::{Digest as _, Sha256};
use thiserror::Error;

/// Length of the digest portion of an obfuscated name.
const DIGEST_LENGTH: usize = 8;

/// Errors from the generation functions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ObfuscatorError {
    /// A phone number must have at least one digit.
    #[error("phone number digit count must be positive")]
    InvalidDigitCount,
}

/// Produce a 16-character lowercase-hex token with 64 bits of entropy.
///
/// Used as a uniqueness seed by [`obfuscated_name`]; also usable on its
/// own wherever a short collision-resistant token is needed.
#[must_use]
pub fn short_unique_id() -> String {
    let mut bytes = [0u8; 8];
    rand::rng().fill(&mut bytes);

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Produce `"<prefix>_<digest>"` where the digest is 8 characters of
/// URL-safe base64 over the SHA-256 of a fresh [`short_unique_id`].
#[must_use]
pub fn obfuscated_name(prefix: &str) -> String {
    let digest = Sha256::digest(short_unique_id().as_bytes());
    let encoded = URL_SAFE_NO_PAD.encode(digest);
    let truncated: String = encoded.chars().take(DIGEST_LENGTH).collect();
    format!("{prefix}_{truncated}")
}

/// Produce `"user_<digest>@<domain>"`.
#[must_use]
pub fn obfuscated_email(domain: &str) -> String {
    format!("{}@{domain}", obfuscated_name("user"))
}

/// Produce a string of exactly `digits` decimal digits.
///
/// The first digit is drawn from 2..=9 (phone numbers never start with 0
/// or 1), the rest uniformly from 0..=9.
///
/// # Errors
///
/// Returns [`ObfuscatorError::InvalidDigitCount`] when `digits` is zero.
pub fn phone_number(digits: usize) -> Result<String, ObfuscatorError> {
    if digits == 0 {
        return Err(ObfuscatorError::InvalidDigitCount);
    }

    let mut rng = rand::rng();
    let mut out = String::with_capacity(digits);
    out.push(char::from(b'0' + rng.random_range(2..=9u8)));
    for _ in 1..digits {
        out.push(char::from(b'0' + rng.random_range(0..=9u8)));
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_unique_id_format() {
        let id = short_unique_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_short_unique_id_does_not_repeat() {
        let a = short_unique_id();
        let b = short_unique_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_obfuscated_name_format() {
        let name = obfuscated_name("first");
        let digest = name.strip_prefix("first_").unwrap();
        assert_eq!(digest.len(), DIGEST_LENGTH);
        assert!(
            digest
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
            "digest not URL-safe: {digest}"
        );
    }

    #[test]
    fn test_obfuscated_name_does_not_repeat() {
        assert_ne!(obfuscated_name("user"), obfuscated_name("user"));
    }

    #[test]
    fn test_obfuscated_email_format() {
        let email = obfuscated_email("obfuscated.com");
        let (local, domain) = email.split_once('@').unwrap();
        assert_eq!(domain, "obfuscated.com");
        let digest = local.strip_prefix("user_").unwrap();
        assert_eq!(digest.len(), DIGEST_LENGTH);
    }

    #[test]
    fn test_phone_number_shape() {
        for digits in [1, 2, 7, 10, 15] {
            let number = phone_number(digits).unwrap();
            assert_eq!(number.len(), digits);

            let mut chars = number.chars();
            let first = chars.next().unwrap();
            assert!(('2'..='9').contains(&first), "bad leading digit in {number}");
            assert!(chars.all(|c| c.is_ascii_digit()), "non-digit in {number}");
        }
    }

    #[test]
    fn test_phone_number_rejects_zero_digits() {
        assert_eq!(phone_number(0), Err(ObfuscatorError::InvalidDigitCount));
    }

    #[test]
    fn test_phone_number_leading_digit_range() {
        // 2..=9 only; with 200 samples a 0/1 lead would show up reliably
        // if the range were wrong.
        for _ in 0..200 {
            let number = phone_number(3).unwrap();
            let first = number.chars().next().unwrap();
            assert_ne!(first, '0');
            assert_ne!(first, '1');
        }
    }
}
