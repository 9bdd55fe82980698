//! HMAC-SHA-512 digests over serialized claims.
//!
//! The HMAC key is the application ID immediately followed by the secret, with
//! no separator. This keeps tokens compatible with every existing verifier,
//! even though distinct pairs such as `("ab", "c")` and `("a", "bc")` derive
//! the same key.

use crate::error::TokenError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::fmt;

type HmacSha512 = Hmac<Sha512>;

/// A shared secret. Its `Debug` output never shows the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for signing.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl From<String> for Secret {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl From<&str> for Secret {
    fn from(secret: &str) -> Self {
        Self(secret.to_string())
    }
}

fn keyed_mac(application_id: &str, secret: &str) -> Result<HmacSha512, TokenError> {
    let mut key = Vec::with_capacity(application_id.len() + secret.len());
    key.extend_from_slice(application_id.as_bytes());
    key.extend_from_slice(secret.as_bytes());

    HmacSha512::new_from_slice(&key).map_err(|e| TokenError::Unsupported(e.to_string()))
}

/// Calculate the base64 digest of a serialized token.
pub fn calculate_digest(
    application_id: &str,
    secret: &str,
    token: &str,
) -> Result<String, TokenError> {
    let mut mac = keyed_mac(application_id, secret)?;
    mac.update(token.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check a base64 digest against a serialized token in constant time.
///
/// A digest that is not valid base64 is a mismatch, not an error.
pub fn verify_digest(
    application_id: &str,
    secret: &str,
    token: &str,
    digest: &str,
) -> Result<bool, TokenError> {
    let Ok(expected) = STANDARD.decode(digest) else {
        return Ok(false);
    };

    let mut mac = keyed_mac(application_id, secret)?;
    mac.update(token.as_bytes());

    Ok(mac.verify_slice(&expected).is_ok())
}
