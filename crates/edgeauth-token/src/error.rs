//! Error types for the token crate.

use thiserror::Error;

/// Errors that abort signing or building a digest token.
///
/// Verification problems are not errors: they are reported through
/// [`VerifyResult`](crate::VerifyResult) because a malformed or forged token is
/// expected input.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No application ID was given to the builder.
    #[error("application ID must be set using with_application_id before calling build")]
    MissingApplicationId,

    /// No secret was given to the builder.
    #[error("secret must be set using with_secret before calling build")]
    MissingSecret,

    /// The claims carry no numeric `expires` field.
    #[error("token must have an expiration (milliseconds since UNIX epoch)")]
    MissingExpiration,

    /// The claims already carry an `applicationId` field.
    #[error("token should not have an application ID property")]
    ApplicationIdPresent,

    /// Unknown token type name.
    #[error("invalid token type: {0} (expected auth, stream or publish)")]
    InvalidTokenType(String),

    /// The HMAC backend rejected the key.
    #[error("digest algorithm unsupported: {0}")]
    Unsupported(String),

    /// Failed to serialize claims or envelope.
    #[error("token serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
