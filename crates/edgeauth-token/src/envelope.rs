//! The `DIGEST:` envelope wrapping signed claims.

use crate::claims::{Claims, fields};
use crate::digest::calculate_digest;
use crate::error::TokenError;
use crate::verify::VerifyCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Prefix of every encoded digest token.
pub const DIGEST_TOKEN_PREFIX: &str = "DIGEST:";

/// Check if a value is a digest token. An absent value is not.
pub fn is_digest_token<'a>(encoded: impl Into<Option<&'a str>>) -> bool {
    encoded
        .into()
        .is_some_and(|token| token.starts_with(DIGEST_TOKEN_PREFIX))
}

/// Signed claims together with the application ID that signed them.
///
/// Field order is the wire order: `applicationId`, `digest`, `token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub application_id: String,
    /// Base64 HMAC-SHA-512 of `token`.
    pub digest: String,
    /// Serialized claims, exactly as digested.
    pub token: String,
}

impl Envelope {
    /// Serialize and sign claims.
    ///
    /// Claims must carry a numeric `expires` and must not carry `applicationId`.
    pub fn seal(application_id: &str, secret: &str, claims: &Claims) -> Result<Self, TokenError> {
        if !claims.has_expiration() {
            return Err(TokenError::MissingExpiration);
        }
        if claims.contains(fields::APPLICATION_ID) {
            return Err(TokenError::ApplicationIdPresent);
        }

        let token = claims.serialize()?;
        let digest = calculate_digest(application_id, secret, &token)?;

        Ok(Self {
            application_id: application_id.to_string(),
            digest,
            token,
        })
    }

    /// Encode as `DIGEST:` + base64(JSON).
    pub fn encode(&self) -> Result<String, TokenError> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}{}", DIGEST_TOKEN_PREFIX, STANDARD.encode(json)))
    }

    /// Unwrap an encoded token without checking its digest.
    ///
    /// Fails with [`VerifyCode::NotADigestToken`] when the prefix is missing and
    /// with [`VerifyCode::BadToken`] when the body is not base64 of a JSON
    /// object holding string `applicationId`, `digest` and `token` fields.
    pub fn decode(encoded: &str) -> Result<Self, VerifyCode> {
        let body = encoded
            .strip_prefix(DIGEST_TOKEN_PREFIX)
            .ok_or(VerifyCode::NotADigestToken)?;

        let json = STANDARD.decode(body).map_err(|_| VerifyCode::BadToken)?;

        serde_json::from_slice(&json).map_err(|_| VerifyCode::BadToken)
    }
}

/// Sign claims and encode them as a digest token.
pub fn sign_and_encode(
    application_id: &str,
    secret: &str,
    claims: &Claims,
) -> Result<String, TokenError> {
    Envelope::seal(application_id, secret, claims)?.encode()
}
