//! Token verification and inspection.

use crate::claims::{Claims, fields};
use crate::digest::verify_digest;
use crate::envelope::Envelope;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome code of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerifyCode {
    /// Digest matched and the claims decoded.
    Verified,
    /// The envelope or the claims are malformed.
    BadToken,
    /// The digest does not match the claims for this secret.
    BadDigest,
    /// The value does not start with `DIGEST:`.
    NotADigestToken,
    /// The digest algorithm is not available.
    Unsupported,
}

impl VerifyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyCode::Verified => "verified",
            VerifyCode::BadToken => "bad-token",
            VerifyCode::BadDigest => "bad-digest",
            VerifyCode::NotADigestToken => "not-a-digest-token",
            VerifyCode::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for VerifyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of verifying a digest token.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyResult {
    /// The token is authentic. The claims include the injected `applicationId`.
    Verified(Claims),
    /// The token was rejected. Never carries [`VerifyCode::Verified`].
    Failed(VerifyCode),
}

impl VerifyResult {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerifyResult::Verified(_))
    }

    pub fn code(&self) -> VerifyCode {
        match self {
            VerifyResult::Verified(_) => VerifyCode::Verified,
            VerifyResult::Failed(code) => *code,
        }
    }

    /// The verified claims, if any.
    pub fn value(&self) -> Option<&Claims> {
        match self {
            VerifyResult::Verified(claims) => Some(claims),
            VerifyResult::Failed(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Claims> {
        match self {
            VerifyResult::Verified(claims) => Some(claims),
            VerifyResult::Failed(_) => None,
        }
    }
}

fn failed(code: VerifyCode) -> VerifyResult {
    tracing::debug!(code = %code, "Digest token verification failed");
    VerifyResult::Failed(code)
}

/// Verify and decode a digest token.
///
/// The digest is recomputed over the raw `token` string from the envelope and
/// compared in constant time. On success the claims are returned with the
/// signing `applicationId` appended.
pub fn verify_and_decode(secret: &str, encoded: &str) -> VerifyResult {
    let envelope = match Envelope::decode(encoded) {
        Ok(envelope) => envelope,
        Err(code) => return failed(code),
    };

    match verify_digest(
        &envelope.application_id,
        secret,
        &envelope.token,
        &envelope.digest,
    ) {
        Ok(true) => {}
        Ok(false) => return failed(VerifyCode::BadDigest),
        Err(e) => {
            tracing::warn!(error = %e, "Digest algorithm unavailable");
            return failed(VerifyCode::Unsupported);
        }
    }

    // Signed by a secret holder, but still untrusted input until parsed.
    let mut claims = match Claims::parse(&envelope.token) {
        Ok(claims) => claims,
        Err(_) => return failed(VerifyCode::BadToken),
    };
    claims.set(fields::APPLICATION_ID, envelope.application_id);

    VerifyResult::Verified(claims)
}

/// Inspect a token without verification (for debugging).
pub fn inspect_token_unverified(encoded: &str) -> Result<TokenInfo, VerifyCode> {
    let envelope = Envelope::decode(encoded)?;
    let claims = Claims::parse(&envelope.token).map_err(|_| VerifyCode::BadToken)?;

    Ok(TokenInfo {
        application_id: envelope.application_id,
        digest: envelope.digest,
        claims,
    })
}

/// Information about a token (for inspection). Nothing here is authenticated.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// Application ID claimed by the envelope.
    pub application_id: String,
    /// Digest carried by the envelope.
    pub digest: String,
    /// Claims as signed, without the injected `applicationId`.
    pub claims: Claims,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{DIGEST_TOKEN_PREFIX, sign_and_encode};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde_json::json;

    fn signed(application_id: &str, secret: &str) -> String {
        let mut claims = Claims::new();
        claims.set(fields::EXPIRES, 1000);
        claims.set(fields::TYPE, "publish");
        claims.set(fields::CAPABILITIES, vec!["streaming".to_string()]);
        sign_and_encode(application_id, secret, &claims).unwrap()
    }

    #[test]
    fn test_verify_injects_application_id() {
        let result = verify_and_decode("secret", &signed("app", "secret"));

        assert!(result.is_verified());
        assert_eq!(result.code(), VerifyCode::Verified);

        let claims = result.into_value().unwrap();
        assert_eq!(claims.application_id(), Some("app"));
        assert_eq!(claims.expires(), Some(1000));
        assert_eq!(claims.get(fields::CAPABILITIES), Some(&json!(["streaming"])));
        assert_eq!(
            claims.serialize().unwrap(),
            r#"{"expires":1000,"type":"publish","capabilities":["streaming"],"applicationId":"app"}"#
        );
    }

    #[test]
    fn test_wrong_secret_is_bad_digest() {
        let result = verify_and_decode("other", &signed("app", "secret"));
        assert_eq!(result, VerifyResult::Failed(VerifyCode::BadDigest));
        assert!(result.value().is_none());
    }

    #[test]
    fn test_not_a_digest_token() {
        let result = verify_and_decode("secret", "Bearer abc");
        assert_eq!(result.code(), VerifyCode::NotADigestToken);
    }

    #[test]
    fn test_bad_token() {
        let result = verify_and_decode("bad-secret", "DIGEST:bad-token");
        assert_eq!(result.code(), VerifyCode::BadToken);
        assert!(!result.is_verified());
    }

    #[test]
    fn test_digested_but_unparsable_claims() {
        let token = "not json";
        let digest = crate::digest::calculate_digest("app", "secret", token).unwrap();
        let envelope = Envelope {
            application_id: "app".to_string(),
            digest,
            token: token.to_string(),
        };

        let result = verify_and_decode("secret", &envelope.encode().unwrap());
        assert_eq!(result.code(), VerifyCode::BadToken);
    }

    #[test]
    fn test_signed_application_id_is_overwritten_in_place() {
        let token = r#"{"applicationId":"spoofed","expires":1000,"type":"auth"}"#;
        let envelope = Envelope {
            application_id: "app".to_string(),
            digest: crate::digest::calculate_digest("app", "secret", token).unwrap(),
            token: token.to_string(),
        };

        let claims = verify_and_decode("secret", &envelope.encode().unwrap())
            .into_value()
            .unwrap();

        assert_eq!(claims.application_id(), Some("app"));
        assert_eq!(
            claims.serialize().unwrap(),
            r#"{"applicationId":"app","expires":1000,"type":"auth"}"#
        );
    }

    #[test]
    fn test_tampered_claims_are_rejected() {
        let mut envelope = Envelope::decode(&signed("app", "secret")).unwrap();
        envelope.token = envelope.token.replace("publish", "stream");

        let result = verify_and_decode("secret", &envelope.encode().unwrap());
        assert_eq!(result.code(), VerifyCode::BadDigest);
    }

    #[test]
    fn test_flipping_any_body_byte_never_verifies() {
        let encoded = signed("app", "secret");
        let body = encoded.strip_prefix(DIGEST_TOKEN_PREFIX).unwrap();
        let mut bytes = STANDARD.decode(body).unwrap();

        for i in 0..bytes.len() {
            bytes[i] ^= 0x01;
            let tampered = format!("{}{}", DIGEST_TOKEN_PREFIX, STANDARD.encode(&bytes));
            let result = verify_and_decode("secret", &tampered);
            assert!(
                matches!(result.code(), VerifyCode::BadToken | VerifyCode::BadDigest),
                "byte {i} produced {}",
                result.code()
            );
            bytes[i] ^= 0x01;
        }
    }

    #[test]
    fn test_flipping_any_encoded_char_never_verifies() {
        let encoded = signed("app", "secret");
        let prefix_len = DIGEST_TOKEN_PREFIX.len();

        for i in prefix_len..encoded.len() {
            let mut chars: Vec<char> = encoded.chars().collect();
            chars[i] = if chars[i] == 'A' { 'B' } else { 'A' };
            let tampered: String = chars.into_iter().collect();

            assert!(!verify_and_decode("secret", &tampered).is_verified());
        }
    }

    #[test]
    fn test_inspect_token_unverified() {
        let info = inspect_token_unverified(&signed("app", "secret")).unwrap();
        assert_eq!(info.application_id, "app");
        assert_eq!(info.digest.len(), 88);
        assert_eq!(info.claims.expires(), Some(1000));
        assert!(!info.claims.contains(fields::APPLICATION_ID));

        assert_eq!(
            inspect_token_unverified("nope").unwrap_err(),
            VerifyCode::NotADigestToken
        );
    }

    #[test]
    fn test_code_strings() {
        assert_eq!(VerifyCode::Verified.to_string(), "verified");
        assert_eq!(VerifyCode::BadToken.to_string(), "bad-token");
        assert_eq!(VerifyCode::BadDigest.to_string(), "bad-digest");
        assert_eq!(VerifyCode::NotADigestToken.to_string(), "not-a-digest-token");
        assert_eq!(VerifyCode::Unsupported.to_string(), "unsupported");
        assert_eq!(
            serde_json::to_string(&VerifyCode::NotADigestToken).unwrap(),
            "\"not-a-digest-token\""
        );
    }
}
