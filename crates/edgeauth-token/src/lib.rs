//! # edgeauth-token
//!
//! Digest token handling for EdgeAuth.
//!
//! This crate provides functionality for:
//! - Assembling token claims with [`TokenBuilder`]
//! - Signing claims with an HMAC-SHA-512 digest keyed by application ID and secret
//! - Wrapping the signed claims into a `DIGEST:` envelope
//! - Verifying and decoding envelopes with [`verify_and_decode`]
//!
//! ## Wire Format
//!
//! ```text
//! DIGEST:<base64 {"applicationId":"…","digest":"<base64 HMAC>","token":"<claims JSON>"}>
//! ```
//!
//! The digest covers the exact bytes of the `token` string. Verification never
//! re-serializes the claims before recomputing it.
//!
//! ## Example
//!
//! ```
//! use edgeauth_token::{TokenBuilder, VerifyCode, verify_and_decode};
//!
//! let built = TokenBuilder::new()
//!     .with_application_id("my-application-id")
//!     .with_secret("my-secret")
//!     .expires_at_millis(1000)
//!     .for_channel("my-channel")
//!     .for_streaming_only()
//!     .build()
//!     .unwrap();
//!
//! let result = verify_and_decode("my-secret", built.token());
//! assert!(result.is_verified());
//!
//! let result = verify_and_decode("bad-secret", built.token());
//! assert_eq!(result.code(), VerifyCode::BadDigest);
//! ```

pub mod claims;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod token;
pub mod verify;

pub use claims::{Claims, TokenType};
pub use digest::Secret;
pub use envelope::{DIGEST_TOKEN_PREFIX, Envelope, is_digest_token, sign_and_encode};
pub use error::TokenError;
pub use token::{BuiltToken, TokenBuilder};
pub use verify::{TokenInfo, VerifyCode, VerifyResult, inspect_token_unverified, verify_and_decode};
