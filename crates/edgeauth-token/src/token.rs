//! Token assembly and signing.

use crate::claims::{Claims, TokenType, fields};
use crate::digest::Secret;
use crate::envelope::Envelope;
use crate::error::TokenError;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;

/// Builder for digest tokens.
///
/// Every setter consumes the builder and returns the updated one; nothing is
/// signed until [`build`](TokenBuilder::build). Scalar claims are serialized in
/// the order they were first set. `capabilities` and `applyTags` are appended
/// after them, and only when non-empty.
#[derive(Debug, Clone, Default)]
#[must_use = "builder methods return the updated builder"]
pub struct TokenBuilder {
    application_id: Option<String>,
    secret: Option<Secret>,
    claims: Claims,
    capabilities: Vec<String>,
    apply_tags: Vec<String>,
}

impl TokenBuilder {
    /// Create an empty token builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The application ID used to sign the token (required).
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    /// The shared secret used to sign the token (required).
    pub fn with_secret(mut self, secret: impl Into<Secret>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// The backend URI.
    pub fn with_uri(self, uri: impl Into<String>) -> Self {
        self.with_claim(fields::URI, uri.into())
    }

    /// Set an arbitrary claim.
    ///
    /// `applicationId` is rejected at build time.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.set(key, value);
        self
    }

    /// Add a capability, e.g. to publish a stream.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Expire the token `seconds` from now.
    ///
    /// The local clock must be synchronized for expiration to work properly.
    pub fn expires_in_seconds(self, seconds: i64) -> Self {
        let expires = Utc::now()
            .timestamp_millis()
            .saturating_add(seconds.saturating_mul(1000));
        self.expires_at_millis(expires)
    }

    /// Expire the token at the given time.
    pub fn expires_at(self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at_millis(expires_at.timestamp_millis())
    }

    /// Expire the token at the given milliseconds since the UNIX epoch.
    pub fn expires_at_millis(self, millis: i64) -> Self {
        self.with_claim(fields::EXPIRES, millis)
    }

    /// Limit the token to one use.
    pub fn for_type(self, token_type: TokenType) -> Self {
        self.with_claim(fields::TYPE, token_type.as_str())
    }

    /// Limit the token to authentication only.
    pub fn for_authentication_only(self) -> Self {
        self.for_type(TokenType::Auth)
    }

    /// Limit the token to streaming only.
    pub fn for_streaming_only(self) -> Self {
        self.for_type(TokenType::Stream)
    }

    /// Limit the token to publishing only.
    pub fn for_publishing_only(self) -> Self {
        self.for_type(TokenType::Publish)
    }

    /// Limit the token to the given session.
    pub fn for_session(self, session_id: impl Into<String>) -> Self {
        self.with_claim(fields::SESSION_ID, session_id.into())
    }

    /// Limit the token to the given remote address.
    pub fn for_remote_address(self, remote_address: impl Into<String>) -> Self {
        self.with_claim(fields::REMOTE_ADDRESS, remote_address.into())
    }

    /// Limit the token to the given origin stream.
    pub fn for_origin_stream(self, origin_stream_id: impl Into<String>) -> Self {
        self.with_claim(fields::ORIGIN_STREAM_ID, origin_stream_id.into())
    }

    /// Limit the token to the given channel ID.
    pub fn for_channel(self, channel_id: impl AsRef<str>) -> Self {
        self.with_tag(fields::SUBSCRIBE_TAG, format!("channelId:{}", channel_id.as_ref()))
    }

    /// Limit the token to the given channel alias.
    pub fn for_channel_alias(self, channel_alias: impl AsRef<str>) -> Self {
        self.with_tag(
            fields::SUBSCRIBE_TAG,
            format!("channelAlias:{}", channel_alias.as_ref()),
        )
    }

    /// Limit the token to the given room ID.
    pub fn for_room(self, room_id: impl AsRef<str>) -> Self {
        self.with_tag(fields::REQUIRED_TAG, format!("roomId:{}", room_id.as_ref()))
    }

    /// Limit the token to the given room alias.
    pub fn for_room_alias(self, room_alias: impl AsRef<str>) -> Self {
        self.with_tag(
            fields::REQUIRED_TAG,
            format!("roomAlias:{}", room_alias.as_ref()),
        )
    }

    /// Limit the token to origin streams carrying the given tag.
    pub fn for_tag(self, tag: impl Into<String>) -> Self {
        self.with_tag(fields::REQUIRED_TAG, tag.into())
    }

    /// Apply a tag to the stream when it is set up.
    pub fn apply_tag(mut self, tag: impl Into<String>) -> Self {
        self.apply_tags.push(tag.into());
        self
    }

    // A token carries at most one required or subscribe tag.
    fn with_tag(mut self, field: &'static str, tag: String) -> Self {
        let other = if field == fields::REQUIRED_TAG {
            fields::SUBSCRIBE_TAG
        } else {
            fields::REQUIRED_TAG
        };
        self.claims.remove(other);
        self.claims.set(field, tag);
        self
    }

    /// Sign the token.
    ///
    /// Fails when the application ID, the secret or the expiration is missing.
    pub fn build(self) -> Result<BuiltToken, TokenError> {
        let application_id = self.application_id.ok_or(TokenError::MissingApplicationId)?;
        let secret = self.secret.ok_or(TokenError::MissingSecret)?;

        let mut claims = self.claims;
        if !self.capabilities.is_empty() {
            claims.set(fields::CAPABILITIES, self.capabilities);
        }
        if !self.apply_tags.is_empty() {
            claims.set(fields::APPLY_TAGS, self.apply_tags);
        }

        let envelope = Envelope::seal(&application_id, secret.expose(), &claims)?;
        let token = envelope.encode()?;

        tracing::debug!(claims = claims.len(), "Built digest token");

        Ok(BuiltToken {
            token,
            payload: envelope.token,
            claims,
        })
    }
}

/// A signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct BuiltToken {
    token: String,
    payload: String,
    claims: Claims,
}

impl BuiltToken {
    /// The encoded `DIGEST:` token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The serialized claims exactly as signed.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Pretty-printed claims for display.
    pub fn pretty_payload(&self) -> Result<String, TokenError> {
        self.claims.to_pretty_string()
    }

    pub fn into_token(self) -> String {
        self.token
    }
}

impl fmt::Display for BuiltToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}
