//! Token claims and their canonical serialization.

use crate::error::TokenError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Claim names used in digest tokens.
pub mod fields {
    /// Injected by the verifier; never present in signed claims.
    pub const APPLICATION_ID: &str = "applicationId";
    pub const URI: &str = "uri";
    pub const EXPIRES: &str = "expires";
    pub const TYPE: &str = "type";
    pub const SESSION_ID: &str = "sessionId";
    pub const REMOTE_ADDRESS: &str = "remoteAddress";
    pub const ORIGIN_STREAM_ID: &str = "originStreamId";
    pub const REQUIRED_TAG: &str = "requiredTag";
    pub const SUBSCRIBE_TAG: &str = "subscribeTag";
    pub const CAPABILITIES: &str = "capabilities";
    pub const APPLY_TAGS: &str = "applyTags";
}

/// What a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Authentication only.
    Auth,
    /// Streaming (subscribing) only.
    Stream,
    /// Publishing only.
    Publish,
}

impl TokenType {
    /// Wire name of the token type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Auth => "auth",
            TokenType::Stream => "stream",
            TokenType::Publish => "publish",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(TokenType::Auth),
            "stream" => Ok(TokenType::Stream),
            "publish" => Ok(TokenType::Publish),
            other => Err(TokenError::InvalidTokenType(other.to_string())),
        }
    }
}

/// Claims carried by a digest token, kept in insertion order.
///
/// The serialized form is the exact input of the digest, so two claim sets
/// with the same entries in a different order produce different tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    /// Create an empty claim set.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Parse claims from a JSON object string.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Map<String, Value>>(json).map(Self)
    }

    /// Insert or overwrite a claim, returning the previous value.
    ///
    /// An overwritten claim keeps the position of its first insertion.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a claim; the remaining claims keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let previous = self.0.get(key).cloned();
        if previous.is_some() {
            self.0.retain(|k, _| k != key);
        }
        previous
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a claim as a string slice, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    /// Whether `expires` is present and numeric.
    pub fn has_expiration(&self) -> bool {
        matches!(self.0.get(fields::EXPIRES), Some(Value::Number(_)))
    }

    /// Expiration in milliseconds since the UNIX epoch.
    pub fn expires(&self) -> Option<i64> {
        self.0.get(fields::EXPIRES).and_then(Value::as_i64)
    }

    /// Expiration as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires().and_then(DateTime::from_timestamp_millis)
    }

    /// Check if the token has expired at `now`.
    ///
    /// Informational only: neither the codec nor the verifier enforces expiration.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expires_at| expires_at <= now)
    }

    /// The token type, if present and recognized.
    pub fn token_type(&self) -> Option<TokenType> {
        self.get_str(fields::TYPE).and_then(|t| t.parse().ok())
    }

    /// The application ID injected by a successful verification.
    pub fn application_id(&self) -> Option<&str> {
        self.get_str(fields::APPLICATION_ID)
    }

    /// Compact JSON in insertion order. This is the string that gets digested.
    pub fn serialize(&self) -> Result<String, TokenError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Pretty-printed JSON for display.
    pub fn to_pretty_string(&self) -> Result<String, TokenError> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Claims> for Value {
    fn from(claims: Claims) -> Self {
        Value::Object(claims.0)
    }
}

impl<'a> IntoIterator for &'a Claims {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
