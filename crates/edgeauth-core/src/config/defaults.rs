//! Default claims for newly minted tokens.

use serde::{Deserialize, Serialize};

/// Claims applied to a token unless the caller overrides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDefaults {
    /// Lifetime of a new token, in seconds.
    #[serde(default = "default_expires_in_seconds")]
    pub expires_in_seconds: i64,

    /// One of `auth`, `stream` or `publish`. Checked when the token is built.
    #[serde(default)]
    pub token_type: Option<String>,

    #[serde(default)]
    pub capabilities: Vec<String>,

    /// Tags applied to streams created with the token.
    #[serde(default)]
    pub apply_tags: Vec<String>,
}

impl Default for TokenDefaults {
    fn default() -> Self {
        Self {
            expires_in_seconds: default_expires_in_seconds(),
            token_type: None,
            capabilities: Vec::new(),
            apply_tags: Vec::new(),
        }
    }
}

fn default_expires_in_seconds() -> i64 {
    3600
}
