//! Configuration types for EdgeAuth tools.
//!
//! A single YAML file (conventionally `edgeauth.yaml`) describes how tokens are
//! signed and which claims new tokens start from:
//!
//! ```yaml
//! signing:
//!   application_id: my-application-id
//!   secret_env: EDGEAUTH_SECRET
//!   secret_file: /run/secrets/edgeauth
//! defaults:
//!   expires_in_seconds: 3600
//!   token_type: stream
//!   capabilities: [multi-bitrate]
//!   apply_tags: [customer1]
//! ```
//!
//! The secret itself never appears in the file, only where to find it.

pub mod defaults;
pub mod signing;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use defaults::TokenDefaults;
pub use signing::SigningConfig;

/// Complete EdgeAuth configuration loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeAuthConfig {
    /// Signing identity and secret location.
    #[serde(default)]
    pub signing: SigningConfig,

    /// Claims applied to every new token unless overridden.
    #[serde(default)]
    pub defaults: TokenDefaults,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EdgeAuthConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading EdgeAuth configuration");

        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot produce a usable token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.expires_in_seconds <= 0 {
            return Err(ConfigError::Config(format!(
                "defaults.expires_in_seconds must be positive, got {}",
                self.defaults.expires_in_seconds
            )));
        }

        if let Some(env_var) = &self.signing.secret_env {
            if env_var.trim().is_empty() {
                return Err(ConfigError::Config(
                    "signing.secret_env must name an environment variable".to_string(),
                ));
            }
        }

        Ok(())
    }
}
