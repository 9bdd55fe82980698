//! Signing identity configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::ConfigError;

/// Where the application ID and shared secret come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Application ID that signs tokens.
    #[serde(default)]
    pub application_id: Option<String>,

    /// Environment variable containing the secret.
    #[serde(default)]
    pub secret_env: Option<String>,

    /// Path to a file containing the secret.
    #[serde(default)]
    pub secret_file: Option<PathBuf>,
}

impl SigningConfig {
    /// Resolve the secret from environment or file.
    ///
    /// The environment variable wins when it is set. A configured file that
    /// does not exist is an error; surrounding whitespace in the file is
    /// ignored.
    pub fn resolve_secret(&self) -> Result<Option<String>, ConfigError> {
        if let Some(env_var) = &self.secret_env {
            if let Ok(secret) = std::env::var(env_var) {
                tracing::debug!(source = %env_var, "Resolved secret from environment");
                return Ok(Some(secret));
            }
        }

        if let Some(path) = &self.secret_file {
            let secret = std::fs::read_to_string(path).map_err(|e| {
                ConfigError::Config(format!(
                    "failed to read secret file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            tracing::debug!(source = %path.display(), "Resolved secret from file");
            return Ok(Some(secret.trim().to_string()));
        }

        Ok(None)
    }
}
