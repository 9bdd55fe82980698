//! CLI command implementations.

pub mod token;

use anyhow::Context;
use edgeauth_core::EdgeAuthConfig;
use std::fs;
use std::path::Path;

/// Load the configuration file, or the built-in defaults when none is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EdgeAuthConfig> {
    match path {
        Some(path) => EdgeAuthConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => {
            tracing::debug!("No configuration file, using defaults");
            Ok(EdgeAuthConfig::default())
        }
    }
}

/// Accept either a token or the path of a file holding one.
pub fn read_token(token: &str) -> anyhow::Result<String> {
    let path = Path::new(token);
    if path.is_file() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read token from file: {}", path.display()))?;
        return Ok(content.trim().to_string());
    }

    Ok(token.trim().to_string())
}
