// Configuration types shared by the EdgeAuth crates
pub mod config;

pub use config::{ConfigError, EdgeAuthConfig, SigningConfig, TokenDefaults};
