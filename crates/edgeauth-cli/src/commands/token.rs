//! Token commands.
//!
//! `edgeauth` - Mint a new digest token (the default action).
//! `edgeauth verify` - Verify a token against a secret.
//! `edgeauth inspect` - Show a token's contents without verifying it.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use edgeauth_core::EdgeAuthConfig;
use edgeauth_token::{TokenBuilder, TokenType, VerifyResult, inspect_token_unverified, verify_and_decode};
use std::io::Write;
use std::path::PathBuf;

use super::{load_config, read_token};

/// Options for minting a token.
#[derive(Args, Debug, Clone, Default)]
pub struct MintOptions {
    /// The application ID
    #[arg(short = 'u', long, env = "EDGEAUTH_APPLICATION_ID")]
    pub application_id: Option<String>,

    /// The application secret
    #[arg(short = 'w', long, env = "EDGEAUTH_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Token life time in seconds [default: 3600]
    #[arg(
        short = 'l',
        long,
        conflicts_with = "expires_at",
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    pub expires_in_seconds: Option<i64>,

    /// Token expires at timestamp measured in milliseconds since UNIX epoch
    #[arg(short = 'e', long)]
    pub expires_at: Option<i64>,

    #[command(flatten)]
    pub kind: TokenKindArgs,

    /// [STREAMING] Comma separated list of capabilities
    #[arg(short = 'b', long, value_delimiter = ',')]
    pub capabilities: Vec<String>,

    /// Token is limited to the given session
    #[arg(short = 'z', long)]
    pub session_id: Option<String>,

    /// Token is limited to the given remote address
    #[arg(short = 'x', long)]
    pub remote_address: Option<String>,

    /// [STREAMING] Token is limited to the given origin stream
    #[arg(short = 'o', long)]
    pub origin_stream_id: Option<String>,

    /// [STREAMING] Token is limited to the given channel
    #[arg(short = 'c', long)]
    pub channel: Option<String>,

    /// [STREAMING] Token is limited to the given channel alias
    #[arg(short = 'i', long)]
    pub channel_alias: Option<String>,

    /// [STREAMING] Token is limited to the given room
    #[arg(short = 'm', long)]
    pub room: Option<String>,

    /// [STREAMING] Token is limited to the given room alias
    #[arg(short = 'n', long)]
    pub room_alias: Option<String>,

    /// [STREAMING] Token is limited to streams with the given tag
    #[arg(short = 't', long)]
    pub tag: Option<String>,

    /// [REPORTING] Apply tag to the new stream (repeatable)
    #[arg(short = 'r', long = "apply-tag")]
    pub apply_tags: Vec<String>,

    /// Custom backend URI
    #[arg(long)]
    pub uri: Option<String>,

    /// Also print the signed claims as pretty JSON
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (YAML)
    #[arg(long, env = "EDGEAUTH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Token type flags. At most one may be given.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct TokenKindArgs {
    /// Token can be used for authentication only
    #[arg(short = 'a', long)]
    pub authentication_only: bool,

    /// Token can be used for streaming only
    #[arg(short = 's', long)]
    pub streaming_only: bool,

    /// Token can be used for publishing only
    #[arg(short = 'p', long)]
    pub publishing_only: bool,
}

impl TokenKindArgs {
    fn token_type(&self) -> Option<TokenType> {
        if self.authentication_only {
            Some(TokenType::Auth)
        } else if self.streaming_only {
            Some(TokenType::Stream)
        } else if self.publishing_only {
            Some(TokenType::Publish)
        } else {
            None
        }
    }
}

/// Assemble a builder from flags, falling back to the configuration.
fn builder_from(options: MintOptions, config: &EdgeAuthConfig) -> anyhow::Result<TokenBuilder> {
    let mut builder = TokenBuilder::new();

    if let Some(application_id) = options
        .application_id
        .or_else(|| config.signing.application_id.clone())
    {
        builder = builder.with_application_id(application_id);
    }

    let secret = match options.secret {
        Some(secret) => Some(secret),
        None => config
            .signing
            .resolve_secret()
            .context("Failed to resolve the signing secret")?,
    };
    if let Some(secret) = secret {
        builder = builder.with_secret(secret);
    }

    if let Some(uri) = options.uri {
        builder = builder.with_uri(uri);
    }

    builder = match options.expires_at {
        Some(millis) => builder.expires_at_millis(millis),
        None => builder.expires_in_seconds(
            options
                .expires_in_seconds
                .unwrap_or(config.defaults.expires_in_seconds),
        ),
    };

    let token_type = match options.kind.token_type() {
        Some(token_type) => Some(token_type),
        None => config
            .defaults
            .token_type
            .as_deref()
            .map(str::parse::<TokenType>)
            .transpose()
            .context("Invalid token_type in configuration")?,
    };
    if let Some(token_type) = token_type {
        builder = builder.for_type(token_type);
    }

    if let Some(session_id) = options.session_id {
        builder = builder.for_session(session_id);
    }
    if let Some(remote_address) = options.remote_address {
        builder = builder.for_remote_address(remote_address);
    }
    if let Some(origin_stream_id) = options.origin_stream_id {
        builder = builder.for_origin_stream(origin_stream_id);
    }
    if let Some(channel) = options.channel {
        builder = builder.for_channel(channel);
    }
    if let Some(channel_alias) = options.channel_alias {
        builder = builder.for_channel_alias(channel_alias);
    }
    if let Some(room) = options.room {
        builder = builder.for_room(room);
    }
    if let Some(room_alias) = options.room_alias {
        builder = builder.for_room_alias(room_alias);
    }
    if let Some(tag) = options.tag {
        builder = builder.for_tag(tag);
    }

    let capabilities = if options.capabilities.is_empty() {
        config.defaults.capabilities.clone()
    } else {
        options.capabilities
    };
    for capability in capabilities
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
    {
        builder = builder.with_capability(capability);
    }

    let apply_tags = if options.apply_tags.is_empty() {
        config.defaults.apply_tags.clone()
    } else {
        options.apply_tags
    };
    for tag in apply_tags {
        builder = builder.apply_tag(tag);
    }

    Ok(builder)
}

/// Mint a new digest token.
pub fn mint(options: MintOptions, out: &mut impl Write) -> anyhow::Result<()> {
    let config = load_config(options.config.as_deref())?;
    let pretty = options.pretty;

    let built = builder_from(options, &config)?
        .build()
        .context("Failed to build token")?;

    writeln!(out, "{}", built.token())?;
    if pretty {
        writeln!(out, "{}", built.pretty_payload()?)?;
    }

    Ok(())
}

/// Verify a token against a secret.
///
/// Returns the verification result so the caller can pick the exit code.
pub fn verify(
    secret: Option<String>,
    config: Option<PathBuf>,
    token: &str,
    out: &mut impl Write,
) -> anyhow::Result<VerifyResult> {
    let secret = match secret {
        Some(secret) => secret,
        None => load_config(config.as_deref())?
            .signing
            .resolve_secret()
            .context("Failed to resolve the signing secret")?
            .context("Secret not provided. Either pass --secret or set EDGEAUTH_SECRET env var")?,
    };

    let token = read_token(token)?;
    let result = verify_and_decode(&secret, &token);

    match &result {
        VerifyResult::Verified(claims) => {
            writeln!(out, "✔ Token is valid")?;
            writeln!(out)?;
            writeln!(out, "{}", claims.to_pretty_string()?)?;
            if let Some(expires_at) = claims.expires_at() {
                if claims.is_expired_at(Utc::now()) {
                    writeln!(out)?;
                    writeln!(out, "  Note: token expired at {}", expires_at.to_rfc3339())?;
                }
            }
        }
        VerifyResult::Failed(code) => {
            writeln!(out, "✖ Token verification failed: {}", code)?;
        }
    }

    Ok(result)
}

/// Inspect a token without verification.
pub fn inspect(token: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let token = read_token(token)?;
    let info = inspect_token_unverified(&token)
        .map_err(|code| anyhow::anyhow!("Failed to decode token: {}", code))?;

    writeln!(out, "Token Information (unverified):")?;
    writeln!(out, "  Application ID: {}", info.application_id)?;
    writeln!(out, "  Digest: {}", info.digest)?;
    if let Some(token_type) = info.claims.token_type() {
        writeln!(out, "  Type: {}", token_type)?;
    }
    if let Some(expires_at) = info.claims.expires_at() {
        writeln!(out, "  Expires: {}", format_expiration(expires_at, Utc::now()))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&info.claims)?)?;

    Ok(())
}

fn format_expiration(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if expires_at <= now {
        format!("{} (expired)", expires_at.to_rfc3339())
    } else {
        expires_at.to_rfc3339()
    }
}
