mod commands;

use clap::{Parser, Subcommand};
use commands::token::MintOptions;
use edgeauth_token::TokenError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code when a token cannot be built from the given options.
const EXIT_TOKEN_ERROR: u8 = 7;

#[derive(Parser, Debug)]
#[command(
    name = "edgeauth",
    version,
    about = "Create and check EdgeAuth digest tokens",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,

    #[command(flatten)]
    mint: MintOptions,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify a token against the application secret.
    Verify {
        /// The application secret
        #[arg(short = 'w', long, env = "EDGEAUTH_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Configuration file (YAML)
        #[arg(long, env = "EDGEAUTH_CONFIG")]
        config: Option<PathBuf>,

        /// The token, or a file containing it
        token: String,
    },

    /// Decode a token without verifying it.
    Inspect {
        /// The token, or a file containing it
        token: String,
    },
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only command output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("✖ {:#}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut stdout = std::io::stdout().lock();

    match cli.cmd {
        None => commands::token::mint(cli.mint, &mut stdout)?,

        Some(Command::Verify {
            secret,
            config,
            token,
        }) => {
            let result = commands::token::verify(secret, config, &token, &mut stdout)?;
            if !result.is_verified() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Some(Command::Inspect { token }) => commands::token::inspect(&token, &mut stdout)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_status(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<TokenError>().is_some() {
        EXIT_TOKEN_ERROR
    } else {
        1
    }
}
