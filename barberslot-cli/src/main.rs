// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! BarberSlot CLI - browse providers and book-able hours from the command line.
//!
//! # Examples
//!
//! ```bash
//! # List providers
//! barberslot providers
//!
//! # One day of a provider's schedule
//! barberslot availability abc --date 2024-05-10
//!
//! # Drive the selection flow from stdin
//! printf 'select xyz\npick 2024-05-11\n' | barberslot session abc
//!
//! # JSON output
//! barberslot providers --format json --pretty
//!
//! # Point at another server
//! barberslot --api-url https://booking.example.com providers
//! ```

mod commands;
mod output;

use anyhow::Result;
use barberslot_fetch::FetchError;
use barberslot_store::StoreError;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{availability, config, providers, session};

// ============================================================================
// CLI Definition
// ============================================================================

/// BarberSlot CLI - appointment availability browser.
#[derive(Parser)]
#[command(name = "barberslot")]
#[command(about = "Browse providers and open appointment hours")]
#[command(long_about = r#"
BarberSlot talks to a booking API and shows which hours a provider has
open on a given day.

Examples:
  barberslot                              # List providers
  barberslot availability abc             # Today's hours for provider abc
  barberslot availability abc -d 2024-05-10
  barberslot session abc                  # Interactive selection flow
  barberslot config set platform ios      # Use the persistent picker
"#)]
#[command(version)]
#[command(author = "BarberSlot Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'providers' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Booking API base URL (overrides settings and BARBERSLOT_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Date-picker platform (android, ios, or one from settings).
    #[arg(long, global = true)]
    pub platform: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List providers (default if no command specified).
    #[command(visible_alias = "p")]
    Providers,

    /// Show one day of a provider's schedule.
    #[command(visible_alias = "a")]
    Availability(availability::AvailabilityArgs),

    /// Run the selection flow, reading commands from stdin.
    #[command(visible_alias = "s")]
    Session(session::SessionArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// The booking API rejected or failed the request.
    FetchFailed = 2,
    /// Invalid settings or arguments.
    ConfigError = 3,
    /// Timeout.
    Timeout = 4,
}

impl ExitCode {
    /// Picks the exit code for an error.
    fn for_error(err: &anyhow::Error) -> Self {
        if let Some(fetch) = err.downcast_ref::<FetchError>() {
            return match fetch {
                FetchError::Timeout(_) => Self::Timeout,
                FetchError::InvalidUrl(_) => Self::ConfigError,
                _ => Self::FetchFailed,
            };
        }
        if let Some(store) = err.downcast_ref::<StoreError>() {
            return match store {
                StoreError::Fetch(FetchError::InvalidUrl(_)) => Self::ConfigError,
                e if e.is_config() => Self::ConfigError,
                _ => Self::Error,
            };
        }
        Self::Error
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("barberslot=debug,info")
    } else {
        EnvFilter::new("barberslot=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Providers) | None => providers::run(&cli).await,
        Some(Commands::Availability(args)) => availability::run(args, &cli).await,
        Some(Commands::Session(args)) => session::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
