//! cadencectl - fixed-rate command streams over WebSocket
//!
//! Drives the drift-free scheduler from the command line: an offline pulse,
//! a numbered command sender, a receive-only listener, and a local echo
//! server to point them at.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod config;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{ListenArgs, PulseArgs, SendArgs, ServeArgs};
use crate::config::Config;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "cadencectl")]
#[command(about = "Fixed-rate, drift-free command streams over WebSocket")]
#[command(version)]
#[command(long_about = "
cadencectl runs work at a fixed rate on a drift-free schedule: every deadline
is the previous deadline plus one period, so time spent doing the work never
accumulates as drift.

Rates, endpoints and the echo server can be preset in a YAML config file
(--config or CADENCE_CONFIG). Flags override the file.
Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// YAML config file
    #[arg(long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log "Command sent at <ms> ms" at a fixed rate without connecting
    Pulse(PulseArgs),

    /// Send "<command> <seq>" to a server at a fixed rate and log replies
    Send(SendArgs),

    /// Log every message a server sends until Ctrl-C or server close
    Listen(ListenArgs),

    /// Run a WebSocket echo server
    Serve(ServeArgs),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "cadencectl={log_level},cadence_scheduler={log_level},cadence_link={log_level}"
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let code = e
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Pulse(args) => {
            commands::pulse::execute(args, &load_config(cli)?, cli.json).await
        }
        Commands::Send(args) => {
            commands::send::execute(args, &load_config(cli)?, cli.json).await
        }
        Commands::Listen(args) => {
            commands::listen::execute(args, &load_config(cli)?, cli.json).await
        }
        Commands::Serve(args) => {
            commands::serve::execute(args, &load_config(cli)?, cli.json).await
        }
        Commands::Completion { shell } => {
            completion::generate_completion(*shell);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Config::load_optional(cli.config.as_deref())
}
