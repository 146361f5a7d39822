// SPDX-FileCopyrightText: 2026 Matrix Agent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Matrix Agent - a blockchain forensics chat assistant.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;
mod render;
mod shell;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Matrix Agent - a blockchain forensics chat assistant.
#[derive(Parser, Debug)]
#[command(name = "matrix", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Accept the disclaimer, enter an invite code and start chatting.
    Shell,
    /// Generate a forensic report for one address.
    Analyze {
        /// Address to analyze (0x... or Base58).
        address: String,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List recorded disclaimer acceptances.
    Consent {
        /// Print the records as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match matrix_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            matrix_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Shell) => shell::run_shell(config).await,
        Some(Commands::Analyze { address, json }) => commands::run_analyze(&address, json),
        Some(Commands::Consent { json }) => commands::run_consent(&config, json).await,
        None => {
            println!("matrix: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber on stderr with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("matrix={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
