//! kip - command-line client for KIP (Knowledge Interaction Protocol)
//!
//! Sends KQL/KML/META commands to a Cognitive Nexus server and prints the
//! normalized `{"result": ...}` / `{"error": ...}` envelope:
//! - Single commands (`kip -c 'DESCRIBE PRIMER'`)
//! - Batches (`kip --commands '[...]'`)
//! - Server log listing (`kip logs`)

mod cli;
mod client;
mod config;
mod core;
mod logging;

use clap::Parser;
use cli::{exit_codes, Cli, Commands};
use crate::core::SecretRedactor;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = logging::init(cli.verbose, cli.json_output) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::FAILURE;
    }

    let args: Vec<String> = std::env::args().collect();
    tracing::debug!(args = ?SecretRedactor::redact_args(&args), "Starting kip");

    let config = match cli.connection.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::FAILURE;
        }
    };

    // Create tokio runtime for the request
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::FAILURE;
        }
    };

    let outcome = match cli.subcommand {
        Some(Commands::Logs(args)) => rt.block_on(cli::logs::run(args, config, cli.compact)),
        None => rt.block_on(cli::execute::run(cli.execute, config, cli.compact)),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::FAILURE
        }
    }
}
