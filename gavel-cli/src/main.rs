// gavel-cli/src/main.rs
//
// Command-line entry point for the Gavel quality validation gate.
//
// Responsibilities include:
// - Parsing user-provided arguments.
// - Setting up console logging.
// - Dispatching to the subcommand implementations.
// - Managing process exit codes based on validation outcome.

use std::process;

use clap::Parser;
use log::error;

use gavel_cli::{Cli, Commands, execute_validate, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let outcome = match cli.command {
        Commands::Validate(args) => execute_validate(args),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{e:#}");
            process::exit(2);
        }
    }
}
