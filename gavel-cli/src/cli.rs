// gavel-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Gavel: media quality validation gate",
    long_about = "Runs fast file-level precondition checks via the gavel-core library, \
                  intended as a gate before expensive analysis or export steps."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validates media files ahead of analysis or export
    Validate(ValidateArgs),
    // Add other subcommands here later (e.g., assess)
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Media files to validate; video or audio is chosen by extension
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Emit a JSON report instead of human-readable lines
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
