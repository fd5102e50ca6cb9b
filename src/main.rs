//! OrcasAI: coordinate pods of cooperating AI agents from declarative YAML.
//!
//! This is the main entry point for the `orcasai` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

mod cli;
mod commands;
pub mod assemble;
pub mod error;
pub mod exit_codes;
pub mod pod;
pub mod runtime;
pub mod template;
pub mod tools;
pub mod yaml;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
