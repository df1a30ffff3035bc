//! SecretBox CLI - seal JSON files to the current user account
//!
//! `secretbox <encrypt|decrypt> <input-file> <output-file> [entropy-hex]`
//!
//! Prints one line on stdout: a confirmation on success (exit 0) or the
//! error on failure (exit 1).

mod app;
mod cli;
mod config;
mod constants;
mod errors;
mod logging;

use clap::error::ErrorKind;
use clap::Parser;

use secretbox_core::USAGE;

use crate::cli::Cli;
use crate::constants::exit_codes;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            println!("{}", USAGE);
            std::process::exit(exit_codes::FAILURE);
        }
    };

    logging::init_tracing();

    match app::run(&cli) {
        Ok(invocation) => {
            if !cli.quiet {
                println!("{}", app::success_line(&invocation));
            }
        }
        Err(err) => {
            tracing::debug!(error = ?err, "run failed");
            errors::exit_with(&err);
        }
    }
}
