//! mk - a simple makefile generator for Go packages
//!
//! Translates an invocation such as `mk -v -race test` into a `make` run on
//! the project's Makefile (or a generated one), with the options folded into
//! `GOFLAGS` for the Go toolchain.
//!
//! ## Architecture
//!
//! ```text
//! cli.rs → build/ (select makefile, compose flags, resolve command) → exec/ → make | go
//! ```

mod build;
mod cli;
mod config;
mod error;
mod exec;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use error::MkError;
use utils::terminal::{print_error, print_hint};

fn main() -> ExitCode {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));
    let verbose = cli.verbose;

    // Returning instead of exiting lets the makefile guard run its cleanup
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err, verbose);
            ExitCode::FAILURE
        }
    }
}

/// Print `err` as a single line, plus its hint in verbose mode
fn report(err: &anyhow::Error, verbose: bool) {
    match err.downcast_ref::<MkError>() {
        Some(mk_err) => {
            print_error(&mk_err.to_string());
            if verbose {
                if let Some(hint) = mk_err.hint() {
                    print_hint(hint);
                }
            }
        }
        None => print_error(&format!("{err:#}")),
    }
}
