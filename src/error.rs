//! Error types and helpers for user-friendly error messages
//!
//! Every failure of a run is reported once, as a single line on stderr, and
//! maps to exit code 1. Hints are extra guidance shown only in verbose mode.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures that abort an `mk` run
#[derive(Error, Debug)]
pub enum MkError {
    /// The transient makefile could not be created
    #[error("creating file [{}]: {source}", .path.display())]
    ScriptWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The makefile selected for `--show` could not be read
    #[error("opening file [{}]: {source}", .path.display())]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The target executable could not be found or started
    #[error("running {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
        hint: Option<String>,
    },

    /// The child process ran but did not succeed
    #[error("running {command}: {status}")]
    Execution { command: String, status: ExitStatus },

    /// A configuration file is unreadable or malformed
    #[error("configuration error in [{}]: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// `--show` was requested while no makefile is in use
    #[error("--show is only available in script mode (no makefile is used in direct mode)")]
    ShowUnavailable,
}

impl MkError {
    /// Create a launch error, attaching an install hint when the program is known
    pub fn launch(command: impl Into<String>, program: &str, source: io::Error) -> Self {
        let hint = match source.kind() {
            io::ErrorKind::NotFound => hints::for_program(program).map(str::to_string),
            _ => None,
        };
        Self::Launch {
            command: command.into(),
            source,
            hint,
        }
    }

    /// Create a configuration error
    pub fn config_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Extra guidance for the user, if any
    pub fn hint(&self) -> Option<&str> {
        match self {
            MkError::Launch { hint, .. } => hint.as_deref(),
            MkError::Config { .. } => Some(hints::config_file()),
            MkError::ScriptWrite { .. }
            | MkError::ScriptRead { .. }
            | MkError::Execution { .. }
            | MkError::ShowUnavailable => None,
        }
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for missing make
    pub fn make() -> &'static str {
        "Install GNU make or use your package manager:\n\
         • macOS: xcode-select --install\n\
         • Ubuntu: sudo apt install make\n\
         • Windows: winget install GnuWin32.Make"
    }

    /// Get hint for missing Go toolchain
    pub fn go() -> &'static str {
        "Install Go from https://go.dev/dl/ or use your package manager:\n\
         • macOS: brew install go\n\
         • Ubuntu: sudo apt install golang-go\n\
         • Windows: winget install GoLang.Go"
    }

    /// Get hint for an invalid mk.toml
    pub fn config_file() -> &'static str {
        "mk.toml is invalid. Common issues:\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • Unknown mode (expected \"script\" or \"direct\")\n\
         • default_targets must be an array of strings"
    }

    /// Hint for a program the engine knows how to install
    pub fn for_program(program: &str) -> Option<&'static str> {
        match program {
            "make" | "gmake" => Some(make()),
            "go" => Some(go()),
            _ => None,
        }
    }
}
