//! Composition of the toolchain flags variable
//!
//! The value handed to the child is the inherited value followed by one
//! ` <flag>` fragment per option, always in the order verbose, race,
//! compiler. Compiler names are not checked here; the toolchain rejects
//! unknown ones. The inherited value is handled as raw OS bytes.

use std::ffi::{OsStr, OsString};

/// Options that turn into toolchain flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolFlags<'a> {
    pub verbose: bool,
    pub race: bool,
    pub compiler: &'a str,
}

/// Append the fragments for `flags` to `prior`
pub fn compose_flags(prior: &OsStr, flags: &ToolFlags<'_>) -> OsString {
    let mut composed = prior.to_os_string();
    if flags.verbose {
        composed.push(" -v");
    }
    if flags.race {
        composed.push(" -race");
    }
    composed.push(" -compiler=");
    composed.push(flags.compiler);
    composed
}
