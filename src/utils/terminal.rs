//! Terminal output utilities
//!
//! All diagnostics go to stderr so the child's stdout stays untouched.

use console::style;

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}: {}", style("error").red().bold(), message);
}

/// Print a warning message to stderr
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", style("warning").yellow().bold(), message);
}

/// Print a hint block to stderr
pub fn print_hint(hint: &str) {
    eprintln!("{}: {}", style("hint").cyan().bold(), hint);
}

/// Print a progress line to stderr when verbose output is enabled
pub fn print_verbose(verbose: bool, message: &str) {
    if verbose {
        eprintln!("{} {}", style("mk:").dim(), message);
    }
}

/// Turn colored output off for both streams
pub fn disable_colors() {
    console::set_colors_enabled(false);
    console::set_colors_enabled_stderr(false);
}
