//! Command resolution
//!
//! Turns the mode, the makefile and the positional targets into the exact
//! command line to run.

use std::path::Path;

use crate::exec::{CommandPlan, Environment};

/// Direct-mode arguments used when no target is given: fetch the
/// dependencies of every package below the working directory
pub const DEFAULT_DIRECT_TARGETS: &[&str] = &["get", "./..."];

/// The executable a plan drives
#[derive(Debug, Clone, Copy)]
pub enum Driver<'a> {
    /// `<runner> -f <script> <targets...>`
    Script { runner: &'a str, script: &'a Path },
    /// `<toolchain> <targets...>`, or the default targets when none are given
    Direct {
        toolchain: &'a str,
        default_targets: &'a [String],
    },
}

/// Build the command line for `driver`
pub fn resolve_command(driver: Driver<'_>, targets: &[String], env: Environment) -> CommandPlan {
    match driver {
        Driver::Script { runner, script } => {
            let mut args = Vec::with_capacity(targets.len() + 2);
            args.push("-f".to_string());
            args.push(script.display().to_string());
            args.extend(targets.iter().cloned());
            CommandPlan::new(runner, args, env)
        }
        Driver::Direct {
            toolchain,
            default_targets,
        } => {
            let args = if !targets.is_empty() {
                targets.to_vec()
            } else if !default_targets.is_empty() {
                default_targets.to_vec()
            } else {
                DEFAULT_DIRECT_TARGETS.iter().map(|s| s.to_string()).collect()
            };
            CommandPlan::new(toolchain, args, env)
        }
    }
}
