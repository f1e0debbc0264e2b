//! Subprocess execution with inherited standard streams

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::CommandPlan;
use crate::error::MkError;

/// Run `plan` to completion with stdin/stdout/stderr forwarded
///
/// Nothing is captured, so interactive children behave as if run directly.
pub fn run_plan(plan: &CommandPlan) -> Result<(), MkError> {
    let program = find_program(plan.program()).ok_or_else(|| {
        MkError::launch(
            plan.to_string(),
            plan.program(),
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("executable file not found in $PATH: {}", plan.program()),
            ),
        )
    })?;

    let mut cmd = Command::new(program);
    cmd.args(plan.args());
    cmd.envs(plan.env().iter());
    cmd.stdin(Stdio::inherit());
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    let status = cmd
        .status()
        .map_err(|e| MkError::launch(plan.to_string(), plan.program(), e))?;

    if !status.success() {
        return Err(MkError::Execution {
            command: plan.to_string(),
            status,
        });
    }

    Ok(())
}

/// Locate an executable on PATH
fn find_program(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
