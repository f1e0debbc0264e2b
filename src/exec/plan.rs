//! Fully resolved command line

use std::fmt;

use super::Environment;

/// The program, arguments and environment overrides of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    program: String,
    args: Vec<String>,
    env: Environment,
}

impl CommandPlan {
    pub fn new(program: impl Into<String>, args: Vec<String>, env: Environment) -> Self {
        Self {
            program: program.into(),
            args,
            env,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }
}

/// The command as a user would type it, e.g. `make -f .makefile-mkgo.mk test`
impl fmt::Display for CommandPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
