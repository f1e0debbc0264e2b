//! Invocation translation
//!
//! One run goes through these steps:
//!
//! ```text
//! Start → (materialize makefile) → compose flags → resolve command
//!       → run subprocess → cleanup → exit
//! ```
//!
//! Cleanup happens on every path, including failures.
//!
//! ## Modules
//!
//! - `templates` - the embedded makefile template
//! - `script` - makefile selection and the generated-file guard
//! - `flags` - composition of the flags environment variable
//! - `resolve` - the command line for script or direct mode

pub mod flags;
pub mod resolve;
pub mod script;
pub mod templates;

use std::ffi::OsStr;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::{MkConfig, Mode};
use crate::error::MkError;
use crate::exec::{inherited_value, run_plan, CommandPlan, Environment};
use crate::utils::paths::HostFs;
use crate::utils::terminal::{print_verbose, print_warning};
use flags::{compose_flags, ToolFlags};
use resolve::{resolve_command, Driver, DEFAULT_DIRECT_TARGETS};
use script::{materialize, select_script, ScriptGuard, ScriptOrigin, ScriptSelection};
use templates::{MAKEFILE_TEMPLATE, TEMPLATE_TARGETS};

/// Compiler used when neither the command line nor mk.toml names one
pub const DEFAULT_COMPILER: &str = "gc";

/// Parsed command-line state relevant to a run
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub verbose: bool,
    pub race: bool,
    pub compiler: Option<String>,
    pub makefile: Option<PathBuf>,
    pub targets: Vec<String>,
}

/// Everything a run needs, after layering the command line over mk.toml
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub verbose: bool,
    pub race: bool,
    pub compiler: String,
    pub makefile: Option<PathBuf>,
    pub runner: String,
    pub toolchain: String,
    pub flags_var: String,
    pub default_targets: Vec<String>,
    pub targets: Vec<String>,
}

impl Settings {
    /// Layer `invocation` over `config` and the built-in defaults
    pub fn resolve(invocation: Invocation, config: MkConfig) -> Self {
        Self {
            mode: config.mode.unwrap_or_default(),
            verbose: invocation.verbose,
            race: invocation.race,
            compiler: invocation
                .compiler
                .or(config.compiler)
                .unwrap_or_else(|| DEFAULT_COMPILER.to_string()),
            makefile: invocation.makefile.or(config.makefile),
            runner: config.runner.unwrap_or_else(|| "make".to_string()),
            toolchain: config.toolchain.unwrap_or_else(|| "go".to_string()),
            flags_var: config.flags_var.unwrap_or_else(|| "GOFLAGS".to_string()),
            default_targets: config.default_targets.unwrap_or_else(|| {
                DEFAULT_DIRECT_TARGETS.iter().map(|s| s.to_string()).collect()
            }),
            targets: invocation.targets,
        }
    }

    fn tool_flags(&self) -> ToolFlags<'_> {
        ToolFlags {
            verbose: self.verbose,
            race: self.race,
            compiler: &self.compiler,
        }
    }
}

/// Execute one run described by `settings`
pub fn run(settings: &Settings, fs: &HostFs) -> Result<()> {
    let prepared = match settings.mode {
        Mode::Script => Some(prepare_script(settings, fs)?),
        Mode::Direct => None,
    };

    let outcome = execute(settings, prepared.as_ref().map(|(selection, _)| selection));

    if let Some((_, guard)) = prepared {
        release(guard, settings.verbose);
    }

    outcome
}

/// Print the makefile a run would use
pub fn show(settings: &Settings, fs: &HostFs) -> Result<()> {
    if settings.mode == Mode::Direct {
        return Err(MkError::ShowUnavailable.into());
    }

    let (selection, guard) = prepare_script(settings, fs)?;
    let outcome = dump_script(&selection, fs);
    release(guard, settings.verbose);
    outcome
}

fn prepare_script(settings: &Settings, fs: &HostFs) -> Result<(ScriptSelection, ScriptGuard)> {
    let selection = select_script(settings.makefile.as_deref(), fs);
    print_verbose(
        settings.verbose,
        &format!(
            "using makefile {} ({})",
            selection.path().display(),
            selection.origin()
        ),
    );

    if settings.verbose && selection.origin() == ScriptOrigin::Generated {
        for target in undefined_targets(&settings.targets) {
            print_verbose(
                true,
                &format!("target '{target}' is not defined by the generated makefile"),
            );
        }
    }

    let guard = materialize(&selection, fs, MAKEFILE_TEMPLATE)?;
    Ok((selection, guard))
}

/// Targets the generated makefile has no rule for
///
/// Make options (`-j4`) and variable assignments (`GOOS=linux`) are not
/// targets and are skipped.
fn undefined_targets(targets: &[String]) -> Vec<&str> {
    targets
        .iter()
        .map(String::as_str)
        .filter(|t| !t.starts_with('-') && !t.contains('='))
        .filter(|t| !TEMPLATE_TARGETS.contains(t))
        .collect()
}

fn execute(settings: &Settings, script: Option<&ScriptSelection>) -> Result<()> {
    let plan = plan_command(settings, script, &inherited_value(&settings.flags_var));

    print_verbose(
        settings.verbose,
        &format!(
            "{}={:?}",
            settings.flags_var,
            plan.env().get(&settings.flags_var).unwrap_or_default()
        ),
    );
    print_verbose(settings.verbose, &format!("Executing: {plan}"));

    run_plan(&plan)?;
    Ok(())
}

/// Compose the flags variable from `prior` and build the command line
fn plan_command(
    settings: &Settings,
    script: Option<&ScriptSelection>,
    prior: &OsStr,
) -> CommandPlan {
    let composed = compose_flags(prior, &settings.tool_flags());
    let env = Environment::new().with(settings.flags_var.clone(), composed);

    let driver = match script {
        Some(selection) => Driver::Script {
            runner: &settings.runner,
            script: selection.path(),
        },
        None => Driver::Direct {
            toolchain: &settings.toolchain,
            default_targets: &settings.default_targets,
        },
    };

    resolve_command(driver, &settings.targets, env)
}

fn dump_script(selection: &ScriptSelection, fs: &HostFs) -> Result<()> {
    let path = fs.resolve(selection.path());
    let mut file = std::fs::File::open(&path).map_err(|source| MkError::ScriptRead {
        path: selection.path().to_path_buf(),
        source,
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    std::io::copy(&mut file, &mut out).context("Failed to write makefile to stdout")?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn release(guard: ScriptGuard, verbose: bool) {
    if guard.owns_file() {
        print_verbose(verbose, "removing generated makefile");
    }
    if let Err(e) = guard.release() {
        print_warning(&format!("removing generated makefile: {e}"));
    }
}
