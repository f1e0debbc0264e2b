//! CLI argument parsing using clap derive macros

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::build::templates::MAKEFILE_TEMPLATE;
use crate::build::{self, Invocation, Settings};
use crate::config::MkConfig;
use crate::utils::paths::HostFs;
use crate::utils::terminal::disable_colors;

const EXAMPLES: &str = "\
Examples:
  $ mk
  $ mk -f Makefile-my.mk
  $ mk install
  $ mk -v -race test";

/// mk - a simple makefile generator for Go packages.
///
/// Runs `make` on the project's Makefile, or on a makefile generated for the
/// duration of the run, with GOFLAGS composed from the options below.
#[derive(Parser, Debug)]
#[command(name = "mk")]
#[command(author, about, long_about = None, disable_version_flag = true)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Alternate Makefile
    #[arg(short = 'f', long = "makefile", value_name = "PATH", allow_hyphen_values = true)]
    pub makefile: Option<PathBuf>,

    /// Enable build with race detector
    #[arg(long)]
    pub race: bool,

    /// Go compiler to use (gc, gccgo, llgo) [default: gc]
    #[arg(long, env = "MK_COMPILER", value_name = "NAME", allow_hyphen_values = true)]
    pub compiler: Option<String>,

    /// Dump the Makefile mk will use on STDOUT
    #[arg(long)]
    pub show: bool,

    /// Dump the default Makefile on STDOUT
    #[arg(long)]
    pub show_default: bool,

    /// Dump mk's version
    #[arg(long)]
    pub version: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Targets to run
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            disable_colors();
        }

        if self.version {
            println!("mk version: {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        // No config, filesystem or environment access on this path
        if self.show_default {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(MAKEFILE_TEMPLATE.as_bytes())
                .and_then(|()| out.flush())
                .context("Failed to write template to stdout")?;
            return Ok(());
        }

        let config = MkConfig::load()?;
        let fs = HostFs::current_dir()?;
        let show = self.show;
        let settings = Settings::resolve(self.into_invocation(), config);

        if show {
            build::show(&settings, &fs)
        } else {
            build::run(&settings, &fs)
        }
    }

    fn into_invocation(self) -> Invocation {
        Invocation {
            verbose: self.verbose,
            race: self.race,
            compiler: self.compiler,
            makefile: self.makefile,
            targets: self.targets,
        }
    }
}

/// Long options that may also be spelled with a single dash (`-race`)
const SINGLE_DASH_LONG: &[&str] = &[
    "race",
    "compiler",
    "makefile",
    "show",
    "show-default",
    "version",
    "verbose",
    "no-color",
    "help",
];

/// Rewrite `-race`, `-compiler=gc` and friends to their `--` form
///
/// The first item is the program name. Nothing after `--` is touched, and
/// neither is the separate value of `-f`, `-makefile` or `-compiler`.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut after_separator = false;
    let mut value_pending = false;
    let mut normalized = Vec::new();

    for (index, arg) in args.into_iter().enumerate() {
        if index == 0 || after_separator || value_pending {
            value_pending = false;
            normalized.push(arg);
            continue;
        }

        let rewritten = match arg.to_str() {
            Some("--") => {
                after_separator = true;
                None
            }
            Some(s) if s.starts_with('-') && !s.starts_with("--") => {
                let name = s[1..].split('=').next().unwrap_or_default();
                SINGLE_DASH_LONG
                    .contains(&name)
                    .then(|| OsString::from(format!("-{s}")))
            }
            _ => None,
        };

        let arg = rewritten.unwrap_or(arg);
        value_pending = arg.to_str().is_some_and(takes_separate_value);
        normalized.push(arg);
    }

    normalized
}

/// Whether `arg` is an option whose value is the next argument
fn takes_separate_value(arg: &str) -> bool {
    match arg {
        "--makefile" | "--compiler" => true,
        // Short clusters such as `-f` or `-vf`
        _ => arg
            .strip_prefix('-')
            .and_then(|cluster| cluster.strip_suffix('f'))
            .is_some_and(|flags| !flags.starts_with('-') && flags.chars().all(|c| c == 'v')),
    }
}
