//! mk.toml configuration parsing
//!
//! Two optional layers are read: the user file
//! (`<config dir>/mk/config.toml`) and the project file (`mk.toml` in the
//! working directory). Project values override user values key by key, and
//! command-line flags override both.
//!
//! ```toml
//! mode = "direct"
//! compiler = "gccgo"
//! makefile = "Makefile-my.mk"
//! runner = "make"
//! toolchain = "go"
//! flags_var = "GOFLAGS"
//! default_targets = ["get", "./..."]
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::error::MkError;

/// How the engine reaches the toolchain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Run the makefile through the script runner
    #[default]
    Script,
    /// Invoke the toolchain directly, no makefile involved
    Direct,
}

/// Optional settings from one configuration layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MkConfig {
    /// Script-driven or direct invocation
    pub mode: Option<Mode>,

    /// Go compiler passed as `-compiler=<name>`
    pub compiler: Option<String>,

    /// Alternate makefile
    pub makefile: Option<PathBuf>,

    /// Executable that runs the makefile
    pub runner: Option<String>,

    /// Toolchain executable used in direct mode
    pub toolchain: Option<String>,

    /// Environment variable carrying the composed flags
    pub flags_var: Option<String>,

    /// Arguments used in direct mode when no target is given
    pub default_targets: Option<Vec<String>>,
}

impl MkConfig {
    /// Name of the project configuration file
    pub const FILE_NAME: &'static str = "mk.toml";

    /// Load the user layer, then the project layer from the current directory
    pub fn load() -> Result<Self> {
        Self::load_layered(Self::user_config_path().as_deref(), Path::new(Self::FILE_NAME))
    }

    /// Load and merge both layers; missing files contribute nothing
    pub fn load_layered(user: Option<&Path>, project: &Path) -> Result<Self> {
        let user = match user {
            Some(path) => Self::load_from_path(path)?.unwrap_or_default(),
            None => Self::default(),
        };
        let project = Self::load_from_path(project)?.unwrap_or_default();
        Ok(user.merge(project))
    }

    /// Load configuration from a specific path, `None` if it does not exist
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MkError::config_error(path, e.to_string()).into()),
        };

        Self::parse(&content, path).map(Some)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| MkError::config_error(origin, describe_toml_error(content, &e)))?;

        if let Some(targets) = &config.default_targets {
            if targets.is_empty() {
                return Err(
                    MkError::config_error(origin, "default_targets must not be empty").into(),
                );
            }
        }

        if let Some(var) = &config.flags_var {
            if var.is_empty() || var.contains('=') || var.contains('\0') {
                return Err(MkError::config_error(
                    origin,
                    format!("flags_var {var:?} is not a valid environment variable name"),
                )
                .into());
            }
        }

        Ok(config)
    }

    /// Overlay `other` on top of `self`
    pub fn merge(self, other: Self) -> Self {
        Self {
            mode: other.mode.or(self.mode),
            compiler: other.compiler.or(self.compiler),
            makefile: other.makefile.or(self.makefile),
            runner: other.runner.or(self.runner),
            toolchain: other.toolchain.or(self.toolchain),
            flags_var: other.flags_var.or(self.flags_var),
            default_targets: other.default_targets.or(self.default_targets),
        }
    }

    /// Location of the per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mk").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Parse diagnostic on one line, prefixed with the 1-based line and column
fn describe_toml_error(content: &str, err: &toml::de::Error) -> String {
    let message = err
        .message()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    let Some(span) = err.span() else {
        return message;
    };

    let before = &content[..span.start.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    format!("line {line}, column {column}: {message}")
}
