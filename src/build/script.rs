//! Makefile selection and the transient generated makefile
//!
//! Selection order:
//!
//! 1. an explicit path that is not the scratch name is used as-is;
//! 2. without an explicit path, a `Makefile` in the working directory;
//! 3. otherwise the scratch name, generated from the template unless a file
//!    by that name is already there.
//!
//! Only a file generated by this run is ever deleted. Two runs in the same
//! directory sharing the scratch name will race on it.

use std::fmt;
use std::path::{Path, PathBuf};

use super::templates::{write_new_file, CONVENTIONAL_SCRIPT_NAME, DEFAULT_SCRIPT_NAME};
use crate::error::MkError;
use crate::utils::paths::{FileProbe, HostFs};
use crate::utils::terminal::print_warning;

/// Where the selected makefile came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOrigin {
    /// Named on the command line or in mk.toml
    Explicit,
    /// `Makefile` found in the working directory
    Discovered,
    /// Scratch-named file left in place by the user
    Existing,
    /// To be written from the template
    Generated,
}

impl fmt::Display for ScriptOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScriptOrigin::Explicit => "explicit",
            ScriptOrigin::Discovered => "found in working directory",
            ScriptOrigin::Existing => "existing",
            ScriptOrigin::Generated => "generated",
        };
        f.write_str(s)
    }
}

/// The makefile a run will hand to the script runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSelection {
    path: PathBuf,
    origin: ScriptOrigin,
}

impl ScriptSelection {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> ScriptOrigin {
        self.origin
    }
}

/// Pick the makefile for this run
pub fn select_script(explicit: Option<&Path>, probe: &impl FileProbe) -> ScriptSelection {
    let scratch = Path::new(DEFAULT_SCRIPT_NAME);

    match explicit {
        Some(path) if path != scratch => {
            return ScriptSelection {
                path: path.to_path_buf(),
                origin: ScriptOrigin::Explicit,
            }
        }
        Some(_) => {}
        None => {
            let conventional = Path::new(CONVENTIONAL_SCRIPT_NAME);
            if probe.exists(conventional) {
                return ScriptSelection {
                    path: conventional.to_path_buf(),
                    origin: ScriptOrigin::Discovered,
                };
            }
        }
    }

    let origin = if probe.exists(scratch) {
        ScriptOrigin::Existing
    } else {
        ScriptOrigin::Generated
    };
    ScriptSelection {
        path: scratch.to_path_buf(),
        origin,
    }
}

/// Removes the generated makefile when released or dropped
///
/// A guard for a makefile this run did not write holds nothing and removes
/// nothing.
#[must_use = "dropping the guard removes the generated makefile"]
#[derive(Debug)]
pub struct ScriptGuard {
    owned: Option<PathBuf>,
}

impl ScriptGuard {
    fn unowned() -> Self {
        Self { owned: None }
    }

    /// Whether this run created the file and will remove it
    pub fn owns_file(&self) -> bool {
        self.owned.is_some()
    }

    /// Remove the generated file now, reporting failure
    pub fn release(mut self) -> std::io::Result<()> {
        match self.owned.take() {
            Some(path) => remove_if_present(&path),
            None => Ok(()),
        }
    }
}

impl Drop for ScriptGuard {
    fn drop(&mut self) {
        if let Some(path) = self.owned.take() {
            if let Err(e) = remove_if_present(&path) {
                print_warning(&format!("removing file [{}]: {}", path.display(), e));
            }
        }
    }
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Write the template for a `Generated` selection and guard the result
///
/// Other selections are user-owned and yield an empty guard. If the file
/// appears between selection and writing it is treated as user-owned too.
pub fn materialize(
    selection: &ScriptSelection,
    fs: &HostFs,
    template: &str,
) -> Result<ScriptGuard, MkError> {
    if selection.origin != ScriptOrigin::Generated {
        return Ok(ScriptGuard::unowned());
    }

    let path = fs.resolve(&selection.path);
    match write_new_file(&path, template) {
        Ok(true) => Ok(ScriptGuard { owned: Some(path) }),
        Ok(false) => Ok(ScriptGuard::unowned()),
        Err(source) => Err(MkError::ScriptWrite {
            path: selection.path.clone(),
            source,
        }),
    }
}
