//! Embedded makefile template
//!
//! The template is compiled into the binary so `mk` works from an empty
//! directory. Its targets (`all`, `build`, `install`, `test`, `bench`,
//! `clean`) are the contract users and CI scripts invoke positionally.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Default makefile written when the project has none
pub const MAKEFILE_TEMPLATE: &str = include_str!("../../templates/makefile-mkgo.mk");

/// Scratch file name for the generated makefile
pub const DEFAULT_SCRIPT_NAME: &str = ".makefile-mkgo.mk";

/// Makefile picked up from the working directory when present
pub const CONVENTIONAL_SCRIPT_NAME: &str = "Makefile";

/// Targets the template defines
pub const TEMPLATE_TARGETS: &[&str] = &["all", "build", "install", "test", "bench", "clean"];

/// Write `content` to a file that must not exist yet
///
/// Returns `Ok(false)` without touching anything if `path` already exists.
pub fn write_new_file(path: &Path, content: &str) -> io::Result<bool> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e),
    };

    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    Ok(true)
}
