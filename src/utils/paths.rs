//! Filesystem queries used to pick the makefile
//!
//! Existence checks go through [`FileProbe`] so the selection logic can be
//! exercised against a simulated working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Read-only view of the filesystem
pub trait FileProbe {
    /// Whether something exists at `path`
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem, resolved against a base directory
#[derive(Debug, Clone)]
pub struct HostFs {
    root: PathBuf,
}

impl HostFs {
    /// Probe relative paths against the current directory
    pub fn current_dir() -> Result<Self> {
        let root = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::at(root))
    }

    /// Probe relative paths against `root`
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute form of `path`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileProbe for HostFs {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling link still counts as user-owned
        self.resolve(path).symlink_metadata().is_ok()
    }
}
