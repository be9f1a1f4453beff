//! The global package cache (`$GOPATH/src`).

use std::path::PathBuf;

use crate::core::error::GopResult;
use crate::core::import_path::ImportPath;
use crate::util::fs::{probe, PathState};

/// A GOPATH workspace used as the machine-wide package cache.
///
/// Read-only from gop's side; only the fetch command writes into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoPath {
    root: PathBuf,
}

impl GoPath {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        GoPath { root: root.into() }
    }

    /// Directory holding package sources, `<GOPATH>/src`.
    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    /// Where the sources of `import` live in the cache.
    pub fn package_dir(&self, import: &ImportPath) -> GopResult<PathBuf> {
        Ok(self.src_dir().join(import.to_relative_path()?))
    }

    /// Whether the cache holds sources for `import`.
    pub fn contains(&self, import: &ImportPath) -> GopResult<bool> {
        Ok(probe(&self.package_dir(import)?)? == PathState::Directory)
    }
}
