//! Test utilities for gop unit tests.
//!
//! Fixtures that lay out projects and GOPATH caches on disk, a fetcher that
//! records calls instead of spawning `go get`, and a tree snapshot used to
//! assert that a run wrote nothing.

pub mod fixtures;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::error::{GopError, GopResult};
use crate::core::import_path::ImportPath;
use crate::sources::Fetcher;
use crate::util::fs::{join_slash_path, manifest};

// Re-export fixtures for convenience
pub use fixtures::*;

/// What a [`RecordingFetcher`] does when asked to fetch.
#[derive(Debug, Clone)]
pub enum FetchBehavior {
    /// Write a package into `<gopath>/src/<import>`.
    Populate { gopath: PathBuf },
    /// Succeed without writing anything.
    Nothing,
    /// Fail like a non-zero exit of the fetch command.
    Fail,
}

/// Fake fetcher that records every call.
#[derive(Debug)]
pub struct RecordingFetcher {
    behavior: FetchBehavior,
    calls: RefCell<Vec<(ImportPath, PathBuf)>>,
}

impl RecordingFetcher {
    pub fn new(behavior: FetchBehavior) -> Self {
        RecordingFetcher {
            behavior,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn populating(gopath: impl Into<PathBuf>) -> Self {
        Self::new(FetchBehavior::Populate {
            gopath: gopath.into(),
        })
    }

    /// Imports fetched so far, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(import, _)| import.to_string())
            .collect()
    }

    /// Working directories of the calls so far.
    pub fn workdirs(&self) -> Vec<PathBuf> {
        self.calls.borrow().iter().map(|(_, dir)| dir.clone()).collect()
    }
}

impl Fetcher for RecordingFetcher {
    fn fetch(&self, import: &ImportPath, workdir: &Path) -> GopResult<()> {
        self.calls
            .borrow_mut()
            .push((import.clone(), workdir.to_path_buf()));
        match &self.behavior {
            FetchBehavior::Populate { gopath } => {
                let dir = gopath.join("src").join(import.to_relative_path()?);
                add_package(&dir, import.as_str(), &[]);
                Ok(())
            }
            FetchBehavior::Nothing => Ok(()),
            FetchBehavior::Fail => Err(GopError::subprocess(format!(
                "`go get {}` failed with exit code Some(1)",
                import
            ))),
        }
    }
}

/// Every entry below `root` with its modification time.
///
/// Two equal snapshots mean nothing was created, removed or rewritten.
pub fn snapshot(root: &Path) -> Vec<(String, Option<SystemTime>)> {
    if !root.exists() {
        return Vec::new();
    }
    manifest(root, true)
        .unwrap()
        .into_iter()
        .map(|rel| {
            let mtime = std::fs::symlink_metadata(join_slash_path(root, &rel))
                .and_then(|m| m.modified())
                .ok();
            (rel, mtime)
        })
        .collect()
}
