//! Error types shared by the vendoring core.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used across the library.
pub type GopResult<T> = Result<T, GopError>;

/// Everything that can abort a vendoring run.
///
/// None of these are retried. The first error short-circuits the whole run
/// and anything already written under the vendor tree stays on disk.
#[derive(Debug, Error)]
pub enum GopError {
    /// A required environment or configuration value is missing or invalid.
    #[error("{message}")]
    Configuration { message: String },

    /// The target source tree could not be parsed as Go source.
    #[error("{}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Stat, read, write or permission failure.
    #[error("{action} `{}`", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The copy destination already exists.
    #[error("file or directory already exists: {}", path.display())]
    DestinationConflict { path: PathBuf },

    /// The fetch command could not be run or reported failure.
    #[error("{message}")]
    Subprocess { message: String },

    /// An import path that cannot be mapped onto a directory.
    #[error("invalid import path `{path}`: {reason}")]
    InvalidImportPath { path: String, reason: &'static str },
}

impl GopError {
    pub fn config(message: impl Into<String>) -> Self {
        GopError::Configuration {
            message: message.into(),
        }
    }

    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        GopError::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn fs(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        GopError::Filesystem {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn subprocess(message: impl Into<String>) -> Self {
        GopError::Subprocess {
            message: message.into(),
        }
    }

    /// Whether the run failed because a destination was already present.
    pub fn is_conflict(&self) -> bool {
        matches!(self, GopError::DestinationConflict { .. })
    }
}

/// Attach a path and an action to an `io::Result`.
pub(crate) trait IoResultExt<T> {
    fn with_path(self, action: &'static str, path: &Path) -> GopResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path(self, action: &'static str, path: &Path) -> GopResult<T> {
        self.map_err(|e| GopError::fs(action, path, e))
    }
}
