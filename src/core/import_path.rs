//! Import paths and their classification.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::core::error::{GopError, GopResult};

/// The deduplicated set of import paths produced for one target.
///
/// Ordered so that every run visits imports in the same sequence.
pub type ImportSet = BTreeSet<ImportPath>;

/// How an import path is treated by the vendoring core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// Part of the standard distribution (`fmt`, `net/http`).
    Standard,
    /// Relative or absolute reference (`./x`, `../x`).
    Local,
    /// The cgo pseudo-package `C`.
    Cgo,
    /// Anything else; a candidate for vendoring.
    External,
}

/// A package import path as written in an import declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImportPath(String);

impl ImportPath {
    pub fn new(path: impl Into<String>) -> Self {
        ImportPath(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify the path. Purely syntactic, nothing is looked up on disk.
    ///
    /// A path is standard when its first element has no dot, which is the
    /// same rule the go tool applies (`golang.org/x/...` is external).
    pub fn kind(&self) -> ImportKind {
        let path = self.0.as_str();
        if path.starts_with('.') || path.starts_with('/') {
            return ImportKind::Local;
        }
        if path == "C" {
            return ImportKind::Cgo;
        }
        let first = path.split('/').next().unwrap_or_default();
        if first.contains('.') {
            ImportKind::External
        } else {
            ImportKind::Standard
        }
    }

    pub fn is_external(&self) -> bool {
        self.kind() == ImportKind::External
    }

    /// Map the import path onto a relative filesystem path.
    ///
    /// Components are split on `/` and rejoined with the native separator, so
    /// the vendor tree and the package cache use the same layout on every
    /// platform.
    pub fn to_relative_path(&self) -> GopResult<PathBuf> {
        let invalid = |reason| GopError::InvalidImportPath {
            path: self.0.clone(),
            reason,
        };

        if self.0.is_empty() {
            return Err(invalid("empty path"));
        }

        let mut rel = PathBuf::new();
        for component in self.0.split('/') {
            match component {
                "" => return Err(invalid("empty path element")),
                "." | ".." => return Err(invalid("relative path element")),
                c if c.contains(['\\', ':']) => {
                    return Err(invalid("path element contains a separator"))
                }
                c => rel.push(c),
            }
        }
        Ok(rel)
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImportPath {
    fn from(s: &str) -> Self {
        ImportPath::new(s)
    }
}

impl From<String> for ImportPath {
    fn from(s: String) -> Self {
        ImportPath(s)
    }
}
