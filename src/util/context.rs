//! Global context for gop operations.
//!
//! Provides centralized access to the working directory and to the
//! environment the go tool would consult (`GOPATH`, `GOOS`, `GOARCH`,
//! `CGO_ENABLED`). Nothing here is process-wide state: a context is built
//! once by the CLI and passed down explicitly.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::core::error::{GopError, GopResult, IoResultExt};
use crate::core::project::{find_project_root, Project};

/// Environment variable naming the global package cache root.
pub const GOPATH_ENV: &str = "GOPATH";

/// Global context: working directory and environment.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
    env: HashMap<String, OsString>,
}

impl GlobalContext {
    /// Create a context from the current process.
    pub fn new() -> GopResult<Self> {
        let cwd = std::env::current_dir()
            .with_path("failed to get current directory", Path::new("."))?;
        Ok(GlobalContext {
            cwd,
            env: std::env::vars_os()
                .filter_map(|(k, v)| k.into_string().ok().map(|k| (k, v)))
                .collect(),
        })
    }

    /// Create a context with a specific working directory and environment.
    pub fn with_env<I, K, V>(cwd: PathBuf, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OsString>,
    {
        GlobalContext {
            cwd,
            env: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Look up a non-empty environment variable.
    pub fn var(&self, key: &str) -> Option<&OsString> {
        self.env.get(key).filter(|v| !v.is_empty())
    }

    fn var_string(&self, key: &str) -> Option<String> {
        self.var(key).and_then(|v| v.to_str()).map(str::to_string)
    }

    /// Root of the global package cache.
    ///
    /// When `GOPATH` lists several directories, the first one is used.
    pub fn gopath(&self) -> GopResult<PathBuf> {
        let raw = self
            .var(GOPATH_ENV)
            .ok_or_else(|| GopError::config(format!("{} is not set", GOPATH_ENV)))?;

        std::env::split_paths(raw)
            .find(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| GopError::config(format!("{} is empty", GOPATH_ENV)))
    }

    /// Target operating system, in go tool spelling.
    pub fn goos(&self) -> String {
        self.var_string("GOOS")
            .unwrap_or_else(|| host_goos().to_string())
    }

    /// Target architecture, in go tool spelling.
    pub fn goarch(&self) -> String {
        self.var_string("GOARCH")
            .unwrap_or_else(|| host_goarch().to_string())
    }

    /// Whether the `cgo` build tag is satisfied.
    pub fn cgo_enabled(&self) -> bool {
        self.var_string("CGO_ENABLED").as_deref() != Some("0")
    }

    /// Find the project root (directory containing `gop.yml`).
    pub fn find_project_root(&self) -> GopResult<PathBuf> {
        find_project_root(&self.cwd)
    }

    /// Find and load the enclosing project.
    pub fn load_project(&self) -> GopResult<Project> {
        let root = self.find_project_root()?;
        tracing::debug!("project root: {}", root.display());
        Project::load(&root)
    }
}

fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
