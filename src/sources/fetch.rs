//! Populating the package cache through an external command.

use std::path::{Path, PathBuf};

use crate::core::error::{GopError, GopResult};
use crate::core::import_path::ImportPath;
use crate::util::process::{find_executable, ProcessBuilder};

/// Something that can download a package into the global cache.
pub trait Fetcher {
    /// Fetch `import`, running in `workdir`. Blocks until done.
    fn fetch(&self, import: &ImportPath, workdir: &Path) -> GopResult<()>;
}

/// Fetches with `go get <import>` in GOPATH mode.
///
/// Go 1.22 dropped GOPATH-mode `go get`, so this needs an older toolchain.
#[derive(Debug, Clone)]
pub struct GoGetFetcher {
    program: String,
    gopath: PathBuf,
}

impl GoGetFetcher {
    pub fn new(gopath: impl Into<PathBuf>) -> Self {
        GoGetFetcher {
            program: "go".to_string(),
            gopath: gopath.into(),
        }
    }

    /// Use a different go executable name or path.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// The command that would be run for `import`.
    pub fn command(&self, go: &Path, import: &ImportPath, workdir: &Path) -> ProcessBuilder {
        ProcessBuilder::new(go)
            .arg("get")
            .arg(import.as_str())
            .cwd(workdir)
            .env("GOPATH", self.gopath.to_string_lossy())
            // `go get` only writes into GOPATH/src outside module mode.
            .env("GO111MODULE", "off")
    }
}

impl Fetcher for GoGetFetcher {
    fn fetch(&self, import: &ImportPath, workdir: &Path) -> GopResult<()> {
        let go = find_executable(&self.program).ok_or_else(|| {
            GopError::subprocess(format!(
                "could not find `{}` in PATH; it is required to fetch `{}`",
                self.program, import
            ))
        })?;

        let cmd = self.command(&go, import, workdir);
        tracing::info!("fetching {}", import);
        tracing::debug!("running `{}` in {}", cmd.display_command(), workdir.display());
        cmd.status_and_check()
    }
}
