//! Test fixtures for common test scenarios.
//!
//! Builders for Go source files, gop projects and GOPATH cache packages.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::import_path::ImportPath;
use crate::core::project::{ProjectConfig, CONFIG_NAME};

/// Write a Go file declaring `package` and importing `imports`.
pub fn write_go_file(path: &Path, package: &str, imports: &[&str]) {
    let mut src = format!("package {}\n", package);
    if !imports.is_empty() {
        src.push_str("\nimport (\n");
        for import in imports {
            src.push_str(&format!("\t\"{}\"\n", import));
        }
        src.push_str(")\n");
    }
    src.push_str("\nfunc init() {}\n");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, src).unwrap();
}

/// Fixture for a project on disk with its own GOPATH cache.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Project root (holds `gop.yml`).
    pub root: PathBuf,
    /// GOPATH root used as the package cache.
    pub gopath: PathBuf,
}

impl ProjectFixture {
    /// Create a project named `name` under `base` with one `main` target
    /// whose `main.go` imports `imports`.
    pub fn new(base: &Path, name: &str, imports: &[&str]) -> Self {
        let root = base.join(name);
        let gopath = base.join("gopath");
        fs::create_dir_all(root.join("src").join("vendor")).unwrap();
        fs::create_dir_all(gopath.join("src")).unwrap();

        let config = ProjectConfig::scaffold(name);
        fs::write(root.join(CONFIG_NAME), config.to_yaml().unwrap()).unwrap();
        write_go_file(&root.join("src/main/main.go"), "main", imports);

        ProjectFixture { root, gopath }
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join("src").join("vendor")
    }

    /// Directory of `import` inside the vendor tree.
    pub fn vendored(&self, import: &str) -> PathBuf {
        self.vendor_dir()
            .join(ImportPath::from(import).to_relative_path().unwrap())
    }

    /// Directory of `import` inside the GOPATH cache.
    pub fn cached(&self, import: &str) -> PathBuf {
        self.gopath
            .join("src")
            .join(ImportPath::from(import).to_relative_path().unwrap())
    }

    /// Put a package into the GOPATH cache, with a `.git` directory.
    pub fn add_cache_package(&self, import: &str, imports: &[&str]) -> PathBuf {
        let dir = self.cached(import);
        add_package(&dir, import, imports);
        dir
    }
}

/// Write a minimal package (one Go file plus VCS metadata) into `dir`.
pub fn add_package(dir: &Path, import: &str, imports: &[&str]) {
    let name = import.rsplit('/').next().unwrap_or("pkg").replace(['.', '-'], "_");
    write_go_file(&dir.join(format!("{}.go", name)), &name, imports);
    fs::create_dir_all(dir.join(".git")).unwrap();
    fs::write(dir.join(".git").join("HEAD"), "ref: refs/heads/master\n").unwrap();
}
