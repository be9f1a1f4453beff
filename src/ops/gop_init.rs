//! Implementation of `gop init`.

use std::path::{Path, PathBuf};

use crate::core::error::{GopError, GopResult, IoResultExt};
use crate::core::project::{ProjectConfig, CONFIG_NAME};
use crate::util::fs::{ensure_dir, is_dir, write_if_missing};

const MAIN_GO: &str = "package main\n\nfunc main() {\n}\n";

/// Options for `gop init`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Name of the default target; defaults to the directory name.
    pub name: Option<String>,
}

/// What `gop init` did.
#[derive(Debug, Clone, Default)]
pub struct InitResult {
    pub root: PathBuf,
    pub name: String,
    /// Entries written, relative to the root.
    pub created: Vec<String>,
}

/// Scaffold a project in `path`, creating the directory if needed.
///
/// Existing files are never overwritten, so running it twice is harmless.
pub fn init_project(path: &Path, opts: &InitOptions) -> GopResult<InitResult> {
    ensure_dir(path)?;
    let root = path
        .canonicalize()
        .with_path("failed to resolve project directory", path)?;

    let name = match &opts.name {
        Some(name) => name.clone(),
        None => root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("main")
            .to_string(),
    };
    if name.trim().is_empty() {
        return Err(GopError::config("target name cannot be empty"));
    }

    let mut created = Vec::new();
    for dir in ["src", "src/vendor", "src/main", "bin"] {
        let full = root.join(dir);
        if !is_dir(&full) {
            ensure_dir(&full)?;
            created.push(format!("{}/", dir));
        }
    }

    let config = ProjectConfig::scaffold(&name).to_yaml()?;
    if write_if_missing(&root.join(CONFIG_NAME), &config)? {
        created.push(CONFIG_NAME.to_string());
    }
    if write_if_missing(&root.join("src").join("main").join("main.go"), MAIN_GO)? {
        created.push("src/main/main.go".to_string());
    }

    tracing::debug!("initialized {} ({} entries created)", root.display(), created.len());
    Ok(InitResult {
        root,
        name,
        created,
    })
}
