//! Project - the workspace described by `gop.yml`.
//!
//! A project root holds `gop.yml`, the Go sources under `src/` and the
//! vendor tree under `src/vendor/`. Each target names a source directory
//! relative to `src/`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{GopError, GopResult, IoResultExt};

/// Project configuration file name.
pub const CONFIG_NAME: &str = "gop.yml";

/// Parsed `gop.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub targets: Vec<Target>,
}

/// A named build unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,

    /// Source directory, relative to `<root>/src`.
    pub dir: String,

    /// Asset directories shipped alongside the binary.
    #[serde(default)]
    pub assets: Vec<String>,
}

impl ProjectConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> GopResult<Self> {
        let contents =
            std::fs::read_to_string(path).with_path("failed to read project config", path)?;
        Self::parse(&contents)
            .map_err(|e| GopError::config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Parse configuration from YAML text.
    pub fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document is a config with no targets.
        if contents.trim().is_empty() {
            return Ok(ProjectConfig::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Default configuration written by `gop init`.
    pub fn scaffold(name: &str) -> Self {
        ProjectConfig {
            targets: vec![Target {
                name: name.to_string(),
                dir: "main".to_string(),
                assets: vec!["templates".to_string(), "public".to_string()],
            }],
        }
    }

    pub fn to_yaml(&self) -> GopResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| GopError::config(format!("failed to serialize project config: {}", e)))
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}

/// A loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Load the project whose `gop.yml` lives in `root`.
    pub fn load(root: &Path) -> GopResult<Self> {
        let config = ProjectConfig::load(&root.join(CONFIG_NAME))?;
        Ok(Project {
            root: root.to_path_buf(),
            config,
        })
    }

    pub fn from_parts(root: PathBuf, config: ProjectConfig) -> Self {
        Project { root, config }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.src_dir().join("vendor")
    }

    /// Absolute source directory of a target.
    pub fn target_dir(&self, target: &Target) -> PathBuf {
        let mut dir = self.src_dir();
        for part in target.dir.split('/').filter(|p| !p.is_empty()) {
            dir.push(part);
        }
        dir
    }

    /// Pick the target to operate on.
    ///
    /// An explicit name must match. Otherwise the target whose source
    /// directory contains `cwd` wins, falling back to the first target.
    pub fn select_target(&self, name: Option<&str>, cwd: &Path) -> GopResult<&Target> {
        if let Some(name) = name {
            return self.config.target(name).ok_or_else(|| {
                let known: Vec<_> = self.config.targets.iter().map(|t| t.name.as_str()).collect();
                GopError::config(format!(
                    "target `{}` not found in {} (known targets: {})",
                    name,
                    CONFIG_NAME,
                    if known.is_empty() {
                        "none".to_string()
                    } else {
                        known.join(", ")
                    }
                ))
            });
        }

        if let Some(target) = self
            .config
            .targets
            .iter()
            .find(|t| cwd.starts_with(self.target_dir(t)))
        {
            return Ok(target);
        }

        self.config
            .targets
            .first()
            .ok_or_else(|| GopError::config(format!("no targets declared in {}", CONFIG_NAME)))
    }
}

/// Find the project root by searching `start` and its parents for `gop.yml`.
pub fn find_project_root(start: &Path) -> GopResult<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_NAME).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(GopError::config(format!(
                "could not find {} in {} or any parent directory\n\
                 help: Run `gop init` to create a new project",
                CONFIG_NAME,
                start.display()
            )));
        }
    }
}
