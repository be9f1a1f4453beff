//! Core data structures for gop.
//!
//! - Errors shared by every operation
//! - Import paths and their classification
//! - The project configuration (`gop.yml`) and its targets

pub mod error;
pub mod import_path;
pub mod project;

pub use error::{GopError, GopResult};
pub use import_path::{ImportKind, ImportPath, ImportSet};
pub use project::{find_project_root, Project, ProjectConfig, Target, CONFIG_NAME};
