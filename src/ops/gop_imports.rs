//! Implementation of `gop imports`.

use std::fmt;

use crate::core::error::GopResult;
use crate::core::import_path::ImportPath;
use crate::imports::{list_imports, BuildContext};
use crate::sources::GoPath;
use crate::util::fs::probe;
use crate::util::GlobalContext;

/// Options for `gop imports`.
#[derive(Debug, Clone, Default)]
pub struct ImportsOptions {
    pub target: Option<String>,
    /// Only the imports of the target's own packages.
    pub direct: bool,
    pub tags: String,
}

/// Where the sources of an import currently are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    Vendored,
    Cached,
    Missing,
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatus::Vendored => write!(f, "vendored"),
            ImportStatus::Cached => write!(f, "cached"),
            ImportStatus::Missing => write!(f, "missing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub import: ImportPath,
    pub status: ImportStatus,
}

/// List the external imports of a target with their vendoring status.
///
/// `GOPATH` is optional here; without it, cached packages are neither
/// followed nor reported as cached.
pub fn list_target_imports(
    ctx: &GlobalContext,
    opts: &ImportsOptions,
) -> GopResult<Vec<ImportEntry>> {
    let project = ctx.load_project()?;
    let target = project.select_target(opts.target.as_deref(), ctx.cwd())?;
    let cache = ctx.gopath().ok().map(GoPath::new);

    let mut build = BuildContext::from_global(ctx)
        .with_tags(&opts.tags)
        .with_search_root(project.vendor_dir())
        .with_local_root(project.src_dir());
    if let Some(cache) = &cache {
        build = build.with_search_root(cache.src_dir());
    }

    let imports = list_imports(&project.target_dir(target), &build, !opts.direct)?;

    let vendor_dir = project.vendor_dir();
    let mut entries = Vec::with_capacity(imports.len());
    for import in imports {
        let status = if probe(&vendor_dir.join(import.to_relative_path()?))?.exists() {
            ImportStatus::Vendored
        } else {
            match &cache {
                Some(cache) if cache.contains(&import)? => ImportStatus::Cached,
                _ => ImportStatus::Missing,
            }
        };
        entries.push(ImportEntry { import, status });
    }
    Ok(entries)
}
