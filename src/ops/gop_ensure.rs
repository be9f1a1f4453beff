//! Implementation of `gop ensure`.
//!
//! Walks the selected target's import graph and copies every external
//! package that is not yet in `src/vendor` out of the GOPATH cache,
//! optionally running the fetcher first for packages the cache lacks.

use std::path::PathBuf;

use crate::core::error::GopResult;
use crate::core::import_path::{ImportPath, ImportSet};
use crate::imports::{list_imports, BuildContext};
use crate::sources::{Fetcher, GoGetFetcher, GoPath};
use crate::util::fs::{copy_tree, is_vcs_metadata, probe, PathState};
use crate::util::GlobalContext;

/// Options for `gop ensure`.
#[derive(Debug, Clone, Default)]
pub struct EnsureOptions {
    /// Target name; `None` selects by working directory or picks the first.
    pub target: Option<String>,

    /// Report what would be vendored without writing or fetching.
    pub dry_run: bool,

    /// Fetch packages missing from the cache before copying them.
    pub auto_fetch: bool,

    /// Extra build tags, whitespace- or comma-separated.
    pub tags: String,
}

/// Inputs of a single synchronization pass.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub vendor_dir: PathBuf,
    pub cache: GoPath,
    /// Working directory of the fetch command.
    pub fetch_dir: PathBuf,
    pub dry_run: bool,
    pub auto_fetch: bool,
}

/// What a synchronization pass did, per import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Copied into the vendor tree.
    pub vendored: Vec<ImportPath>,
    /// Already present in the vendor tree.
    pub skipped: Vec<ImportPath>,
    /// Would have been vendored (dry run).
    pub pending: Vec<ImportPath>,
    /// Fetched into the cache before being copied.
    pub fetched: Vec<ImportPath>,
}

impl SyncReport {
    /// Whether the pass changed nothing on disk.
    pub fn is_noop(&self) -> bool {
        self.vendored.is_empty() && self.fetched.is_empty()
    }
}

/// Outcome of `gop ensure`.
#[derive(Debug, Clone)]
pub struct EnsureResult {
    pub target: String,
    pub imports: ImportSet,
    pub report: SyncReport,
}

/// Vendor every import in `imports` that is not vendored yet.
///
/// Imports are handled one at a time in sorted order. An existing entry
/// under the vendor tree counts as satisfied whatever its content. The first
/// failure aborts the pass and leaves earlier copies in place.
pub fn sync(
    imports: &ImportSet,
    opts: &SyncOptions,
    fetcher: &dyn Fetcher,
) -> GopResult<SyncReport> {
    let mut report = SyncReport::default();

    for import in imports {
        if !import.is_external() {
            tracing::debug!("not vendorable: {}", import);
            continue;
        }

        let rel = import.to_relative_path()?;
        let dest = opts.vendor_dir.join(&rel);
        if probe(&dest)?.exists() {
            tracing::debug!("already vendored: {}", import);
            report.skipped.push(import.clone());
            continue;
        }

        if opts.dry_run {
            tracing::info!("would vendor {}", import);
            report.pending.push(import.clone());
            continue;
        }

        let src = opts.cache.package_dir(import)?;
        if opts.auto_fetch && probe(&src)? == PathState::Missing {
            fetcher.fetch(import, &opts.fetch_dir)?;
            report.fetched.push(import.clone());
        }

        tracing::info!("copying {}", import);
        copy_tree(&src, &dest, is_vcs_metadata)?;
        report.vendored.push(import.clone());
    }

    Ok(report)
}

/// Run `gop ensure`, fetching with `go get`.
pub fn ensure(ctx: &GlobalContext, opts: &EnsureOptions) -> GopResult<EnsureResult> {
    let gopath = ctx.gopath()?;
    ensure_with_fetcher(ctx, opts, &GoGetFetcher::new(gopath))
}

/// Run `gop ensure` with a caller-supplied fetcher.
pub fn ensure_with_fetcher(
    ctx: &GlobalContext,
    opts: &EnsureOptions,
    fetcher: &dyn Fetcher,
) -> GopResult<EnsureResult> {
    // Checked before touching the project at all.
    let cache = GoPath::new(ctx.gopath()?);

    let project = ctx.load_project()?;
    let target = project.select_target(opts.target.as_deref(), ctx.cwd())?;
    let target_dir = project.target_dir(target);
    tracing::debug!("target `{}` in {}", target.name, target_dir.display());

    let build = BuildContext::from_global(ctx)
        .with_tags(&opts.tags)
        .with_search_root(project.vendor_dir())
        .with_search_root(cache.src_dir())
        .with_local_root(project.src_dir());

    let imports = list_imports(&target_dir, &build, true)?;
    tracing::debug!("{} external imports", imports.len());

    let sync_opts = SyncOptions {
        vendor_dir: project.vendor_dir(),
        cache,
        fetch_dir: project.src_dir(),
        dry_run: opts.dry_run,
        auto_fetch: opts.auto_fetch,
    };
    let report = sync(&imports, &sync_opts, fetcher)?;

    Ok(EnsureResult {
        target: target.name.clone(),
        imports,
        report,
    })
}
