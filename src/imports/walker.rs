//! Import graph walk.
//!
//! Collects the import paths of every package under a target's source
//! directory and, when asked to, follows external imports into the
//! directories where their sources can be found locally.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::core::error::{GopError, GopResult, IoResultExt};
use crate::core::import_path::{ImportKind, ImportPath, ImportSet};
use crate::imports::constraint::{
    file_name_matches, is_release_tag, os_matches, parse_go_build, parse_plus_build, UNIX_OS,
};
use crate::imports::scanner::scan_header;
use crate::util::fs::is_dir;
use crate::util::GlobalContext;

/// Which files count and where dependencies are looked up.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub goos: String,
    pub goarch: String,
    pub cgo_enabled: bool,
    /// Extra tags from the tag expression.
    pub tags: Vec<String>,
    /// Roots searched, in order, for the sources of external imports.
    pub search_roots: Vec<PathBuf>,
    /// Root under which the project's own packages live (`<root>/src`).
    pub local_root: Option<PathBuf>,
}

impl BuildContext {
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        BuildContext {
            goos: goos.into(),
            goarch: goarch.into(),
            cgo_enabled: true,
            tags: Vec::new(),
            search_roots: Vec::new(),
            local_root: None,
        }
    }

    /// Build a context from the environment seen by `ctx`.
    pub fn from_global(ctx: &GlobalContext) -> Self {
        let mut build = BuildContext::new(ctx.goos(), ctx.goarch());
        build.cgo_enabled = ctx.cgo_enabled();
        build
    }

    /// Add the tags of a whitespace- or comma-separated tag expression.
    pub fn with_tags(mut self, expr: &str) -> Self {
        self.tags.extend(
            expr.split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        );
        self
    }

    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    pub fn with_local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = Some(root.into());
        self
    }

    /// Whether `tag` is satisfied in this context.
    pub fn satisfies(&self, tag: &str) -> bool {
        os_matches(tag, &self.goos)
            || tag == self.goarch
            || (tag == "unix" && UNIX_OS.contains(&self.goos.as_str()))
            || tag == "gc"
            || (tag == "cgo" && self.cgo_enabled)
            || is_release_tag(tag)
            || self.tags.iter().any(|t| t == tag)
    }

    /// Whether a file with this name and header takes part in the build.
    fn includes_file(&self, go_build: Option<&str>, plus_build: &[String]) -> Result<bool, String> {
        let ok = |tag: &str| self.satisfies(tag);
        if let Some(expr) = go_build {
            return parse_go_build(expr)
                .map(|e| e.eval(&ok))
                .map_err(|e| e.to_string());
        }
        for line in plus_build {
            let expr = parse_plus_build(line).map_err(|e| e.to_string())?;
            if !expr.eval(&ok) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Locate the source directory of an import seen from `from_dir`.
    fn resolve(&self, import: &ImportPath, from_dir: &Path) -> Option<PathBuf> {
        match import.kind() {
            ImportKind::External => {
                let rel = import.to_relative_path().ok()?;
                self.search_roots
                    .iter()
                    .map(|root| root.join(&rel))
                    .find(|dir| is_dir(dir))
            }
            ImportKind::Local if import.as_str().starts_with('.') => {
                let dir = clean_path(&from_dir.join(import.as_str()));
                is_dir(&dir).then_some(dir)
            }
            // Packages of the project itself look standard to the classifier.
            ImportKind::Standard => {
                let rel = import.to_relative_path().ok()?;
                let dir = self.local_root.as_ref()?.join(rel);
                is_dir(&dir).then_some(dir)
            }
            _ => None,
        }
    }
}

/// One scanned package directory.
#[derive(Debug, Clone)]
pub struct GoPackage {
    pub dir: PathBuf,
    pub name: String,
    pub files: Vec<String>,
    pub imports: BTreeSet<String>,
}

/// Scan the buildable, non-test Go files directly inside `dir`.
///
/// Returns `None` when the directory holds no buildable Go file.
pub fn scan_package(dir: &Path, build: &BuildContext) -> GopResult<Option<GoPackage>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_path("failed to read directory", dir)? {
        let entry = entry.with_path("failed to read directory", dir)?;
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        if !name.ends_with(".go")
            || name.ends_with("_test.go")
            || name.starts_with('.')
            || name.starts_with('_')
        {
            continue;
        }
        if !file_name_matches(&name, &build.goos, &build.goarch) {
            tracing::trace!("skipping {} (GOOS/GOARCH suffix)", name);
            continue;
        }
        if entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();

    let mut package: Option<GoPackage> = None;
    for name in names {
        let path = dir.join(&name);
        let src = fs::read_to_string(&path).with_path("failed to read", &path)?;
        let header = scan_header(&src).map_err(|e| GopError::parse(&path, e.to_string()))?;

        let included = build
            .includes_file(header.go_build.as_deref(), &header.plus_build)
            .map_err(|msg| GopError::parse(&path, msg))?;
        if !included {
            tracing::trace!("skipping {} (build constraints)", path.display());
            continue;
        }

        match package.as_mut() {
            Some(pkg) if pkg.name != header.package => {
                return Err(GopError::parse(
                    dir,
                    format!(
                        "found packages {} ({}) and {} ({})",
                        pkg.name, pkg.files[0], header.package, name
                    ),
                ));
            }
            Some(pkg) => {
                pkg.files.push(name);
                pkg.imports.extend(header.imports);
            }
            None => {
                package = Some(GoPackage {
                    dir: dir.to_path_buf(),
                    name: header.package,
                    files: vec![name],
                    imports: header.imports.into_iter().collect(),
                });
            }
        }
    }

    Ok(package)
}

/// Package directories under `root`, including `root` itself.
///
/// `vendor`, `testdata` and directories starting with `.` or `_` are skipped,
/// as the go tool does for `./...`.
fn package_dirs(root: &Path) -> GopResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !e.file_type().is_dir()
                || !is_ignored_dir(e.file_name().to_str().unwrap_or_default())
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            GopError::fs("failed to read directory", path, std::io::Error::from(e))
        })?;
        if entry.file_type().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

fn is_ignored_dir(name: &str) -> bool {
    name == "vendor" || name == "testdata" || name.starts_with('.') || name.starts_with('_')
}

/// Lexically resolve `.` and `..` components.
fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// List the external imports reachable from the packages under `target_dir`.
///
/// With `transitive`, every import whose sources can be found (project
/// packages, relative imports, and external packages under one of the
/// search roots) is scanned in turn. External imports that cannot be found
/// locally are still reported. The result never contains standard library,
/// relative or `C` imports.
pub fn list_imports(
    target_dir: &Path,
    build: &BuildContext,
    transitive: bool,
) -> GopResult<ImportSet> {
    if !is_dir(target_dir) {
        return Err(GopError::parse(
            target_dir,
            "cannot find package directory",
        ));
    }

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut queue: Vec<PathBuf> = Vec::new();
    let mut found_go = false;

    for dir in package_dirs(target_dir)? {
        visited.insert(clean_path(&dir));
        if let Some(pkg) = scan_package(&dir, build)? {
            tracing::debug!("scanned {} ({} files)", dir.display(), pkg.files.len());
            found_go = true;
            record(&pkg, build, transitive, &mut seen, &visited, &mut queue);
        }
    }

    if !found_go {
        return Err(GopError::parse(
            target_dir,
            "no buildable Go source files",
        ));
    }

    while let Some(dir) = queue.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        // A broken dependency must not hide the rest of the graph.
        match scan_package(&dir, build) {
            Ok(Some(pkg)) => {
                tracing::debug!("following {}", dir.display());
                record(&pkg, build, transitive, &mut seen, &visited, &mut queue);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("skipping dependency {}: {}", dir.display(), e),
        }
    }

    Ok(seen
        .into_iter()
        .map(ImportPath::from)
        .filter(ImportPath::is_external)
        .collect())
}

fn record(
    pkg: &GoPackage,
    build: &BuildContext,
    transitive: bool,
    seen: &mut BTreeSet<String>,
    visited: &HashSet<PathBuf>,
    queue: &mut Vec<PathBuf>,
) {
    for import in &pkg.imports {
        seen.insert(import.clone());
        if !transitive {
            continue;
        }
        if let Some(dir) = build.resolve(&ImportPath::from(import.as_str()), &pkg.dir) {
            let dir = clean_path(&dir);
            if !visited.contains(&dir) {
                queue.push(dir);
            }
        }
    }
}
