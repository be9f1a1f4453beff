//! Filesystem utilities.
//!
//! Probing helpers, the depth-first directory manifest and the exclusive
//! recursive copy used to materialize vendored packages.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::error::{GopError, GopResult, IoResultExt};

/// OS metadata files that never make it into a manifest.
const JUNK_FILES: &[&str] = &[".DS_Store"];

/// Directory-name prefixes owned by version control systems.
pub const VCS_PREFIXES: &[&str] = &[".git", ".hg", ".svn", ".bzr"];

/// What is found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    Missing,
    Directory,
    /// A file, a symlink to a non-directory, or a dangling symlink.
    NotDirectory,
}

impl PathState {
    pub fn exists(self) -> bool {
        self != PathState::Missing
    }
}

/// Returns true if `path` is a directory.
///
/// Stat errors are reported as `false`; use [`probe`] to tell an absent path
/// from an inaccessible one.
pub fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Returns true if anything, including a dangling symlink, exists at `path`.
pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Inspect `path`, keeping "not there" apart from "cannot look".
pub fn probe(path: &Path) -> GopResult<PathState> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PathState::Missing),
        Err(e) => return Err(GopError::fs("failed to stat", path, e)),
    };

    if meta.is_dir() {
        return Ok(PathState::Directory);
    }
    if meta.file_type().is_symlink() {
        return match fs::metadata(path) {
            Ok(target) if target.is_dir() => Ok(PathState::Directory),
            Ok(_) => Ok(PathState::NotDirectory),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PathState::NotDirectory),
            Err(e) => Err(GopError::fs("failed to stat", path, e)),
        };
    }
    Ok(PathState::NotDirectory)
}

/// List everything below `root`, depth-first.
///
/// Paths are relative to `root` and always `/`-separated. Entries of a
/// directory are visited in file-name order. With `include_dirs`, directories
/// are listed (before their contents) with a trailing `/`. Symlinks are
/// listed as plain entries and never followed.
pub fn manifest(root: &Path, include_dirs: bool) -> GopResult<Vec<String>> {
    if !is_dir(root) {
        return Err(GopError::fs(
            "not a directory or does not exist",
            root,
            io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_junk(e.file_name().to_str().unwrap_or_default()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            GopError::fs("failed to read directory", path, io::Error::from(e))
        })?;

        let rel = relative_slash_path(root, entry.path())?;
        if entry.file_type().is_dir() {
            if include_dirs {
                entries.push(format!("{}/", rel));
            }
        } else {
            entries.push(rel);
        }
    }

    Ok(entries)
}

fn is_junk(name: &str) -> bool {
    JUNK_FILES.iter().any(|junk| name.contains(junk))
}

fn relative_slash_path(root: &Path, path: &Path) -> GopResult<String> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut parts = Vec::new();
    for component in rel.components() {
        let part = component.as_os_str().to_str().ok_or_else(|| {
            GopError::fs(
                "path is not valid UTF-8",
                path,
                io::Error::from(io::ErrorKind::InvalidData),
            )
        })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}

/// Join a `/`-separated relative path onto `base`.
pub fn join_slash_path(base: &Path, rel: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for part in rel.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path
}

/// Exclusion predicate for version control metadata.
///
/// Matches when any component of the relative path starts with one of
/// [`VCS_PREFIXES`].
pub fn is_vcs_metadata(rel: &str) -> bool {
    rel.split('/')
        .any(|part| VCS_PREFIXES.iter().any(|prefix| part.starts_with(prefix)))
}

/// Copy a single file, preserving its modification time and permissions.
///
/// A symlink is recreated pointing at the same target string rather than
/// having its target's content copied.
pub fn copy_file(src: &Path, dest: &Path) -> GopResult<()> {
    let meta = fs::symlink_metadata(src).with_path("failed to stat", src)?;

    if meta.file_type().is_symlink() {
        let target = fs::read_link(src).with_path("failed to read symlink", src)?;
        // Timestamps and modes of the link itself are not carried over.
        return symlink(&target, dest, is_dir(src))
            .with_path("failed to create symlink", dest);
    }

    let mut reader = File::open(src).with_path("failed to open", src)?;
    let mut writer = File::create(dest).with_path("failed to create", dest)?;
    io::copy(&mut reader, &mut writer).with_path("failed to copy into", dest)?;

    let modified = meta.modified().with_path("failed to read mtime of", src)?;
    writer
        .set_modified(modified)
        .with_path("failed to set mtime of", dest)?;
    drop(writer);

    fs::set_permissions(dest, meta.permissions()).with_path("failed to set permissions of", dest)
}

/// Recursively copy `src` into a new directory `dest`.
///
/// `dest` must not exist. Entries whose relative path (directories carry a
/// trailing `/`) matches `exclude` are skipped. A failure part-way leaves the
/// already copied entries in place.
pub fn copy_tree<F>(src: &Path, dest: &Path, exclude: F) -> GopResult<()>
where
    F: Fn(&str) -> bool,
{
    if exists(dest) {
        return Err(GopError::DestinationConflict {
            path: dest.to_path_buf(),
        });
    }

    let entries = manifest(src, true)?;

    fs::create_dir_all(dest).with_path("failed to create directory", dest)?;

    for entry in entries {
        if exclude(&entry) {
            tracing::trace!("excluding {}", entry);
            continue;
        }

        let dest_path = join_slash_path(dest, &entry);
        if entry.ends_with('/') {
            fs::create_dir_all(&dest_path).with_path("failed to create directory", &dest_path)?;
        } else {
            copy_file(&join_slash_path(src, &entry), &dest_path)?;
        }
    }

    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> GopResult<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_path("failed to create directory", path)?;
    }
    Ok(())
}

/// Write a file unless something is already there. Returns whether it wrote.
pub fn write_if_missing(path: &Path, contents: &str) -> GopResult<bool> {
    if exists(path) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_path("failed to write file", path)?;
    Ok(true)
}

/// Create a symlink (platform-aware).
#[cfg(unix)]
fn symlink(target: &Path, link: &Path, _target_is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path, target_is_dir: bool) -> io::Result<()> {
    if target_is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_is_dir_and_exists() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(is_dir(tmp.path()));
        assert!(!is_dir(&file));
        assert!(!is_dir(&tmp.path().join("missing")));
        assert!(exists(&file));
        assert!(!exists(&tmp.path().join("missing")));
    }

    #[test]
    fn test_probe_states() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert_eq!(probe(tmp.path()).unwrap(), PathState::Directory);
        assert_eq!(probe(&file).unwrap(), PathState::NotDirectory);
        assert_eq!(
            probe(&tmp.path().join("missing")).unwrap(),
            PathState::Missing
        );
        assert!(!PathState::Missing.exists());
    }

    #[test]
    fn test_probe_inaccessible_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        // Stat through a regular file fails with ENOTDIR, not NotFound.
        let err = probe(&file.join("child")).unwrap_err();
        assert!(matches!(err, GopError::Filesystem { .. }));
        assert!(!exists(&file.join("child")));
    }

    #[cfg(unix)]
    #[test]
    fn test_probe_dangling_symlink_exists() {
        let tmp = TempDir::new().unwrap();
        let link = tmp.path().join("dangling");
        std::os::unix::fs::symlink("nowhere", &link).unwrap();

        assert!(exists(&link));
        assert!(!is_dir(&link));
        assert_eq!(probe(&link).unwrap(), PathState::NotDirectory);
    }

    #[test]
    fn test_manifest_depth_first_with_dirs() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("b.go"), "");
        write(&tmp.path().join("a/z.go"), "");
        write(&tmp.path().join("a/inner/y.go"), "");

        let entries = manifest(tmp.path(), true).unwrap();
        assert_eq!(
            entries,
            vec!["a/", "a/inner/", "a/inner/y.go", "a/z.go", "b.go"]
        );
    }

    #[test]
    fn test_manifest_without_dirs() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("a/z.go"), "");
        write(&tmp.path().join("b.go"), "");

        let entries = manifest(tmp.path(), false).unwrap();
        assert_eq!(entries, vec!["a/z.go", "b.go"]);
    }

    #[test]
    fn test_manifest_skips_ds_store() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join(".DS_Store"), "");
        write(&tmp.path().join("sub/.DS_Store"), "");
        write(&tmp.path().join("sub/x.go"), "");

        let entries = manifest(tmp.path(), true).unwrap();
        assert_eq!(entries, vec!["sub/", "sub/x.go"]);
    }

    #[test]
    fn test_manifest_requires_directory() {
        let tmp = TempDir::new().unwrap();
        assert!(manifest(&tmp.path().join("missing"), true).is_err());

        let file = tmp.path().join("file");
        fs::write(&file, "").unwrap();
        assert!(manifest(&file, true).is_err());
    }

    #[test]
    fn test_is_vcs_metadata() {
        assert!(is_vcs_metadata(".git/"));
        assert!(is_vcs_metadata(".git/config"));
        assert!(is_vcs_metadata("sub/.git/HEAD"));
        assert!(is_vcs_metadata(".hg/store"));
        assert!(!is_vcs_metadata("a.go"));
        assert!(!is_vcs_metadata("sub/b.go"));
        assert!(!is_vcs_metadata("digit/x.go"));
    }

    #[test]
    fn test_copy_tree_excludes_vcs_metadata() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("pkg");
        write(&src.join("a.go"), "package a");
        write(&src.join(".git/config"), "[core]");
        write(&src.join("sub/b.go"), "package sub");
        let dest = tmp.path().join("dest");

        copy_tree(&src, &dest, is_vcs_metadata).unwrap();

        assert_eq!(
            manifest(&dest, true).unwrap(),
            vec!["a.go", "sub/", "sub/b.go"]
        );
        assert_eq!(fs::read_to_string(dest.join("a.go")).unwrap(), "package a");
        assert!(!dest.join(".git").exists());
    }

    #[test]
    fn test_copy_tree_refuses_existing_destination() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("a.go"), "");
        let dest = tmp.path().join("dest");
        fs::create_dir_all(&dest).unwrap();

        let err = copy_tree(&src, &dest, |_| false).unwrap_err();
        assert!(err.is_conflict());
        assert!(!dest.join("a.go").exists());
    }

    #[test]
    fn test_copy_tree_missing_source_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("vendor").join("pkg");

        let err = copy_tree(&tmp.path().join("missing"), &dest, |_| false).unwrap_err();
        assert!(matches!(err, GopError::Filesystem { .. }));
        assert!(!exists(&dest));
    }

    #[test]
    fn test_copy_tree_creates_intermediate_dirs() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("a.go"), "");
        let dest = tmp.path().join("vendor/github.com/x/y");

        copy_tree(&src, &dest, |_| false).unwrap();
        assert!(dest.join("a.go").is_file());
    }

    #[test]
    fn test_copy_file_preserves_mtime() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.go");
        fs::write(&src, "package a").unwrap();
        let past = SystemTime::now() - Duration::from_secs(86_400 * 30);
        File::options()
            .write(true)
            .open(&src)
            .unwrap()
            .set_modified(past)
            .unwrap();

        let dest = tmp.path().join("b.go");
        copy_file(&src, &dest).unwrap();

        let src_mtime = fs::metadata(&src).unwrap().modified().unwrap();
        let dest_mtime = fs::metadata(&dest).unwrap().modified().unwrap();
        assert_eq!(src_mtime, dest_mtime);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "package a");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_file_preserves_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("run.sh");
        fs::write(&src, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o751)).unwrap();

        let dest = tmp.path().join("copy.sh");
        copy_file(&src, &dest).unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o751);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_recreates_symlinks() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("pkg");
        write(&src.join("real.go"), "package pkg");
        std::os::unix::fs::symlink("real.go", src.join("alias.go")).unwrap();
        std::os::unix::fs::symlink("/does/not/exist", src.join("dangling")).unwrap();
        let dest = tmp.path().join("dest");

        copy_tree(&src, &dest, |_| false).unwrap();

        let alias = dest.join("alias.go");
        assert!(fs::symlink_metadata(&alias)
            .unwrap()
            .file_type()
            .is_symlink());
        assert_eq!(fs::read_link(&alias).unwrap(), Path::new("real.go"));
        assert_eq!(fs::read_link(dest.join("dangling")).unwrap(), Path::new("/does/not/exist"));
    }

    #[test]
    fn test_write_if_missing() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/file.txt");

        assert!(write_if_missing(&path, "one").unwrap());
        assert!(!write_if_missing(&path, "two").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "one");
    }
}
