//! CLI integration tests for gop.
//!
//! These tests drive the binary through project initialization, import
//! listing and vendoring against a temporary GOPATH.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the gop binary command.
fn gop() -> Command {
    let mut cmd = Command::cargo_bin("gop").unwrap();
    cmd.env("GOOS", "linux").env("GOARCH", "amd64");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn write_go_file(path: &Path, package: &str, imports: &[&str]) {
    let mut src = format!("package {}\n\nimport (\n", package);
    for import in imports {
        src.push_str(&format!("\t\"{}\"\n", import));
    }
    src.push_str(")\n");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, src).unwrap();
}

/// Initialize a project named `app` whose main package imports `imports`.
fn init_app(tmp: &TempDir, imports: &[&str]) -> PathBuf {
    let root = tmp.path().join("app");
    gop().arg("init").arg(&root).assert().success();
    write_go_file(&root.join("src/main/main.go"), "main", imports);
    root
}

/// Put a package with a `.git` directory into `<gopath>/src`.
fn cache_package(gopath: &Path, import: &str, imports: &[&str]) -> PathBuf {
    let dir = gopath.join("src").join(import);
    let name = import.rsplit('/').next().unwrap();
    write_go_file(&dir.join(format!("{}.go", name)), name, imports);
    fs::create_dir_all(dir.join(".git")).unwrap();
    fs::write(dir.join(".git/config"), "[core]\n").unwrap();
    dir
}

// ============================================================================
// gop init
// ============================================================================

#[test]
fn test_init_creates_project_layout() {
    let tmp = temp_dir();
    let root = tmp.path().join("webapp");

    gop()
        .arg("init")
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("Initialized target `webapp`"));

    assert!(root.join("gop.yml").is_file());
    assert!(root.join("src/vendor").is_dir());
    assert!(root.join("bin").is_dir());
    assert!(root.join("src/main/main.go").is_file());

    let config = fs::read_to_string(root.join("gop.yml")).unwrap();
    assert!(config.contains("name: webapp"));
    assert!(config.contains("dir: main"));
}

#[test]
fn test_init_in_current_dir_twice() {
    let tmp = temp_dir();

    gop().arg("init").current_dir(tmp.path()).assert().success();
    gop()
        .arg("init")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("already initialized"));
}

// ============================================================================
// gop ensure
// ============================================================================

#[test]
fn test_ensure_vendors_from_gopath() {
    let tmp = temp_dir();
    let gopath = tmp.path().join("gopath");
    let root = init_app(&tmp, &["fmt", "github.com/x/y"]);
    cache_package(&gopath, "github.com/x/y", &["github.com/x/z", "strings"]);
    cache_package(&gopath, "github.com/x/z", &[]);

    gop()
        .arg("ensure")
        .env("GOPATH", &gopath)
        .current_dir(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("copying github.com/x/y"))
        .stderr(predicate::str::contains("Vendored 2 packages"));

    let vendor = root.join("src/vendor/github.com/x");
    assert!(vendor.join("y/y.go").is_file());
    assert!(vendor.join("z/z.go").is_file());
    assert!(!vendor.join("y/.git").exists());
    assert!(!root.join("src/vendor/fmt").exists());

    // Second run has nothing to do.
    gop()
        .arg("ensure")
        .env("GOPATH", &gopath)
        .current_dir(root.join("src/main"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Up to date"));
}

#[test]
fn test_ensure_dry_run_writes_nothing() {
    let tmp = temp_dir();
    let gopath = tmp.path().join("gopath");
    let root = init_app(&tmp, &["github.com/x/y"]);
    cache_package(&gopath, "github.com/x/y", &[]);

    gop()
        .args(["ensure", "--dry"])
        .env("GOPATH", &gopath)
        .current_dir(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("would vendor github.com/x/y"))
        .stderr(predicate::str::contains("Would vendor 1 of 1 packages"));

    assert!(!root.join("src/vendor/github.com").exists());
}

#[test]
fn test_ensure_requires_gopath() {
    let tmp = temp_dir();
    let root = init_app(&tmp, &["github.com/x/y"]);

    gop()
        .arg("ensure")
        .env_remove("GOPATH")
        .current_dir(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOPATH is not set"));
}

#[test]
fn test_ensure_outside_project() {
    let tmp = temp_dir();

    gop()
        .arg("ensure")
        .env("GOPATH", tmp.path())
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("gop init"));
}

#[test]
fn test_ensure_missing_package_without_get() {
    let tmp = temp_dir();
    let gopath = tmp.path().join("gopath");
    fs::create_dir_all(gopath.join("src")).unwrap();
    let root = init_app(&tmp, &["github.com/x/absent"]);

    gop()
        .arg("ensure")
        .env("GOPATH", &gopath)
        .current_dir(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));

    assert!(!root.join("src/vendor/github.com/x/absent").exists());
}

#[test]
fn test_ensure_get_without_go_binary() {
    let tmp = temp_dir();
    let gopath = tmp.path().join("gopath");
    let empty_path = tmp.path().join("empty-path");
    fs::create_dir_all(&empty_path).unwrap();
    let root = init_app(&tmp, &["github.com/x/absent"]);

    gop()
        .args(["ensure", "--get"])
        .env("GOPATH", &gopath)
        .env("PATH", &empty_path)
        .current_dir(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not find `go`"));
}

#[test]
fn test_ensure_unknown_target() {
    let tmp = temp_dir();
    let root = init_app(&tmp, &[]);

    gop()
        .args(["ensure", "nope"])
        .env("GOPATH", tmp.path())
        .current_dir(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("target `nope` not found"));
}

// ============================================================================
// gop imports
// ============================================================================

#[test]
fn test_imports_lists_external_paths() {
    let tmp = temp_dir();
    let gopath = tmp.path().join("gopath");
    let root = init_app(&tmp, &["os", "github.com/b/b", "github.com/a/a"]);
    fs::create_dir_all(root.join("src/vendor/github.com/a/a")).unwrap();

    gop()
        .arg("imports")
        .env("GOPATH", &gopath)
        .current_dir(&root)
        .assert()
        .success()
        .stdout("github.com/a/a (vendored)\ngithub.com/b/b\n");
}

#[test]
fn test_imports_without_gopath() {
    let tmp = temp_dir();
    let root = init_app(&tmp, &["github.com/a/a"]);

    gop()
        .args(["imports", "--direct"])
        .env_remove("GOPATH")
        .current_dir(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com/a/a"));
}

// ============================================================================
// gop completions
// ============================================================================

#[test]
fn test_completions_bash() {
    gop()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gop"));
}
