//! gop - project-local dependency vendoring for Go workspaces
//!
//! This crate provides the library behind the `gop` binary: project
//! configuration, the import graph walk over Go sources, and the vendor
//! synchronization that copies packages out of the GOPATH cache.

pub mod core;
pub mod imports;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and fakes for gop unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides on-disk fixtures and a recording fetcher.
#[cfg(test)]
pub mod test_support;

pub use core::{GopError, GopResult, ImportPath, ImportSet, Project, ProjectConfig, Target};
pub use util::context::GlobalContext;
