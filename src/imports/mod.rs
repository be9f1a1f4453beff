//! Import graph discovery for Go sources.
//!
//! - [`scanner`] reads the package clause, imports and build constraints of a file
//! - [`constraint`] evaluates `//go:build`, `// +build` and file name suffixes
//! - [`walker`] turns a target directory into the set of external imports

pub mod constraint;
pub mod scanner;
pub mod walker;

pub use walker::{list_imports, scan_package, BuildContext, GoPackage};
