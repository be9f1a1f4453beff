//! High-level operations.
//!
//! This module contains the implementation of gop commands.

pub mod gop_ensure;
pub mod gop_imports;
pub mod gop_init;

pub use gop_ensure::{
    ensure, ensure_with_fetcher, sync, EnsureOptions, EnsureResult, SyncOptions, SyncReport,
};
pub use gop_imports::{list_target_imports, ImportEntry, ImportStatus, ImportsOptions};
pub use gop_init::{init_project, InitOptions, InitResult};
