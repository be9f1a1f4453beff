//! Shared utilities

pub mod context;
pub mod fs;
pub mod process;

pub use context::GlobalContext;
