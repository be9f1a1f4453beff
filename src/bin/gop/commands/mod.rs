//! Command implementations

pub mod completions;
pub mod ensure;
pub mod imports;
pub mod init;
