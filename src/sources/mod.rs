//! Package sources.
//!
//! The global GOPATH cache vendored packages are copied from, and the
//! fetcher that fills it when a package is missing.

pub mod fetch;
pub mod gopath;

pub use fetch::{Fetcher, GoGetFetcher};
pub use gopath::GoPath;
