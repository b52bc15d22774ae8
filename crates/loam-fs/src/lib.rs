//! Filesystem layer for Loam
//!
//! Provides normalized path handling and format-agnostic loading of
//! configuration files. Everything above this crate works with
//! [`SitePath`] values that always use forward slashes internally.

pub mod error;
pub mod loader;
pub mod path;

pub use error::{Error, Result};
pub use loader::ConfigLoader;
pub use path::SitePath;
