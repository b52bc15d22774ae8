//! Error types for loam-fs

use std::path::PathBuf;

/// Result type for loam-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading configuration files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration file could not be parsed
    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// The file extension does not map to a known config format
    #[error("Unsupported config format: .{extension}")]
    UnsupportedFormat { extension: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
