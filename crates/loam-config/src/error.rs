//! Error types for loam-config

use std::path::PathBuf;

/// Result type for loam-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during configuration resolution
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The schema rejected the configuration tree; fatal to `update()`
    #[error("Invalid configuration from {source_id}: {message}")]
    Validation { source_id: String, message: String },

    /// `get_path()` was asked for a key that does not exist
    #[error("Configuration path not found: {path}")]
    PathNotFound { path: String },

    /// A string-named middleware/lifecycle/asset processor could not be located
    #[error("Cannot resolve module '{identifier}' from {basedir}")]
    ModuleResolution { identifier: String, basedir: PathBuf },

    /// An ignore/asset matcher pattern failed to compile
    #[error("Invalid matcher pattern '{pattern}': {message}")]
    Matcher { pattern: String, message: String },

    /// The store has no resolved configuration yet (`update()` never succeeded)
    #[error("Configuration has not been resolved; call update() first")]
    NotResolved,

    /// Schema-level validation failure
    #[error(transparent)]
    Schema(#[from] crate::schema::SchemaError),

    /// Filesystem error from loam-fs
    #[error(transparent)]
    Fs(#[from] loam_fs::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
