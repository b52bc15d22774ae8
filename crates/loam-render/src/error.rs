//! Error types for loam-render

/// Opaque failure from a collaborator (dispatcher or render capability)
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for loam-render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during render orchestration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A bound render primitive was called before a successful `update()`
    #[error("Render engines not configured; call update() first")]
    NotConfigured,

    /// The markdown engine (or its factory) failed
    #[error("Markdown engine error: {message}")]
    Markdown { message: String },

    /// The template environment rejected a template or render call
    #[error("Template error in '{template}': {message}")]
    Template { template: String, message: String },

    /// The file's render capability threw; tagged with the file identity
    #[error("Failed to render {file}")]
    Render {
        file: String,
        #[source]
        source: BoxedError,
    },

    /// The external plugin dispatcher rejected; propagated unmodified
    #[error("Plugin dispatch failed for event '{event}'")]
    Dispatch {
        event: String,
        #[source]
        source: BoxedError,
    },

    /// A post-render dispatch returned a payload without the rendered artifact
    #[error("Dispatcher for event '{event}' dropped the rendered artifact")]
    MissingArtifact { event: String },

    /// Configuration error from loam-config
    #[error(transparent)]
    Config(#[from] loam_config::Error),
}
