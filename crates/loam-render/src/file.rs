//! Content file seam
//!
//! The orchestrator never renders content itself; it invokes the file
//! object's own render capability. Hooks may rewrite file metadata (or
//! substitute the file wholesale) between phases.

use serde_json::Value;

/// Opaque failure from a file's render capability
pub type FileRenderError = Box<dyn std::error::Error + Send + Sync>;

/// A rendered output file ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Destination path, relative to the destination root
    pub path: String,
    /// Rendered content
    pub content: String,
}

/// A content file with its own render capability.
///
/// `render` typically calls back into the orchestrator's bound markdown
/// and template primitives, but that is the file's business; this layer
/// only invokes it.
pub trait ContentFile: Send {
    /// Stable identity used in diagnostics (usually the source path).
    fn id(&self) -> &str;

    /// Frontmatter-style metadata visible to hooks.
    fn metadata(&self) -> &Value;

    /// Mutable metadata access for hooks.
    fn metadata_mut(&mut self) -> &mut Value;

    /// Render this file against the site data.
    fn render(&self, site: &Value) -> std::result::Result<RenderedFile, FileRenderError>;
}
