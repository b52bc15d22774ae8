//! Render orchestration for Loam
//!
//! Consumes the resolved configuration from `loam-config` to (re)build
//! the markdown and template engines, and drives the per-file
//! pre-render / render / post-render plugin-hook sequence. Rendering
//! itself belongs to the file object and the engines; this crate only
//! wires them together in the right order.

pub mod dispatch;
pub mod engine;
pub mod error;
pub mod file;
pub mod orchestrator;

pub use dispatch::{DispatchError, HookPayload, NullDispatcher, PluginDispatcher};
pub use engine::{
    MarkdownEngine, MarkdownFactory, TemplateEnvironment, TemplateFactory, TemplateFilter,
    TeraEnvironment, TeraFactory,
};
pub use error::{BoxedError, Error, Result};
pub use file::{ContentFile, FileRenderError, RenderedFile};
pub use orchestrator::{RenderOptions, RenderOrchestrator};
