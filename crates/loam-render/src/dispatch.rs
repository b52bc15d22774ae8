//! Plugin-hook dispatch seam
//!
//! The hook-registration/execution loop lives in the host's plugin
//! manager. The orchestrator only needs "run the handlers for this
//! event over this payload and give me the payload back"; both the
//! pre-render and post-render phases return an explicit payload and the
//! orchestrator always rebinds from it.

use crate::file::{ContentFile, RenderedFile};
use async_trait::async_trait;

/// Opaque failure from the external dispatcher; propagated unmodified.
pub type DispatchError = Box<dyn std::error::Error + Send + Sync>;

/// The payload carried through a plugin-hook dispatch.
///
/// Pre-render dispatches carry only the file; post-render dispatches
/// carry the file and its rendered artifact, and must return both.
pub struct HookPayload {
    pub file: Box<dyn ContentFile>,
    pub rendered: Option<RenderedFile>,
}

/// External plugin-hook dispatcher.
///
/// Implementations must be reentrant for concurrent payloads: the
/// orchestrator may dispatch for several distinct files at once.
#[async_trait]
pub trait PluginDispatcher: Send + Sync {
    async fn process_event(
        &self,
        event: &str,
        payload: HookPayload,
    ) -> std::result::Result<HookPayload, DispatchError>;
}

/// Dispatcher that runs no handlers and returns the payload unchanged.
#[derive(Debug, Default)]
pub struct NullDispatcher;

#[async_trait]
impl PluginDispatcher for NullDispatcher {
    async fn process_event(
        &self,
        _event: &str,
        payload: HookPayload,
    ) -> std::result::Result<HookPayload, DispatchError> {
        Ok(payload)
    }
}
