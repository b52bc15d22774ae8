//! The render orchestrator
//!
//! Owns the live render engines (rebuilt wholesale from the resolved
//! configuration on every `update()`) and drives the three-phase
//! pre-render / render / post-render sequence for one content file.

use crate::dispatch::{HookPayload, PluginDispatcher};
use crate::engine::{
    MarkdownEngine, MarkdownFactory, TemplateEnvironment, TemplateFactory, TemplateFilter,
};
use crate::error::{Error, Result};
use crate::file::{ContentFile, RenderedFile};
use loam_config::ConfigStore;
use loam_fs::SitePath;
use serde_json::Value;
use std::sync::Arc;

/// Options for (re)building the render engines.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Disable template caching (every render reloads from disk)
    pub cache_disabled: bool,
    /// Template search paths, usually the resolved templates root
    pub template_search_paths: Vec<SitePath>,
}

/// The live engines; replaced wholesale on every `update()`.
struct RenderContext {
    markdown: Box<dyn MarkdownEngine>,
    templates: Box<dyn TemplateEnvironment>,
}

/// Drives engine (re)configuration and per-file plugin-hook rendering.
///
/// `update()` must not run concurrently with the bound render calls;
/// `render_file_with_plugins` holds no mutable state and is safe to run
/// concurrently across distinct files.
pub struct RenderOrchestrator {
    markdown_factory: Box<dyn MarkdownFactory>,
    template_factory: Box<dyn TemplateFactory>,
    dispatcher: Arc<dyn PluginDispatcher>,
    context: Option<RenderContext>,
}

impl RenderOrchestrator {
    pub fn new(
        markdown_factory: Box<dyn MarkdownFactory>,
        template_factory: Box<dyn TemplateFactory>,
        dispatcher: Arc<dyn PluginDispatcher>,
    ) -> Self {
        Self {
            markdown_factory,
            template_factory,
            dispatcher,
            context: None,
        }
    }

    /// Rebuild both engines from the store's resolved configuration.
    ///
    /// There is no incremental reconfiguration: the previous engines are
    /// dropped and fresh ones take their place, or on failure the old
    /// context stays as it was.
    pub fn update(&mut self, config: &ConfigStore, options: RenderOptions) -> Result<()> {
        let resolved = config.resolved()?;

        let markdown = self.markdown_factory.create(&resolved.manifest.markdown)?;
        let templates = self
            .template_factory
            .create(&options.template_search_paths, !options.cache_disabled)?;

        tracing::debug!(
            search_paths = options.template_search_paths.len(),
            cache_disabled = options.cache_disabled,
            "Render engines rebuilt"
        );
        self.context = Some(RenderContext {
            markdown,
            templates,
        });
        Ok(())
    }

    fn context(&self) -> Result<&RenderContext> {
        self.context.as_ref().ok_or(Error::NotConfigured)
    }

    /// Render markdown text to HTML with the bound engine.
    pub fn render_markdown(&self, text: &str) -> Result<String> {
        self.context()?
            .markdown
            .render(text)
            .map_err(|e| Error::Markdown {
                message: e.to_string(),
            })
    }

    /// Render a template by name with the bound environment.
    pub fn render_template(&self, name: &str, context: &Value) -> Result<String> {
        self.context()?.templates.render(name, context)
    }

    /// Render an inline template string with the bound environment.
    pub fn render_template_str(&self, source: &str, context: &Value) -> Result<String> {
        self.context()?.templates.render_str(source, context)
    }

    /// Register a custom template filter on the bound environment.
    pub fn add_template_filter(&mut self, name: &str, filter: TemplateFilter) -> Result<()> {
        self.context
            .as_mut()
            .ok_or(Error::NotConfigured)?
            .templates
            .add_filter(name, filter)
    }

    /// Run the three-phase render sequence for one file.
    ///
    /// PRE (if `event_before` is given) dispatches the file through the
    /// plugin hooks; RENDER invokes the file's own render capability;
    /// POST (if `event_after` is given) dispatches the `(file, rendered)`
    /// pair. Both dispatch phases return an explicit payload and the
    /// local bindings are always replaced from it, so a hook may
    /// substitute the file object in either phase. Failures propagate to
    /// the caller; there is no retry and no partial result.
    pub async fn render_file_with_plugins(
        &self,
        file: Box<dyn ContentFile>,
        site: &Value,
        event_before: Option<&str>,
        event_after: Option<&str>,
    ) -> Result<(Box<dyn ContentFile>, RenderedFile)> {
        let mut file = file;

        if let Some(event) = event_before {
            tracing::debug!(event, file = file.id(), "Dispatching pre-render hooks");
            let payload = self
                .dispatcher
                .process_event(event, HookPayload {
                    file,
                    rendered: None,
                })
                .await
                .map_err(|source| Error::Dispatch {
                    event: event.to_string(),
                    source,
                })?;
            file = payload.file;
        }

        let mut rendered = file.render(site).map_err(|source| Error::Render {
            file: file.id().to_string(),
            source,
        })?;

        if let Some(event) = event_after {
            tracing::debug!(event, file = file.id(), "Dispatching post-render hooks");
            let payload = self
                .dispatcher
                .process_event(event, HookPayload {
                    file,
                    rendered: Some(rendered),
                })
                .await
                .map_err(|source| Error::Dispatch {
                    event: event.to_string(),
                    source,
                })?;
            file = payload.file;
            rendered = payload.rendered.ok_or_else(|| Error::MissingArtifact {
                event: event.to_string(),
            })?;
        }

        Ok((file, rendered))
    }
}
