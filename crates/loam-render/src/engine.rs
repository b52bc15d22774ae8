//! Render engine seams and the Tera-backed template environment
//!
//! Engine internals are external collaborators: the orchestrator only
//! needs factories that build a fresh engine from configuration, and
//! the bound render calls. The template side ships a Tera
//! implementation; the markdown side is injected by the host.

use crate::error::{BoxedError, Error, Result};
use loam_config::MarkdownSection;
use loam_fs::SitePath;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Context, Tera};

/// A markdown rendering engine.
///
/// Failures are opaque to the orchestrator, which surfaces them as
/// [`Error::Markdown`].
pub trait MarkdownEngine: Send + Sync {
    fn render(&self, text: &str) -> std::result::Result<String, BoxedError>;
}

/// Builds a fresh markdown engine from the configured markdown section.
pub trait MarkdownFactory: Send + Sync {
    fn create(&self, section: &MarkdownSection) -> Result<Box<dyn MarkdownEngine>>;
}

/// A custom template filter: `(value, args) -> value`.
pub type TemplateFilter =
    Arc<dyn Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync>;

/// A template environment scoped to a set of search paths.
pub trait TemplateEnvironment: Send + Sync {
    /// Render a template by name.
    fn render(&self, name: &str, context: &Value) -> Result<String>;

    /// Render an inline template string.
    fn render_str(&self, source: &str, context: &Value) -> Result<String>;

    /// Register a custom filter under the given name.
    fn add_filter(&mut self, name: &str, filter: TemplateFilter) -> Result<()>;
}

/// Builds a fresh template environment over the given search paths.
pub trait TemplateFactory: Send + Sync {
    fn create(
        &self,
        search_paths: &[SitePath],
        cache_enabled: bool,
    ) -> Result<Box<dyn TemplateEnvironment>>;
}

/// Tera-backed template environment.
///
/// Templates are loaded from `<search path>/**/*` globs. With caching
/// enabled the compiled instance is reused across renders; with caching
/// disabled every render rebuilds from disk so template edits are
/// picked up immediately. Registered filters survive rebuilds.
pub struct TeraEnvironment {
    search_paths: Vec<SitePath>,
    cache_enabled: bool,
    compiled: Tera,
    filters: Vec<(String, TemplateFilter)>,
}

impl TeraEnvironment {
    pub fn new(search_paths: Vec<SitePath>, cache_enabled: bool) -> Result<Self> {
        let compiled = Self::build(&search_paths, &[])?;
        Ok(Self {
            search_paths,
            cache_enabled,
            compiled,
            filters: Vec::new(),
        })
    }

    fn build(search_paths: &[SitePath], filters: &[(String, TemplateFilter)]) -> Result<Tera> {
        let mut tera = Tera::default();
        for path in search_paths {
            let glob = format!("{}/**/*", path.as_str().trim_end_matches('/'));
            let loaded = Tera::new(&glob).map_err(|e| Error::Template {
                template: glob.clone(),
                message: e.to_string(),
            })?;
            tera.extend(&loaded).map_err(|e| Error::Template {
                template: glob,
                message: e.to_string(),
            })?;
        }
        for (name, filter) in filters {
            register(&mut tera, name, filter);
        }
        Ok(tera)
    }

    fn context_from(context: &Value) -> Result<Context> {
        Context::from_value(context.clone()).map_err(|e| Error::Template {
            template: "<context>".to_string(),
            message: e.to_string(),
        })
    }

    /// Render against the cached instance, or a freshly built one when
    /// caching is disabled.
    fn with_instance<T>(&self, f: impl FnOnce(&Tera) -> Result<T>) -> Result<T> {
        if self.cache_enabled {
            f(&self.compiled)
        } else {
            let fresh = Self::build(&self.search_paths, &self.filters)?;
            f(&fresh)
        }
    }
}

fn register(tera: &mut Tera, name: &str, filter: &TemplateFilter) {
    let filter = filter.clone();
    tera.register_filter(
        name,
        move |value: &Value, args: &HashMap<String, Value>| filter(value, args),
    );
}

impl TemplateEnvironment for TeraEnvironment {
    fn render(&self, name: &str, context: &Value) -> Result<String> {
        let context = Self::context_from(context)?;
        self.with_instance(|tera| {
            tera.render(name, &context).map_err(|e| Error::Template {
                template: name.to_string(),
                message: e.to_string(),
            })
        })
    }

    fn render_str(&self, source: &str, context: &Value) -> Result<String> {
        let context = Self::context_from(context)?;
        self.with_instance(|tera| {
            // Clone so custom filters remain available for the inline template
            let mut inline = tera.clone();
            inline
                .add_raw_template("__inline__", source)
                .map_err(|e| Error::Template {
                    template: "__inline__".to_string(),
                    message: e.to_string(),
                })?;
            inline.render("__inline__", &context).map_err(|e| Error::Template {
                template: "__inline__".to_string(),
                message: e.to_string(),
            })
        })
    }

    fn add_filter(&mut self, name: &str, filter: TemplateFilter) -> Result<()> {
        register(&mut self.compiled, name, &filter);
        self.filters.push((name.to_string(), filter));
        Ok(())
    }
}

/// Stock [`TemplateFactory`] producing [`TeraEnvironment`] instances.
#[derive(Debug, Default)]
pub struct TeraFactory;

impl TemplateFactory for TeraFactory {
    fn create(
        &self,
        search_paths: &[SitePath],
        cache_enabled: bool,
    ) -> Result<Box<dyn TemplateEnvironment>> {
        Ok(Box::new(TeraEnvironment::new(
            search_paths.to_vec(),
            cache_enabled,
        )?))
    }
}
