//! The configuration store
//!
//! `ConfigStore` owns the resolved configuration and the full
//! load → validate → default-merge → normalize pipeline behind a single
//! all-or-nothing `update()`. Every step stages into a candidate
//! `ResolvedConfig`; the stored state is swapped only after the whole
//! pipeline succeeds, so a failing update leaves readers untouched.

use crate::callable::{
    AssetProcessor, CallableSpec, CopyProcessor, LifecycleEvent, LifecycleHook, Middleware,
    ModuleRegistry, resolve_callable,
};
use crate::defaults::{DefaultRule, resolve_defaults};
use crate::manifest::SiteManifest;
use crate::matcher::Matcher;
use crate::paths::PathSet;
use crate::schema::{ManifestSchema, SchemaValidator, deep_merge};
use crate::{Error, Result};
use loam_fs::{ConfigLoader, SitePath};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Well-known project-relative name of the on-disk config source.
pub const CONFIG_FILE: &str = "config.toml";

/// Where the configuration tree comes from.
///
/// A `Factory` is invoked exactly once per `update()`, never cached
/// across updates.
pub enum ConfigSource {
    /// An in-memory tree
    Value(Value),
    /// A zero-argument factory producing a tree
    Factory(Box<dyn Fn() -> Value + Send + Sync>),
    /// A config file loaded via [`ConfigLoader`]
    File(SitePath),
}

impl ConfigSource {
    /// Identifier used in validation diagnostics.
    fn identifier(&self) -> String {
        match self {
            Self::Value(_) => "<inline>".to_string(),
            Self::Factory(_) => "<factory>".to_string(),
            Self::File(path) => path.as_str().to_string(),
        }
    }

    fn load(&self, loader: &ConfigLoader) -> Result<Value> {
        match self {
            Self::Value(tree) => Ok(tree.clone()),
            Self::Factory(factory) => Ok(factory()),
            Self::File(path) => Ok(loader.load_value(path)?),
        }
    }
}

impl fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

/// A normalized asset rule: compiled matcher plus resolved processor.
#[derive(Clone)]
pub struct AssetRule {
    pub test: Matcher,
    pub processor: Arc<dyn AssetProcessor>,
}

impl fmt::Debug for AssetRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRule").field("test", &self.test).finish()
    }
}

/// The fully resolved configuration.
///
/// Replaced wholesale on every successful `update()`; readers must treat
/// it as read-only.
pub struct ResolvedConfig {
    /// The merged raw tree, for the dotted-path compatibility shim
    pub raw: Value,
    /// The typed configuration surface
    pub manifest: SiteManifest,
    /// Absolute filesystem roots
    pub paths: PathSet,
    /// Default rules in authoritative override order, scopes absolute
    pub defaults: Vec<DefaultRule>,
    /// One compiled predicate per configured ignore entry
    pub ignore: Vec<Matcher>,
    /// Resolved middlewares, in pipeline order
    pub middlewares: Vec<Arc<dyn Middleware>>,
    /// Resolved lifecycle hooks keyed by event
    pub lifecycle: HashMap<LifecycleEvent, Vec<Arc<dyn LifecycleHook>>>,
    /// Normalized asset rules, in declaration order
    pub assets: Vec<AssetRule>,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("paths", &self.paths)
            .field("defaults", &self.defaults.len())
            .field("ignore", &self.ignore.len())
            .field("middlewares", &self.middlewares.len())
            .field("assets", &self.assets.len())
            .finish()
    }
}

/// Builder for [`ConfigStore`].
pub struct ConfigStoreBuilder {
    root: SitePath,
    source: ConfigSource,
    schema: Arc<dyn SchemaValidator>,
    middlewares: ModuleRegistry<Arc<dyn Middleware>>,
    hooks: ModuleRegistry<Arc<dyn LifecycleHook>>,
    processors: ModuleRegistry<Arc<dyn AssetProcessor>>,
    builtin_processors: HashMap<String, Arc<dyn AssetProcessor>>,
}

impl ConfigStoreBuilder {
    fn new(root: SitePath) -> Self {
        let mut builtin_processors: HashMap<String, Arc<dyn AssetProcessor>> = HashMap::new();
        builtin_processors.insert("copy".to_string(), Arc::new(CopyProcessor));
        Self {
            source: ConfigSource::File(root.join(CONFIG_FILE)),
            root,
            schema: Arc::new(ManifestSchema),
            middlewares: ModuleRegistry::new(),
            hooks: ModuleRegistry::new(),
            processors: ModuleRegistry::new(),
            builtin_processors,
        }
    }

    /// Replace the default file-based source.
    pub fn source(mut self, source: ConfigSource) -> Self {
        self.source = source;
        self
    }

    /// Substitute the schema validator.
    pub fn schema(mut self, schema: Arc<dyn SchemaValidator>) -> Self {
        self.schema = schema;
        self
    }

    /// Register a middleware implementation under its config identifier.
    pub fn register_middleware(
        mut self,
        identifier: impl Into<String>,
        middleware: Arc<dyn Middleware>,
    ) -> Self {
        self.middlewares.register(identifier, middleware);
        self
    }

    /// Register a lifecycle hook implementation under its config identifier.
    pub fn register_hook(
        mut self,
        identifier: impl Into<String>,
        hook: Arc<dyn LifecycleHook>,
    ) -> Self {
        self.hooks.register(identifier, hook);
        self
    }

    /// Register an asset processor under its config identifier.
    pub fn register_processor(
        mut self,
        identifier: impl Into<String>,
        processor: Arc<dyn AssetProcessor>,
    ) -> Self {
        self.processors.register(identifier, processor);
        self
    }

    /// Add or replace an entry in the built-in processor table.
    pub fn builtin_processor(
        mut self,
        name: impl Into<String>,
        processor: Arc<dyn AssetProcessor>,
    ) -> Self {
        self.builtin_processors.insert(name.into(), processor);
        self
    }

    pub fn build(self) -> ConfigStore {
        ConfigStore {
            root: self.root,
            source: self.source,
            schema: self.schema,
            loader: ConfigLoader::new(),
            middlewares: self.middlewares,
            hooks: self.hooks,
            processors: self.processors,
            builtin_processors: self.builtin_processors,
            state: None,
        }
    }
}

/// Owner of the resolved configuration.
pub struct ConfigStore {
    root: SitePath,
    source: ConfigSource,
    schema: Arc<dyn SchemaValidator>,
    loader: ConfigLoader,
    middlewares: ModuleRegistry<Arc<dyn Middleware>>,
    hooks: ModuleRegistry<Arc<dyn LifecycleHook>>,
    processors: ModuleRegistry<Arc<dyn AssetProcessor>>,
    builtin_processors: HashMap<String, Arc<dyn AssetProcessor>>,
    state: Option<ResolvedConfig>,
}

impl ConfigStore {
    /// Start building a store anchored at the given project root.
    pub fn builder(root: impl Into<SitePath>) -> ConfigStoreBuilder {
        ConfigStoreBuilder::new(root.into())
    }

    /// The project root this store is anchored at.
    pub fn root(&self) -> &SitePath {
        &self.root
    }

    /// Swap the configuration source for subsequent updates.
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Re-resolve the configuration from the stored source.
    ///
    /// All-or-nothing: every stage below runs against a candidate tree,
    /// and the stored state is replaced only when all of them succeed.
    /// A failing update leaves the previously resolved configuration
    /// completely unchanged.
    pub fn update(&mut self) -> Result<()> {
        let source_id = self.source.identifier();
        tracing::debug!(source = %source_id, "Loading site configuration");

        // 1. Load (a factory source is invoked exactly once here)
        let tree = self.source.load(&self.loader)?;

        // 2. Validate
        let validated = self.schema.validate(&tree).map_err(|e| {
            tracing::error!(source = %source_id, error = %e, "Configuration rejected by schema");
            Error::Validation {
                source_id: source_id.clone(),
                message: e.message,
            }
        })?;

        // 3. Merge onto the schema's zero-input defaults so fields the
        //    validator does not actively default are still populated
        let mut merged = self.schema.defaults();
        deep_merge(&mut merged, &validated);

        // 4. Typed decode of the merged tree
        let manifest: SiteManifest = serde_json::from_value(merged.clone())?;

        // 5. Absolute roots. A relative project root is anchored at the
        //    process working directory first, so every PathSet entry
        //    comes out absolute.
        let root = if self.root.is_absolute() {
            self.root.clone()
        } else {
            let cwd = std::env::current_dir().map_err(loam_fs::Error::from)?;
            self.root.absolutize(&SitePath::new(cwd))
        };
        let paths = PathSet::resolve(&root, &manifest.path);
        tracing::debug!(source_root = %paths.source, "Resolved path set");

        // 6. Defaults into override order, scopes absolute
        let defaults = resolve_defaults(manifest.file.defaults.clone(), &paths.source);

        // The raw tree mirrors the resolved forms so the dotted-path
        // shim observes the same values as typed readers
        merged["path"] = serde_json::json!({
            "source": paths.source.as_str(),
            "destination": paths.destination.as_str(),
            "templates": paths.templates.as_str(),
            "data": paths.data.as_str(),
        });
        merged["file"]["defaults"] = serde_json::to_value(&defaults)?;

        // 7. Ignore matchers
        let ignore = manifest
            .ignore
            .iter()
            .cloned()
            .map(|spec| Matcher::compile(spec))
            .collect::<Result<Vec<_>>>()?;

        // 8. Middlewares and lifecycle hooks (no builtin table for these)
        let basedir = root.to_native();
        let no_builtins = HashMap::new();
        let middlewares = manifest
            .middlewares
            .iter()
            .map(|name| {
                resolve_callable(
                    CallableSpec::from(name.clone()),
                    &basedir,
                    &no_builtins,
                    &self.middlewares,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let hook_no_builtins = HashMap::new();
        let mut lifecycle = HashMap::new();
        let event_lists = [
            (LifecycleEvent::WillUpdate, &manifest.lifecycle.will_update),
            (LifecycleEvent::DidUpdate, &manifest.lifecycle.did_update),
            (LifecycleEvent::WillBuild, &manifest.lifecycle.will_build),
            (LifecycleEvent::DidBuild, &manifest.lifecycle.did_build),
        ];
        for (event, names) in event_lists {
            let resolved = names
                .iter()
                .map(|name| {
                    resolve_callable(
                        CallableSpec::from(name.clone()),
                        &basedir,
                        &hook_no_builtins,
                        &self.hooks,
                    )
                })
                .collect::<Result<Vec<_>>>()?;
            if !resolved.is_empty() {
                tracing::debug!(event = %event, hooks = resolved.len(), "Resolved lifecycle hooks");
            }
            lifecycle.insert(event, resolved);
        }

        // 9. Asset rules: compiled test, builtin-table-first processor
        let assets = manifest
            .assets
            .iter()
            .map(|asset| {
                let test = Matcher::compile(asset.test.clone())?;
                let processor = resolve_callable(
                    CallableSpec::from(asset.use_.clone()),
                    &basedir,
                    &self.builtin_processors,
                    &self.processors,
                )?;
                Ok(AssetRule { test, processor })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            source = %source_id,
            defaults = defaults.len(),
            middlewares = middlewares.len(),
            assets = assets.len(),
            "Site configuration resolved"
        );

        // Everything succeeded; swap in the new state wholesale
        self.state = Some(ResolvedConfig {
            raw: merged,
            manifest,
            paths,
            defaults,
            ignore,
            middlewares,
            lifecycle,
            assets,
        });
        Ok(())
    }

    /// The typed resolved configuration.
    pub fn resolved(&self) -> Result<&ResolvedConfig> {
        self.state.as_ref().ok_or(Error::NotResolved)
    }

    /// The whole merged raw tree. Callers must treat it as read-only.
    pub fn get(&self) -> Result<&Value> {
        Ok(&self.resolved()?.raw)
    }

    /// Dotted-path lookup into the raw tree.
    ///
    /// Compatibility shim over [`ConfigStore::resolved`]; an absent
    /// segment fails with [`Error::PathNotFound`] rather than silently
    /// yielding nothing. Array segments may be indexed numerically.
    pub fn get_path(&self, dotted: &str) -> Result<&Value> {
        let mut current = self.get()?;
        for segment in dotted.split('.') {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            };
            current = next.ok_or_else(|| Error::PathNotFound {
                path: dotted.to_string(),
            })?;
        }
        Ok(current)
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("root", &self.root)
            .field("source", &self.source)
            .field("resolved", &self.state.is_some())
            .finish()
    }
}
