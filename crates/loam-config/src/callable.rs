//! Callable resolution
//!
//! Middlewares, lifecycle hooks, and asset processors are declared in
//! the configuration by name. Resolution turns each name into an
//! invokable implementation exactly once at load time: a fixed built-in
//! table is consulted first, then an injected module-lookup
//! collaborator. Values that are already implementations pass through
//! untouched.

use crate::{Error, Result};
use async_trait::async_trait;
use loam_fs::SitePath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// A callable as declared: either an inline implementation or a name
/// still to be resolved.
pub enum CallableSpec<T> {
    /// Already an implementation; resolution passes it through unchanged
    Inline(T),
    /// A built-in table entry or module identifier
    Named(String),
}

impl<T> From<&str> for CallableSpec<T> {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl<T> From<String> for CallableSpec<T> {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// External local-module-lookup collaborator.
///
/// Resolves a string identifier against the host's module search rules
/// starting from `basedir` and returns the loaded implementation.
pub trait ModuleLookup<T>: Send + Sync {
    fn lookup(&self, identifier: &str, basedir: &Path) -> Result<T>;
}

/// Name-keyed registry of implementations.
///
/// The stock [`ModuleLookup`]: hosts register implementations under the
/// identifiers their configuration uses; an unknown identifier is a
/// [`Error::ModuleResolution`].
pub struct ModuleRegistry<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for ModuleRegistry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> ModuleRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation under an identifier.
    pub fn register(&mut self, identifier: impl Into<String>, implementation: T) {
        self.entries.insert(identifier.into(), implementation);
    }
}

impl<T: Clone + Send + Sync> ModuleLookup<T> for ModuleRegistry<T> {
    fn lookup(&self, identifier: &str, basedir: &Path) -> Result<T> {
        self.entries
            .get(identifier)
            .cloned()
            .ok_or_else(|| Error::ModuleResolution {
                identifier: identifier.to_string(),
                basedir: basedir.to_path_buf(),
            })
    }
}

impl<T> fmt::Debug for ModuleRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ModuleRegistry").field("entries", &names).finish()
    }
}

/// Resolve a callable spec into an implementation.
///
/// `Inline` values pass through untouched. A name is matched exactly
/// against `builtins` first; anything else goes to the lookup
/// collaborator, whose failure surfaces as [`Error::ModuleResolution`].
pub fn resolve_callable<T: Clone>(
    spec: CallableSpec<T>,
    basedir: &Path,
    builtins: &HashMap<String, T>,
    lookup: &dyn ModuleLookup<T>,
) -> Result<T> {
    match spec {
        CallableSpec::Inline(implementation) => Ok(implementation),
        CallableSpec::Named(name) => {
            if let Some(builtin) = builtins.get(&name) {
                return Ok(builtin.clone());
            }
            lookup.lookup(&name, basedir)
        }
    }
}

/// Output of an asset processor's `write` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessorOutput {
    /// Transformed content to write at the destination
    Content(String),
    /// A path whose content should be copied verbatim
    Path(SitePath),
}

/// An asset processor: where does this asset go, and what gets written.
///
/// This is the shape of the built-in processor table; custom `use`
/// entries supply the same shape through the module lookup.
pub trait AssetProcessor: Send + Sync {
    /// Map a source asset path to its destination path.
    fn calculate_destination(&self, source: &SitePath) -> SitePath;

    /// Produce the content (or source path) to write for the asset.
    fn write(&self, source: &SitePath) -> Result<ProcessorOutput>;
}

/// The stock built-in processor: pass the asset through untouched.
#[derive(Debug, Default)]
pub struct CopyProcessor;

impl AssetProcessor for CopyProcessor {
    fn calculate_destination(&self, source: &SitePath) -> SitePath {
        source.clone()
    }

    fn write(&self, source: &SitePath) -> Result<ProcessorOutput> {
        Ok(ProcessorOutput::Path(source.clone()))
    }
}

/// A pluggable content transform applied by the surrounding pipeline.
///
/// Only resolution is handled here; the pipeline invoking these lives
/// outside this crate.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: &mut Value) -> Result<()>;
}

/// A hook fired at a defined moment of the surrounding build process.
#[async_trait]
pub trait LifecycleHook: Send + Sync {
    async fn run(&self, site: &Value) -> Result<()>;
}

/// Build-process moments that carry hook lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleEvent {
    #[serde(rename = "willUpdate")]
    WillUpdate,
    #[serde(rename = "didUpdate")]
    DidUpdate,
    #[serde(rename = "willBuild")]
    WillBuild,
    #[serde(rename = "didBuild")]
    DidBuild,
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WillUpdate => write!(f, "willUpdate"),
            Self::DidUpdate => write!(f, "didUpdate"),
            Self::WillBuild => write!(f, "willBuild"),
            Self::DidBuild => write!(f, "didBuild"),
        }
    }
}
