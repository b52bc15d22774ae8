//! Configuration resolution engine for Loam
//!
//! This crate turns a user-supplied site configuration tree into a fully
//! resolved, executable form:
//!
//! - **Schema validation and defaulting**: the tree is checked against the
//!   site schema and merged onto the schema's own defaults.
//! - **Path resolution**: every configured root becomes absolute: the
//!   source root against the project root, everything else against the
//!   source root.
//! - **Scoped defaults ordering**: cascading per-file default rules are
//!   sorted into their authoritative override order.
//! - **Callable normalization**: ignore matchers, middlewares, lifecycle
//!   hooks, and asset processors are coerced from their declared forms
//!   (literal, regex, name) into compiled matchers and resolved
//!   implementations.
//!
//! The [`ConfigStore`] orchestrates all of the above behind a single
//! all-or-nothing `update()`; readers only ever observe a fully resolved
//! configuration.

pub mod callable;
pub mod defaults;
pub mod error;
pub mod manifest;
pub mod matcher;
pub mod paths;
pub mod schema;
pub mod store;

pub use callable::{
    AssetProcessor, CallableSpec, CopyProcessor, LifecycleEvent, LifecycleHook, Middleware,
    ModuleLookup, ModuleRegistry, ProcessorOutput, resolve_callable,
};
pub use defaults::{DefaultRule, Scope, resolve_defaults};
pub use error::{Error, Result};
pub use manifest::{
    AssetConfig, Collection, FileSection, LifecycleSection, MarkdownSection, PathsSection,
    ServerSection, SiteManifest,
};
pub use matcher::{Matcher, MatcherInput, MatcherSpec};
pub use paths::PathSet;
pub use schema::{ManifestSchema, SchemaError, SchemaValidator, deep_merge};
pub use store::{
    AssetRule, CONFIG_FILE, ConfigSource, ConfigStore, ConfigStoreBuilder, ResolvedConfig,
};
