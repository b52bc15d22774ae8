//! Schema validation and defaulting
//!
//! The validator is a seam: the store only needs "check this tree and
//! hand back the defaulted form" plus "give me the all-defaults tree".
//! The stock implementation validates by typed decoding into
//! [`SiteManifest`]; a host embedding Loam can substitute its own.

use crate::manifest::SiteManifest;
use serde_json::Value;

/// A schema-level rejection of a configuration tree
#[derive(Debug, thiserror::Error)]
#[error("Schema validation failed: {message}")]
pub struct SchemaError {
    pub message: String,
}

impl SchemaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validation seam for the configuration tree.
///
/// `validate` checks a candidate tree and returns its defaulted form;
/// `defaults` is the zero-input variant returning the all-defaults tree.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, candidate: &Value) -> Result<Value, SchemaError>;

    fn defaults(&self) -> Value;
}

/// Stock validator backed by the typed [`SiteManifest`].
///
/// A tree validates iff it decodes into the manifest type: unknown keys
/// and type mismatches are schema errors. The returned value is the
/// re-serialized decoded form, so every schema-defaulted field is
/// populated.
#[derive(Debug, Default)]
pub struct ManifestSchema;

impl SchemaValidator for ManifestSchema {
    fn validate(&self, candidate: &Value) -> Result<Value, SchemaError> {
        let manifest: SiteManifest = serde_json::from_value(candidate.clone())
            .map_err(|e| SchemaError::new(e.to_string()))?;
        serde_json::to_value(&manifest).map_err(|e| SchemaError::new(e.to_string()))
    }

    fn defaults(&self) -> Value {
        // SiteManifest is fully defaultable, so this cannot fail
        serde_json::to_value(SiteManifest::default()).unwrap_or(Value::Null)
    }
}

/// Deep merge two JSON trees
///
/// If both values are objects, merge them recursively with `overlay`
/// taking precedence. Otherwise `overlay` replaces `base`.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                if let Some(base_val) = base_map.get_mut(key) {
                    deep_merge(base_val, overlay_val);
                } else {
                    base_map.insert(key.clone(), overlay_val.clone());
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}
