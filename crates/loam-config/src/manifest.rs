//! Typed site configuration surface
//!
//! `SiteManifest` is the schema's field definitions: every key the
//! configuration tree may carry, with its default. The store validates
//! raw trees by decoding into this type and resolves the decoded form
//! into executable state.

use crate::defaults::DefaultRule;
use crate::matcher::MatcherSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

fn default_source() -> String {
    "./".to_string()
}

fn default_destination() -> String {
    "./dist".to_string()
}

fn default_templates() -> String {
    "./_templates".to_string()
}

fn default_data() -> String {
    "./_data".to_string()
}

fn default_url_key() -> String {
    "url".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_permalink() -> String {
    "/:title/".to_string()
}

/// Named filesystem roots, as declared (possibly relative)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_destination")]
    pub destination: String,
    #[serde(default = "default_templates")]
    pub templates: String,
    #[serde(default = "default_data")]
    pub data: String,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            source: default_source(),
            destination: default_destination(),
            templates: default_templates(),
            data: default_data(),
        }
    }
}

/// Per-file options and cascading default rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSection {
    /// Frontmatter key carrying the output URL
    #[serde(default = "default_url_key")]
    pub url_key: String,
    /// Date format applied to file dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Cascading per-file default rules, in declaration order
    #[serde(default)]
    pub defaults: Vec<DefaultRule>,
    /// Named content filters
    #[serde(default)]
    pub filters: Map<String, Value>,
}

impl Default for FileSection {
    fn default() -> Self {
        Self {
            url_key: default_url_key(),
            date_format: default_date_format(),
            defaults: Vec::new(),
            filters: Map::new(),
        }
    }
}

/// A named content collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Collection {
    /// Source-path scope selecting members (exclusive with `metadata`)
    pub path: Option<String>,
    /// Frontmatter scope selecting members
    pub metadata: Option<Map<String, Value>>,
    /// Template used to render collection pages
    pub template: Option<String>,
    /// Items per paginated page
    pub page_size: Option<usize>,
    /// Sort key expression
    pub sort: Option<String>,
    /// Permalink pattern for collection pages
    pub permalink: Option<String>,
}

/// A declared asset rule: which files, which processor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetConfig {
    /// Matcher selecting asset paths
    pub test: MatcherSpec,
    /// Processor name: a built-in table entry or a module identifier
    #[serde(rename = "use")]
    pub use_: String,
}

/// Markdown engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkdownSection {
    /// Engine extensions to enable
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Engine-specific options, passed through opaquely
    #[serde(default)]
    pub options: Map<String, Value>,
}

/// Development server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub baseurl: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            baseurl: String::new(),
        }
    }
}

/// Hook names per lifecycle event, in declaration order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LifecycleSection {
    #[serde(default, rename = "willUpdate")]
    pub will_update: Vec<String>,
    #[serde(default, rename = "didUpdate")]
    pub did_update: Vec<String>,
    #[serde(default, rename = "willBuild")]
    pub will_build: Vec<String>,
    #[serde(default, rename = "didBuild")]
    pub did_build: Vec<String>,
}

/// The full typed configuration surface
///
/// Every field has a default so an empty tree decodes to the schema's
/// all-defaults form. Unknown top-level keys are schema violations;
/// open-ended sections (`site`, `slug`, filter/option maps) accept
/// arbitrary values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteManifest {
    /// Site-wide metadata exposed to templates
    #[serde(default)]
    pub site: Map<String, Value>,

    /// Named filesystem roots
    #[serde(default)]
    pub path: PathsSection,

    /// Per-file options and cascading defaults
    #[serde(default)]
    pub file: FileSection,

    /// Named content collections (ordered for deterministic output)
    #[serde(default)]
    pub collections: BTreeMap<String, Collection>,

    /// Asset rules, in declaration order
    #[serde(default)]
    pub assets: Vec<AssetConfig>,

    /// Slugification options, passed through opaquely
    #[serde(default)]
    pub slug: Map<String, Value>,

    /// Markdown engine configuration
    #[serde(default)]
    pub markdown: MarkdownSection,

    /// Development server configuration
    #[serde(default)]
    pub server: ServerSection,

    /// Whether incremental builds are requested (consumed elsewhere)
    #[serde(default)]
    pub incremental: bool,

    /// Permalink pattern for newly scaffolded files
    #[serde(default = "default_permalink")]
    pub new_file_permalink: String,

    /// Middleware names, in pipeline order
    #[serde(default)]
    pub middlewares: Vec<String>,

    /// Lifecycle hook names keyed by event
    #[serde(default)]
    pub lifecycle: LifecycleSection,

    /// Ignore matchers applied to source paths
    #[serde(default)]
    pub ignore: Vec<MatcherSpec>,
}

// Kept in lockstep with the serde field defaults above so `Default` and
// decoding an empty tree agree.
impl Default for SiteManifest {
    fn default() -> Self {
        Self {
            site: Map::new(),
            path: PathsSection::default(),
            file: FileSection::default(),
            collections: BTreeMap::new(),
            assets: Vec::new(),
            slug: Map::new(),
            markdown: MarkdownSection::default(),
            server: ServerSection::default(),
            incremental: false,
            new_file_permalink: default_permalink(),
            middlewares: Vec::new(),
            lifecycle: LifecycleSection::default(),
            ignore: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_tree_decodes_to_defaults() {
        let manifest: SiteManifest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(manifest.path.source, "./");
        assert_eq!(manifest.path.destination, "./dist");
        assert_eq!(manifest.file.url_key, "url");
        assert_eq!(manifest.server.port, 4000);
        assert_eq!(manifest.new_file_permalink, "/:title/");
        assert!(!manifest.incremental);
        assert!(manifest.middlewares.is_empty());
    }

    #[test]
    fn decodes_full_surface() {
        let tree = serde_json::json!({
            "site": { "title": "Blog" },
            "path": { "source": "./site" },
            "file": {
                "defaults": [
                    { "scope": { "path": "./_posts" }, "values": { "layout": "post" } }
                ]
            },
            "collections": {
                "posts": { "path": "./_posts", "template": "post", "page_size": 10 }
            },
            "assets": [ { "test": { "regex": "\\.scss$" }, "use": "sass" } ],
            "markdown": { "extensions": ["toc"], "options": { "breaks": true } },
            "lifecycle": { "willBuild": ["clean"], "didBuild": ["announce"] },
            "middlewares": ["serve-static"],
            "ignore": ["_drafts"]
        });
        let manifest: SiteManifest = serde_json::from_value(tree).unwrap();
        assert_eq!(manifest.site["title"], "Blog");
        assert_eq!(manifest.path.source, "./site");
        assert_eq!(manifest.file.defaults.len(), 1);
        assert_eq!(manifest.collections["posts"].page_size, Some(10));
        assert_eq!(manifest.assets[0].use_, "sass");
        assert_eq!(manifest.lifecycle.will_build, vec!["clean"]);
        assert_eq!(manifest.lifecycle.did_build, vec!["announce"]);
        assert_eq!(manifest.middlewares, vec!["serve-static"]);
    }

    #[test]
    fn default_agrees_with_empty_tree_decode() {
        let decoded: SiteManifest = serde_json::from_value(serde_json::json!({})).unwrap();
        let built = SiteManifest::default();
        assert_eq!(built.new_file_permalink, "/:title/");
        assert_eq!(
            serde_json::to_value(&built).unwrap(),
            serde_json::to_value(&decoded).unwrap(),
        );
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let tree = serde_json::json!({ "paths": { "source": "./site" } });
        assert!(serde_json::from_value::<SiteManifest>(tree).is_err());
    }
}
