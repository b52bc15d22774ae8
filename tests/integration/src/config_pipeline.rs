//! End-to-end configuration resolution over an on-disk config file.

use loam_config::{ConfigSource, ConfigStore, Error, LifecycleEvent};
use loam_fs::SitePath;
use std::sync::Arc;

// Top-level keys must precede the table sections
const CONFIG: &str = r#"
incremental = true
ignore = ["_drafts"]

[site]
title = "Field Notes"

[path]
source = "./site"
destination = "./out"

[[file.defaults]]
scope = { path = "./" }
values = { layout = "default" }

[[file.defaults]]
scope = { path = "./_posts" }
values = { layout = "post" }

[[file.defaults]]
scope = { metadata = { draft = true } }
values = { published = false }

[[assets]]
test = "images/"
use = "copy"
"#;

fn write_config(dir: &tempfile::TempDir, content: &str) {
    std::fs::write(dir.path().join("config.toml"), content).unwrap();
}

fn store_for(dir: &tempfile::TempDir) -> ConfigStore {
    ConfigStore::builder(SitePath::new(dir.path())).build()
}

#[test]
fn resolves_file_config_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write_config(&dir, CONFIG);

    let mut store = store_for(&dir);
    store.update().unwrap();

    let root = SitePath::new(dir.path());
    let resolved = store.resolved().unwrap();

    // PathSet: source against root, destination against source
    assert_eq!(resolved.paths.source, root.join("site"));
    assert_eq!(resolved.paths.destination, root.join("site").join("out"));
    assert!(resolved.paths.templates.is_absolute());

    // Defaults in override order: metadata-only, "./", "./_posts"
    let scopes: Vec<Option<&str>> = resolved
        .defaults
        .iter()
        .map(|rule| rule.scope.path.as_deref())
        .collect();
    assert_eq!(scopes[0], None);
    assert_eq!(scopes[1], Some(root.join("site").as_str()));
    assert_eq!(scopes[2], Some(root.join("site").join("_posts").as_str()));

    // Matchers and asset rules are live predicates
    assert!(resolved.ignore[0].matches("_drafts/wip.md"));
    assert!(resolved.assets[0].test.matches("images/logo.png"));

    // Dotted-path shim sees the resolved values
    assert_eq!(
        store.get_path("path.source").unwrap().as_str().unwrap(),
        root.join("site").as_str()
    );
    assert_eq!(
        store.get_path("site.title").unwrap().as_str().unwrap(),
        "Field Notes"
    );
    assert!(matches!(
        store.get_path("nope.nope"),
        Err(Error::PathNotFound { .. })
    ));
}

#[test]
fn repeated_updates_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_config(&dir, CONFIG);

    let mut store = store_for(&dir);
    store.update().unwrap();
    let first_paths = store.resolved().unwrap().paths.clone();
    let first_defaults = store.resolved().unwrap().defaults.clone();

    store.update().unwrap();
    assert_eq!(store.resolved().unwrap().paths, first_paths);
    assert_eq!(store.resolved().unwrap().defaults, first_defaults);
}

#[test]
fn invalid_rewrite_keeps_previous_resolution() {
    let dir = tempfile::tempdir().unwrap();
    write_config(&dir, CONFIG);

    let mut store = store_for(&dir);
    store.update().unwrap();
    let before = store.get_path("path.source").unwrap().clone();

    // Schema violation: incremental must be a boolean
    write_config(&dir, "incremental = \"yes\"\n");
    let err = store.update().unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    assert_eq!(store.get_path("path.source").unwrap(), &before);
}

#[test]
fn validation_error_names_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_config(&dir, "bogus_key = 1\n");

    let mut store = store_for(&dir);
    match store.update().unwrap_err() {
        Error::Validation { source_id, .. } => {
            assert!(source_id.ends_with("config.toml"), "got {source_id}");
        }
        other => panic!("expected Validation, got {other}"),
    }
}

#[test]
fn factory_source_resolves_like_a_file() {
    let mut store = ConfigStore::builder("/project")
        .source(ConfigSource::Factory(Box::new(|| {
            serde_json::json!({
                "path": { "source": "./site" },
                "lifecycle": { "didBuild": ["announce"] }
            })
        })))
        .register_hook("announce", Arc::new(Announce))
        .build();
    store.update().unwrap();

    let resolved = store.resolved().unwrap();
    assert_eq!(resolved.paths.source.as_str(), "/project/site");
    assert_eq!(resolved.lifecycle[&LifecycleEvent::DidBuild].len(), 1);
}

struct Announce;

#[async_trait::async_trait]
impl loam_config::LifecycleHook for Announce {
    async fn run(&self, _site: &serde_json::Value) -> loam_config::Result<()> {
        Ok(())
    }
}
