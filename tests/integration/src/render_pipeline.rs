//! End-to-end render orchestration: config store feeding engines, plus
//! the pre/render/post hook sequence over real dispatch doubles.

use async_trait::async_trait;
use loam_config::{ConfigSource, ConfigStore, MarkdownSection};
use loam_fs::SitePath;
use loam_render::{
    BoxedError, ContentFile, DispatchError, FileRenderError, HookPayload, MarkdownEngine,
    MarkdownFactory, PluginDispatcher, RenderOptions, RenderOrchestrator, RenderedFile, Result,
    TeraFactory,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

struct UpperMarkdown;

impl MarkdownEngine for UpperMarkdown {
    fn render(&self, text: &str) -> std::result::Result<String, BoxedError> {
        Ok(text.to_uppercase())
    }
}

struct UpperFactory;

impl MarkdownFactory for UpperFactory {
    fn create(&self, _section: &MarkdownSection) -> Result<Box<dyn MarkdownEngine>> {
        Ok(Box::new(UpperMarkdown))
    }
}

struct Page {
    id: String,
    metadata: Value,
    body: String,
}

impl Page {
    fn boxed(id: &str, body: &str) -> Box<dyn ContentFile> {
        Box::new(Self {
            id: id.to_string(),
            metadata: serde_json::json!({}),
            body: body.to_string(),
        })
    }
}

impl ContentFile for Page {
    fn id(&self) -> &str {
        &self.id
    }

    fn metadata(&self) -> &Value {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Value {
        &mut self.metadata
    }

    fn render(&self, site: &Value) -> std::result::Result<RenderedFile, FileRenderError> {
        let extra = self.metadata["note"].as_str().unwrap_or("");
        Ok(RenderedFile {
            path: format!("{}.html", self.id),
            content: format!("{}|{}{}", site["name"].as_str().unwrap_or(""), self.body, extra),
        })
    }
}

/// Records event order and stamps metadata in PRE, wraps content in POST.
#[derive(Default)]
struct MarkingDispatcher {
    events: Mutex<Vec<String>>,
}

#[async_trait]
impl PluginDispatcher for MarkingDispatcher {
    async fn process_event(
        &self,
        event: &str,
        mut payload: HookPayload,
    ) -> std::result::Result<HookPayload, DispatchError> {
        self.events.lock().unwrap().push(format!("{event}:{}", payload.file.id()));
        if event == "beforeRender" {
            payload.file.metadata_mut()["note"] = Value::String("+hooked".to_string());
        }
        if event == "afterRender" {
            if let Some(rendered) = payload.rendered.take() {
                payload.rendered = Some(RenderedFile {
                    path: rendered.path,
                    content: format!("[{}]", rendered.content),
                });
            }
        }
        Ok(payload)
    }
}

fn build_orchestrator(dispatcher: Arc<dyn PluginDispatcher>) -> RenderOrchestrator {
    RenderOrchestrator::new(Box::new(UpperFactory), Box::new(TeraFactory), dispatcher)
}

fn updated_store() -> ConfigStore {
    let mut store = ConfigStore::builder("/project")
        .source(ConfigSource::Value(serde_json::json!({})))
        .build();
    store.update().unwrap();
    store
}

#[test]
fn engines_rebuild_from_store_state() {
    let templates = tempfile::tempdir().unwrap();
    std::fs::write(templates.path().join("page.html"), "<b>{{ title }}</b>").unwrap();

    let store = updated_store();
    let mut orchestrator = build_orchestrator(Arc::new(MarkingDispatcher::default()));
    orchestrator
        .update(&store, RenderOptions {
            cache_disabled: false,
            template_search_paths: vec![SitePath::new(templates.path())],
        })
        .unwrap();

    assert_eq!(orchestrator.render_markdown("hi").unwrap(), "HI");
    assert_eq!(
        orchestrator
            .render_template("page.html", &serde_json::json!({ "title": "x" }))
            .unwrap(),
        "<b>x</b>"
    );

    // A second update fully replaces the environment
    let empty = tempfile::tempdir().unwrap();
    orchestrator
        .update(&store, RenderOptions {
            cache_disabled: false,
            template_search_paths: vec![SitePath::new(empty.path())],
        })
        .unwrap();
    assert!(
        orchestrator
            .render_template("page.html", &serde_json::json!({ "title": "x" }))
            .is_err()
    );
}

#[tokio::test]
async fn full_three_phase_sequence() {
    let dispatcher = Arc::new(MarkingDispatcher::default());
    let orchestrator = build_orchestrator(dispatcher.clone());
    let site = serde_json::json!({ "name": "Blog" });

    let (file, rendered) = orchestrator
        .render_file_with_plugins(
            Page::boxed("hello.md", "body"),
            &site,
            Some("beforeRender"),
            Some("afterRender"),
        )
        .await
        .unwrap();

    // PRE ran before RENDER (the hook's metadata stamp reached render),
    // POST ran after and rewrote the artifact
    assert_eq!(file.id(), "hello.md");
    assert_eq!(rendered.path, "hello.md.html");
    assert_eq!(rendered.content, "[Blog|body+hooked]");
    assert_eq!(
        *dispatcher.events.lock().unwrap(),
        vec!["beforeRender:hello.md", "afterRender:hello.md"]
    );
}

#[tokio::test]
async fn concurrent_files_keep_their_own_pairs() {
    let dispatcher = Arc::new(MarkingDispatcher::default());
    let orchestrator = build_orchestrator(dispatcher);
    let site = serde_json::json!({ "name": "Blog" });

    let (a, b) = tokio::join!(
        orchestrator.render_file_with_plugins(
            Page::boxed("a.md", "alpha"),
            &site,
            Some("beforeRender"),
            Some("afterRender"),
        ),
        orchestrator.render_file_with_plugins(
            Page::boxed("b.md", "beta"),
            &site,
            Some("beforeRender"),
            Some("afterRender"),
        ),
    );

    let (a_file, a_rendered) = a.unwrap();
    let (b_file, b_rendered) = b.unwrap();
    assert_eq!(a_file.id(), "a.md");
    assert_eq!(a_rendered.content, "[Blog|alpha+hooked]");
    assert_eq!(b_file.id(), "b.md");
    assert_eq!(b_rendered.content, "[Blog|beta+hooked]");
}
