//! Shared test harness for integration tests.
//!
//! Provides [`TestPage`], an in-memory document with helpers for adding
//! placeholder nodes, and [`StubProvider`], a metadata provider that records
//! every lookup.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use lazyframe::metadata::{EmbedMetadata, MetadataProvider};
use lazyframe::{Document, Element, InitConfig, Lazyframe, LazyframeOptions, MemoryDocument, NodeId};

/// An in-memory page holding placeholder nodes.
pub struct TestPage {
    pub doc: Arc<MemoryDocument>,
}

impl TestPage {
    pub fn new() -> Self {
        Self::with_viewport(768.0)
    }

    pub fn with_viewport(height: f64) -> Self {
        Self {
            doc: Arc::new(MemoryDocument::new(height)),
        }
    }

    /// Append a `.lazyframe` node with the given attributes at `offset`.
    pub fn placeholder(&self, attributes: &[(&str, &str)], offset: f64) -> NodeId {
        let mut el = Element::new("div").with_class("lazyframe");
        for (name, value) in attributes {
            el.set_attribute(*name, *value);
        }
        let node = self
            .doc
            .append_child(self.doc.body(), el)
            .expect("body accepts children");
        self.doc
            .set_offset_top(node, offset)
            .expect("node was just added");
        node
    }

    pub fn lazyframe(&self) -> Lazyframe {
        Lazyframe::without_metadata(self.doc.clone())
    }

    pub fn lazyframe_with(&self, provider: Arc<dyn MetadataProvider>) -> Lazyframe {
        Lazyframe::new(self.doc.clone(), Some(provider))
    }

    pub fn is_loaded(&self, node: NodeId) -> bool {
        self.doc.has_class(node, "lazyframe--loaded").unwrap()
    }

    pub fn title_text(&self, node: NodeId) -> Option<String> {
        let span = self.doc.query_selector(node, ".lazyframe__title").unwrap()?;
        Some(self.doc.text(span).unwrap())
    }
}

pub fn eager() -> InitConfig {
    LazyframeOptions {
        lazyload: false,
        ..LazyframeOptions::default()
    }
    .into()
}

pub fn lazy(debounce_ms: u64) -> InitConfig {
    LazyframeOptions {
        debounce_ms,
        ..LazyframeOptions::default()
    }
    .into()
}

/// Attach an `on_load` hook that forwards loaded nodes to a channel.
pub fn track_loads(config: InitConfig) -> (InitConfig, mpsc::UnboundedReceiver<NodeId>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let config = config.on_load(move |node| {
        let _ = tx.send(node);
    });
    (config, rx)
}

/// Wait for `count` loads, failing the test after a few seconds.
pub async fn wait_for_loads(rx: &mut mpsc::UnboundedReceiver<NodeId>, count: usize) -> Vec<NodeId> {
    let mut loaded = Vec::with_capacity(count);
    while loaded.len() < count {
        let node = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for on_load")
            .expect("load channel closed");
        loaded.push(node);
    }
    loaded
}

/// Metadata provider returning a fixed answer and recording each lookup.
pub struct StubProvider {
    pub response: EmbedMetadata,
    pub lookups: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(title: Option<&str>, thumbnail_url: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            response: EmbedMetadata {
                title: title.map(str::to_string),
                thumbnail_url: thumbnail_url.map(str::to_string),
            },
            lookups: Mutex::new(Vec::new()),
        })
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn lookup(&self, source_url: &str) -> anyhow::Result<EmbedMetadata> {
        self.lookups.lock().push(source_url.to_string());
        Ok(self.response.clone())
    }
}
