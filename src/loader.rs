//! Registration entry point.

use std::sync::Arc;
use std::time::Duration;

use lazyframe_common::{classes, Error, NodeId, Result};
use lazyframe_dom::Document;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{InitConfig, MetadataConfig};
use crate::metadata::{MetadataProvider, NoembedProvider};
use crate::placeholder;
use crate::registry::{Registry, TrackedElement};
use crate::scheduler::{self, Activator};

/// Nodes to register in one batch.
#[derive(Debug, Clone)]
pub enum Selection<'a> {
    /// Every node matching a selector, in document order.
    Selector(&'a str),
    Node(NodeId),
    Nodes(Vec<NodeId>),
}

impl<'a> From<&'a str> for Selection<'a> {
    fn from(selector: &'a str) -> Self {
        Selection::Selector(selector)
    }
}

impl From<NodeId> for Selection<'_> {
    fn from(node: NodeId) -> Self {
        Selection::Node(node)
    }
}

impl From<Vec<NodeId>> for Selection<'_> {
    fn from(nodes: Vec<NodeId>) -> Self {
        Selection::Nodes(nodes)
    }
}

/// Outcome of one [`Lazyframe::init`] call.
#[derive(Debug, Default)]
pub struct Registration {
    /// Newly tracked elements, in selection order.
    pub elements: Vec<Arc<TrackedElement>>,
    /// Nodes that could not be registered. They do not affect the others.
    pub failures: Vec<Error>,
    /// Nodes left alone because they were already tracked or loaded.
    pub skipped: Vec<NodeId>,
    /// Debounced scroll handler, when some element is still waiting for the
    /// viewport.
    pub scroll_task: Option<JoinHandle<()>>,
}

impl Registration {
    pub fn nodes(&self) -> Vec<NodeId> {
        self.elements.iter().map(|e| e.node()).collect()
    }
}

/// A lazy-loading instance bound to one document.
///
/// The registry is shared by every batch and only grows. Each batch keeps the
/// configuration it was registered with.
///
/// Registration spawns tokio tasks for metadata lookups and scroll handling.
/// Called outside a runtime, [`init`](Self::init) skips lookups and activates
/// lazily loaded elements straight away.
pub struct Lazyframe {
    activator: Activator,
    registry: Registry,
}

impl Lazyframe {
    pub fn new(doc: Arc<dyn Document>, provider: Option<Arc<dyn MetadataProvider>>) -> Self {
        Self {
            activator: Activator::new(doc, provider),
            registry: Registry::new(),
        }
    }

    /// Instance that never performs metadata lookups.
    pub fn without_metadata(doc: Arc<dyn Document>) -> Self {
        Self::new(doc, None)
    }

    /// Instance backed by a [`NoembedProvider`] for the configured endpoint.
    pub fn from_config(doc: Arc<dyn Document>, metadata: &MetadataConfig) -> Self {
        let provider = metadata.enabled.then(|| {
            Arc::new(NoembedProvider::new(metadata.endpoint.clone())) as Arc<dyn MetadataProvider>
        });
        Self::new(doc, provider)
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        self.activator.document()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether registered elements can have missing title or thumbnail
    /// looked up.
    pub fn has_metadata(&self) -> bool {
        self.activator.provider().is_some()
    }

    /// Register a batch of nodes and schedule their activation.
    pub fn init<'a>(&self, selection: impl Into<Selection<'a>>, config: InitConfig) -> Registration {
        let doc = self.document();
        let config = Arc::new(config);
        let nodes = match selection.into() {
            Selection::Selector(selector) => doc.query_selector_all(selector),
            Selection::Node(node) => vec![node],
            Selection::Nodes(nodes) => nodes,
        };

        let mut registration = Registration::default();
        for node in nodes {
            match self.register(node, &config) {
                Ok(Some(element)) => registration.elements.push(element),
                Ok(None) => registration.skipped.push(node),
                Err(e) => {
                    warn!(%node, error = %e, "Skipping node");
                    registration.failures.push(e);
                }
            }
        }

        let options = &config.options;
        info!(
            registered = registration.elements.len(),
            failed = registration.failures.len(),
            skipped = registration.skipped.len(),
            lazyload = options.lazyload,
            "Registered batch"
        );

        if options.lazyload {
            registration.scroll_task = scheduler::schedule_lazy(
                self.activator.clone(),
                registration.elements.clone(),
                Duration::from_millis(options.debounce_ms),
            );
        } else {
            scheduler::activate_all(&self.activator, &registration.elements);
        }

        registration
    }

    /// Register a single node, reporting its failure directly.
    ///
    /// A node that is already tracked yields its existing element.
    pub fn create(&self, node: NodeId, config: InitConfig) -> Result<Arc<TrackedElement>> {
        let mut registration = self.init(node, config);
        if let Some(err) = registration.failures.pop() {
            return Err(err);
        }
        registration
            .elements
            .pop()
            .or_else(|| self.registry.get(node))
            .ok_or(Error::UnknownNode(node))
    }

    fn register(&self, node: NodeId, config: &Arc<InitConfig>) -> Result<Option<Arc<TrackedElement>>> {
        let doc = self.document();
        if self.registry.contains(node) || doc.has_class(node, classes::LOADED)? {
            debug!(%node, "Already registered");
            return Ok(None);
        }

        let element = Arc::new(TrackedElement::from_node(
            doc.as_ref(),
            node,
            Arc::clone(config),
        )?);
        placeholder::prepare(doc, &element)?;
        self.registry.push(Arc::clone(&element));
        debug!(%node, vendor = %element.vendor(), embed = %element.settings().embed_url, "Registered node");
        Ok(Some(element))
    }
}
