//! Activation scheduling.
//!
//! Elements are activated either all at once (`lazyload = false`) or by
//! viewport position: an initial sweep against the viewport height, then a
//! debounced scroll handler that only reacts to downward movement.

pub mod debounce;

pub use debounce::{Debouncer, Trigger};

use std::sync::Arc;
use std::time::Duration;

use lazyframe_dom::Document;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::metadata::MetadataProvider;
use crate::placeholder;
use crate::registry::TrackedElement;

/// Turns a tracked element into a populated placeholder, at most once.
#[derive(Clone)]
pub struct Activator {
    doc: Arc<dyn Document>,
    provider: Option<Arc<dyn MetadataProvider>>,
}

impl Activator {
    pub fn new(doc: Arc<dyn Document>, provider: Option<Arc<dyn MetadataProvider>>) -> Self {
        Self { doc, provider }
    }

    pub fn document(&self) -> &Arc<dyn Document> {
        &self.doc
    }

    pub fn provider(&self) -> Option<&Arc<dyn MetadataProvider>> {
        self.provider.as_ref()
    }

    /// Activate `element` unless it already was.
    ///
    /// The `initialized` flag is flipped before anything else happens, so a
    /// second call for the same element returns `false` even while the first
    /// one's lookup is still in flight. Population runs inline when no lookup
    /// is needed, otherwise on a spawned task. Outside a tokio runtime the
    /// lookup is skipped and population runs inline.
    pub fn activate(&self, element: &Arc<TrackedElement>) -> bool {
        if !element.try_activate() {
            return false;
        }

        let node = element.node();
        let provider = self
            .provider
            .as_ref()
            .filter(|p| element.settings().use_api && p.is_available())
            .cloned();
        let handle = match (&provider, Handle::try_current()) {
            (Some(_), Ok(handle)) => Some(handle),
            (Some(_), Err(_)) => {
                warn!(%node, "No tokio runtime; populating without metadata lookup");
                None
            }
            (None, _) => None,
        };

        let (Some(provider), Some(handle)) = (provider, handle) else {
            debug!(%node, vendor = %element.vendor(), "Activating without lookup");
            if let Err(e) = placeholder::populate(self.doc.as_ref(), element) {
                warn!(%node, error = %e, "Failed to populate placeholder");
            }
            return true;
        };

        debug!(%node, vendor = %element.vendor(), provider = provider.name(), "Activating with lookup");
        let doc = Arc::clone(&self.doc);
        let element = Arc::clone(element);
        handle.spawn(async move {
            let src = &element.settings().source.source;
            match provider.lookup(src).await {
                Ok(metadata) => element.apply_metadata(metadata),
                Err(e) => warn!(node = %element.node(), %src, error = %e, "Metadata lookup failed"),
            }
            if let Err(e) = placeholder::populate(doc.as_ref(), &element) {
                warn!(node = %element.node(), error = %e, "Failed to populate placeholder");
            }
        });
        true
    }

    /// Activate every element whose offset lies above `limit`.
    pub fn sweep(&self, elements: &[Arc<TrackedElement>], limit: f64) -> usize {
        elements
            .iter()
            .filter(|e| !e.is_initialized() && e.settings().viewport_offset < limit)
            .filter(|e| self.activate(e))
            .count()
    }
}

/// Activate every element of a batch straight away.
pub fn activate_all(activator: &Activator, elements: &[Arc<TrackedElement>]) -> usize {
    elements.iter().filter(|e| activator.activate(e)).count()
}

/// Run the initial sweep for a lazily loaded batch and, if anything is left,
/// attach a debounced scroll handler for the rest.
///
/// Returns the handle of the scroll task, or `None` when the initial sweep
/// already activated the whole batch. Outside a tokio runtime no scroll task
/// can run, so the remaining elements are activated straight away.
pub fn schedule_lazy(
    activator: Activator,
    elements: Vec<Arc<TrackedElement>>,
    debounce: Duration,
) -> Option<JoinHandle<()>> {
    let doc = Arc::clone(activator.document());
    let activated = activator.sweep(&elements, doc.viewport_height());
    debug!(activated, total = elements.len(), "Initial sweep");

    if elements.iter().all(|e| e.is_initialized()) {
        return None;
    }

    let Ok(handle) = Handle::try_current() else {
        let activated = activate_all(&activator, &elements);
        warn!(activated, "No tokio runtime for the scroll handler; activated the rest eagerly");
        return None;
    };

    let (trigger, mut debouncer) = Debouncer::channel(debounce);
    let listener = doc.add_scroll_listener(Arc::new(move || {
        let _ = trigger.send(());
    }));

    Some(handle.spawn(async move {
        let mut last_y = 0.0;

        while debouncer.settled().await {
            let y = doc.scroll_y();
            let downward = last_y < y;
            last_y = y;

            if downward {
                let activated = activator.sweep(&elements, doc.viewport_height() + y);
                if activated > 0 {
                    debug!(activated, scroll_y = y, "Scroll sweep");
                }
            }

            if elements.iter().all(|e| e.is_initialized()) {
                doc.remove_scroll_listener(listener);
                info!(total = elements.len(), "All elements activated; scroll listener removed");
                break;
            }
        }
    }))
}
