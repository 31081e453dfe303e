//! Lazyframe-DOM: the host document seen by lazyframe.
//!
//! Lazyframe never talks to a browser directly. Everything it needs from a
//! page (attributes, classes, child insertion, inline styles, click and
//! scroll listeners, viewport geometry) goes through the [`Document`] trait.
//!
//! - [`element`] -- Detached element trees used to build fragments.
//! - [`memory`] -- [`MemoryDocument`], an in-memory implementation with HTML
//!   serialisation, used by tests and the command-line renderer.
//! - [`selector`] -- The compound selector subset understood by
//!   [`MemoryDocument`].

pub mod element;
pub mod memory;
pub mod selector;

use std::sync::Arc;

use lazyframe_common::{NodeId, Result};

pub use element::Element;
pub use memory::MemoryDocument;
pub use selector::Selector;

/// Callback invoked with the clicked node.
pub type ClickListener = Arc<dyn Fn(NodeId) + Send + Sync>;

/// Callback invoked on every scroll event.
pub type ScrollListener = Arc<dyn Fn() + Send + Sync>;

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A page that lazyframe can read from and mutate.
///
/// Implementations must not hold internal locks while invoking listeners:
/// listeners call straight back into the document.
pub trait Document: Send + Sync {
    /// All element nodes matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<NodeId>;

    /// First descendant of `node` matching `selector`.
    fn query_selector(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>>;

    /// Attribute value, `None` when the attribute is absent.
    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>>;

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()>;

    fn has_class(&self, node: NodeId, class: &str) -> Result<bool>;

    fn add_class(&self, node: NodeId, class: &str) -> Result<()>;

    /// Set an inline style property (e.g. `background-image`).
    fn set_style(&self, node: NodeId, property: &str, value: &str) -> Result<()>;

    /// Text content of `node`.
    fn text(&self, node: NodeId) -> Result<String>;

    fn set_text(&self, node: NodeId, text: &str) -> Result<()>;

    /// Attach a detached element tree as the last child of `parent` and
    /// return the handle of its root.
    fn append_child(&self, parent: NodeId, element: Element) -> Result<NodeId>;

    /// Vertical offset of `node` from the top of the page.
    fn offset_top(&self, node: NodeId) -> Result<f64>;

    fn viewport_height(&self) -> f64;

    /// Current vertical scroll position.
    fn scroll_y(&self) -> f64;

    /// Register a click listener on `node`. A `once` listener is removed
    /// before its first invocation.
    fn add_click_listener(&self, node: NodeId, listener: ClickListener, once: bool)
        -> Result<ListenerId>;

    /// Dispatch a click on `node` to its listeners.
    fn click(&self, node: NodeId) -> Result<()>;

    fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId;

    /// Remove a scroll listener. Removing an unknown id is a no-op.
    fn remove_scroll_listener(&self, id: ListenerId);
}
