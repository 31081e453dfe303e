//! In-memory [`Document`] implementation.
//!
//! Nodes live in an arena indexed by [`NodeId`]; node 0 is `<body>`. Layout is
//! not computed: offsets are set explicitly with
//! [`MemoryDocument::set_offset_top`], and scrolling happens through
//! [`MemoryDocument::scroll_to`], which fires every registered scroll
//! listener.

use std::fmt::Write as _;

use lazyframe_common::{Error, NodeId, Result};
use parking_lot::RwLock;

use crate::element::Element;
use crate::selector::Selector;
use crate::{ClickListener, Document, ListenerId, ScrollListener};

#[derive(Debug)]
struct NodeData {
    tag: String,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    text: String,
    children: Vec<NodeId>,
    offset_top: f64,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            classes: Vec::new(),
            styles: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            offset_top: 0.0,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn matches(&self, selector: &Selector) -> bool {
        selector.matches(&self.tag, &self.classes, |name| self.attr(name))
    }
}

struct ClickEntry {
    node: NodeId,
    listener: ClickListener,
    once: bool,
}

struct Inner {
    nodes: Vec<NodeData>,
    viewport_height: f64,
    scroll_y: f64,
    next_listener: u64,
    click_listeners: Vec<ClickEntry>,
    scroll_listeners: Vec<(ListenerId, ScrollListener)>,
}

impl Inner {
    fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes.get(id.index()).ok_or(Error::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes.get_mut(id.index()).ok_or(Error::UnknownNode(id))
    }

    fn listener_id(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId(self.next_listener)
    }

    fn insert(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId::from(self.nodes.len());
        let mut data = NodeData::new(&element.tag);
        data.attributes = element.attributes;
        data.classes = element.classes;
        data.text = element.text;
        self.nodes.push(data);
        self.nodes[parent.index()].children.push(id);
        for child in element.children {
            self.insert(id, child);
        }
        id
    }

    /// Descendants of `root` in document order, `root` excluded.
    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.nodes[root.index()].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.index()];
        let _ = write!(out, "<{}", node.tag);
        if !node.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&node.classes.join(" ")));
        }
        for (name, value) in &node.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if !node.styles.is_empty() {
            let style = node
                .styles
                .iter()
                .map(|(p, v)| format!("{p}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            let _ = write!(out, " style=\"{}\"", escape(&style));
        }
        out.push('>');
        out.push_str(&escape(&node.text));
        for &child in &node.children {
            self.write_html(child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Thread-safe in-memory document.
pub struct MemoryDocument {
    inner: RwLock<Inner>,
}

impl MemoryDocument {
    /// Create an empty document with the given viewport height.
    pub fn new(viewport_height: f64) -> Self {
        Self {
            inner: RwLock::new(Inner {
                nodes: vec![NodeData::new("body")],
                viewport_height,
                scroll_y: 0.0,
                next_listener: 0,
                click_listeners: Vec::new(),
                scroll_listeners: Vec::new(),
            }),
        }
    }

    /// The `<body>` node.
    pub fn body(&self) -> NodeId {
        NodeId::from(0)
    }

    pub fn set_offset_top(&self, node: NodeId, offset: f64) -> Result<()> {
        self.inner.write().node_mut(node)?.offset_top = offset;
        Ok(())
    }

    pub fn set_viewport_height(&self, height: f64) {
        self.inner.write().viewport_height = height;
    }

    /// Move the scroll position and fire every scroll listener once.
    pub fn scroll_to(&self, y: f64) {
        let listeners: Vec<ScrollListener> = {
            let mut inner = self.inner.write();
            inner.scroll_y = y;
            inner
                .scroll_listeners
                .iter()
                .map(|(_, l)| l.clone())
                .collect()
        };
        tracing::trace!(y, listeners = listeners.len(), "Dispatching scroll");
        for listener in listeners {
            listener();
        }
    }

    /// Number of scroll listeners currently registered.
    pub fn scroll_listener_count(&self) -> usize {
        self.inner.read().scroll_listeners.len()
    }

    /// Inline style value of `property` on `node`.
    pub fn style(&self, node: NodeId, property: &str) -> Result<Option<String>> {
        let inner = self.inner.read();
        Ok(inner
            .node(node)?
            .styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.clone()))
    }

    /// Direct children of `node`.
    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.inner.read().node(node)?.children.clone())
    }

    /// Tag name of `node`.
    pub fn tag(&self, node: NodeId) -> Result<String> {
        Ok(self.inner.read().node(node)?.tag.clone())
    }

    /// Serialise `node` and its subtree.
    pub fn outer_html(&self, node: NodeId) -> Result<String> {
        let inner = self.inner.read();
        inner.node(node)?;
        let mut out = String::new();
        inner.write_html(node, &mut out);
        Ok(out)
    }

    /// Number of descendants of `node` matching `selector`.
    pub fn count(&self, node: NodeId, selector: &str) -> usize {
        let Ok(selector) = Selector::parse(selector) else {
            return 0;
        };
        let inner = self.inner.read();
        if inner.node(node).is_err() {
            return 0;
        }
        let mut all = Vec::new();
        inner.descendants(node, &mut all);
        all.into_iter()
            .filter(|id| inner.nodes[id.index()].matches(&selector))
            .count()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new(768.0)
    }
}

impl Document for MemoryDocument {
    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let selector = match Selector::parse(selector) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring selector");
                return Vec::new();
            }
        };
        let inner = self.inner.read();
        let mut all = Vec::new();
        inner.descendants(self.body(), &mut all);
        all.retain(|id| inner.nodes[id.index()].matches(&selector));
        all
    }

    fn query_selector(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let Ok(selector) = Selector::parse(selector) else {
            return Ok(None);
        };
        let inner = self.inner.read();
        inner.node(node)?;
        let mut all = Vec::new();
        inner.descendants(node, &mut all);
        Ok(all
            .into_iter()
            .find(|id| inner.nodes[id.index()].matches(&selector)))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        let inner = self.inner.read();
        let data = inner.node(node)?;
        if name.eq_ignore_ascii_case("class") {
            return Ok((!data.classes.is_empty()).then(|| data.classes.join(" ")));
        }
        Ok(data.attr(name).map(str::to_string))
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let data = inner.node_mut(node)?;
        let name = name.to_ascii_lowercase();
        if name == "class" {
            data.classes = value.split_whitespace().map(str::to_string).collect();
            return Ok(());
        }
        match data.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => data.attributes.push((name, value.to_string())),
        }
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> Result<bool> {
        Ok(self.inner.read().node(node)?.classes.iter().any(|c| c == class))
    }

    fn add_class(&self, node: NodeId, class: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let data = inner.node_mut(node)?;
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_string());
        }
        Ok(())
    }

    fn set_style(&self, node: NodeId, property: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let data = inner.node_mut(node)?;
        match data.styles.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) => *v = value.to_string(),
            None => data.styles.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn text(&self, node: NodeId) -> Result<String> {
        Ok(self.inner.read().node(node)?.text.clone())
    }

    fn set_text(&self, node: NodeId, text: &str) -> Result<()> {
        self.inner.write().node_mut(node)?.text = text.to_string();
        Ok(())
    }

    fn append_child(&self, parent: NodeId, element: Element) -> Result<NodeId> {
        let mut inner = self.inner.write();
        inner.node(parent)?;
        Ok(inner.insert(parent, element))
    }

    fn offset_top(&self, node: NodeId) -> Result<f64> {
        Ok(self.inner.read().node(node)?.offset_top)
    }

    fn viewport_height(&self) -> f64 {
        self.inner.read().viewport_height
    }

    fn scroll_y(&self) -> f64 {
        self.inner.read().scroll_y
    }

    fn add_click_listener(
        &self,
        node: NodeId,
        listener: ClickListener,
        once: bool,
    ) -> Result<ListenerId> {
        let mut inner = self.inner.write();
        inner.node(node)?;
        let id = inner.listener_id();
        inner.click_listeners.push(ClickEntry {
            node,
            listener,
            once,
        });
        Ok(id)
    }

    fn click(&self, node: NodeId) -> Result<()> {
        let listeners: Vec<ClickListener> = {
            let mut inner = self.inner.write();
            inner.node(node)?;
            let fired = inner
                .click_listeners
                .iter()
                .filter(|entry| entry.node == node)
                .map(|entry| entry.listener.clone())
                .collect();
            inner
                .click_listeners
                .retain(|entry| !(entry.node == node && entry.once));
            fired
        };
        tracing::trace!(%node, listeners = listeners.len(), "Dispatching click");
        for listener in listeners {
            listener(node);
        }
        Ok(())
    }

    fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId {
        let mut inner = self.inner.write();
        let id = inner.listener_id();
        inner.scroll_listeners.push((id, listener));
        id
    }

    fn remove_scroll_listener(&self, id: ListenerId) {
        self.inner
            .write()
            .scroll_listeners
            .retain(|(existing, _)| *existing != id);
    }
}
