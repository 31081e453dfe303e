//! Tracked elements and the registry that owns them.
//!
//! A [`TrackedElement`] splits into a frozen [`ElementSettings`] value,
//! computed once from the node's attributes, and the only three fields that
//! change afterwards: title, thumbnail and the `initialized` flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lazyframe_common::{Error, NodeId, Result, ThumbnailImage, ThumbnailQuality, Vendor};
use lazyframe_dom::{Document, Element};
use parking_lot::{Mutex, RwLock};

use crate::config::InitConfig;
use crate::metadata::thumbnail::select_thumbnail;
use crate::metadata::EmbedMetadata;
use crate::resolver::ResolvedSource;

/// Attribute names read from a tracked node.
pub mod attrs {
    pub const SRC: &str = "data-src";
    pub const TITLE: &str = "data-title";
    pub const THUMBNAIL: &str = "data-thumbnail";
    pub const INIT_IN_VIEW: &str = "data-initinview";
    pub const VENDOR: &str = "data-vendor";
    pub const YOUTUBE_THUMBNAIL_QUALITY: &str = "data-youtube-thumbnail-quality";
    pub const YOUTUBE_THUMBNAIL_IMAGE: &str = "data-youtube-thumbnail-image";
}

/// Immutable per-element settings.
#[derive(Debug, Clone)]
pub struct ElementSettings {
    pub source: ResolvedSource,
    pub autoplay: bool,
    /// `autoplay=<0|1>` plus extracted extras.
    pub query: String,
    pub embed_url: String,
    /// Click the node as soon as it is populated.
    pub init_in_view: bool,
    /// Whether a metadata lookup is wanted.
    pub use_api: bool,
    pub thumbnail_quality: ThumbnailQuality,
    pub thumbnail_image: ThumbnailImage,
    /// Captured at registration; never refreshed.
    pub viewport_offset: f64,
}

/// Read an attribute, treating an empty value as absent.
fn non_empty(doc: &dyn Document, node: NodeId, name: &str) -> Result<Option<String>> {
    Ok(doc.attribute(node, name)?.filter(|v| !v.is_empty()))
}

/// Read a hint attribute, falling back when missing, empty or not a known
/// value.
fn hint<T: std::str::FromStr>(
    doc: &dyn Document,
    node: NodeId,
    name: &str,
    fallback: T,
) -> Result<T> {
    Ok(non_empty(doc, node, name)?
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback))
}

/// A registered node together with its settings and mutable state.
pub struct TrackedElement {
    node: NodeId,
    settings: ElementSettings,
    config: Arc<InitConfig>,
    title: RwLock<Option<String>>,
    thumbnail: RwLock<Option<String>>,
    initialized: AtomicBool,
    /// Prepared iframe, taken by the first click.
    iframe: Mutex<Option<Element>>,
}

impl TrackedElement {
    /// Build the tracked state for `node` from its attributes.
    ///
    /// Fails with [`Error::MissingSource`] when `data-src` is absent or empty.
    pub fn from_node(doc: &dyn Document, node: NodeId, config: Arc<InitConfig>) -> Result<Self> {
        let src = non_empty(doc, node, attrs::SRC)?.ok_or(Error::missing_source(node))?;
        let title = non_empty(doc, node, attrs::TITLE)?;
        let thumbnail = non_empty(doc, node, attrs::THUMBNAIL)?;
        let init_in_view = doc.attribute(node, attrs::INIT_IN_VIEW)?.as_deref() == Some("true");

        let options = &config.options;
        let thumbnail_quality = hint(
            doc,
            node,
            attrs::YOUTUBE_THUMBNAIL_QUALITY,
            options.youtube_thumbnail_quality,
        )?;
        let thumbnail_image = hint(
            doc,
            node,
            attrs::YOUTUBE_THUMBNAIL_IMAGE,
            options.youtube_thumbnail_image,
        )?;

        let source = ResolvedSource::parse(&src);
        let use_api = source.vendor != Vendor::Unknown && (title.is_none() || thumbnail.is_none());

        let settings = ElementSettings {
            query: source.query(options.autoplay),
            embed_url: source.embed_url(options.autoplay),
            autoplay: options.autoplay,
            source,
            init_in_view,
            use_api,
            thumbnail_quality,
            thumbnail_image,
            viewport_offset: doc.offset_top(node)?,
        };

        Ok(Self {
            node,
            settings,
            config,
            title: RwLock::new(title),
            thumbnail: RwLock::new(thumbnail),
            initialized: AtomicBool::new(false),
            iframe: Mutex::new(None),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn settings(&self) -> &ElementSettings {
        &self.settings
    }

    pub fn vendor(&self) -> Vendor {
        self.settings.source.vendor
    }

    /// Configuration snapshot of the batch this element was registered in.
    pub fn config(&self) -> &InitConfig {
        &self.config
    }

    pub fn title(&self) -> Option<String> {
        self.title.read().clone()
    }

    pub fn thumbnail(&self) -> Option<String> {
        self.thumbnail.read().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Flip `initialized` from false to true.
    ///
    /// Returns `true` only for the single caller that performed the flip.
    pub fn try_activate(&self) -> bool {
        self.initialized
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Fill in title and thumbnail from a lookup. Values the caller supplied
    /// are never replaced.
    pub fn apply_metadata(&self, metadata: EmbedMetadata) {
        if let Some(fetched) = metadata.title {
            let mut title = self.title.write();
            if title.is_none() {
                *title = Some(fetched);
            }
        }
        if let Some(fetched) = metadata.thumbnail_url {
            let mut thumbnail = self.thumbnail.write();
            if thumbnail.is_none() {
                *thumbnail = Some(select_thumbnail(
                    self.vendor(),
                    &fetched,
                    self.settings.thumbnail_quality,
                    self.settings.thumbnail_image,
                ));
            }
        }
    }

    pub(crate) fn store_iframe(&self, iframe: Element) {
        *self.iframe.lock() = Some(iframe);
    }

    /// Take the prepared iframe. `None` once it has been attached.
    pub(crate) fn take_iframe(&self) -> Option<Element> {
        self.iframe.lock().take()
    }
}

impl std::fmt::Debug for TrackedElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedElement")
            .field("node", &self.node)
            .field("settings", &self.settings)
            .field("title", &self.title())
            .field("thumbnail", &self.thumbnail())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Ordered collection of every element tracked by a
/// [`Lazyframe`](crate::Lazyframe) instance. It only grows.
#[derive(Default)]
pub struct Registry {
    elements: RwLock<Vec<Arc<TrackedElement>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, element: Arc<TrackedElement>) {
        self.elements.write().push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.read().is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.elements.read().iter().any(|e| e.node() == node)
    }

    pub fn get(&self, node: NodeId) -> Option<Arc<TrackedElement>> {
        self.elements
            .read()
            .iter()
            .find(|e| e.node() == node)
            .cloned()
    }

    /// Snapshot of all elements in registration order.
    pub fn elements(&self) -> Vec<Arc<TrackedElement>> {
        self.elements.read().clone()
    }

    /// Number of elements that have not been activated yet.
    pub fn pending(&self) -> usize {
        self.elements
            .read()
            .iter()
            .filter(|e| !e.is_initialized())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LazyframeOptions;
    use lazyframe_dom::MemoryDocument;

    fn node_with(doc: &MemoryDocument, attributes: &[(&str, &str)]) -> NodeId {
        let mut el = Element::new("div").with_class("lazyframe");
        for (name, value) in attributes {
            el.set_attribute(*name, *value);
        }
        doc.append_child(doc.body(), el).unwrap()
    }

    fn config() -> Arc<InitConfig> {
        Arc::new(InitConfig::default())
    }

    #[test]
    fn missing_or_empty_src_is_an_error() {
        let doc = MemoryDocument::default();
        let missing = node_with(&doc, &[]);
        let empty = node_with(&doc, &[("data-src", "")]);

        assert!(matches!(
            TrackedElement::from_node(&doc, missing, config()),
            Err(Error::MissingSource { node }) if node == missing
        ));
        assert!(matches!(
            TrackedElement::from_node(&doc, empty, config()),
            Err(Error::MissingSource { .. })
        ));
    }

    #[test]
    fn settings_from_attributes() {
        let doc = MemoryDocument::default();
        let node = node_with(
            &doc,
            &[
                ("data-src", "http://www.youtube.com/embed/iwGFalTRHDA/?rel=0"),
                ("data-title", "custom title"),
                ("data-initinview", "true"),
                ("data-youtube-thumbnail-quality", "maxres"),
                ("data-youtube-thumbnail-image", "bogus"),
            ],
        );
        doc.set_offset_top(node, 420.0).unwrap();

        let el = TrackedElement::from_node(&doc, node, config()).unwrap();
        let s = el.settings();
        assert_eq!(s.source.vendor, Vendor::YouTube);
        assert_eq!(s.query, "autoplay=1&rel=0");
        assert_eq!(
            s.embed_url,
            "https://www.youtube.com/embed/iwGFalTRHDA/?autoplay=1&rel=0"
        );
        assert!(s.init_in_view);
        assert!(s.use_api, "thumbnail is missing");
        assert_eq!(s.thumbnail_quality, ThumbnailQuality::Maxres);
        assert_eq!(s.thumbnail_image, ThumbnailImage::Default);
        assert_eq!(s.viewport_offset, 420.0);
        assert_eq!(el.title().as_deref(), Some("custom title"));
        assert_eq!(el.thumbnail(), None);
    }

    #[test]
    fn use_api_policy() {
        let doc = MemoryDocument::default();
        let both = node_with(
            &doc,
            &[
                ("data-src", "https://vimeo.com/152985022"),
                ("data-title", "t"),
                ("data-thumbnail", "u"),
            ],
        );
        let unknown = node_with(&doc, &[("data-src", "https://example.com/video.mp4")]);

        assert!(!TrackedElement::from_node(&doc, both, config())
            .unwrap()
            .settings()
            .use_api);
        assert!(!TrackedElement::from_node(&doc, unknown, config())
            .unwrap()
            .settings()
            .use_api);
    }

    #[test]
    fn autoplay_comes_from_the_batch_options() {
        let doc = MemoryDocument::default();
        let node = node_with(&doc, &[("data-src", "https://vimeo.com/152985022")]);
        let options = LazyframeOptions {
            autoplay: false,
            ..LazyframeOptions::default()
        };
        let el = TrackedElement::from_node(&doc, node, Arc::new(options.into())).unwrap();
        assert!(!el.settings().autoplay);
        assert_eq!(
            el.settings().embed_url,
            "https://player.vimeo.com/video/152985022/?autoplay=0"
        );
    }

    #[test]
    fn activation_flips_once() {
        let doc = MemoryDocument::default();
        let node = node_with(&doc, &[("data-src", "https://vimeo.com/1")]);
        let el = TrackedElement::from_node(&doc, node, config()).unwrap();

        assert!(!el.is_initialized());
        assert!(el.try_activate());
        assert!(!el.try_activate());
        assert!(el.is_initialized());
    }

    #[test]
    fn fetched_metadata_never_overrides_caller_values() {
        let doc = MemoryDocument::default();
        let node = node_with(
            &doc,
            &[
                ("data-src", "https://www.youtube.com/watch?v=iwGFalTRHDA"),
                ("data-title", "mine"),
                ("data-youtube-thumbnail-quality", "sd"),
            ],
        );
        let el = TrackedElement::from_node(&doc, node, config()).unwrap();
        el.apply_metadata(EmbedMetadata {
            title: Some("theirs".into()),
            thumbnail_url: Some("https://i.ytimg.com/vi/iwGFalTRHDA/hqdefault.jpg".into()),
        });

        assert_eq!(el.title().as_deref(), Some("mine"));
        assert_eq!(
            el.thumbnail().as_deref(),
            Some("https://i.ytimg.com/vi/iwGFalTRHDA/sddefault.jpg")
        );
    }

    #[test]
    fn empty_hints_fall_back_to_the_batch_options() {
        let doc = MemoryDocument::default();
        let node = node_with(
            &doc,
            &[
                ("data-src", "https://www.youtube.com/watch?v=iwGFalTRHDA"),
                ("data-youtube-thumbnail-quality", ""),
                ("data-youtube-thumbnail-image", ""),
            ],
        );
        let el = TrackedElement::from_node(&doc, node, config()).unwrap();
        assert_eq!(el.settings().thumbnail_quality, ThumbnailQuality::Hq);
        assert_eq!(el.settings().thumbnail_image, ThumbnailImage::Default);

        el.apply_metadata(EmbedMetadata {
            title: None,
            thumbnail_url: Some("https://i.ytimg.com/vi/iwGFalTRHDA/hqdefault.jpg".into()),
        });
        assert_eq!(
            el.thumbnail().as_deref(),
            Some("https://i.ytimg.com/vi/iwGFalTRHDA/hqdefault.jpg")
        );
    }

    #[test]
    fn registry_tracks_pending() {
        let doc = MemoryDocument::default();
        let registry = Registry::new();
        for i in 0..3 {
            let src = format!("https://vimeo.com/{i}");
            let node = node_with(&doc, &[("data-src", src.as_str())]);
            registry.push(Arc::new(
                TrackedElement::from_node(&doc, node, config()).unwrap(),
            ));
        }
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.pending(), 3);

        registry.elements()[1].try_activate();
        assert_eq!(registry.pending(), 2);
        let second = registry.elements()[1].node();
        assert!(registry.contains(second));
        assert!(registry.get(second).unwrap().is_initialized());
    }
}
