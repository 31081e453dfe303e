//! Placeholder construction.
//!
//! A placeholder is prepared at registration (title overlay, deferred iframe,
//! one-time click handler) and populated on activation (title text,
//! background thumbnail, `loaded` class). The iframe is only attached by the
//! first click.

use std::sync::Arc;

use lazyframe_common::{classes, Result};
use lazyframe_dom::{Document, Element};
use tracing::{debug, warn};

use crate::registry::{attrs, TrackedElement};
use crate::resolver::ResolvedSource;

/// Permissions granted to autoplaying players.
pub const AUTOPLAY_ALLOW: &str =
    "accelerometer; autoplay; encrypted-media; gyroscope; picture-in-picture";

/// Build the iframe that replaces the placeholder on click.
pub fn iframe_fragment(source: &ResolvedSource, autoplay: bool) -> Element {
    let mut iframe = Element::new("iframe");
    if let Some(id) = &source.media_id {
        iframe.set_attribute("id", format!("lazyframe-{id}"));
    }
    iframe.set_attribute("src", source.embed_url(autoplay));
    iframe.set_attribute("frameborder", "0");
    iframe.set_attribute("allowfullscreen", "");
    if autoplay {
        iframe.set_attribute("allow", AUTOPLAY_ALLOW);
    }
    iframe
}

/// Prepare a freshly registered node: vendor marker, title overlay, deferred
/// iframe and the one-time click handler.
pub fn prepare(doc: &Arc<dyn Document>, element: &Arc<TrackedElement>) -> Result<()> {
    let node = element.node();

    if let Some(vendor) = element.vendor().attribute_value() {
        doc.set_attribute(node, attrs::VENDOR, vendor)?;
    }

    let selector = format!(".{}", classes::TITLE);
    if doc.query_selector(node, &selector)?.is_none() {
        let span = Element::new("span")
            .with_class(classes::TITLE)
            .with_text(element.title().unwrap_or_default());
        doc.append_child(node, span)?;
    }

    let settings = element.settings();
    element.store_iframe(iframe_fragment(&settings.source, settings.autoplay));

    let handler_doc = Arc::clone(doc);
    let handler_element = Arc::clone(element);
    doc.add_click_listener(
        node,
        Arc::new(move |clicked| {
            if let Err(e) = append_iframe(handler_doc.as_ref(), &handler_element) {
                warn!(node = %clicked, error = %e, "Failed to attach iframe");
            }
        }),
        true,
    )?;

    Ok(())
}

/// Attach the prepared iframe and report it through `on_append`.
fn append_iframe(doc: &dyn Document, element: &TrackedElement) -> Result<()> {
    let Some(iframe) = element.take_iframe() else {
        return Ok(());
    };
    let node = element.node();
    doc.append_child(node, iframe)?;
    let attached = doc.query_selector(node, "iframe")?;
    debug!(%node, src = %element.settings().embed_url, "Attached iframe");
    (element.config().callbacks.on_append)(attached);
    Ok(())
}

/// Fill the placeholder with whatever title and thumbnail are known, mark it
/// loaded and notify the caller.
pub fn populate(doc: &dyn Document, element: &TrackedElement) -> Result<()> {
    let node = element.node();
    let callbacks = &element.config().callbacks;

    if let Some(title) = element.title() {
        let selector = format!(".{}", classes::TITLE);
        if let Some(span) = doc.query_selector(node, &selector)? {
            if doc.text(span)?.is_empty() {
                doc.set_text(span, &title)?;
            }
        }
    }

    if let Some(thumbnail) = element.thumbnail() {
        doc.set_style(node, "background-image", &format!("url({thumbnail})"))?;
        (callbacks.on_thumbnail_load)(&thumbnail);
    }

    doc.add_class(node, classes::LOADED)?;
    debug!(%node, "Placeholder populated");

    if element.settings().init_in_view {
        doc.click(node)?;
    }

    (callbacks.on_load)(node);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InitConfig, LazyframeOptions};
    use lazyframe_common::NodeId;
    use lazyframe_dom::MemoryDocument;
    use parking_lot::Mutex;

    fn setup(
        attributes: &[(&str, &str)],
        config: InitConfig,
    ) -> (Arc<MemoryDocument>, Arc<dyn Document>, Arc<TrackedElement>) {
        let memory = Arc::new(MemoryDocument::default());
        let mut el = Element::new("div").with_class("lazyframe");
        for (name, value) in attributes {
            el.set_attribute(*name, *value);
        }
        let node = memory.append_child(memory.body(), el).unwrap();
        let doc: Arc<dyn Document> = memory.clone();
        let element =
            Arc::new(TrackedElement::from_node(doc.as_ref(), node, Arc::new(config)).unwrap());
        (memory, doc, element)
    }

    const YT: &str = "http://www.youtube.com/embed/iwGFalTRHDA/?rel=0";

    #[test]
    fn iframe_carries_embed_attributes() {
        let (_, _, element) = setup(&[("data-src", YT)], InitConfig::default());
        let iframe = iframe_fragment(&element.settings().source, element.settings().autoplay);

        assert_eq!(iframe.attribute("id"), Some("lazyframe-iwGFalTRHDA"));
        assert_eq!(
            iframe.attribute("src"),
            Some("https://www.youtube.com/embed/iwGFalTRHDA/?autoplay=1&rel=0")
        );
        assert_eq!(iframe.attribute("frameborder"), Some("0"));
        assert_eq!(iframe.attribute("allowfullscreen"), Some(""));
        assert_eq!(iframe.attribute("allow"), Some(AUTOPLAY_ALLOW));
    }

    #[test]
    fn iframe_without_autoplay_or_id() {
        let options = LazyframeOptions {
            autoplay: false,
            ..LazyframeOptions::default()
        };
        let (_, _, element) = setup(
            &[("data-src", "https://example.com/player.html")],
            options.into(),
        );
        let iframe = iframe_fragment(&element.settings().source, element.settings().autoplay);

        assert_eq!(iframe.attribute("id"), None);
        assert_eq!(iframe.attribute("src"), Some("https://example.com/player.html"));
        assert_eq!(iframe.attribute("allow"), None);
    }

    #[test]
    fn prepare_is_idempotent_for_the_title_overlay() {
        let (memory, doc, element) =
            setup(&[("data-src", YT), ("data-title", "custom title")], InitConfig::default());
        let node = element.node();

        prepare(&doc, &element).unwrap();
        prepare(&doc, &element).unwrap();

        assert_eq!(memory.count(node, ".lazyframe__title"), 1);
        assert_eq!(
            doc.attribute(node, "data-vendor").unwrap().as_deref(),
            Some("youtube")
        );
    }

    #[test]
    fn two_clicks_attach_one_iframe() {
        let appended: Arc<Mutex<Vec<Option<NodeId>>>> = Arc::default();
        let sink = appended.clone();
        let config = InitConfig::default().on_append(move |iframe| sink.lock().push(iframe));
        let (memory, doc, element) = setup(&[("data-src", YT)], config);
        let node = element.node();

        prepare(&doc, &element).unwrap();
        doc.click(node).unwrap();
        doc.click(node).unwrap();

        assert_eq!(memory.count(node, "iframe"), 1);
        let appended = appended.lock();
        assert_eq!(appended.len(), 1);
        assert_eq!(appended[0], doc.query_selector(node, "iframe").unwrap());
    }

    #[test]
    fn populate_fills_title_thumbnail_and_class() {
        let thumbs: Arc<Mutex<Vec<String>>> = Arc::default();
        let loaded: Arc<Mutex<Vec<NodeId>>> = Arc::default();
        let (t, l) = (thumbs.clone(), loaded.clone());
        let config = InitConfig::default()
            .on_thumbnail_load(move |url| t.lock().push(url.to_string()))
            .on_load(move |node| l.lock().push(node));
        let (memory, doc, element) = setup(
            &[
                ("data-src", YT),
                ("data-title", "custom title"),
                ("data-thumbnail", "thumb.jpg"),
            ],
            config,
        );
        let node = element.node();

        prepare(&doc, &element).unwrap();
        populate(doc.as_ref(), &element).unwrap();

        let span = doc.query_selector(node, ".lazyframe__title").unwrap().unwrap();
        assert_eq!(doc.text(span).unwrap(), "custom title");
        assert_eq!(
            memory.style(node, "background-image").unwrap().as_deref(),
            Some("url(thumb.jpg)")
        );
        assert!(doc.has_class(node, "lazyframe--loaded").unwrap());
        assert_eq!(*thumbs.lock(), vec!["thumb.jpg".to_string()]);
        assert_eq!(*loaded.lock(), vec![node]);
    }

    #[test]
    fn populate_does_not_overwrite_a_filled_title() {
        let (_, doc, element) = setup(&[("data-src", YT)], InitConfig::default());
        let node = element.node();
        doc.append_child(
            node,
            Element::new("span")
                .with_class("lazyframe__title")
                .with_text("already there"),
        )
        .unwrap();

        prepare(&doc, &element).unwrap();
        element.apply_metadata(crate::metadata::EmbedMetadata {
            title: Some("fetched".into()),
            thumbnail_url: None,
        });
        populate(doc.as_ref(), &element).unwrap();

        let span = doc.query_selector(node, ".lazyframe__title").unwrap().unwrap();
        assert_eq!(doc.text(span).unwrap(), "already there");
    }

    #[test]
    fn init_in_view_clicks_after_population() {
        let (memory, doc, element) =
            setup(&[("data-src", YT), ("data-initinview", "true")], InitConfig::default());
        let node = element.node();

        prepare(&doc, &element).unwrap();
        assert_eq!(memory.count(node, "iframe"), 0);
        populate(doc.as_ref(), &element).unwrap();
        assert_eq!(memory.count(node, "iframe"), 1);
    }
}
