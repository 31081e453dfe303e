//! Source URL to embed URL resolution.
//!
//! A single anchored pattern captures the vendor host, the media id and any
//! trailing query string. Everything that does not match is passed through
//! unchanged as the embed target.

use lazyframe_common::Vendor;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static VENDOR_ID_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.)?(youtube-nocookie|youtube|vimeo)(?:\.com)?/?.*(?:watch|embed)?(?:.*v=|v/|/)([A-Za-z0-9_-]+)(?:&|\?|/\?)?(.+)?$",
    )
    .expect("Failed to compile vendor regex")
});

/// Result of matching a source URL against the known vendor shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSource {
    pub source: String,
    pub vendor: Vendor,
    /// Absent when the vendor is [`Vendor::Unknown`].
    pub media_id: Option<String>,
    /// Query string forwarded after the autoplay flag, without a leading `&`.
    pub extra_query: Option<String>,
}

impl ResolvedSource {
    pub fn parse(source: &str) -> Self {
        let Some(caps) = VENDOR_ID_QUERY.captures(source) else {
            tracing::debug!(src = %source, "No vendor pattern matched; passing through");
            return Self {
                source: source.to_string(),
                vendor: Vendor::Unknown,
                media_id: None,
                extra_query: None,
            };
        };

        let vendor = caps
            .get(1)
            .map(|m| Vendor::from_host(m.as_str()))
            .unwrap_or(Vendor::Unknown);
        let media_id = caps.get(2).map(|m| m.as_str().to_string());
        let extra_query = caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .filter(|q| !q.is_empty());

        tracing::debug!(
            src = %source,
            %vendor,
            id = ?media_id,
            query = ?extra_query,
            "Resolved source"
        );

        Self {
            source: source.to_string(),
            vendor,
            media_id,
            extra_query,
        }
    }

    /// `autoplay=<0|1>` followed by the extracted extras.
    pub fn query(&self, autoplay: bool) -> String {
        let flag = if autoplay { 1 } else { 0 };
        match &self.extra_query {
            Some(extra) => format!("autoplay={flag}&{extra}"),
            None => format!("autoplay={flag}"),
        }
    }

    /// URL loaded by the iframe. Unknown vendors embed the source verbatim.
    pub fn embed_url(&self, autoplay: bool) -> String {
        match &self.media_id {
            Some(id) => self
                .vendor
                .embed_url(id, &self.query(autoplay))
                .unwrap_or_else(|| self.source.clone()),
            None => self.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_embed_url_with_extra_query() {
        let resolved = ResolvedSource::parse("http://www.youtube.com/embed/iwGFalTRHDA/?rel=0");
        assert_eq!(resolved.vendor, Vendor::YouTube);
        assert_eq!(resolved.media_id.as_deref(), Some("iwGFalTRHDA"));
        assert_eq!(resolved.extra_query.as_deref(), Some("rel=0"));
        assert_eq!(
            resolved.embed_url(true),
            "https://www.youtube.com/embed/iwGFalTRHDA/?autoplay=1&rel=0"
        );
        assert_eq!(
            resolved.embed_url(false),
            "https://www.youtube.com/embed/iwGFalTRHDA/?autoplay=0&rel=0"
        );
    }

    #[test]
    fn youtube_watch_url() {
        let resolved = ResolvedSource::parse("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42");
        assert_eq!(resolved.vendor, Vendor::YouTube);
        assert_eq!(resolved.media_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(
            resolved.embed_url(true),
            "https://www.youtube.com/embed/dQw4w9WgXcQ/?autoplay=1&t=42"
        );
    }

    #[test]
    fn youtube_without_query_only_carries_autoplay() {
        let resolved = ResolvedSource::parse("https://youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(resolved.extra_query, None);
        assert_eq!(resolved.query(true), "autoplay=1");
        assert_eq!(
            resolved.embed_url(true),
            "https://www.youtube.com/embed/dQw4w9WgXcQ/?autoplay=1"
        );
    }

    #[test]
    fn youtube_nocookie_keeps_its_host() {
        let resolved =
            ResolvedSource::parse("https://www.youtube-nocookie.com/embed/iwGFalTRHDA");
        assert_eq!(resolved.vendor, Vendor::YouTubeNoCookie);
        assert_eq!(
            resolved.embed_url(false),
            "https://www.youtube-nocookie.com/embed/iwGFalTRHDA/?autoplay=0"
        );
    }

    #[test]
    fn vimeo_url() {
        let resolved = ResolvedSource::parse("https://vimeo.com/152985022");
        assert_eq!(resolved.vendor, Vendor::Vimeo);
        assert_eq!(resolved.media_id.as_deref(), Some("152985022"));
        assert_eq!(
            resolved.embed_url(true),
            "https://player.vimeo.com/video/152985022/?autoplay=1"
        );
    }

    #[test]
    fn unknown_vendor_passes_through_unmodified() {
        let src = "https://example.com/player?id=7";
        let resolved = ResolvedSource::parse(src);
        assert_eq!(resolved.vendor, Vendor::Unknown);
        assert_eq!(resolved.media_id, None);
        assert_eq!(resolved.embed_url(true), src);
        assert_eq!(resolved.embed_url(false), src);
    }

    #[test]
    fn media_id_is_ascii_only() {
        let resolved = ResolvedSource::parse("https://vimeo.com/vid\u{e9}o");
        assert_eq!(resolved.vendor, Vendor::Vimeo);
        assert_eq!(resolved.media_id.as_deref(), Some("vid"));
        assert_eq!(resolved.extra_query.as_deref(), Some("\u{e9}o"));
    }

    #[test]
    fn embed_url_is_deterministic() {
        let src = "https://vimeo.com/152985022?color=ff0";
        assert_eq!(
            ResolvedSource::parse(src).embed_url(true),
            ResolvedSource::parse(src).embed_url(true)
        );
    }
}
