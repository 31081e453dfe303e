use lazyframe_common::{ThumbnailImage, ThumbnailQuality};
use serde::{Deserialize, Serialize};

/// File-level configuration, as read from `lazyframe.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub options: LazyframeOptions,

    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// Options captured once per registration batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LazyframeOptions {
    /// Quiet interval of the trailing-edge scroll debounce, in milliseconds
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Defer population until a node scrolls into view (default: true)
    #[serde(default = "default_true")]
    pub lazyload: bool,

    /// Ask the player to start as soon as the iframe is attached (default: true)
    #[serde(default = "default_true")]
    pub autoplay: bool,

    /// Quality used for YouTube thumbnails unless a node overrides it
    #[serde(default)]
    pub youtube_thumbnail_quality: ThumbnailQuality,

    /// Still used for YouTube thumbnails unless a node overrides it
    #[serde(default)]
    pub youtube_thumbnail_image: ThumbnailImage,
}

fn default_debounce() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for LazyframeOptions {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            lazyload: true,
            autoplay: true,
            youtube_thumbnail_quality: ThumbnailQuality::default(),
            youtube_thumbnail_image: ThumbnailImage::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// Look up missing titles and thumbnails (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// oEmbed-style endpoint queried with `?url=<source>`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

pub const DEFAULT_METADATA_ENDPOINT: &str = "https://noembed.com/embed";

fn default_endpoint() -> String {
    DEFAULT_METADATA_ENDPOINT.to_string()
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
        }
    }
}
