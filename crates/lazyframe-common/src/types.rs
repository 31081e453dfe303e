//! Core type definitions for vendors and thumbnail hints.
//!
//! The vendor set is closed: every dispatch over vendors is an exhaustive
//! `match`, so adding a vendor is a compile error until every template knows
//! about it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Video hosting provider recognised from a source URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Vendor {
    /// `youtube.com`.
    #[serde(rename = "youtube")]
    YouTube,
    /// `youtube-nocookie.com`, the privacy-enhanced YouTube host.
    #[serde(rename = "youtube-nocookie")]
    YouTubeNoCookie,
    /// `vimeo.com`.
    Vimeo,
    /// Anything else. The source URL is embedded verbatim.
    Unknown,
}

impl Vendor {
    /// Map a captured host name to a vendor.
    pub fn from_host(host: &str) -> Self {
        match host {
            "youtube" => Self::YouTube,
            "youtube-nocookie" => Self::YouTubeNoCookie,
            "vimeo" => Self::Vimeo,
            _ => Self::Unknown,
        }
    }

    /// Whether this is one of the YouTube hosts.
    pub fn is_youtube(self) -> bool {
        matches!(self, Self::YouTube | Self::YouTubeNoCookie)
    }

    /// Value written to a node's `data-vendor` attribute, if any.
    ///
    /// Both YouTube hosts share the `youtube` value so stylesheets need a
    /// single selector.
    pub fn attribute_value(self) -> Option<&'static str> {
        match self {
            Self::YouTube | Self::YouTubeNoCookie => Some("youtube"),
            Self::Vimeo => Some("vimeo"),
            Self::Unknown => None,
        }
    }

    /// Build the player URL for `id` with the given query string.
    ///
    /// Returns `None` for [`Vendor::Unknown`], whose embed target is the
    /// original source URL.
    pub fn embed_url(self, id: &str, query: &str) -> Option<String> {
        match self {
            Self::YouTube => Some(format!("https://www.youtube.com/embed/{id}/?{query}")),
            Self::YouTubeNoCookie => Some(format!(
                "https://www.youtube-nocookie.com/embed/{id}/?{query}"
            )),
            Self::Vimeo => Some(format!("https://player.vimeo.com/video/{id}/?{query}")),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YouTube => write!(f, "youtube"),
            Self::YouTubeNoCookie => write!(f, "youtube-nocookie"),
            Self::Vimeo => write!(f, "vimeo"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Quality prefix of a YouTube thumbnail file name (`hq` in `hqdefault.jpg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailQuality {
    /// No prefix (`default.jpg`, `1.jpg`, ...).
    #[serde(rename = "")]
    Base,
    Sd,
    Mq,
    #[default]
    Hq,
    Maxres,
}

impl ThumbnailQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Base => "",
            Self::Sd => "sd",
            Self::Mq => "mq",
            Self::Hq => "hq",
            Self::Maxres => "maxres",
        }
    }
}

impl fmt::Display for ThumbnailQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThumbnailQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::Base),
            "sd" => Ok(Self::Sd),
            "mq" => Ok(Self::Mq),
            "hq" => Ok(Self::Hq),
            "maxres" => Ok(Self::Maxres),
            _ => Err(format!("Invalid thumbnail quality: {}", s)),
        }
    }
}

/// Which still of a YouTube video is used (`default` in `hqdefault.jpg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThumbnailImage {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "3")]
    Third,
}

impl ThumbnailImage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::First => "1",
            Self::Second => "2",
            Self::Third => "3",
        }
    }
}

impl fmt::Display for ThumbnailImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThumbnailImage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "1" => Ok(Self::First),
            "2" => Ok(Self::Second),
            "3" => Ok(Self::Third),
            _ => Err(format!("Invalid thumbnail image: {}", s)),
        }
    }
}
