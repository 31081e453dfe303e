//! Trait definition and types for metadata providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Title and thumbnail for a media URL, as returned by an oEmbed-style
/// endpoint. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Async lookup of [`EmbedMetadata`] for a source URL.
///
/// Every call is independent: providers must not cache, so the same URL
/// registered twice is looked up twice. Failures are reported to the caller,
/// which decides whether to swallow them.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short, lowercase identifier for this provider (e.g. `"noembed"`).
    fn name(&self) -> &'static str;

    /// Returns `true` when the provider can serve requests.
    fn is_available(&self) -> bool;

    /// Fetch title and thumbnail for `source_url`.
    async fn lookup(&self, source_url: &str) -> anyhow::Result<EmbedMetadata>;
}
