//! noembed.com metadata provider.
//!
//! Implements [`MetadataProvider`] by querying an oEmbed proxy with
//! `GET <endpoint>?url=<source>`. The response is expected to carry
//! `title` and `thumbnail_url`.
//!
//! No timeout, retry or rate limit is applied: a lookup either completes or is
//! abandoned along with the page.

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::DEFAULT_METADATA_ENDPOINT;
use crate::metadata::provider::{EmbedMetadata, MetadataProvider};

#[derive(Debug, Deserialize)]
struct NoembedResponse {
    title: Option<String>,
    thumbnail_url: Option<String>,
    /// noembed answers unsupported URLs with `200 {"error": "..."}`.
    error: Option<String>,
}

/// oEmbed lookup through noembed.com (or a compatible endpoint).
///
/// # Examples
///
/// ```no_run
/// use lazyframe::metadata::providers::NoembedProvider;
///
/// let provider = NoembedProvider::new("https://noembed.com/embed");
/// ```
pub struct NoembedProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl NoembedProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for NoembedProvider {
    fn default() -> Self {
        Self::new(DEFAULT_METADATA_ENDPOINT)
    }
}

#[async_trait]
impl MetadataProvider for NoembedProvider {
    fn name(&self) -> &'static str {
        "noembed"
    }

    fn is_available(&self) -> bool {
        !self.endpoint.is_empty()
    }

    async fn lookup(&self, source_url: &str) -> anyhow::Result<EmbedMetadata> {
        debug!(endpoint = %self.endpoint, src = %source_url, "noembed lookup");

        let body: NoembedResponse = self
            .client
            .get(&self.endpoint)
            .query(&[("url", source_url)])
            .send()
            .await
            .with_context(|| format!("noembed request failed: {source_url}"))?
            .error_for_status()
            .with_context(|| format!("noembed request returned error: {source_url}"))?
            .json()
            .await
            .context("failed to parse noembed response")?;

        if let Some(error) = body.error {
            anyhow::bail!("noembed could not resolve {source_url}: {error}");
        }

        Ok(EmbedMetadata {
            title: body.title,
            thumbnail_url: body.thumbnail_url,
        })
    }
}
