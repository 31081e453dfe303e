//! Title and thumbnail lookups for placeholders.
//!
//! # Module layout
//!
//! - [`provider`] -- The [`MetadataProvider`] trait and lookup result type.
//! - [`providers`] -- Concrete providers ([`NoembedProvider`]).
//! - [`thumbnail`] -- YouTube thumbnail quality rewriting.

pub mod provider;
pub mod providers;
pub mod thumbnail;

pub use provider::{EmbedMetadata, MetadataProvider};
pub use providers::NoembedProvider;
