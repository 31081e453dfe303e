//! Lazyframe - lazy loading for embedded video players
//!
//! Placeholders stand in for YouTube, Vimeo and arbitrary iframes until they
//! scroll into view. Activation fills in title and thumbnail (looked up when
//! missing); the real player iframe is attached on the first click.
//!
//! The host page is reached through the [`Document`] trait;
//! [`MemoryDocument`] is an in-memory implementation.
//!
//! ```
//! use std::sync::Arc;
//! use lazyframe::{Document, Element, InitConfig, Lazyframe, LazyframeOptions, MemoryDocument};
//!
//! let doc = Arc::new(MemoryDocument::default());
//! let node = doc
//!     .append_child(
//!         doc.body(),
//!         Element::new("div")
//!             .with_class("lazyframe")
//!             .with_attribute("data-src", "https://vimeo.com/152985022")
//!             .with_attribute("data-title", "Demo")
//!             .with_attribute("data-thumbnail", "https://example.com/demo.jpg"),
//!     )
//!     .unwrap();
//!
//! let lazyframe = Lazyframe::without_metadata(doc.clone());
//! let options = LazyframeOptions { lazyload: false, ..Default::default() };
//! let registration = lazyframe.init(".lazyframe", InitConfig::new(options));
//!
//! assert_eq!(registration.nodes(), vec![node]);
//! assert!(doc.has_class(node, "lazyframe--loaded").unwrap());
//! ```

pub mod config;
pub mod loader;
pub mod metadata;
pub mod placeholder;
pub mod registry;
pub mod resolver;
pub mod scheduler;

pub use config::{Callbacks, Config, InitConfig, LazyframeOptions, MetadataConfig};
pub use lazyframe_common::{Error, NodeId, Result, ThumbnailImage, ThumbnailQuality, Vendor};
pub use lazyframe_dom::{Document, Element, MemoryDocument};
pub use loader::{Lazyframe, Registration, Selection};
pub use registry::{ElementSettings, Registry, TrackedElement};
pub use resolver::ResolvedSource;
