//! Caller hooks and the per-batch configuration snapshot.

use std::fmt;
use std::sync::Arc;

use lazyframe_common::NodeId;

use super::LazyframeOptions;

pub type OnLoad = Arc<dyn Fn(NodeId) + Send + Sync>;
pub type OnAppend = Arc<dyn Fn(Option<NodeId>) + Send + Sync>;
pub type OnThumbnailLoad = Arc<dyn Fn(&str) + Send + Sync>;

/// Hooks invoked as placeholders progress. All default to no-ops.
#[derive(Clone)]
pub struct Callbacks {
    /// Called with the node once its placeholder is populated.
    pub on_load: OnLoad,
    /// Called after the first click with the attached iframe, if it can be found.
    pub on_append: OnAppend,
    /// Called with the thumbnail URL when it is applied as a background.
    pub on_thumbnail_load: OnThumbnailLoad,
}

impl Default for Callbacks {
    fn default() -> Self {
        Self {
            on_load: Arc::new(|_| {}),
            on_append: Arc::new(|_| {}),
            on_thumbnail_load: Arc::new(|_| {}),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

/// Everything a registration batch needs: options plus hooks.
///
/// Each batch keeps its own snapshot, so registering more nodes with a
/// different configuration never affects nodes registered earlier.
#[derive(Debug, Clone, Default)]
pub struct InitConfig {
    pub options: LazyframeOptions,
    pub callbacks: Callbacks,
}

impl InitConfig {
    pub fn new(options: LazyframeOptions) -> Self {
        Self {
            options,
            callbacks: Callbacks::default(),
        }
    }

    pub fn on_load(mut self, f: impl Fn(NodeId) + Send + Sync + 'static) -> Self {
        self.callbacks.on_load = Arc::new(f);
        self
    }

    pub fn on_append(mut self, f: impl Fn(Option<NodeId>) + Send + Sync + 'static) -> Self {
        self.callbacks.on_append = Arc::new(f);
        self
    }

    pub fn on_thumbnail_load(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.callbacks.on_thumbnail_load = Arc::new(f);
        self
    }
}

impl From<LazyframeOptions> for InitConfig {
    fn from(options: LazyframeOptions) -> Self {
        Self::new(options)
    }
}
