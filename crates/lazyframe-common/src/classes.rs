//! CSS class names forming the styling contract with callers.

/// Applied to a tracked node once its placeholder has been populated.
pub const LOADED: &str = "lazyframe--loaded";

/// Applied to the title overlay `<span>` inserted into every tracked node.
pub const TITLE: &str = "lazyframe__title";
