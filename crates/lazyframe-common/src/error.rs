//! Common error types used throughout lazyframe.
//!
//! Registration reports failures per node; metadata lookup failures are
//! logged and swallowed before they reach a caller.

use crate::NodeId;

/// Common error type for lazyframe.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The node has no (or an empty) `data-src` attribute.
    #[error("You must supply a data-src on node {node}")]
    MissingSource { node: NodeId },

    /// The node handle does not belong to the document.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a new MissingSource error.
    pub fn missing_source(node: NodeId) -> Self {
        Self::MissingSource { node }
    }

    /// Create a new InvalidConfig error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
