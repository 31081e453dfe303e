//! Lazyframe-Common: Shared types, constants, and errors.
//!
//! This crate provides common functionality used across lazyframe:
//!
//! - **Node IDs**: Typed handles for nodes in a host document
//! - **Core Types**: The closed [`Vendor`] set and YouTube thumbnail hints
//! - **CSS Contract**: Class names applied to placeholders
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use lazyframe_common::{Error, NodeId, Result, Vendor};
//!
//! let node = NodeId::from(3);
//! assert_eq!(Vendor::from_host("vimeo"), Vendor::Vimeo);
//!
//! fn register() -> Result<()> {
//!     Err(Error::MissingSource { node: NodeId::from(3) })
//! }
//! assert!(register().is_err());
//! ```

pub mod classes;
pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::NodeId;
pub use types::*;
