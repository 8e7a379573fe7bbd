//! Namespace-aware XML element tree for CaSQ.
//!
//! This crate contains:
//! - An owned element tree with resolved namespace URIs
//! - Lookup helpers (children, descendants, attributes by namespace)
//! - Local-name serialization for embedded XHTML fragments

pub mod error;
pub mod tree;

pub use error::{XmlError, XmlResult};
pub use tree::{Attribute, Element, Node};
