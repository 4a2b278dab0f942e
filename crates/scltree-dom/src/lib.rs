//! Owned element documents for scltree.
//!
//! The fingerprinting and diff engine only sees [`scltree_types::TreeView`].
//! This crate supplies the concrete tree the command-line tool feeds it: an
//! arena of elements addressed by [`NodeId`], loaded from SCL/XML text with
//! `quick-xml`.
//!
//! # Key Types
//!
//! - [`Document`] -- Arena of elements with a single document element
//! - [`NodeId`] -- Index of an element inside its document
//! - [`Element`] -- Tag, attributes, direct text, and tree links

pub mod document;
pub mod error;
pub mod parser;

pub use document::{Document, Element, NodeId};
pub use error::{DomError, DomResult};
pub use parser::{has_scl_extension, SCL_EXTENSIONS};
