//! Card Keeper DOM - In-memory host document
//!
//! This crate provides the host layer the templating engine renders into:
//! a small, single-threaded DOM with the node kinds the engine needs, an
//! HTML fragment parser and a serializer.
//!
//! ## Architecture
//!
//! - [`node`]: [`Node`] handles (elements, attribute nodes, text, comments, fragments)
//! - [`event`]: event listeners and bubbling dispatch
//! - [`parse`]: HTML fragment parsing built on `html5gum`
//! - [`serialize`]: HTML serialization
//! - [`document`]: the hosting [`Document`] and simple selectors
//!
//! ## Example
//!
//! ```ignore
//! use cardkeep_dom::{Node, parse_fragment};
//!
//! let fragment = parse_fragment("<ul><li>One</li></ul>")?;
//! let list = fragment.first_child().unwrap();
//! list.append_child(&Node::element("li"))?;
//! assert_eq!(fragment.inner_html(), "<ul><li>One</li><li></li></ul>");
//! ```

#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod event;
pub mod node;
pub mod parse;
pub mod serialize;

pub use document::{Document, Selector, document, set_document};
pub use error::{DomError, DomResult};
pub use event::{Event, EventHandler, ListenerId, ListenerOptions};
pub use node::{Node, NodeType, WeakNode};
pub use parse::parse_fragment;

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Returns whether `tag` names a void element.
pub fn is_void_element(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}
