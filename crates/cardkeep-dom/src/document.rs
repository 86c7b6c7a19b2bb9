//! The hosting document
//!
//! A [`Document`] owns a `<body>` element. Each thread has a current
//! document, reachable through [`document`], which the renderer mounts into
//! unless it is given one explicitly.

use std::cell::RefCell;

use crate::error::DomResult;
use crate::node::Node;
use crate::parse::parse_fragment;

/// A simple CSS selector: a tag name, `#id` or `.class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
	/// Matches elements by tag name.
	Tag(String),
	/// Matches the element with the given `id`.
	Id(String),
	/// Matches elements whose `class` list contains the name.
	Class(String),
}

impl Selector {
	/// Parses a simple selector.
	pub fn parse(selector: &str) -> Self {
		let selector = selector.trim();
		if let Some(id) = selector.strip_prefix('#') {
			Self::Id(id.to_string())
		} else if let Some(class) = selector.strip_prefix('.') {
			Self::Class(class.to_string())
		} else {
			Self::Tag(selector.to_ascii_lowercase())
		}
	}

	/// Returns whether `node` matches this selector.
	pub fn matches(&self, node: &Node) -> bool {
		if !node.is_element() {
			return false;
		}
		match self {
			Self::Tag(tag) => node.tag_name() == tag,
			Self::Id(id) => node.id().as_deref() == Some(id.as_str()),
			Self::Class(class) => node
				.class_name()
				.split_ascii_whitespace()
				.any(|name| name == class),
		}
	}
}

/// A hosting document.
#[derive(Debug, Clone)]
pub struct Document {
	body: Node,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Creates a document with an empty body.
	pub fn new() -> Self {
		Self {
			body: Node::element("body"),
		}
	}

	/// Creates a document whose body holds a single `<main>` element.
	pub fn app_shell() -> DomResult<Self> {
		Self::from_html("<main></main>")
	}

	/// Creates a document whose body is parsed from `body_html`.
	pub fn from_html(body_html: &str) -> DomResult<Self> {
		let document = Self::new();
		document.body.append_child(&parse_fragment(body_html)?)?;
		Ok(document)
	}

	/// Returns the `<body>` element.
	pub fn body(&self) -> Node {
		self.body.clone()
	}

	/// Returns the first element in document order matching `selector`.
	pub fn query_selector(&self, selector: &str) -> Option<Node> {
		let selector = Selector::parse(selector);
		let mut found = None;
		walk(&self.body, &mut |node| {
			if selector.matches(node) {
				found = Some(node.clone());
				false
			} else {
				true
			}
		});
		found
	}

	/// Returns every element in document order matching `selector`.
	pub fn query_selector_all(&self, selector: &str) -> Vec<Node> {
		let selector = Selector::parse(selector);
		let mut found = Vec::new();
		walk(&self.body, &mut |node| {
			if selector.matches(node) {
				found.push(node.clone());
			}
			true
		});
		found
	}
}

/// Pre-order traversal; stops as soon as `visit` returns `false`.
fn walk(node: &Node, visit: &mut dyn FnMut(&Node) -> bool) -> bool {
	if !visit(node) {
		return false;
	}
	for child in node.child_nodes() {
		if !walk(&child, visit) {
			return false;
		}
	}
	true
}

thread_local! {
	static DOCUMENT: RefCell<Document> = RefCell::new(Document::app_shell().unwrap_or_default());
}

/// Returns the current thread's document.
pub fn document() -> Document {
	DOCUMENT.with(|current| current.borrow().clone())
}

/// Replaces the current thread's document, returning the previous one.
pub fn set_document(document: Document) -> Document {
	DOCUMENT.with(|current| current.replace(document))
}
