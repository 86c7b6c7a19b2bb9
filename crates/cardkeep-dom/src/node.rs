//! DOM nodes
//!
//! [`Node`] is a cheap, reference-counted handle. Cloning a handle never
//! copies the tree; use [`Node::clone_node`] for that. Parent links are weak,
//! so a detached subtree is freed once the last handle to its root goes away.
//!
//! Attribute nodes are real nodes: an element owns its attribute nodes and
//! writing an attribute node's value updates the element. This is what lets
//! the template engine bind an expression to an attribute position.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{DomError, DomResult};
use crate::event::Listener;

/// The kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
	/// An element such as `<li>`.
	Element,
	/// An attribute node owned by an element.
	Attr,
	/// A text node.
	Text,
	/// A comment node.
	Comment,
	/// A document fragment (a parentless container of nodes).
	Fragment,
}

pub(crate) struct NodeInner {
	pub(crate) node_type: NodeType,
	/// Tag name for elements, attribute name for attribute nodes.
	pub(crate) name: String,
	/// Character data for text/comment nodes, value for attribute nodes.
	pub(crate) data: RefCell<String>,
	/// Parent node, or owner element for attribute nodes.
	pub(crate) parent: RefCell<Weak<NodeInner>>,
	pub(crate) children: RefCell<Vec<Node>>,
	pub(crate) attributes: RefCell<Vec<Node>>,
	pub(crate) listeners: RefCell<Vec<Listener>>,
}

/// A handle to a node in the in-memory DOM.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<NodeInner>);

/// A non-owning handle to a [`Node`].
#[derive(Clone, Default)]
pub struct WeakNode(Weak<NodeInner>);

impl WeakNode {
	/// Returns the node if it is still alive.
	pub fn upgrade(&self) -> Option<Node> {
		self.0.upgrade().map(Node)
	}
}

impl Node {
	fn new(node_type: NodeType, name: impl Into<String>, data: impl Into<String>) -> Self {
		Self(Rc::new(NodeInner {
			node_type,
			name: name.into(),
			data: RefCell::new(data.into()),
			parent: RefCell::new(Weak::new()),
			children: RefCell::new(Vec::new()),
			attributes: RefCell::new(Vec::new()),
			listeners: RefCell::new(Vec::new()),
		}))
	}

	/// Creates a detached element. The tag name is lower-cased.
	pub fn element(tag: &str) -> Self {
		Self::new(NodeType::Element, tag.to_ascii_lowercase(), "")
	}

	/// Creates a detached text node.
	pub fn text(data: impl Into<String>) -> Self {
		Self::new(NodeType::Text, "", data)
	}

	/// Creates a detached comment node.
	pub fn comment(data: impl Into<String>) -> Self {
		Self::new(NodeType::Comment, "", data)
	}

	/// Creates an empty document fragment.
	pub fn fragment() -> Self {
		Self::new(NodeType::Fragment, "", "")
	}

	/// Creates an attribute node that is not attached to any element.
	pub fn attribute(name: &str, value: impl Into<String>) -> Self {
		Self::new(NodeType::Attr, name.to_ascii_lowercase(), value)
	}

	/// Returns the node type.
	pub fn node_type(&self) -> NodeType {
		self.0.node_type
	}

	/// Returns whether this is an element.
	pub fn is_element(&self) -> bool {
		self.0.node_type == NodeType::Element
	}

	/// Returns whether this is an attribute node.
	pub fn is_attr(&self) -> bool {
		self.0.node_type == NodeType::Attr
	}

	/// Returns whether this is a text node.
	pub fn is_text(&self) -> bool {
		self.0.node_type == NodeType::Text
	}

	/// Returns whether this is a comment node.
	pub fn is_comment(&self) -> bool {
		self.0.node_type == NodeType::Comment
	}

	/// Returns whether this is a document fragment.
	pub fn is_fragment(&self) -> bool {
		self.0.node_type == NodeType::Fragment
	}

	/// Returns the DOM node name (`#text`, `#comment`, the tag name, ...).
	pub fn node_name(&self) -> &str {
		match self.0.node_type {
			NodeType::Element | NodeType::Attr => &self.0.name,
			NodeType::Text => "#text",
			NodeType::Comment => "#comment",
			NodeType::Fragment => "#document-fragment",
		}
	}

	/// Returns the lower-cased tag name, or an empty string for non-elements.
	pub fn tag_name(&self) -> &str {
		match self.0.node_type {
			NodeType::Element => &self.0.name,
			_ => "",
		}
	}

	/// Returns the attribute name for attribute nodes, or an empty string.
	pub fn attr_name(&self) -> &str {
		match self.0.node_type {
			NodeType::Attr => &self.0.name,
			_ => "",
		}
	}

	/// Returns whether both handles refer to the same node.
	pub fn ptr_eq(&self, other: &Node) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	/// Creates a weak handle to this node.
	pub fn downgrade(&self) -> WeakNode {
		WeakNode(Rc::downgrade(&self.0))
	}

	// ------------------------------------------------------------------
	// Tree navigation
	// ------------------------------------------------------------------

	/// Returns the parent node. Attribute nodes have no parent.
	pub fn parent_node(&self) -> Option<Node> {
		if self.is_attr() {
			return None;
		}
		self.0.parent.borrow().upgrade().map(Node)
	}

	/// Returns the element owning this attribute node.
	pub fn owner_element(&self) -> Option<Node> {
		if !self.is_attr() {
			return None;
		}
		self.0.parent.borrow().upgrade().map(Node)
	}

	/// Returns a snapshot of the child list.
	pub fn child_nodes(&self) -> Vec<Node> {
		self.0.children.borrow().clone()
	}

	/// Returns the child at `index`.
	pub fn child(&self, index: usize) -> Option<Node> {
		self.0.children.borrow().get(index).cloned()
	}

	/// Returns the number of children.
	pub fn child_count(&self) -> usize {
		self.0.children.borrow().len()
	}

	/// Returns the first child.
	pub fn first_child(&self) -> Option<Node> {
		self.0.children.borrow().first().cloned()
	}

	/// Returns the last child.
	pub fn last_child(&self) -> Option<Node> {
		self.0.children.borrow().last().cloned()
	}

	/// Returns the position of this node among its parent's children.
	pub fn index_in_parent(&self) -> Option<usize> {
		let parent = self.parent_node()?;
		let children = parent.0.children.borrow();
		children.iter().position(|child| child.ptr_eq(self))
	}

	/// Returns the following sibling.
	pub fn next_sibling(&self) -> Option<Node> {
		let parent = self.parent_node()?;
		let index = self.index_in_parent()?;
		parent.child(index + 1)
	}

	/// Returns the preceding sibling.
	pub fn previous_sibling(&self) -> Option<Node> {
		let parent = self.parent_node()?;
		let index = self.index_in_parent()?;
		index.checked_sub(1).and_then(|i| parent.child(i))
	}

	/// Returns whether `other` is this node or one of its descendants.
	pub fn contains(&self, other: &Node) -> bool {
		let mut current = Some(other.clone());
		while let Some(node) = current {
			if node.ptr_eq(self) {
				return true;
			}
			current = node.parent_node();
		}
		false
	}

	/// Returns the nearest inclusive ancestor element with the given tag.
	pub fn closest(&self, tag: &str) -> Option<Node> {
		let mut current = Some(self.clone());
		while let Some(node) = current {
			if node.is_element() && node.tag_name().eq_ignore_ascii_case(tag) {
				return Some(node);
			}
			current = node.parent_node();
		}
		None
	}

	fn parent_is(&self, parent: &Node) -> bool {
		self.parent_node().is_some_and(|p| p.ptr_eq(parent))
	}

	fn set_parent(&self, parent: Option<&Node>) {
		*self.0.parent.borrow_mut() = parent.map(|p| Rc::downgrade(&p.0)).unwrap_or_default();
	}

	// ------------------------------------------------------------------
	// Tree mutation
	// ------------------------------------------------------------------

	fn ensure_can_have_children(&self) -> DomResult<()> {
		match self.0.node_type {
			NodeType::Element | NodeType::Fragment => Ok(()),
			found => Err(DomError::InvalidNodeType {
				expected: "element or fragment",
				found,
			}),
		}
	}

	fn ensure_element(&self) -> DomResult<()> {
		if self.is_element() {
			Ok(())
		} else {
			Err(DomError::InvalidNodeType {
				expected: "element",
				found: self.0.node_type,
			})
		}
	}

	fn detach(&self) {
		if let Some(parent) = self.parent_node() {
			parent
				.0
				.children
				.borrow_mut()
				.retain(|child| !child.ptr_eq(self));
		}
		self.set_parent(None);
	}

	/// Appends `child`, moving it out of its previous parent.
	///
	/// Appending a fragment moves all of the fragment's children.
	pub fn append_child(&self, child: &Node) -> DomResult<()> {
		self.insert_before(child, None)
	}

	/// Inserts `node` before `reference`, or at the end when `reference` is `None`.
	///
	/// # Errors
	///
	/// - [`DomError::HierarchyRequest`] when `node` is an attribute or an
	///   inclusive ancestor of `self`.
	/// - [`DomError::NotFound`] when `reference` is not a child of `self`.
	pub fn insert_before(&self, node: &Node, reference: Option<&Node>) -> DomResult<()> {
		self.ensure_can_have_children()?;
		if node.is_attr() {
			return Err(DomError::HierarchyRequest(
				"attribute nodes cannot be inserted as children".to_string(),
			));
		}
		if node.contains(self) {
			return Err(DomError::HierarchyRequest(
				"a node cannot be inserted into itself or one of its descendants".to_string(),
			));
		}
		if let Some(reference) = reference
			&& !reference.parent_is(self)
		{
			return Err(DomError::NotFound(
				"reference node is not a child of this node".to_string(),
			));
		}

		let mut reference = reference.cloned();
		if reference.as_ref().is_some_and(|r| r.ptr_eq(node)) {
			reference = node.next_sibling();
		}

		let nodes = if node.is_fragment() {
			node.take_children()
		} else {
			node.detach();
			vec![node.clone()]
		};

		let mut index = match &reference {
			Some(reference) => reference.index_in_parent().ok_or_else(|| {
				DomError::NotFound("reference node was detached during insertion".to_string())
			})?,
			None => self.child_count(),
		};
		for inserted in nodes {
			inserted.set_parent(Some(self));
			self.0.children.borrow_mut().insert(index, inserted);
			index += 1;
		}
		Ok(())
	}

	/// Removes `child` from this node.
	pub fn remove_child(&self, child: &Node) -> DomResult<()> {
		if !child.parent_is(self) {
			return Err(DomError::NotFound(
				"node is not a child of this node".to_string(),
			));
		}
		child.detach();
		Ok(())
	}

	/// Detaches this node from its parent (or owner element for attributes).
	pub fn remove(&self) {
		if let Some(owner) = self.owner_element() {
			owner
				.0
				.attributes
				.borrow_mut()
				.retain(|attr| !attr.ptr_eq(self));
			self.set_parent(None);
		} else {
			self.detach();
		}
	}

	/// Detaches and returns all children.
	pub fn take_children(&self) -> Vec<Node> {
		let children = std::mem::take(&mut *self.0.children.borrow_mut());
		for child in &children {
			child.set_parent(None);
		}
		children
	}

	/// Replaces this node with `nodes` in its parent. A parentless node is left untouched.
	pub fn replace_with(&self, nodes: &[Node]) -> DomResult<()> {
		let Some(parent) = self.parent_node() else {
			return Ok(());
		};
		let mut keeps_self = false;
		for node in nodes {
			if node.ptr_eq(self) {
				keeps_self = true;
				continue;
			}
			parent.insert_before(node, Some(self))?;
		}
		if !keeps_self {
			self.detach();
		}
		Ok(())
	}

	/// Copies this node. Event listeners are never copied.
	pub fn clone_node(&self, deep: bool) -> Node {
		let copy = Node::new(
			self.0.node_type,
			self.0.name.clone(),
			self.0.data.borrow().clone(),
		);
		for attr in self.0.attributes.borrow().iter() {
			let attr_copy = attr.clone_node(false);
			attr_copy.set_parent(Some(&copy));
			copy.0.attributes.borrow_mut().push(attr_copy);
		}
		if deep {
			for child in self.0.children.borrow().iter() {
				let child_copy = child.clone_node(true);
				child_copy.set_parent(Some(&copy));
				copy.0.children.borrow_mut().push(child_copy);
			}
		}
		copy
	}

	/// Merges adjacent text nodes and drops empty ones, recursively.
	pub fn normalize(&self) {
		let mut index = 0;
		while let Some(child) = self.child(index) {
			if child.is_text() {
				while let Some(next) = child.next_sibling() {
					if !next.is_text() {
						break;
					}
					child.0.data.borrow_mut().push_str(&next.data());
					next.detach();
				}
				if child.0.data.borrow().is_empty() {
					child.detach();
					continue;
				}
			} else {
				child.normalize();
			}
			index += 1;
		}
	}

	// ------------------------------------------------------------------
	// Character data
	// ------------------------------------------------------------------

	/// Returns the character data (text, comment) or value (attribute).
	pub fn data(&self) -> String {
		self.0.data.borrow().clone()
	}

	/// Replaces the character data of a text, comment or attribute node.
	pub fn set_data(&self, data: impl Into<String>) -> DomResult<()> {
		match self.0.node_type {
			NodeType::Text | NodeType::Comment | NodeType::Attr => {
				*self.0.data.borrow_mut() = data.into();
				Ok(())
			}
			found => Err(DomError::InvalidNodeType {
				expected: "text, comment or attribute",
				found,
			}),
		}
	}

	/// Returns the value of an attribute node.
	pub fn value(&self) -> Option<String> {
		self.is_attr().then(|| self.data())
	}

	/// Sets the value of an attribute node.
	pub fn set_value(&self, value: impl Into<String>) -> DomResult<()> {
		if !self.is_attr() {
			return Err(DomError::InvalidNodeType {
				expected: "attribute",
				found: self.0.node_type,
			});
		}
		self.set_data(value)
	}

	/// Returns the concatenated text of all descendant text nodes.
	pub fn text_content(&self) -> String {
		match self.0.node_type {
			NodeType::Text | NodeType::Comment | NodeType::Attr => self.data(),
			NodeType::Element | NodeType::Fragment => {
				let mut out = String::new();
				for child in self.0.children.borrow().iter() {
					if !child.is_comment() {
						out.push_str(&child.text_content());
					}
				}
				out
			}
		}
	}

	// ------------------------------------------------------------------
	// Attributes
	// ------------------------------------------------------------------

	/// Returns a snapshot of this element's attribute nodes.
	pub fn attribute_nodes(&self) -> Vec<Node> {
		self.0.attributes.borrow().clone()
	}

	/// Returns the attribute names in order.
	pub fn attribute_names(&self) -> Vec<String> {
		self.0
			.attributes
			.borrow()
			.iter()
			.map(|attr| attr.0.name.clone())
			.collect()
	}

	/// Returns the attribute node named `name`.
	pub fn get_attribute_node(&self, name: &str) -> Option<Node> {
		self.0
			.attributes
			.borrow()
			.iter()
			.find(|attr| attr.0.name.eq_ignore_ascii_case(name))
			.cloned()
	}

	/// Returns the value of the attribute named `name`.
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		self.get_attribute_node(name).map(|attr| attr.data())
	}

	/// Returns whether the attribute named `name` exists.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.get_attribute_node(name).is_some()
	}

	/// Sets (or creates) an attribute on this element.
	pub fn set_attribute(&self, name: &str, value: impl Into<String>) -> DomResult<()> {
		self.ensure_element()?;
		let value = value.into();
		if let Some(attr) = self.get_attribute_node(name) {
			*attr.0.data.borrow_mut() = value;
		} else {
			let attr = Node::attribute(name, value);
			attr.set_parent(Some(self));
			self.0.attributes.borrow_mut().push(attr);
		}
		Ok(())
	}

	/// Removes the attribute named `name`, returning its node.
	pub fn remove_attribute(&self, name: &str) -> DomResult<Option<Node>> {
		self.ensure_element()?;
		let removed = self.get_attribute_node(name);
		if let Some(attr) = &removed {
			attr.remove();
		}
		Ok(removed)
	}

	/// Attaches an attribute node, replacing any attribute of the same name.
	///
	/// Returns the replaced attribute node.
	///
	/// # Errors
	///
	/// [`DomError::HierarchyRequest`] when the attribute already belongs to a
	/// different element.
	pub fn set_attribute_node(&self, attr: &Node) -> DomResult<Option<Node>> {
		self.ensure_element()?;
		if !attr.is_attr() {
			return Err(DomError::InvalidNodeType {
				expected: "attribute",
				found: attr.node_type(),
			});
		}
		if let Some(owner) = attr.owner_element() {
			if owner.ptr_eq(self) {
				return Ok(None);
			}
			return Err(DomError::HierarchyRequest(
				"attribute node is in use by another element".to_string(),
			));
		}
		let replaced = self.get_attribute_node(&attr.0.name);
		let mut attributes = self.0.attributes.borrow_mut();
		match &replaced {
			Some(old) => {
				if let Some(slot) = attributes.iter_mut().find(|a| a.ptr_eq(old)) {
					*slot = attr.clone();
				}
				old.set_parent(None);
			}
			None => attributes.push(attr.clone()),
		}
		attr.set_parent(Some(self));
		Ok(replaced)
	}

	/// Detaches an attribute node owned by this element.
	pub fn remove_attribute_node(&self, attr: &Node) -> DomResult<()> {
		if !attr.owner_element().is_some_and(|owner| owner.ptr_eq(self)) {
			return Err(DomError::NotFound(format!(
				"attribute {:?} is not owned by this element",
				attr.attr_name()
			)));
		}
		attr.remove();
		Ok(())
	}

	/// Returns the `class` attribute (empty when absent).
	pub fn class_name(&self) -> String {
		self.get_attribute("class").unwrap_or_default()
	}

	/// Sets the `class` attribute.
	pub fn set_class_name(&self, class_name: &str) -> DomResult<()> {
		self.set_attribute("class", class_name)
	}

	/// Returns the `id` attribute.
	pub fn id(&self) -> Option<String> {
		self.get_attribute("id")
	}
}

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for Node {}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0.node_type {
			NodeType::Element => f
				.debug_struct("Element")
				.field("tag", &self.0.name)
				.field("attributes", &self.attribute_names())
				.field("children", &self.child_count())
				.finish(),
			NodeType::Attr => f
				.debug_struct("Attr")
				.field("name", &self.0.name)
				.field("value", &*self.0.data.borrow())
				.finish(),
			NodeType::Text => f.debug_tuple("Text").field(&*self.0.data.borrow()).finish(),
			NodeType::Comment => f
				.debug_tuple("Comment")
				.field(&*self.0.data.borrow())
				.finish(),
			NodeType::Fragment => f
				.debug_struct("Fragment")
				.field("children", &self.child_count())
				.finish(),
		}
	}
}
