//! Mounting screens into the document container
//!
//! A screen is mounted by replacing the container's children with a single
//! placeholder comment and applying the content expression to it, so any
//! expression kind (node, text, iterable, deferred ...) can be a screen.
//! [`Mount::save`] moves the current screen out so it can be mounted again
//! later without re-rendering.

use cardkeep_dom::{Document, Node, document};

use crate::apply::apply_expression;
use crate::error::{PagesError, PagesResult};
use crate::expression::IntoExpression;
use crate::settings::PagesSettings;

/// A mount container.
#[derive(Debug, Clone)]
pub struct Mount {
	container: Node,
	default_class: String,
}

impl Mount {
	/// Mounts into `container` with an empty default class.
	pub fn new(container: Node) -> Self {
		Self {
			container,
			default_class: String::new(),
		}
	}

	/// Looks up the container named by `settings` in `document`.
	///
	/// # Errors
	///
	/// [`PagesError::ContainerNotFound`] when no element matches.
	pub fn from_document(document: &Document, settings: &PagesSettings) -> PagesResult<Self> {
		let container = document
			.query_selector(&settings.container)
			.ok_or_else(|| PagesError::ContainerNotFound(settings.container.clone()))?;
		Ok(Self {
			container,
			default_class: settings.default_class.clone(),
		})
	}

	/// Returns the container element.
	pub fn container(&self) -> &Node {
		&self.container
	}

	/// Replaces the container's content with `content`.
	///
	/// The container's `class` becomes `class_name`, or the default class
	/// when `None`. Previous children are detached, not preserved; call
	/// [`save`](Self::save) first to keep them.
	pub fn mount(&self, content: impl IntoExpression, class_name: Option<&str>) -> PagesResult<()> {
		self.container.take_children();
		self.container
			.set_class_name(class_name.unwrap_or(&self.default_class))?;
		let placeholder = Node::comment("");
		self.container.append_child(&placeholder)?;
		crate::debug_log!("Mounting into <{}>", self.container.tag_name());
		apply_expression(content.into_expression(), &placeholder)
	}

	/// Moves the container's children into a fragment.
	///
	/// Listeners and state on the moved nodes are kept; mounting the
	/// fragment restores the screen.
	pub fn save(&self) -> PagesResult<Node> {
		let fragment = Node::fragment();
		for child in self.container.take_children() {
			fragment.append_child(&child)?;
		}
		Ok(fragment)
	}
}

fn default_mount() -> PagesResult<Mount> {
	Mount::from_document(&document(), &PagesSettings::default())
}

/// Mounts `content` into the current document's `<main>`.
///
/// # Example
///
/// ```ignore
/// mount(html!("<h1>Cards</h1>")?, Some("home"))?;
/// ```
pub fn mount(content: impl IntoExpression, class_name: Option<&str>) -> PagesResult<()> {
	default_mount()?.mount(content, class_name)
}

/// Moves the current screen out of the document's `<main>`.
pub fn save() -> PagesResult<Node> {
	default_mount()?.save()
}
