//! Template compilation and caching
//!
//! A template literal is a list of static segments separating N dynamic
//! expressions. Compilation joins the segments with [markers](crate::marker),
//! parses the result once, replaces each marker with a bindable location and
//! records the [`Path`] to it. Instantiating a [`Template`] is then a deep
//! clone plus path resolution.
//!
//! ## Marker positions
//!
//! | Source | Location bound |
//! |--------|----------------|
//! | `<li ${x}>` | the `<li>` element (marker attribute removed) |
//! | `<a href=${x}>` | the `href` attribute node (value blanked) |
//! | `<b>${x}</b>` | a placeholder comment inside `<b>` |
//!
//! ## Caching
//!
//! Templates are cached per thread, keyed by the identity of the segment
//! object. `html!` stores its segments in a per-call-site `static`, so every
//! call site compiles once. Identical markup at two call sites yields two
//! templates.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use cardkeep_dom::{Node, NodeType, parse_fragment};

use crate::error::{PagesError, PagesResult};
use crate::marker::{find_marker, marker};
use crate::path::{Path, coalesce_paths, descend_paths, get_path};

/// Static segments of a template literal.
///
/// Place values in `static` storage (as `html!` does); the cache keys on
/// their address, so rendering only accepts `&'static` values.
///
/// ```compile_fail
/// use cardkeep_pages::{TemplateStrings, render};
///
/// let local = TemplateStrings::new(&["<p>", "</p>"]);
/// let _ = render(&local, Vec::new());
/// ```
#[derive(Debug)]
pub struct TemplateStrings {
	segments: &'static [&'static str],
}

impl TemplateStrings {
	/// Wraps literal segments.
	pub const fn new(segments: &'static [&'static str]) -> Self {
		Self { segments }
	}

	/// Returns the segments.
	pub fn segments(&self) -> &'static [&'static str] {
		self.segments
	}

	/// Number of expressions the literal takes.
	pub fn expression_count(&self) -> usize {
		self.segments.len().saturating_sub(1)
	}

	fn key(&self) -> usize {
		self as *const Self as usize
	}
}

/// Segments built at runtime.
///
/// Held through an `Rc`; the cached template is dropped once the last
/// handle goes away and the cache is next pruned.
#[derive(Debug)]
pub struct OwnedTemplateStrings {
	segments: Vec<String>,
}

impl OwnedTemplateStrings {
	/// Wraps runtime segments.
	pub fn new<I, S>(segments: I) -> Rc<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Rc::new(Self {
			segments: segments.into_iter().map(Into::into).collect(),
		})
	}

	/// Returns the segments.
	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	/// Number of expressions the literal takes.
	pub fn expression_count(&self) -> usize {
		self.segments.len().saturating_sub(1)
	}
}

/// A compiled template: inert content plus one path per expression.
#[derive(Debug)]
pub struct Template {
	content: Node,
	paths: Vec<Path>,
}

impl Template {
	/// Returns the uninstantiated content fragment.
	pub fn content(&self) -> &Node {
		&self.content
	}

	/// Returns the paths, indexed by marker ordinal.
	pub fn paths(&self) -> &[Path] {
		&self.paths
	}

	/// Clones the content and resolves every path against the clone.
	pub fn instantiate(&self) -> PagesResult<(Node, Vec<Node>)> {
		let fragment = self.content.clone_node(true);
		let nodes = descend_paths(&self.paths, &fragment)?;
		Ok((fragment, nodes))
	}
}

/// Compiles literal segments into a [`Template`].
///
/// # Errors
///
/// Any malformation: a marker inside `<style>`, a marker sharing an
/// attribute name or value with other text, a marker the parser dropped or
/// duplicated.
pub fn compile<S: AsRef<str>>(segments: &[S]) -> PagesResult<Template> {
	let count = segments.len().saturating_sub(1);
	let mut source = String::new();
	for (index, segment) in segments.iter().enumerate() {
		if index > 0 {
			source.push_str(&marker(index - 1));
		}
		source.push_str(segment.as_ref());
	}

	let content = parse_fragment(&source)?;
	let mut locations: Vec<Option<Location>> = vec![None; count];
	visit(&content, false, &mut locations)?;

	// Paths are taken after every split so earlier indices stay valid.
	let mut paths = Vec::with_capacity(count);
	for (ordinal, location) in locations.into_iter().enumerate() {
		let location = location.ok_or(PagesError::MissingMarker { ordinal })?;
		paths.push(get_path(
			&location.node,
			&content,
			location.attribute.as_deref(),
		)?);
	}

	tracing::debug!(markers = count, "compiled template");
	Ok(Template {
		content,
		paths: coalesce_paths(paths),
	})
}

#[derive(Clone)]
struct Location {
	node: Node,
	attribute: Option<String>,
}

fn record(
	locations: &mut [Option<Location>],
	ordinal: usize,
	node: Node,
	attribute: Option<String>,
) -> PagesResult<()> {
	let count = locations.len();
	let slot = locations
		.get_mut(ordinal)
		.ok_or(PagesError::UnknownMarker { ordinal, count })?;
	if slot.is_some() {
		return Err(PagesError::DuplicateMarker { ordinal });
	}
	*slot = Some(Location { node, attribute });
	Ok(())
}

fn visit(node: &Node, parent_is_style: bool, locations: &mut [Option<Location>]) -> PagesResult<()> {
	match node.node_type() {
		NodeType::Element | NodeType::Fragment => {
			if node.is_element() {
				visit_attributes(node, locations)?;
			}
			let is_style = node.tag_name() == "style";
			for child in node.child_nodes() {
				visit(&child, is_style, locations)?;
			}
			Ok(())
		}
		NodeType::Text => split_text(node, parent_is_style, locations),
		NodeType::Attr | NodeType::Comment => Ok(()),
	}
}

fn visit_attributes(element: &Node, locations: &mut [Option<Location>]) -> PagesResult<()> {
	for attr in element.attribute_nodes() {
		let name = attr.attr_name().to_string();
		let value = attr.data();

		if let Some(found) = find_marker(&name) {
			if !found.is_whole(&name) {
				return Err(PagesError::PartialAttributeName {
					element: element.tag_name().to_string(),
					attribute: name,
				});
			}
			if find_marker(&value).is_some() {
				return Err(PagesError::MarkerConflict {
					element: element.tag_name().to_string(),
					attribute: name,
				});
			}
			element.remove_attribute_node(&attr)?;
			record(locations, found.ordinal, element.clone(), None)?;
			continue;
		}

		if let Some(found) = find_marker(&value) {
			if !found.is_whole(&value) {
				return Err(PagesError::PartialAttributeValue {
					element: element.tag_name().to_string(),
					attribute: name,
					value,
				});
			}
			attr.set_value("")?;
			record(locations, found.ordinal, element.clone(), Some(name))?;
		}
	}
	Ok(())
}

/// Replaces every marker in a text node with a placeholder comment.
fn split_text(text: &Node, parent_is_style: bool, locations: &mut [Option<Location>]) -> PagesResult<()> {
	let Some(parent) = text.parent_node() else {
		return Ok(());
	};
	loop {
		let data = text.data();
		let Some(found) = find_marker(&data) else {
			return Ok(());
		};
		if parent_is_style {
			return Err(PagesError::MarkerInStyle);
		}

		let placeholder = Node::comment("");
		parent.insert_before(&placeholder, Some(text))?;
		let before = &data[..found.start];
		if !before.is_empty() {
			parent.insert_before(&Node::text(before), Some(&placeholder))?;
		}
		record(locations, found.ordinal, placeholder, None)?;

		let after = &data[found.end..];
		if after.is_empty() {
			text.remove();
			return Ok(());
		}
		text.set_data(after)?;
	}
}

// ----------------------------------------------------------------------
// Cache
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
	Static(usize),
	Owned(usize),
}

struct CacheEntry {
	owner: Option<Weak<OwnedTemplateStrings>>,
	template: Rc<Template>,
}

impl CacheEntry {
	fn is_live(&self) -> bool {
		self.owner.as_ref().is_none_or(|owner| owner.strong_count() > 0)
	}
}

/// Identity-keyed template cache.
#[derive(Default)]
pub struct TemplateCache {
	entries: RefCell<HashMap<CacheKey, CacheEntry>>,
}

impl TemplateCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the template for static segments, compiling on first use.
	pub fn get_or_compile(&self, strings: &'static TemplateStrings) -> PagesResult<Rc<Template>> {
		let key = CacheKey::Static(strings.key());
		if let Some(entry) = self.entries.borrow().get(&key) {
			return Ok(entry.template.clone());
		}
		tracing::debug!(expressions = strings.expression_count(), "template cache miss");
		let template = Rc::new(compile(strings.segments())?);
		self.entries.borrow_mut().insert(
			key,
			CacheEntry {
				owner: None,
				template: template.clone(),
			},
		);
		Ok(template)
	}

	/// Returns the template for runtime segments, compiling on first use.
	///
	/// A miss also prunes entries whose segments have been dropped.
	pub fn get_or_compile_owned(
		&self,
		strings: &Rc<OwnedTemplateStrings>,
	) -> PagesResult<Rc<Template>> {
		let key = CacheKey::Owned(Rc::as_ptr(strings) as usize);
		if let Some(entry) = self.entries.borrow().get(&key)
			&& entry
				.owner
				.as_ref()
				.is_some_and(|owner| owner.as_ptr() == Rc::as_ptr(strings))
			&& entry.is_live()
		{
			return Ok(entry.template.clone());
		}
		self.prune();
		tracing::debug!(
			expressions = strings.expression_count(),
			"template cache miss (owned segments)"
		);
		let template = Rc::new(compile(strings.segments())?);
		self.entries.borrow_mut().insert(
			key,
			CacheEntry {
				owner: Some(Rc::downgrade(strings)),
				template: template.clone(),
			},
		);
		Ok(template)
	}

	/// Drops entries whose owned segments no longer exist. Returns how many.
	pub fn prune(&self) -> usize {
		let mut entries = self.entries.borrow_mut();
		let before = entries.len();
		entries.retain(|_, entry| entry.is_live());
		let pruned = before - entries.len();
		if pruned > 0 {
			tracing::trace!(pruned, "pruned dead template cache entries");
		}
		pruned
	}

	/// Removes the entry for `strings`. Returns whether one existed.
	pub fn evict(&self, strings: &'static TemplateStrings) -> bool {
		let removed = self
			.entries
			.borrow_mut()
			.remove(&CacheKey::Static(strings.key()))
			.is_some();
		tracing::trace!(removed, "evicted template");
		removed
	}

	/// Removes every entry.
	pub fn clear(&self) {
		let mut entries = self.entries.borrow_mut();
		tracing::trace!(entries = entries.len(), "cleared template cache");
		entries.clear();
	}

	/// Number of cached templates.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns whether the cache is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}
}

thread_local! {
	static TEMPLATE_CACHE: TemplateCache = TemplateCache::new();
}

/// Runs `f` with the thread's template cache.
pub fn with_template_cache<R, F>(f: F) -> R
where
	F: FnOnce(&TemplateCache) -> R,
{
	TEMPLATE_CACHE.with(f)
}

/// Fetches or compiles the template for `strings` from the thread's cache.
pub fn template_for(strings: &'static TemplateStrings) -> PagesResult<Rc<Template>> {
	with_template_cache(|cache| cache.get_or_compile(strings))
}
