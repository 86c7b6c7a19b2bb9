//! Descendant paths
//!
//! A [`Path`] locates a node (or attribute node) relative to a template root
//! by child indices alone, so it resolves identically against every deep
//! clone of that root.

use cardkeep_dom::Node;

use crate::error::{PagesError, PagesResult};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Descend into the child at this index.
	Child(usize),
	/// Select the named attribute node of the current element. Terminal.
	Attribute(String),
	/// Resolve each sub-path from the current node. Terminal.
	Group(Vec<Path>),
}

/// A root-relative location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<PathStep>);

impl Path {
	/// Creates a path from steps.
	pub fn new(steps: Vec<PathStep>) -> Self {
		Self(steps)
	}

	/// Returns the steps.
	pub fn steps(&self) -> &[PathStep] {
		&self.0
	}

	/// Returns whether the path ends at an attribute node.
	pub fn is_attribute(&self) -> bool {
		matches!(self.0.last(), Some(PathStep::Attribute(_)))
	}
}

/// Computes the path from `root` to `target`.
///
/// With `attribute` set, the path identifies that attribute of `target`.
///
/// # Errors
///
/// [`PagesError::UnresolvablePath`] when `target` is not inside `root`.
pub fn get_path(target: &Node, root: &Node, attribute: Option<&str>) -> PagesResult<Path> {
	let mut indices = Vec::new();
	let mut current = target.clone();
	while !current.ptr_eq(root) {
		let (Some(parent), Some(index)) = (current.parent_node(), current.index_in_parent()) else {
			return Err(PagesError::UnresolvablePath(format!(
				"{} is not inside the template root",
				target.node_name()
			)));
		};
		indices.push(index);
		current = parent;
	}

	let mut steps: Vec<PathStep> = indices.into_iter().rev().map(PathStep::Child).collect();
	if let Some(name) = attribute {
		steps.push(PathStep::Attribute(name.to_string()));
	}
	Ok(Path(steps))
}

/// Resolves every path against `root`, in order.
///
/// Each plain path yields one node; a group step splices the nodes of its
/// sub-paths in place.
pub fn descend_paths(paths: &[Path], root: &Node) -> PagesResult<Vec<Node>> {
	let mut nodes = Vec::with_capacity(paths.len());
	for path in paths {
		descend(path, root, &mut nodes)?;
	}
	Ok(nodes)
}

fn descend(path: &Path, root: &Node, out: &mut Vec<Node>) -> PagesResult<()> {
	let mut target = root.clone();
	for step in path.steps() {
		match step {
			PathStep::Child(index) => {
				target = target.child(*index).ok_or_else(|| {
					PagesError::UnresolvablePath(format!(
						"{} has no child at index {index}",
						target.node_name()
					))
				})?;
			}
			PathStep::Attribute(name) => {
				let attr = target.get_attribute_node(name).ok_or_else(|| {
					PagesError::UnresolvablePath(format!(
						"<{}> has no attribute {name:?}",
						target.tag_name()
					))
				})?;
				out.push(attr);
				return Ok(());
			}
			PathStep::Group(paths) => {
				for sub_path in paths {
					descend(sub_path, &target, out)?;
				}
				return Ok(());
			}
		}
	}
	out.push(target);
	Ok(())
}

/// Merges paths that share a prefix. Currently returns them unchanged.
pub fn coalesce_paths(paths: Vec<Path>) -> Vec<Path> {
	paths
}
