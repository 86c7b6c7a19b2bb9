//! Binding expressions to template nodes
//!
//! [`apply_expression`] is total over [`Expression`] × node kind: a pair it
//! has no rule for fails with [`PagesError::UnsupportedExpression`].
//!
//! | Expression | Comment | Attr | Text | Element |
//! |------------|---------|------|------|---------|
//! | empty | - | - | - | - |
//! | text / number / bigint | replaced by text | value set | data set | error |
//! | attribute node | error | error | error | attribute set |
//! | other node | replaced by node | error | error | appended |
//! | iterable | one comment per item | error | error | each applied |

use cardkeep_dom::Node;
use cardkeep_reactive::spawn_local_fallible;

use crate::error::{PagesError, PagesResult};
use crate::expression::{Expression, Primitive};

fn unsupported(kind: &str, node: &Node) -> PagesError {
	PagesError::UnsupportedExpression {
		expression: kind.to_string(),
		node: node.node_name().to_string(),
	}
}

/// Applies `expression` to `node`.
///
/// # Errors
///
/// [`PagesError::UnsupportedExpression`] for a pair without a rule, or the
/// error a function expression returned.
pub fn apply_expression(expression: Expression, node: &Node) -> PagesResult<()> {
	match expression {
		Expression::Capability(capability) => capability.bind(node),
		Expression::Function(f) => {
			let next = f(node)?;
			apply_expression(next, node)
		}
		Expression::Empty => Ok(()),
		Expression::Primitive(primitive) => apply_text(primitive, node),
		Expression::Node(value) => apply_node(value, node),
		Expression::Deferred(future) => {
			let node = node.clone();
			spawn_local_fallible(async move {
				let resolved = future.await;
				apply_expression(resolved, &node)
			});
			Ok(())
		}
		Expression::Iterable(items) => apply_iterable(items, node),
	}
}

fn apply_text(primitive: Primitive, node: &Node) -> PagesResult<()> {
	let kind = Expression::Primitive(primitive.clone()).kind();
	let text = match primitive {
		Primitive::Text(text) => text,
		other => other.to_string(),
	};
	if node.is_comment() {
		node.replace_with(&[Node::text(text)])?;
	} else if node.is_attr() {
		node.set_value(text)?;
	} else if node.is_text() {
		node.set_data(text)?;
	} else {
		return Err(unsupported(kind, node));
	}
	Ok(())
}

fn apply_node(value: Node, node: &Node) -> PagesResult<()> {
	if value.is_attr() {
		if !node.is_element() {
			return Err(unsupported("attribute node", node));
		}
		node.set_attribute_node(&value)?;
	} else if node.is_comment() {
		node.replace_with(&[value])?;
	} else if node.is_element() {
		node.append_child(&value)?;
	} else {
		return Err(unsupported("node", node));
	}
	Ok(())
}

fn apply_iterable(items: Vec<Expression>, node: &Node) -> PagesResult<()> {
	if node.is_comment() {
		let Some(parent) = node.parent_node() else {
			return Err(unsupported("iterable", node));
		};
		for item in items {
			let slot = Node::comment("");
			parent.insert_before(&slot, Some(node))?;
			apply_expression(item, &slot)?;
		}
		node.remove();
		Ok(())
	} else if node.is_element() {
		items
			.into_iter()
			.try_for_each(|item| apply_expression(item, node))
	} else {
		Err(unsupported("iterable", node))
	}
}
