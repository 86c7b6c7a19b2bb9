//! Rendering tagged templates
//!
//! [`render`] fetches the cached [`Template`](crate::Template) for a set of
//! literal segments, clones its content and applies one expression to each
//! resolved node. The `html!` macro builds the static segments and converts
//! the arguments.
//!
//! ## Example
//!
//! ```ignore
//! use cardkeep_pages::{Node, attr, html};
//!
//! let item = html!("<li ", attr("data-x", "1"), "><b>", "Hi", "</b></li>")?;
//! assert_eq!(item.inner_html(), "<li data-x=\"1\"><b>Hi</b></li>");
//! ```

use std::rc::Rc;

use cardkeep_dom::Node;

use crate::apply::apply_expression;
use crate::error::{PagesError, PagesResult};
use crate::expression::Expression;
use crate::template::{
	OwnedTemplateStrings, Template, TemplateStrings, template_for, with_template_cache,
};

/// Renders `expressions` into the template named by `strings`.
///
/// # Errors
///
/// Compilation errors, [`PagesError::ArityMismatch`] when the expression
/// count differs from the template's, and any error raised while applying.
pub fn render(strings: &'static TemplateStrings, expressions: Vec<Expression>) -> PagesResult<Node> {
	render_with(strings, expressions, apply_expression)
}

/// Renders with a custom applier in place of [`apply_expression`].
pub fn render_with<A>(
	strings: &'static TemplateStrings,
	expressions: Vec<Expression>,
	applier: A,
) -> PagesResult<Node>
where
	A: Fn(Expression, &Node) -> PagesResult<()>,
{
	let template = template_for(strings)?;
	fill(&template, expressions, applier)
}

/// Renders runtime-built segments.
///
/// The compiled template stays cached while `strings` is alive.
pub fn render_owned(
	strings: &Rc<OwnedTemplateStrings>,
	expressions: Vec<Expression>,
) -> PagesResult<Node> {
	let template = with_template_cache(|cache| cache.get_or_compile_owned(strings))?;
	fill(&template, expressions, apply_expression)
}

fn fill<A>(template: &Template, expressions: Vec<Expression>, applier: A) -> PagesResult<Node>
where
	A: Fn(Expression, &Node) -> PagesResult<()>,
{
	let (fragment, nodes) = template.instantiate()?;
	if nodes.len() != expressions.len() {
		return Err(PagesError::ArityMismatch {
			expected: nodes.len(),
			found: expressions.len(),
		});
	}
	crate::debug_log!("Applying {} expressions", expressions.len());
	for (expression, node) in expressions.into_iter().zip(nodes.iter()) {
		applier(expression, node)?;
	}
	Ok(fragment)
}

/// Renders an HTML template.
///
/// Literal segments alternate with expressions, starting and ending with a
/// literal. Each expression is converted with
/// [`IntoExpression`](crate::IntoExpression). Evaluates to
/// `PagesResult<Node>` holding a fragment.
///
/// # Example
///
/// ```ignore
/// let view = html!("<p>Hello, ", name, "!</p>")?;
/// ```
#[macro_export]
macro_rules! html {
	($first:literal $(, $expr:expr, $lit:literal)*) => {{
		static STRINGS: $crate::TemplateStrings =
			$crate::TemplateStrings::new(&[$first $(, $lit)*]);
		$crate::render(
			&STRINGS,
			::std::vec![$($crate::IntoExpression::into_expression($expr)),*],
		)
	}};
}
