//! Template expressions
//!
//! [`Expression`] is the closed set of values a template hole accepts. Most
//! callers never build one directly: `html!` converts each argument with
//! [`IntoExpression`], and the helpers in this module ([`on`], [`attr`],
//! [`node_ref`], [`live`]) produce function expressions that act on the
//! bound node.
//!
//! Types that need full control of their binding implement
//! [`TemplateExpression`] and are wrapped with [`Expression::capability`].

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use cardkeep_dom::{ListenerOptions, Node};
use cardkeep_reactive::use_later;
use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::apply::apply_expression;
use crate::callback::IntoEventHandler;
use crate::error::{PagesError, PagesResult};

/// A function expression: called with the bound node, its result is applied
/// to the same node.
pub type ExpressionFn = Box<dyn FnOnce(&Node) -> PagesResult<Expression>>;

/// A scalar value rendered as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
	/// A string.
	Text(String),
	/// A floating-point number.
	Number(f64),
	/// An integer too wide for `f64`.
	BigInt(i128),
}

impl fmt::Display for Primitive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => f.write_str(text),
			Self::Number(value) if value.is_nan() => f.write_str("NaN"),
			Self::Number(value) if value.is_infinite() => {
				f.write_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
			}
			Self::Number(value) if *value == 0.0 => f.write_str("0"),
			Self::Number(value) => write!(f, "{value}"),
			Self::BigInt(value) => write!(f, "{value}"),
		}
	}
}

/// An expression that binds itself to its node.
///
/// Consulted before every built-in rule.
///
/// # Example
///
/// ```ignore
/// struct Highlight;
///
/// impl TemplateExpression for Highlight {
///     fn bind(self: Box<Self>, node: &Node) -> PagesResult<()> {
///         node.set_attribute("data-highlight", "")?;
///         Ok(())
///     }
/// }
///
/// let view = html!("<li ", Expression::capability(Highlight), "></li>")?;
/// ```
pub trait TemplateExpression {
	/// Binds to `node`.
	fn bind(self: Box<Self>, node: &Node) -> PagesResult<()>;
}

/// A value bound to one template hole.
pub enum Expression {
	/// Renders nothing.
	Empty,
	/// Text, number or bigint.
	Primitive(Primitive),
	/// A DOM node (element, fragment, text, attribute ...).
	Node(Node),
	/// Called with the bound node.
	Function(ExpressionFn),
	/// Applied once the future completes; nothing renders meanwhile.
	Deferred(LocalBoxFuture<'static, Expression>),
	/// A sequence of expressions.
	Iterable(Vec<Expression>),
	/// A self-binding value.
	Capability(Box<dyn TemplateExpression>),
}

impl Expression {
	/// A text expression.
	pub fn text(text: impl Into<String>) -> Self {
		Self::Primitive(Primitive::Text(text.into()))
	}

	/// A function expression whose return value is applied to the node.
	pub fn func<F, R>(f: F) -> Self
	where
		F: FnOnce(&Node) -> R + 'static,
		R: IntoExpression,
	{
		Self::Function(Box::new(move |node| Ok(f(node).into_expression())))
	}

	/// A fallible function expression.
	pub fn try_func<F, R>(f: F) -> Self
	where
		F: FnOnce(&Node) -> PagesResult<R> + 'static,
		R: IntoExpression,
	{
		Self::Function(Box::new(move |node| f(node).map(IntoExpression::into_expression)))
	}

	/// An expression applied when `future` completes.
	pub fn deferred<F>(future: F) -> Self
	where
		F: Future + 'static,
		F::Output: IntoExpression,
	{
		Self::Deferred(future.map(IntoExpression::into_expression).boxed_local())
	}

	/// Wraps a self-binding value.
	pub fn capability<C>(capability: C) -> Self
	where
		C: TemplateExpression + 'static,
	{
		Self::Capability(Box::new(capability))
	}

	/// A short name for the kind of expression, used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Empty => "empty",
			Self::Primitive(Primitive::Text(_)) => "text",
			Self::Primitive(Primitive::Number(_)) => "number",
			Self::Primitive(Primitive::BigInt(_)) => "bigint",
			Self::Node(node) if node.is_attr() => "attribute node",
			Self::Node(_) => "node",
			Self::Function(_) => "function",
			Self::Deferred(_) => "deferred",
			Self::Iterable(_) => "iterable",
			Self::Capability(_) => "capability",
		}
	}
}

impl fmt::Debug for Expression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Primitive(primitive) => f.debug_tuple("Primitive").field(primitive).finish(),
			Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
			Self::Iterable(items) => f.debug_tuple("Iterable").field(items).finish(),
			other => f.write_str(other.kind()),
		}
	}
}

/// Conversion into an [`Expression`].
pub trait IntoExpression {
	/// Performs the conversion.
	fn into_expression(self) -> Expression;
}

impl IntoExpression for Expression {
	fn into_expression(self) -> Expression {
		self
	}
}

impl IntoExpression for () {
	fn into_expression(self) -> Expression {
		Expression::Empty
	}
}

impl IntoExpression for &str {
	fn into_expression(self) -> Expression {
		Expression::text(self)
	}
}

impl IntoExpression for String {
	fn into_expression(self) -> Expression {
		Expression::text(self)
	}
}

impl IntoExpression for &String {
	fn into_expression(self) -> Expression {
		Expression::text(self.as_str())
	}
}

impl IntoExpression for char {
	fn into_expression(self) -> Expression {
		Expression::text(self.to_string())
	}
}

macro_rules! impl_into_expression_number {
	($($ty:ty),*) => {
		$(
			impl IntoExpression for $ty {
				fn into_expression(self) -> Expression {
					Expression::Primitive(Primitive::Number(f64::from(self)))
				}
			}
		)*
	};
}

// Wider than an f64 mantissa: rendered exactly as bigints.
macro_rules! impl_into_expression_bigint {
	(lossless: $($ty:ty),*) => {
		$(
			impl IntoExpression for $ty {
				fn into_expression(self) -> Expression {
					Expression::Primitive(Primitive::BigInt(i128::from(self)))
				}
			}
		)*
	};
	(fallible: $($ty:ty),*) => {
		$(
			impl IntoExpression for $ty {
				fn into_expression(self) -> Expression {
					match i128::try_from(self) {
						Ok(value) => Expression::Primitive(Primitive::BigInt(value)),
						Err(_) => Expression::text(self.to_string()),
					}
				}
			}
		)*
	};
}

impl_into_expression_number!(i8, i16, i32, u8, u16, u32, f32, f64);
impl_into_expression_bigint!(lossless: i64, u64);
impl_into_expression_bigint!(fallible: isize, usize, u128);

impl IntoExpression for i128 {
	fn into_expression(self) -> Expression {
		Expression::Primitive(Primitive::BigInt(self))
	}
}

impl IntoExpression for Primitive {
	fn into_expression(self) -> Expression {
		Expression::Primitive(self)
	}
}

impl IntoExpression for Node {
	fn into_expression(self) -> Expression {
		Expression::Node(self)
	}
}

impl IntoExpression for &Node {
	fn into_expression(self) -> Expression {
		Expression::Node(self.clone())
	}
}

impl<T: IntoExpression> IntoExpression for Option<T> {
	fn into_expression(self) -> Expression {
		match self {
			Some(value) => value.into_expression(),
			None => Expression::Empty,
		}
	}
}

impl<T: IntoExpression> IntoExpression for Vec<T> {
	fn into_expression(self) -> Expression {
		Expression::Iterable(self.into_iter().map(IntoExpression::into_expression).collect())
	}
}

impl<T: IntoExpression, const N: usize> IntoExpression for [T; N] {
	fn into_expression(self) -> Expression {
		Expression::Iterable(self.into_iter().map(IntoExpression::into_expression).collect())
	}
}

/// A render result; an error surfaces when the expression is applied.
impl<T: IntoExpression + 'static> IntoExpression for PagesResult<T> {
	fn into_expression(self) -> Expression {
		match self {
			Ok(value) => value.into_expression(),
			Err(error) => Expression::Function(Box::new(move |_| Err(error))),
		}
	}
}

fn require_element(node: &Node, what: &str) -> PagesResult<()> {
	if node.is_element() {
		Ok(())
	} else {
		Err(PagesError::UnsupportedExpression {
			expression: what.to_string(),
			node: node.node_name().to_string(),
		})
	}
}

/// Adds an event listener to the bound element.
///
/// # Example
///
/// ```ignore
/// html!("<button ", on("click", |_: Event| info_log!("clicked")), ">Save</button>")?
/// ```
pub fn on<H>(event_type: &str, handler: H) -> Expression
where
	H: IntoEventHandler + 'static,
{
	on_with(event_type, handler, ListenerOptions::default())
}

/// Adds an event listener with options to the bound element.
pub fn on_with<H>(event_type: &str, handler: H, options: ListenerOptions) -> Expression
where
	H: IntoEventHandler + 'static,
{
	let event_type = event_type.to_string();
	Expression::try_func(move |node: &Node| {
		require_element(node, "event binding")?;
		node.add_event_listener(&event_type, handler.into_event_handler(), options);
		Ok(())
	})
}

/// Sets an attribute on the bound element.
pub fn attr(name: &str, value: impl Into<String>) -> Expression {
	let name = name.to_string();
	let value = value.into();
	Expression::try_func(move |node: &Node| {
		require_element(node, "attribute setter")?;
		node.set_attribute(&name, value)?;
		Ok(())
	})
}

/// A slot filled with the node a [`node_ref`] expression was bound to.
#[derive(Debug, Clone, Default)]
pub struct NodeRef(Rc<RefCell<Option<Node>>>);

impl NodeRef {
	/// Creates an empty slot.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the captured node.
	pub fn get(&self) -> Option<Node> {
		self.0.borrow().clone()
	}
}

/// Captures the bound node into `slot`.
pub fn node_ref(slot: &NodeRef) -> Expression {
	let slot = slot.clone();
	Expression::func(move |node: &Node| {
		*slot.0.borrow_mut() = Some(node.clone());
	})
}

/// Binds text or an attribute value to a reactive computation.
///
/// `compute` runs as an effect: every signal it reads re-runs it on change
/// and the new value is applied in place. A placeholder comment is first
/// replaced by an empty text node so that later runs update that text.
///
/// # Example
///
/// ```ignore
/// let (name, set_name) = signal(String::from("Library"));
/// let view = html!("<h2>", live(move || name.get()), "</h2>")?;
/// set_name.set(String::from("Gym"));
/// ```
pub fn live<F, R>(compute: F) -> Expression
where
	F: Fn() -> R + 'static,
	R: IntoExpression,
{
	Expression::try_func(move |node: &Node| {
		let target = if node.is_comment() {
			let text = Node::text("");
			node.replace_with(std::slice::from_ref(&text))?;
			text
		} else {
			node.clone()
		};
		if !(target.is_text() || target.is_attr()) {
			return Err(PagesError::UnsupportedExpression {
				expression: "live binding".to_string(),
				node: target.node_name().to_string(),
			});
		}

		let effect = use_later(move || {
			if let Err(error) = apply_expression(compute().into_expression(), &target) {
				crate::error_log!("Live binding failed: {}", error);
			}
		});
		effect.run();
		Ok(())
	})
}
