//! HTML fragment parsing
//!
//! A deliberately small tree builder on top of the `html5gum` tokenizer.
//! It handles the shapes template markup actually uses: nested elements,
//! void elements, comments and text. It does not implement the full HTML
//! tree-construction algorithm (no foster parenting, no adoption agency).

use html5gum::{HtmlString, Token, Tokenizer};

use crate::error::DomResult;
use crate::is_void_element;
use crate::node::Node;

/// Elements implicitly closed when a sibling of the same tag opens.
const IMPLIED_END_TAGS: &[&str] = &["li", "option", "p"];

/// Parses `html` into a detached document fragment.
///
/// Text nodes in the result are normalized. Doctypes are dropped and
/// tokenizer errors are logged and skipped.
///
/// # Example
///
/// ```ignore
/// let fragment = parse_fragment("<p>One<p>Two")?;
/// assert_eq!(fragment.child_count(), 2);
/// ```
pub fn parse_fragment(html: &str) -> DomResult<Node> {
	let fragment = Node::fragment();
	let mut open: Vec<Node> = Vec::new();

	for token in Tokenizer::new(html).infallible() {
		match token {
			Token::StartTag(tag) => {
				let name = decode(tag.name)?;
				if IMPLIED_END_TAGS.contains(&name.as_str())
					&& open.last().is_some_and(|top| top.tag_name() == name)
				{
					open.pop();
				}
				let element = Node::element(&name);
				for (key, value) in tag.attributes {
					element.set_attribute(&decode(key)?, decode(value)?)?;
				}
				current(&open, &fragment).append_child(&element)?;
				if !tag.self_closing && !is_void_element(&name) {
					open.push(element);
				}
			}
			Token::EndTag(tag) => {
				let name = decode(tag.name)?;
				match open.iter().rposition(|element| element.tag_name() == name) {
					Some(position) => open.truncate(position),
					None => tracing::debug!(tag = %name, "ignoring unmatched end tag"),
				}
			}
			Token::String(text) => {
				current(&open, &fragment).append_child(&Node::text(decode(text)?))?;
			}
			Token::Comment(text) => {
				current(&open, &fragment).append_child(&Node::comment(decode(text)?))?;
			}
			Token::Doctype(_) => {}
			Token::Error(error) => {
				tracing::debug!(?error, "html tokenizer error");
			}
		}
	}

	fragment.normalize();
	Ok(fragment)
}

fn current(open: &[Node], fragment: &Node) -> Node {
	open.last().cloned().unwrap_or_else(|| fragment.clone())
}

fn decode(s: HtmlString) -> DomResult<String> {
	Ok(String::from_utf8(s.0)?)
}
