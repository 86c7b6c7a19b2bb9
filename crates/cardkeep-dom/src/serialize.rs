//! HTML serialization

use crate::is_void_element;
use crate::node::{Node, NodeType};

/// Elements whose text content is written without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Escapes `&`, `<` and `>` for use in text content.
pub fn escape_text(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
	out
}

/// Escapes `&`, `"`, `<` and `>` for use in a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'"' => out.push_str("&quot;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
	out
}

impl Node {
	/// Serializes this node and its descendants.
	pub fn outer_html(&self) -> String {
		let mut out = String::new();
		write_node(self, &mut out, false);
		out
	}

	/// Serializes this node's children.
	pub fn inner_html(&self) -> String {
		let raw = RAW_TEXT_ELEMENTS.contains(&self.tag_name());
		let mut out = String::new();
		for child in self.child_nodes() {
			write_node(&child, &mut out, raw);
		}
		out
	}
}

fn write_node(node: &Node, out: &mut String, raw_text: bool) {
	match node.node_type() {
		NodeType::Element => {
			let tag = node.tag_name();
			out.push('<');
			out.push_str(tag);
			for attr in node.attribute_nodes() {
				out.push(' ');
				write_node(&attr, out, false);
			}
			out.push('>');
			if is_void_element(tag) {
				return;
			}
			let raw = RAW_TEXT_ELEMENTS.contains(&tag);
			for child in node.child_nodes() {
				write_node(&child, out, raw);
			}
			out.push_str("</");
			out.push_str(tag);
			out.push('>');
		}
		NodeType::Attr => {
			out.push_str(node.attr_name());
			out.push_str("=\"");
			out.push_str(&escape_attr(&node.data()));
			out.push('"');
		}
		NodeType::Text => {
			if raw_text {
				out.push_str(&node.data());
			} else {
				out.push_str(&escape_text(&node.data()));
			}
		}
		NodeType::Comment => {
			out.push_str("<!--");
			out.push_str(&node.data());
			out.push_str("-->");
		}
		NodeType::Fragment => {
			for child in node.child_nodes() {
				write_node(&child, out, raw_text);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("a < b & c > d", "a &lt; b &amp; c &gt; d")]
	#[case("plain", "plain")]
	#[case("\"quoted\"", "\"quoted\"")]
	fn test_escape_text(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(escape_text(input), expected);
	}

	#[rstest]
	fn test_escape_attr_quotes() {
		assert_eq!(escape_attr("say \"hi\" & go"), "say &quot;hi&quot; &amp; go");
	}

	#[rstest]
	fn test_outer_html_with_attributes_and_void() {
		let div = Node::element("div");
		div.set_attribute("class", "card").unwrap();
		div.append_child(&Node::element("br")).unwrap();
		div.append_child(&Node::text("1 < 2")).unwrap();
		div.append_child(&Node::comment("slot")).unwrap();

		assert_eq!(
			div.outer_html(),
			"<div class=\"card\"><br>1 &lt; 2<!--slot--></div>"
		);
	}

	#[rstest]
	fn test_style_text_is_not_escaped() {
		let style = Node::element("style");
		style.append_child(&Node::text("a > b { color: red }")).unwrap();

		assert_eq!(style.outer_html(), "<style>a > b { color: red }</style>");
		assert_eq!(style.inner_html(), "a > b { color: red }");
	}
}
