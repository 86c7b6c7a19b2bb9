//! Template markers
//!
//! A marker is `<base>-<ordinal>-`, where `<base>` is `a` followed by 16
//! lowercase hex digits drawn once per process. The leading letter lets a
//! marker stand as a bare attribute name, and lowercase survives the HTML
//! tokenizer's name folding. The trailing `-` ends the ordinal, so a digit
//! in the following literal stays literal text.

use std::sync::OnceLock;

use rand::RngCore;
use regex::Regex;

static MARKER_BASE: OnceLock<String> = OnceLock::new();
static MARKER_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Returns this process's marker base.
pub fn marker_base() -> &'static str {
	MARKER_BASE.get_or_init(|| {
		let mut bytes = [0u8; 8];
		rand::thread_rng().fill_bytes(&mut bytes);
		bytes
			.iter()
			.fold(String::from("a"), |acc, byte| acc + &format!("{byte:02x}"))
	})
}

/// Returns the marker token for `ordinal`.
pub fn marker(ordinal: usize) -> String {
	format!("{}-{ordinal}-", marker_base())
}

fn pattern() -> &'static Regex {
	MARKER_PATTERN.get_or_init(|| {
		Regex::new(&format!("{}-([0-9]+)-", marker_base())).expect("Invalid marker pattern")
	})
}

/// The first marker found in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerMatch {
	/// Byte offset where the marker starts.
	pub start: usize,
	/// Byte offset just past the marker.
	pub end: usize,
	/// The marker's ordinal.
	pub ordinal: usize,
}

impl MarkerMatch {
	/// Returns whether the marker spans all of `s`.
	pub fn is_whole(&self, s: &str) -> bool {
		self.start == 0 && self.end == s.len()
	}
}

/// Finds the first marker in `s`.
pub fn find_marker(s: &str) -> Option<MarkerMatch> {
	let captures = pattern().captures(s)?;
	let full = captures.get(0)?;
	let ordinal = captures.get(1)?.as_str().parse().ok()?;
	Some(MarkerMatch {
		start: full.start(),
		end: full.end(),
		ordinal,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_marker_base_shape() {
		let base = marker_base();

		assert_eq!(base.len(), 17);
		assert!(base.starts_with('a'));
		assert!(base[1..].chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
		assert_eq!(marker_base(), base);
	}

	#[rstest]
	#[case(0)]
	#[case(7)]
	#[case(42)]
	fn test_find_marker_in_text(#[case] ordinal: usize) {
		let text = format!("before {} after", marker(ordinal));

		let found = find_marker(&text).unwrap();

		assert_eq!(found.ordinal, ordinal);
		assert_eq!(&text[..found.start], "before ");
		assert_eq!(&text[found.end..], " after");
		assert!(!found.is_whole(&text));
	}

	#[rstest]
	fn test_whole_marker() {
		let token = marker(3);

		assert!(find_marker(&token).unwrap().is_whole(&token));
	}

	#[rstest]
	fn test_no_marker() {
		assert!(find_marker("plain text").is_none());
		assert!(find_marker(&format!("{}-", marker_base())).is_none());
		assert!(find_marker(&format!("{}-7", marker_base())).is_none());
	}

	#[rstest]
	fn test_digits_after_marker_are_not_ordinal() {
		let text = format!("{}0 items", marker(5));

		let found = find_marker(&text).unwrap();

		assert_eq!(found.ordinal, 5);
		assert_eq!(&text[found.end..], "0 items");
	}
}
