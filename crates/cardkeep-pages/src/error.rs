//! Error types for template compilation, rendering and mounting.

use cardkeep_dom::DomError;
use thiserror::Error;

/// Errors raised by the template engine.
#[derive(Debug, Error)]
pub enum PagesError {
	/// A DOM operation failed.
	#[error("DOM error: {0}")]
	Dom(#[from] DomError),

	/// An attribute-name marker whose value also carries a marker.
	#[error("Marker conflict on <{element}>: attribute {attribute:?} has markers in both name and value")]
	MarkerConflict {
		/// Tag name of the owning element.
		element: String,
		/// The offending attribute name.
		attribute: String,
	},

	/// A marker embedded in an attribute name alongside other text.
	#[error("Attribute name {attribute:?} on <{element}> contains a marker mixed with other text")]
	PartialAttributeName {
		/// Tag name of the owning element.
		element: String,
		/// The offending attribute name.
		attribute: String,
	},

	/// A marker embedded in an attribute value alongside other text.
	#[error(
		"Attribute value parts must be the entire value: {attribute:?} on <{element}> has {value:?}"
	)]
	PartialAttributeValue {
		/// Tag name of the owning element.
		element: String,
		/// The attribute name.
		attribute: String,
		/// The attribute value as parsed.
		value: String,
	},

	/// A text marker inside `<style>` content.
	#[error("Node parts are not allowed inside <style> elements")]
	MarkerInStyle,

	/// A marker that the parser swallowed.
	#[error("Template marker {ordinal} was not found after parsing; the markup is probably malformed")]
	MissingMarker {
		/// Zero-based marker ordinal.
		ordinal: usize,
	},

	/// A marker found at more than one location.
	#[error("Template marker {ordinal} was found more than once")]
	DuplicateMarker {
		/// Zero-based marker ordinal.
		ordinal: usize,
	},

	/// A marker ordinal beyond the template's expression count.
	#[error("Template marker {ordinal} is out of range for a template with {count} expressions")]
	UnknownMarker {
		/// Zero-based marker ordinal.
		ordinal: usize,
		/// Number of expressions the template declares.
		count: usize,
	},

	/// Expression count differs from the template's marker count.
	#[error(
		"Template has {expected} parts but {found} expressions were supplied; this usually means an HTML syntax error in the template"
	)]
	ArityMismatch {
		/// Number of resolved marker locations.
		expected: usize,
		/// Number of expressions supplied.
		found: usize,
	},

	/// No applier rule covers this expression and node combination.
	#[error("No handling for a {expression} expression bound to a {node} node")]
	UnsupportedExpression {
		/// Kind of the expression.
		expression: String,
		/// Name of the bound node.
		node: String,
	},

	/// A descendant path that does not resolve.
	#[error("Unresolvable path: {0}")]
	UnresolvablePath(String),

	/// The configured mount container is missing from the document.
	#[error("Mount container {0:?} not found in document")]
	ContainerNotFound(String),

	/// Settings could not be loaded.
	#[error("Settings error: {0}")]
	Settings(String),
}

/// Result type alias for template engine operations.
pub type PagesResult<T> = Result<T, PagesError>;
