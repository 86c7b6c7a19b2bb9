//! Error types for DOM operations.

use thiserror::Error;

use crate::node::NodeType;

/// Errors raised by tree mutations and lookups.
#[derive(Debug, Error)]
pub enum DomError {
	/// The requested insertion would produce an invalid tree.
	#[error("Hierarchy request error: {0}")]
	HierarchyRequest(String),

	/// The operation requires a different kind of node.
	#[error("Invalid node type: expected {expected}, found {found:?}")]
	InvalidNodeType {
		/// Description of the accepted node kinds.
		expected: &'static str,
		/// The node type that was supplied.
		found: NodeType,
	},

	/// A referenced node is not where the operation expected it.
	#[error("Node not found: {0}")]
	NotFound(String),

	/// Parsed markup was not valid UTF-8.
	#[error("Encoding error: {0}")]
	Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type alias for DOM operations.
pub type DomResult<T> = Result<T, DomError>;
