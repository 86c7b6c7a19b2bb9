//! Error types for card storage and barcode collaborators.

use thiserror::Error;

/// Errors raised by the card layer.
#[derive(Debug, Error)]
pub enum CardError {
	/// No card is stored under the id.
	#[error("Card not found: {0}")]
	NotFound(String),

	/// A stored record is not valid card JSON.
	#[error("Invalid card record: {0}")]
	Json(#[from] serde_json::Error),

	/// The id counter holds something other than a number, or is exhausted.
	#[error("Card id counter {key:?} holds {value:?}, expected an integer below u64::MAX")]
	Counter {
		/// Counter key.
		key: &'static str,
		/// The stored value.
		value: String,
	},

	/// A bitmap whose data does not match its dimensions.
	#[error("Bitmap of {width}x{height} needs {expected} modules, got {found}")]
	InvalidBitmap {
		/// Width in modules.
		width: usize,
		/// Height in modules.
		height: usize,
		/// `width * height`, or `usize::MAX` when that overflows.
		expected: usize,
		/// Length of the data supplied.
		found: usize,
	},

	/// The barcode detector or encoder failed.
	#[error("Barcode collaborator failed: {0}")]
	Detector(String),
}

/// Result type for card operations.
pub type CardResult<T> = Result<T, CardError>;
