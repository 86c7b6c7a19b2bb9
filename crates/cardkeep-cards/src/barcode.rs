//! Barcode collaborators
//!
//! Decoding and encoding are done by an external engine; this module fixes
//! the shapes that cross the boundary. A [`BarcodeDetector`] turns a camera
//! frame into at most one [`Barcode`], and a [`BarcodeEncoder`] turns a
//! barcode back into a monochrome [`Bitmap`] for display.

use serde::{Deserialize, Serialize};

use crate::error::{CardError, CardResult};

/// Formats drawn as a single row of bars.
pub const LINEAR_FORMATS: [&str; 7] = ["code_128", "code_39", "ean_13", "ean_8", "itf", "upc_a", "upc_e"];

/// Returns `true` for one-dimensional formats.
pub fn is_linear_format(format: &str) -> bool {
	LINEAR_FORMATS.contains(&format)
}

/// A decoded barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barcode {
	/// Symbology name, e.g. `qr_code` or `ean_13`.
	pub format: String,
	/// Decoded payload.
	#[serde(rename = "rawValue")]
	pub raw_value: String,
}

impl Barcode {
	/// Creates a barcode.
	pub fn new(format: impl Into<String>, raw_value: impl Into<String>) -> Self {
		Self {
			format: format.into(),
			raw_value: raw_value.into(),
		}
	}
}

/// An RGBA camera frame.
#[derive(Debug, Clone, Default)]
pub struct Frame {
	/// Width in pixels.
	pub width: usize,
	/// Height in pixels.
	pub height: usize,
	/// Pixel data, four bytes per pixel.
	pub rgba: Vec<u8>,
}

impl Frame {
	/// Returns `true` when the frame has no pixels, as before a camera starts.
	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}
}

/// A monochrome module grid. A zero module is dark.
///
/// A height of 1 marks a linear barcode whose row is stretched vertically
/// when drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
	width: usize,
	height: usize,
	data: Vec<u8>,
}

impl Bitmap {
	/// Creates a bitmap.
	///
	/// # Errors
	///
	/// [`CardError::InvalidBitmap`] when `data` is not `width * height` long,
	/// or when that product overflows.
	pub fn new(width: usize, height: usize, data: Vec<u8>) -> CardResult<Self> {
		let invalid = |expected| CardError::InvalidBitmap {
			width,
			height,
			expected,
			found: data.len(),
		};
		let expected = width.checked_mul(height).ok_or_else(|| invalid(usize::MAX))?;
		if data.len() != expected {
			return Err(invalid(expected));
		}
		Ok(Self {
			width,
			height,
			data,
		})
	}

	/// Width in modules.
	pub fn width(&self) -> usize {
		self.width
	}

	/// Height in modules.
	pub fn height(&self) -> usize {
		self.height
	}

	/// Raw module data, row-major.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Returns `true` for a single-row barcode.
	pub fn is_linear(&self) -> bool {
		self.height == 1
	}

	/// Height to draw a linear barcode at: half its width.
	pub fn bar_height(&self) -> usize {
		self.width / 2
	}

	/// Columns holding a dark bar in the first row.
	pub fn bars(&self) -> impl Iterator<Item = usize> + '_ {
		self.data
			.iter()
			.take(self.width)
			.enumerate()
			.filter(|(_, module)| **module == 0)
			.map(|(x, _)| x)
	}

	/// Expands to RGBA: dark modules are opaque black, light ones transparent.
	pub fn to_rgba(&self) -> Vec<u8> {
		let mut rgba = vec![0u8; self.data.len() * 4];
		for (i, module) in self.data.iter().enumerate() {
			rgba[i * 4 + 3] = if *module == 0 { 255 } else { 0 };
		}
		rgba
	}
}

/// Finds a barcode in a camera frame.
pub trait BarcodeDetector {
	/// Returns the barcode in `frame`, if any. An empty frame holds none.
	///
	/// # Errors
	///
	/// [`CardError::Detector`] when the engine reports a failure.
	fn detect(&mut self, frame: &Frame) -> CardResult<Option<Barcode>>;
}

/// Renders a barcode for display.
pub trait BarcodeEncoder {
	/// Encodes `barcode` into a bitmap.
	///
	/// # Errors
	///
	/// [`CardError::Detector`] when the engine cannot encode the payload.
	fn encode(&self, barcode: &Barcode) -> CardResult<Bitmap>;
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("ean_13", true)]
	#[case("upc_e", true)]
	#[case("qr_code", false)]
	#[case("aztec", false)]
	fn test_is_linear_format(#[case] format: &str, #[case] linear: bool) {
		assert_eq!(is_linear_format(format), linear);
	}

	#[rstest]
	fn test_barcode_json_uses_raw_value_key() {
		let barcode = Barcode::new("qr_code", "hello");

		let json = serde_json::to_string(&barcode).unwrap();

		assert_eq!(json, r#"{"format":"qr_code","rawValue":"hello"}"#);
	}

	#[rstest]
	fn test_bitmap_dimension_mismatch() {
		let result = Bitmap::new(3, 2, vec![0; 5]);

		assert!(matches!(
			result,
			Err(CardError::InvalidBitmap {
				expected: 6,
				found: 5,
				..
			})
		));
	}

	#[rstest]
	fn test_bitmap_dimension_overflow() {
		let result = Bitmap::new(usize::MAX, 2, vec![0; 4]);

		assert!(matches!(
			result,
			Err(CardError::InvalidBitmap {
				expected: usize::MAX,
				found: 4,
				..
			})
		));
	}

	#[rstest]
	fn test_linear_bars() {
		let bitmap = Bitmap::new(6, 1, vec![0, 1, 0, 0, 1, 1]).unwrap();

		assert!(bitmap.is_linear());
		assert_eq!(bitmap.bar_height(), 3);
		assert_eq!(bitmap.bars().collect::<Vec<_>>(), vec![0, 2, 3]);
	}

	#[rstest]
	fn test_to_rgba_marks_dark_modules_opaque() {
		let bitmap = Bitmap::new(2, 2, vec![0, 1, 1, 0]).unwrap();

		let rgba = bitmap.to_rgba();

		assert_eq!(rgba.len(), 16);
		assert_eq!(rgba[3], 255);
		assert_eq!(rgba[7], 0);
		assert_eq!(rgba[11], 0);
		assert_eq!(rgba[15], 255);
		assert!(rgba.iter().enumerate().all(|(i, b)| i % 4 == 3 || *b == 0));
	}

	#[rstest]
	fn test_empty_frame() {
		assert!(Frame::default().is_empty());
	}
}
