//! Card Keeper Cards - records, persistence and barcode collaborators
//!
//! - [`Card`] and [`CardStore`]: JSON card records over a [`KeyValueStore`]
//! - [`BarcodeDetector`] / [`BarcodeEncoder`]: seams for the external barcode engine
//! - [`CARD_COLORS`]: the card colour palette
//!
//! Nothing here depends on the template engine; screens treat cards as
//! plain values.

#![warn(missing_docs)]

pub mod barcode;
pub mod card;
pub mod colors;
pub mod error;
pub mod store;

pub use barcode::{
	Barcode, BarcodeDetector, BarcodeEncoder, Bitmap, Frame, LINEAR_FORMATS, is_linear_format,
};
pub use card::{Card, CardStore, ID_COUNTER_KEY, ID_PREFIX, format_raw_value};
pub use colors::{CARD_COLORS, CardColor, card_color};
pub use error::{CardError, CardResult};
pub use store::{KeyValueStore, MemoryStore};
