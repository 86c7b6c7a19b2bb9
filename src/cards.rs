//! Card storage and barcode collaborators
//!
//! ```rust
//! # #[cfg(feature = "cards")]
//! # {
//! use cardkeep::cards::{Barcode, CardStore, MemoryStore};
//!
//! let cards = CardStore::new(MemoryStore::new());
//! let card = cards.create(&Barcode::new("qr_code", "hello")).unwrap();
//! assert_eq!(card.id, "card.1");
//! # }
//! ```

pub use cardkeep_cards::*;
