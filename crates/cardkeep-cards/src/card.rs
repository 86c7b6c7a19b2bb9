//! Card records and their store
//!
//! A card is saved as JSON under its id (`card.N`). Ids come from a counter
//! kept under [`ID_COUNTER_KEY`], so deleted ids are never reused.
//!
//! ## Example
//!
//! ```
//! use cardkeep_cards::{Barcode, CardStore, MemoryStore};
//!
//! let cards = CardStore::new(MemoryStore::new());
//! let mut card = cards.create(&Barcode::new("ean_13", "4006381333931"))?;
//! card.name = "Library".to_string();
//! cards.save(&card)?;
//!
//! assert_eq!(cards.get_cards()?, vec![card]);
//! # Ok::<(), cardkeep_cards::CardError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::barcode::{Barcode, is_linear_format};
use crate::colors::{CARD_COLORS, CardColor, card_color};
use crate::error::{CardError, CardResult};
use crate::store::KeyValueStore;

/// Key of the id counter.
pub const ID_COUNTER_KEY: &str = "card-id-gen";

/// Prefix shared by every card key.
pub const ID_PREFIX: &str = "card.";

/// A stored card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
	/// Storage key.
	pub id: String,
	/// Barcode symbology.
	pub format: String,
	/// Barcode payload.
	#[serde(rename = "rawValue")]
	pub raw_value: String,
	/// User-chosen name.
	#[serde(default)]
	pub name: String,
	/// Index into [`CARD_COLORS`].
	#[serde(default)]
	pub color: usize,
}

impl Card {
	/// Creates an unnamed card for `barcode`.
	pub fn from_barcode(id: impl Into<String>, barcode: &Barcode) -> Self {
		Self {
			id: id.into(),
			format: barcode.format.clone(),
			raw_value: barcode.raw_value.clone(),
			name: String::new(),
			color: 0,
		}
	}

	/// Returns the card's barcode.
	pub fn barcode(&self) -> Barcode {
		Barcode::new(self.format.clone(), self.raw_value.clone())
	}

	/// Returns the card's colour, falling back to the first palette entry.
	pub fn color_entry(&self) -> &'static CardColor {
		card_color(self.color).unwrap_or(&CARD_COLORS[0])
	}

	fn id_number(&self) -> Option<u64> {
		self.id.strip_prefix(ID_PREFIX)?.parse().ok()
	}
}

/// The payload as displayed: linear formats get a `#` prefix.
///
/// # Example
///
/// ```
/// use cardkeep_cards::{Barcode, Card, format_raw_value};
///
/// let card = Card::from_barcode("card.1", &Barcode::new("upc_a", "036000291452"));
/// assert_eq!(format_raw_value(&card), "#036000291452");
/// ```
pub fn format_raw_value(card: &Card) -> String {
	if is_linear_format(&card.format) {
		format!("#{}", card.raw_value)
	} else {
		card.raw_value.clone()
	}
}

/// Cards persisted in a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CardStore<S> {
	store: S,
}

impl<S: KeyValueStore> CardStore<S> {
	/// Wraps `store`.
	pub fn new(store: S) -> Self {
		Self { store }
	}

	/// Returns the underlying store.
	pub fn store(&self) -> &S {
		&self.store
	}

	/// Loads every card, ordered by id number.
	///
	/// # Errors
	///
	/// [`CardError::Json`] when any record is corrupt.
	pub fn get_cards(&self) -> CardResult<Vec<Card>> {
		let mut cards = self
			.store
			.keys()
			.into_iter()
			.filter(|key| key.starts_with(ID_PREFIX))
			.map(|key| self.load(&key))
			.collect::<CardResult<Vec<_>>>()?;
		cards.sort_by_key(|card| (card.id_number().unwrap_or(u64::MAX), card.id.clone()));
		Ok(cards)
	}

	/// Loads the card stored under `id`.
	///
	/// The returned card always carries `id`, whatever the record says.
	pub fn load(&self, id: &str) -> CardResult<Card> {
		let record = self
			.store
			.get(id)
			.ok_or_else(|| CardError::NotFound(id.to_string()))?;
		let mut card: Card = serde_json::from_str(&record)?;
		card.id = id.to_string();
		Ok(card)
	}

	/// Creates an unsaved card for `barcode` with a fresh id.
	pub fn create(&self, barcode: &Barcode) -> CardResult<Card> {
		let id = self.next_id()?;
		tracing::debug!(%id, format = %barcode.format, "created card");
		Ok(Card::from_barcode(id, barcode))
	}

	/// Saves `card` under its id.
	pub fn save(&self, card: &Card) -> CardResult<()> {
		let record = serde_json::to_string(card)?;
		self.store.set(&card.id, record);
		tracing::debug!(id = %card.id, "saved card");
		Ok(())
	}

	/// Deletes the card stored under `id`. Deleting a missing card does nothing.
	pub fn delete(&self, id: &str) {
		self.store.remove(id);
		tracing::debug!(id, "deleted card");
	}

	fn next_id(&self) -> CardResult<String> {
		let stored = self.store.get(ID_COUNTER_KEY);
		let corrupt = |value: &str| CardError::Counter {
			key: ID_COUNTER_KEY,
			value: value.to_string(),
		};
		let next = match stored.as_deref() {
			Some(value) => value
				.trim()
				.parse::<u64>()
				.ok()
				.and_then(|last| last.checked_add(1))
				.ok_or_else(|| corrupt(value))?,
			None => 1,
		};
		self.store.set(ID_COUNTER_KEY, next.to_string());
		Ok(format!("{ID_PREFIX}{next}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::store::MemoryStore;
	use rstest::{fixture, rstest};

	#[fixture]
	fn cards() -> CardStore<MemoryStore> {
		CardStore::new(MemoryStore::new())
	}

	fn qr(value: &str) -> Barcode {
		Barcode::new("qr_code", value)
	}

	#[rstest]
	fn test_create_allocates_sequential_ids(cards: CardStore<MemoryStore>) {
		let first = cards.create(&qr("a")).unwrap();
		let second = cards.create(&qr("b")).unwrap();

		assert_eq!(first.id, "card.1");
		assert_eq!(second.id, "card.2");
		assert_eq!(cards.store().get(ID_COUNTER_KEY).as_deref(), Some("2"));
	}

	#[rstest]
	fn test_create_does_not_save(cards: CardStore<MemoryStore>) {
		cards.create(&qr("a")).unwrap();

		assert!(cards.get_cards().unwrap().is_empty());
	}

	#[rstest]
	fn test_save_load_round_trip(cards: CardStore<MemoryStore>) {
		let mut card = cards.create(&qr("member-42")).unwrap();
		card.name = "Gym".to_string();
		card.color = 4;

		cards.save(&card).unwrap();

		assert_eq!(cards.load(&card.id).unwrap(), card);
	}

	#[rstest]
	fn test_load_reads_original_record_shape(cards: CardStore<MemoryStore>) {
		cards.store().set(
			"card.7",
			r#"{"format":"ean_8","rawValue":"96385074","name":"Shop","color":2,"id":"card.7"}"#
				.to_string(),
		);

		let card = cards.load("card.7").unwrap();

		assert_eq!(card.raw_value, "96385074");
		assert_eq!(card.color_entry().name, "Pink");
	}

	#[rstest]
	fn test_get_cards_orders_numerically(cards: CardStore<MemoryStore>) {
		for _ in 0..10 {
			let card = cards.create(&qr("x")).unwrap();
			cards.save(&card).unwrap();
		}

		let ids: Vec<String> = cards.get_cards().unwrap().into_iter().map(|c| c.id).collect();

		assert_eq!(ids.first().map(String::as_str), Some("card.1"));
		assert_eq!(ids.last().map(String::as_str), Some("card.10"));
	}

	#[rstest]
	fn test_delete_keeps_counter(cards: CardStore<MemoryStore>) {
		let card = cards.create(&qr("a")).unwrap();
		cards.save(&card).unwrap();

		cards.delete(&card.id);
		let next = cards.create(&qr("b")).unwrap();

		assert!(matches!(cards.load(&card.id), Err(CardError::NotFound(_))));
		assert_eq!(next.id, "card.2");
	}

	#[rstest]
	fn test_corrupt_record(cards: CardStore<MemoryStore>) {
		cards.store().set("card.1", "not json".to_string());

		assert!(matches!(cards.get_cards(), Err(CardError::Json(_))));
	}

	#[rstest]
	fn test_corrupt_counter(cards: CardStore<MemoryStore>) {
		cards.store().set(ID_COUNTER_KEY, "NaN".to_string());

		assert!(matches!(
			cards.create(&qr("a")),
			Err(CardError::Counter { .. })
		));
	}

	#[rstest]
	fn test_exhausted_counter(cards: CardStore<MemoryStore>) {
		cards.store().set(ID_COUNTER_KEY, u64::MAX.to_string());

		assert!(matches!(
			cards.create(&qr("a")),
			Err(CardError::Counter { .. })
		));
		assert_eq!(
			cards.store().get(ID_COUNTER_KEY),
			Some(u64::MAX.to_string())
		);
	}

	#[rstest]
	#[case("code_39", "ABC", "#ABC")]
	#[case("qr_code", "https://example.com", "https://example.com")]
	fn test_format_raw_value(#[case] format: &str, #[case] raw: &str, #[case] shown: &str) {
		let card = Card::from_barcode("card.1", &Barcode::new(format, raw));

		assert_eq!(format_raw_value(&card), shown);
	}

	#[rstest]
	fn test_color_entry_falls_back_to_first() {
		let mut card = Card::from_barcode("card.1", &qr("a"));
		card.color = 99;

		assert_eq!(card.color_entry().name, "Blue");
	}
}
