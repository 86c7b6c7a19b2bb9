//! Key-value persistence
//!
//! Cards are stored as JSON strings under string keys, the way a browser's
//! local storage holds them. [`KeyValueStore`] is the seam; [`MemoryStore`]
//! is the in-process implementation used by the app shell and tests.
//!
//! ## Example
//!
//! ```
//! use cardkeep_cards::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("card-id-gen", "3".to_string());
//!
//! assert_eq!(store.get("card-id-gen").as_deref(), Some("3"));
//! assert_eq!(store.keys(), vec!["card-id-gen".to_string()]);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// A string-keyed store of string values.
pub trait KeyValueStore {
	/// Returns the value stored under `key`.
	fn get(&self, key: &str) -> Option<String>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set(&self, key: &str, value: String);

	/// Removes `key`. Removing a missing key does nothing.
	fn remove(&self, key: &str);

	/// Returns every key.
	fn keys(&self) -> Vec<String>;
}

/// In-memory store
///
/// Clones share the same entries. Keys are kept sorted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	data: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.data.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.data.read().is_empty()
	}

	/// Removes every entry.
	pub fn clear(&self) {
		self.data.write().clear();
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.data.read().get(key).cloned()
	}

	fn set(&self, key: &str, value: String) {
		tracing::trace!(key, "store set");
		self.data.write().insert(key.to_string(), value);
	}

	fn remove(&self, key: &str) {
		tracing::trace!(key, "store remove");
		self.data.write().remove(key);
	}

	fn keys(&self) -> Vec<String> {
		self.data.read().keys().cloned().collect()
	}
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
	fn get(&self, key: &str) -> Option<String> {
		(**self).get(key)
	}

	fn set(&self, key: &str, value: String) {
		(**self).set(key, value)
	}

	fn remove(&self, key: &str) {
		(**self).remove(key)
	}

	fn keys(&self) -> Vec<String> {
		(**self).keys()
	}
}
