//! # Card Keeper
//!
//! Templating, reactivity and screen sequencing for a card-wallet app.
//!
//! This facade re-exports the workspace crates behind feature flags:
//!
//! - [`dom`]: the in-process DOM the templates render into (always on)
//! - [`reactive`]: signals, effects and the local task executor
//! - [`pages`]: `html!` templates, mounting and the transition machine
//! - [`cards`]: card records, persistence and barcode collaborators
//!
//! ## Feature Flags
//!
//! - `reactive` - Signal core
//! - `pages` - Template engine (implies `reactive`)
//! - `cards` - Card storage
//! - `full` (default) - Everything
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use cardkeep::prelude::*;
//!
//! async fn home(cards: &CardStore<MemoryStore>, machine: &Machine<Screen>) -> PagesResult<Screen> {
//!     let list: Vec<Node> = cards
//!         .get_cards()
//!         .unwrap_or_default()
//!         .iter()
//!         .map(|card| html!("<li>", card.name.clone(), "</li>"))
//!         .collect::<PagesResult<_>>()?;
//!     mount(html!(
//!         "<ul>", list, "</ul><button ",
//!         on("click", machine.transition_with("add", |_| Screen::Add)), ">Add</button>"
//!     )?, Some("home"))?;
//!     Ok(machine.state(["add"], vec![]).await)
//! }
//! ```

pub mod dom;
#[cfg(feature = "reactive")]
pub mod reactive;
#[cfg(feature = "pages")]
pub mod pages;
#[cfg(feature = "cards")]
pub mod cards;

#[cfg(feature = "pages")]
pub use cardkeep_pages::html;

/// Commonly used items.
pub mod prelude {
	pub use crate::dom::{Document, Event, ListenerOptions, Node, document, set_document};

	#[cfg(feature = "reactive")]
	pub use crate::reactive::{
		Effect, ReadSignal, Signal, WriteSignal, block_on, run_microtasks, run_until_stalled,
		signal, spawn_local, untrack, use_effect, use_later,
	};

	#[cfg(feature = "pages")]
	pub use crate::pages::{
		Callback, Expression, IntoExpression, Machine, Mount, NodeRef, PagesError, PagesResult,
		PagesSettings, Step, TemplateExpression, apply_expression, attr, live, mount, node_ref,
		on, on_with, save,
	};
	#[cfg(feature = "pages")]
	pub use crate::html;

	#[cfg(feature = "cards")]
	pub use crate::cards::{
		Barcode, BarcodeDetector, BarcodeEncoder, Bitmap, CARD_COLORS, Card, CardError,
		CardResult, CardStore, KeyValueStore, MemoryStore, format_raw_value,
	};
}
