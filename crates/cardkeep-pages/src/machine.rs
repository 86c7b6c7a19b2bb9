//! View transition machine
//!
//! A screen arms the transitions it currently accepts with
//! [`Machine::state`] and awaits the returned future. Callbacks made by
//! [`Machine::transition`] resolve that future when their name is armed and
//! do nothing otherwise, so listeners left over from an earlier state are
//! inert.
//!
//! ## Example
//!
//! ```ignore
//! use cardkeep_pages::{Machine, html, mount, on};
//!
//! let machine: Machine<String> = Machine::new();
//! mount(html!(
//!     "<button ", on("click", machine.transition("save")), ">Save</button><button ",
//!     on("click", machine.transition("cancel")), ">Cancel</button>"
//! )?, Some("edit"))?;
//!
//! match machine.state(["save", "cancel"], vec![]).await.as_str() {
//!     "save" => { /* ... */ }
//!     _ => { /* ... */ }
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use cardkeep_dom::Event;
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture, select_all};

use crate::callback::Callback;

/// What a transition handler asks the machine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
	/// Resolve the pending state with this value.
	Resolve(T),
	/// Stay in the current state.
	Skip,
}

impl<T> From<T> for Step<T> {
	fn from(value: T) -> Self {
		Self::Resolve(value)
	}
}

struct MachineInner<T> {
	armed: RefCell<HashSet<String>>,
	pending: RefCell<Option<oneshot::Sender<T>>>,
	generation: Cell<u64>,
}

/// Coordinates which named transitions a screen accepts.
///
/// Clones share state.
pub struct Machine<T> {
	inner: Rc<MachineInner<T>>,
}

impl<T> Clone for Machine<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T> Default for Machine<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for Machine<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Machine")
			.field("armed", &self.inner.armed.borrow())
			.field("pending", &self.inner.pending.borrow().is_some())
			.finish()
	}
}

impl<T> Machine<T> {
	/// Creates a machine with nothing armed.
	pub fn new() -> Self {
		Self {
			inner: Rc::new(MachineInner {
				armed: RefCell::new(HashSet::new()),
				pending: RefCell::new(None),
				generation: Cell::new(0),
			}),
		}
	}

	/// Returns `true` when `name` is armed and its state is still pending.
	pub fn is_armed(&self, name: &str) -> bool {
		self.inner.pending.borrow().is_some() && self.inner.armed.borrow().contains(name)
	}

	/// Returns the armed names, sorted.
	pub fn armed(&self) -> Vec<String> {
		let mut names: Vec<String> = self.inner.armed.borrow().iter().cloned().collect();
		names.sort();
		names
	}

	/// Resolves the pending state with `value` if `name` is armed.
	///
	/// Returns `true` when this call resolved the state.
	pub fn fire(&self, name: &str, value: T) -> bool {
		if !self.is_armed(name) {
			crate::debug_log!("Transition {:?} is not armed", name);
			return false;
		}
		let Some(sender) = self.inner.pending.borrow_mut().take() else {
			return false;
		};
		if sender.send(value).is_err() {
			crate::debug_log!("Transition {:?} fired after its state was dropped", name);
			return false;
		}
		true
	}

	/// A callback that resolves with `handler`'s result when `name` is armed.
	///
	/// Returning [`Step::Skip`] from `handler` leaves the state pending.
	pub fn transition_with<F, R>(&self, name: impl Into<String>, handler: F) -> Callback<Event, ()>
	where
		T: 'static,
		F: Fn(Event) -> R + 'static,
		R: Into<Step<T>>,
	{
		let machine = self.clone();
		let name = name.into();
		Callback::new(move |event: Event| {
			if !machine.is_armed(&name) {
				crate::debug_log!("Ignoring {:?}: transition is not armed", name);
				return;
			}
			match handler(event).into() {
				Step::Resolve(value) => {
					machine.fire(&name, value);
				}
				Step::Skip => crate::debug_log!("Transition {:?} skipped", name),
			}
		})
	}

	/// A callback that resolves with the transition's own name.
	pub fn transition(&self, name: &'static str) -> Callback<Event, ()>
	where
		T: From<&'static str> + 'static,
	{
		self.transition_with(name, move |_| T::from(name))
	}

	/// Arms `names` and races their transitions against `extras`.
	///
	/// The names are armed as soon as this is called. Whichever settles
	/// first wins; afterwards nothing is armed until the next call, and
	/// losing extras are dropped. Calling `state` again before the race ends
	/// re-arms the machine and leaves the earlier future to the extras
	/// alone.
	pub fn state<I, S>(
		&self,
		names: I,
		extras: Vec<LocalBoxFuture<'static, T>>,
	) -> LocalBoxFuture<'static, T>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
		T: 'static,
	{
		let (sender, receiver) = oneshot::channel();
		*self.inner.armed.borrow_mut() = names.into_iter().map(Into::into).collect();
		*self.inner.pending.borrow_mut() = Some(sender);
		let generation = self.inner.generation.get().wrapping_add(1);
		self.inner.generation.set(generation);

		let mut racers: Vec<LocalBoxFuture<'static, Option<T>>> = Vec::with_capacity(extras.len() + 1);
		racers.push(receiver.map(Result::ok).boxed_local());
		racers.extend(extras.into_iter().map(|extra| extra.map(Some).boxed_local()));

		let inner = Rc::clone(&self.inner);
		async move {
			let value = loop {
				if racers.is_empty() {
					break future::pending::<T>().await;
				}
				let (outcome, _, rest) = select_all(racers).await;
				match outcome {
					Some(value) => break value,
					None => racers = rest,
				}
			};
			if inner.generation.get() == generation {
				inner.armed.borrow_mut().clear();
				inner.pending.borrow_mut().take();
			}
			value
		}
		.boxed_local()
	}
}
