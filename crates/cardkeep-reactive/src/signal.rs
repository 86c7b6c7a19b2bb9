//! Signal - Push-based Reactive Cell
//!
//! `Signal<T>` holds a value and the set of observers that read it.
//!
//! ## Key Features
//!
//! - **Implicit Subscription**: `get()` inside an effect subscribes that effect.
//! - **Change Detection**: `set()` is a no-op when the new value equals the old one.
//! - **One-shot Subscribers**: a change schedules every subscriber once and then
//!   forgets them; effects re-subscribe on their next run.
//!
//! ## Example
//!
//! ```ignore
//! use cardkeep_reactive::Signal;
//!
//! let count = Signal::new(0);
//! count.set(42);
//! assert_eq!(count.get_untracked(), 42);
//! count.update(|n| *n += 1);
//! assert_eq!(count.get_untracked(), 43);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::runtime::{NodeId, Observer, with_runtime};

struct SignalInner<T> {
	value: RefCell<T>,
	subscribers: RefCell<Vec<Observer>>,
}

/// A reactive cell that can be read and written
///
/// Clones share the same value and subscriber set.
pub struct Signal<T: 'static> {
	id: NodeId,
	inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			inner: self.inner.clone(),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			inner: Rc::new(SignalInner {
				value: RefCell::new(value),
				subscribers: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Get the current value, subscribing the active tracking context
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.track();
		self.get_untracked()
	}

	/// Get the current value without subscribing
	pub fn get_untracked(&self) -> T
	where
		T: Clone,
	{
		self.inner.value.borrow().clone()
	}

	/// Borrow the current value, subscribing the active tracking context
	///
	/// # Example
	///
	/// ```ignore
	/// let name = Signal::new(String::from("Library"));
	/// let len = name.with(|s| s.len());
	/// ```
	pub fn with<R, F>(&self, f: F) -> R
	where
		F: FnOnce(&T) -> R,
	{
		self.track();
		f(&self.inner.value.borrow())
	}

	/// Set the signal to a new value
	///
	/// Nothing is scheduled when `value` equals the current value.
	pub fn set(&self, value: T)
	where
		T: PartialEq,
	{
		if *self.inner.value.borrow() == value {
			return;
		}
		*self.inner.value.borrow_mut() = value;
		self.notify();
	}

	/// Mutate the value in place and notify subscribers unconditionally
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		f(&mut self.inner.value.borrow_mut());
		self.notify();
	}

	/// Get the NodeId of this signal
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Number of observers currently subscribed (for testing)
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}

	/// Returns a read-only handle sharing this signal.
	pub fn read_only(&self) -> ReadSignal<T> {
		ReadSignal(self.clone())
	}

	/// Returns a write-only handle sharing this signal.
	pub fn write_only(&self) -> WriteSignal<T> {
		WriteSignal(self.clone())
	}

	fn track(&self) {
		let Some(observer) = with_runtime(|rt| rt.current_observer()) else {
			return;
		};
		let mut subscribers = self.inner.subscribers.borrow_mut();
		if !subscribers.iter().any(|s| s.id() == observer.id()) {
			subscribers.push(observer);
		}
	}

	fn notify(&self) {
		let subscribers = std::mem::take(&mut *self.inner.subscribers.borrow_mut());
		with_runtime(|rt| {
			for subscriber in subscribers {
				rt.schedule_update(subscriber);
			}
		});
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &*self.inner.value.borrow())
			.finish()
	}
}

/// The reading half returned by [`signal`].
pub struct ReadSignal<T: 'static>(Signal<T>);

impl<T: 'static> Clone for ReadSignal<T> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<T: 'static> ReadSignal<T> {
	/// See [`Signal::get`].
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.0.get()
	}

	/// See [`Signal::get_untracked`].
	pub fn get_untracked(&self) -> T
	where
		T: Clone,
	{
		self.0.get_untracked()
	}

	/// See [`Signal::with`].
	pub fn with<R, F>(&self, f: F) -> R
	where
		F: FnOnce(&T) -> R,
	{
		self.0.with(f)
	}
}

/// The writing half returned by [`signal`].
pub struct WriteSignal<T: 'static>(Signal<T>);

impl<T: 'static> Clone for WriteSignal<T> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}

impl<T: 'static> WriteSignal<T> {
	/// See [`Signal::set`].
	pub fn set(&self, value: T)
	where
		T: PartialEq,
	{
		self.0.set(value);
	}

	/// See [`Signal::update`].
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
	{
		self.0.update(f);
	}
}

/// Creates a signal split into its reading and writing halves.
pub fn signal<T: 'static>(initial: T) -> (ReadSignal<T>, WriteSignal<T>) {
	let signal = Signal::new(initial);
	(signal.read_only(), signal.write_only())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::runtime::run_microtasks;
	use rstest::rstest;
	use serial_test::serial;
	use std::cell::Cell;

	fn with_observer<R>(observer: &Observer, f: impl FnOnce() -> R) -> R {
		with_runtime(|rt| rt.push_observer(Some(observer.clone())));
		let result = f();
		with_runtime(|rt| rt.pop_observer());
		result
	}

	#[rstest]
	#[serial]
	fn test_signal_set_and_update() {
		let signal = Signal::new(0);

		signal.set(100);
		assert_eq!(signal.get_untracked(), 100);

		signal.update(|n| *n *= 2);
		assert_eq!(signal.get_untracked(), 200);
	}

	#[rstest]
	#[serial]
	fn test_signal_clone_shares_value() {
		let signal1 = Signal::new(42);
		let signal2 = signal1.clone();

		signal1.set(100);

		assert_eq!(signal2.get_untracked(), 100);
		assert_eq!(signal1.id(), signal2.id());
	}

	#[rstest]
	#[serial]
	fn test_get_without_context_does_not_subscribe() {
		let signal = Signal::new(1);

		let _ = signal.get();

		assert_eq!(signal.subscriber_count(), 0);
	}

	#[rstest]
	#[serial]
	fn test_repeated_reads_subscribe_once() {
		let signal = Signal::new(1);
		let observer = Observer::new(|| {});

		with_observer(&observer, || {
			let _ = signal.get();
			let _ = signal.get();
			signal.with(|_| ());
		});

		assert_eq!(signal.subscriber_count(), 1);
	}

	#[rstest]
	#[serial]
	fn test_equal_write_schedules_nothing() {
		let runs = Rc::new(Cell::new(0));
		let runs_clone = runs.clone();
		let signal = Signal::new(String::from("same"));
		let observer = Observer::new(move || runs_clone.set(runs_clone.get() + 1));
		with_observer(&observer, || signal.get());

		signal.set(String::from("same"));

		assert_eq!(with_runtime(|rt| rt.pending_count()), 0);
		assert_eq!(run_microtasks(), 0);
		assert_eq!(runs.get(), 0);
		assert_eq!(signal.subscriber_count(), 1);
	}

	#[rstest]
	#[serial]
	fn test_changed_write_schedules_once_and_clears_subscribers() {
		let runs = Rc::new(Cell::new(0));
		let runs_clone = runs.clone();
		let signal = Signal::new(0);
		let observer = Observer::new(move || runs_clone.set(runs_clone.get() + 1));
		with_observer(&observer, || {
			signal.get();
			signal.get();
		});

		signal.set(1);
		signal.set(2);

		assert_eq!(signal.subscriber_count(), 0);
		assert_eq!(with_runtime(|rt| rt.pending_count()), 1);
		run_microtasks();
		assert_eq!(runs.get(), 1);
	}

	#[rstest]
	#[serial]
	fn test_split_signal_halves() {
		let (read, write) = signal(String::from("a"));

		write.set(String::from("b"));
		write.update(|s| s.push('c'));

		assert_eq!(read.get_untracked(), "bc");
		assert_eq!(read.with(|s| s.len()), 2);
	}
}
