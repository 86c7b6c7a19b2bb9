//! Reactive Runtime
//!
//! Thread-local state shared by signals and effects:
//!
//! 1. **Observer Stack**: the tracking context of the effect currently running
//! 2. **Pending Updates**: the batch of observers scheduled by signal writes
//! 3. **Microtask Queue**: FIFO callbacks drained by [`run_microtasks`]
//!
//! The first scheduled observer opens a batch and queues a single flush
//! microtask. Later writes merge into that batch until the flush runs.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Unique identifier for reactive nodes (signals and effects)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

/// A re-run callback registered as a signal subscriber
///
/// Two observers with the same id are the same subscriber.
#[derive(Clone)]
pub struct Observer {
	id: NodeId,
	run: Rc<dyn Fn()>,
}

impl Observer {
	/// Creates an observer with a fresh id.
	pub fn new<F>(run: F) -> Self
	where
		F: Fn() + 'static,
	{
		Self::with_id(NodeId::new(), run)
	}

	/// Creates an observer with an existing id.
	pub fn with_id<F>(id: NodeId, run: F) -> Self
	where
		F: Fn() + 'static,
	{
		Self {
			id,
			run: Rc::new(run),
		}
	}

	/// Returns the observer's id.
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Invokes the callback.
	pub fn run(&self) {
		(self.run)();
	}
}

impl fmt::Debug for Observer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Observer").field("id", &self.id).finish()
	}
}

type Microtask = Box<dyn FnOnce()>;

/// Per-thread reactive runtime
pub struct Runtime {
	/// Tracking contexts; `None` entries suspend tracking (see `untrack`)
	observer_stack: RefCell<Vec<Option<Observer>>>,
	/// Observers waiting for the next flush, in scheduling order
	pub(crate) pending_updates: RefCell<Vec<Observer>>,
	/// Whether a flush microtask is queued or running
	pub(crate) update_scheduled: Cell<bool>,
	microtasks: RefCell<VecDeque<Microtask>>,
}

impl Runtime {
	/// Create a new Runtime instance
	pub fn new() -> Self {
		Self {
			observer_stack: RefCell::new(Vec::new()),
			pending_updates: RefCell::new(Vec::new()),
			update_scheduled: Cell::new(false),
			microtasks: RefCell::new(VecDeque::new()),
		}
	}

	/// Get the current tracking context, if any
	pub fn current_observer(&self) -> Option<Observer> {
		self.observer_stack.borrow().last().cloned().flatten()
	}

	/// Push a tracking context (`None` disables tracking)
	pub fn push_observer(&self, observer: Option<Observer>) {
		self.observer_stack.borrow_mut().push(observer);
	}

	/// Pop the innermost tracking context
	pub fn pop_observer(&self) -> Option<Observer> {
		self.observer_stack.borrow_mut().pop().flatten()
	}

	/// Schedule an observer for the next batched flush
	///
	/// An observer already in the batch is not added again. The first
	/// addition to a closed batch queues exactly one flush microtask.
	pub fn schedule_update(&self, observer: Observer) {
		{
			let mut pending = self.pending_updates.borrow_mut();
			if !pending.iter().any(|queued| queued.id == observer.id) {
				pending.push(observer);
			}
		}

		if !self.update_scheduled.get() {
			self.update_scheduled.set(true);
			self.queue_microtask(Box::new(|| with_runtime(|rt| rt.flush_updates())));
		}
	}

	/// Run every pending observer once, in insertion order
	///
	/// Observers scheduled while the flush is running join the same batch.
	pub fn flush_updates(&self) {
		let mut index = 0;
		loop {
			let next = self.pending_updates.borrow().get(index).cloned();
			let Some(observer) = next else {
				break;
			};
			observer.run();
			index += 1;
		}
		self.pending_updates.borrow_mut().clear();
		self.update_scheduled.set(false);
	}

	/// Number of observers waiting in the current batch (for testing)
	pub fn pending_count(&self) -> usize {
		self.pending_updates.borrow().len()
	}

	fn queue_microtask(&self, task: Microtask) {
		self.microtasks.borrow_mut().push_back(task);
	}

	fn next_microtask(&self) -> Option<Microtask> {
		self.microtasks.borrow_mut().pop_front()
	}
}

impl Default for Runtime {
	fn default() -> Self {
		Self::new()
	}
}

// Thread-local runtime instance
thread_local! {
	static RUNTIME: Runtime = Runtime::new();
}

/// Get a reference to the thread's runtime
///
/// # Example
///
/// ```ignore
/// use cardkeep_reactive::runtime::with_runtime;
///
/// let pending = with_runtime(|rt| rt.pending_count());
/// ```
pub fn with_runtime<F, R>(f: F) -> R
where
	F: FnOnce(&Runtime) -> R,
{
	RUNTIME.with(f)
}

/// Queue a callback to run on the next [`run_microtasks`] drain.
pub fn queue_microtask<F>(task: F)
where
	F: FnOnce() + 'static,
{
	with_runtime(|rt| rt.queue_microtask(Box::new(task)));
}

/// Run queued microtasks until the queue is empty.
///
/// Microtasks queued while draining run in the same call. Returns the
/// number of microtasks that ran.
pub fn run_microtasks() -> usize {
	let mut count = 0;
	while let Some(task) = with_runtime(|rt| rt.next_microtask()) {
		task();
		count += 1;
	}
	count
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	fn counting_observer(count: &Rc<Cell<usize>>) -> Observer {
		let count = count.clone();
		Observer::new(move || count.set(count.get() + 1))
	}

	#[rstest]
	#[serial]
	fn test_node_id_uniqueness() {
		let id1 = NodeId::new();
		let id2 = NodeId::new();
		let id3 = NodeId::new();

		assert_ne!(id1, id2);
		assert_ne!(id2, id3);
		assert_ne!(id1, id3);
	}

	#[rstest]
	#[serial]
	fn test_runtime_observer_stack() {
		let runtime = Runtime::new();
		let outer = Observer::new(|| {});
		let inner = Observer::new(|| {});

		assert!(runtime.current_observer().is_none());

		runtime.push_observer(Some(outer.clone()));
		assert_eq!(runtime.current_observer().map(|o| o.id()), Some(outer.id()));

		runtime.push_observer(Some(inner.clone()));
		assert_eq!(runtime.current_observer().map(|o| o.id()), Some(inner.id()));

		runtime.push_observer(None);
		assert!(runtime.current_observer().is_none());

		runtime.pop_observer();
		runtime.pop_observer();
		assert_eq!(runtime.current_observer().map(|o| o.id()), Some(outer.id()));

		runtime.pop_observer();
		assert!(runtime.current_observer().is_none());
	}

	#[rstest]
	#[serial]
	fn test_schedule_update_dedupes_and_queues_one_flush() {
		let count = Rc::new(Cell::new(0));
		let observer = counting_observer(&count);

		with_runtime(|rt| {
			rt.schedule_update(observer.clone());
			rt.schedule_update(observer.clone());
			assert_eq!(rt.pending_count(), 1);
		});

		assert_eq!(run_microtasks(), 1);
		assert_eq!(count.get(), 1);
		assert_eq!(with_runtime(|rt| rt.pending_count()), 0);
	}

	#[rstest]
	#[serial]
	fn test_flush_runs_in_insertion_order() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let make = |label: &'static str| {
			let log = log.clone();
			Observer::new(move || log.borrow_mut().push(label))
		};

		with_runtime(|rt| {
			rt.schedule_update(make("b"));
			rt.schedule_update(make("a"));
			rt.schedule_update(make("c"));
		});
		run_microtasks();

		assert_eq!(*log.borrow(), vec!["b", "a", "c"]);
	}

	#[rstest]
	#[serial]
	fn test_microtasks_queued_while_draining_run() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let inner_log = log.clone();
		let outer_log = log.clone();

		queue_microtask(move || {
			outer_log.borrow_mut().push(1);
			queue_microtask(move || inner_log.borrow_mut().push(2));
		});

		assert_eq!(run_microtasks(), 2);
		assert_eq!(*log.borrow(), vec![1, 2]);
		assert_eq!(run_microtasks(), 0);
	}
}
