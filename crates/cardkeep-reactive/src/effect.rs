//! Effect - Tracking Contexts
//!
//! An [`Effect`] wraps a closure. Running it pushes the effect onto the
//! observer stack, so every signal read during the run subscribes the
//! effect. When such a signal changes, the effect is re-run on the next
//! batched flush.
//!
//! ## Example
//!
//! ```ignore
//! use cardkeep_reactive::{Signal, run_microtasks, use_effect};
//!
//! let name = Signal::new("Library card".to_string());
//! let reader = name.clone();
//! let _effect = use_effect(move || println!("{}", reader.get()));
//!
//! name.set("Gym card".to_string());
//! run_microtasks();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::{NodeId, Observer, with_runtime};

type EffectFn = Box<dyn FnMut() + 'static>;

struct EffectInner {
	id: NodeId,
	f: RefCell<EffectFn>,
}

/// A re-runnable tracking context
///
/// Clones refer to the same effect.
#[derive(Clone)]
pub struct Effect(Rc<EffectInner>);

impl Effect {
	/// Create an effect without running it
	pub fn new<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		Self(Rc::new(EffectInner {
			id: NodeId::new(),
			f: RefCell::new(Box::new(f)),
		}))
	}

	/// Run the effect as the active tracking context
	///
	/// The previous context is restored afterwards. A re-entrant run of the
	/// same effect (from inside its own closure) is skipped.
	pub fn run(&self) {
		let Ok(mut f) = self.0.f.try_borrow_mut() else {
			tracing::trace!(effect = ?self.0.id, "skipping re-entrant effect run");
			return;
		};
		with_runtime(|rt| rt.push_observer(Some(self.observer())));
		(*f)();
		with_runtime(|rt| rt.pop_observer());
	}

	/// Get the NodeId of this effect
	pub fn id(&self) -> NodeId {
		self.0.id
	}

	fn observer(&self) -> Observer {
		let this = self.clone();
		Observer::with_id(self.0.id, move || this.run())
	}
}

impl std::fmt::Debug for Effect {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Effect").field("id", &self.0.id).finish()
	}
}

/// Create an effect and run it immediately.
pub fn use_effect<F>(f: F) -> Effect
where
	F: FnMut() + 'static,
{
	let effect = Effect::new(f);
	effect.run();
	effect
}

/// Create an effect that first runs when [`Effect::run`] is called.
///
/// Useful when the effect needs something that does not exist yet, such as
/// the DOM node it will update.
pub fn use_later<F>(f: F) -> Effect
where
	F: FnMut() + 'static,
{
	Effect::new(f)
}

/// Run `f` with tracking suspended.
pub fn untrack<R, F>(f: F) -> R
where
	F: FnOnce() -> R,
{
	with_runtime(|rt| rt.push_observer(None));
	let result = f();
	with_runtime(|rt| rt.pop_observer());
	result
}
