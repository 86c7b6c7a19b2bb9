//! Card Keeper Reactive - Push-based signals and effects
//!
//! A deliberately small reactive core:
//!
//! - [`Signal`]: a cell whose reads, made while an effect runs, subscribe that effect
//! - [`Effect`]: a re-runnable closure that acts as the tracking context
//! - a microtask queue that batches effect re-runs after writes
//! - a single-threaded executor for futures spawned by the template engine
//!
//! ## Propagation model
//!
//! A write that changes a signal's value moves every current subscriber into
//! the pending batch and clears the subscriber list. Effects re-subscribe by
//! reading again when they re-run, so the dependency set always reflects the
//! most recent run. There is no unsubscribe API.
//!
//! ## Example
//!
//! ```ignore
//! use cardkeep_reactive::{run_microtasks, signal, use_effect};
//!
//! let (count, set_count) = signal(0);
//! let _effect = use_effect(move || println!("count = {}", count.get()));
//!
//! set_count.set(1);
//! set_count.set(2);
//! run_microtasks(); // prints "count = 2" once
//! ```

#![warn(missing_docs)]

pub mod effect;
pub mod runtime;
pub mod signal;
pub mod spawn;

pub use effect::{Effect, untrack, use_effect, use_later};
pub use runtime::{NodeId, Observer, queue_microtask, run_microtasks, with_runtime};
pub use signal::{ReadSignal, Signal, WriteSignal, signal};
pub use spawn::{
	block_on, run_until_stalled, spawn_local, spawn_local_fallible, take_unhandled_errors,
};
