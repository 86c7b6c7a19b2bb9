//! Signals and effects
//!
//! Reads inside an effect subscribe it; a changed write re-runs subscribers
//! once per microtask flush.
//!
//! ```rust
//! # #[cfg(feature = "reactive")]
//! # {
//! use cardkeep::reactive::{run_microtasks, signal, use_effect};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let (count, set_count) = signal(0);
//! let seen = Rc::new(Cell::new(0));
//! let _effect = use_effect({
//!     let seen = seen.clone();
//!     move || seen.set(count.get())
//! });
//!
//! set_count.set(2);
//! run_microtasks();
//! assert_eq!(seen.get(), 2);
//! # }
//! ```

pub use cardkeep_reactive::*;
