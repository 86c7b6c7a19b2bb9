//! Local task executor
//!
//! A thread-local `futures` [`LocalPool`] for `!Send` futures such as
//! deferred template expressions and screen flows. Polling the pool and
//! draining the microtask queue alternate in [`run_until_stalled`], so a
//! future woken by a signal flush makes progress in the same call.

use std::cell::RefCell;
use std::fmt::Display;
use std::future::Future;
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;

use crate::runtime::run_microtasks;

thread_local! {
	static POOL: RefCell<LocalPool> = RefCell::new(LocalPool::new());
	static SPAWNER: LocalSpawner = POOL.with(|pool| pool.borrow().spawner());
	static UNHANDLED_ERRORS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Spawn a future on the thread's local executor.
///
/// The future makes progress during [`run_until_stalled`] or [`block_on`].
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	SPAWNER.with(|spawner| {
		if let Err(error) = spawner.spawn_local(future) {
			tracing::error!(%error, "failed to spawn local task");
		}
	});
}

/// Spawn a fallible future; an `Err` is logged and recorded as unhandled.
///
/// Recorded messages are returned by [`take_unhandled_errors`].
pub fn spawn_local_fallible<F, E>(future: F)
where
	F: Future<Output = Result<(), E>> + 'static,
	E: Display + 'static,
{
	spawn_local(async move {
		if let Err(error) = future.await {
			let message = error.to_string();
			tracing::error!(error = %message, "unhandled error in local task");
			UNHANDLED_ERRORS.with(|errors| errors.borrow_mut().push(message));
		}
	});
}

/// Drain and return the messages of failed fallible tasks.
pub fn take_unhandled_errors() -> Vec<String> {
	UNHANDLED_ERRORS.with(|errors| std::mem::take(&mut *errors.borrow_mut()))
}

/// Poll spawned tasks and drain microtasks until neither makes progress.
///
/// Returns `false` without doing anything when called from inside a task
/// that the executor is already polling.
pub fn run_until_stalled() -> bool {
	loop {
		let polled = POOL.with(|pool| match pool.try_borrow_mut() {
			Ok(mut pool) => {
				pool.run_until_stalled();
				true
			}
			Err(_) => false,
		});
		if !polled {
			tracing::warn!("run_until_stalled called re-entrantly; ignoring");
			return false;
		}
		if run_microtasks() == 0 {
			return true;
		}
	}
}

/// Run `future` on the local executor until it completes or stalls.
///
/// Returns `None` when the future cannot make further progress, which on a
/// single thread means nothing left can wake it.
///
/// # Example
///
/// ```ignore
/// let value = block_on(async { 42 });
/// assert_eq!(value, Some(42));
/// ```
pub fn block_on<F>(future: F) -> Option<F::Output>
where
	F: Future + 'static,
{
	let slot = Rc::new(RefCell::new(None));
	let output = slot.clone();
	spawn_local(async move {
		let value = future.await;
		*output.borrow_mut() = Some(value);
	});
	run_until_stalled();
	slot.borrow_mut().take()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::runtime::queue_microtask;
	use futures::channel::oneshot;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[serial]
	fn test_block_on_ready_future() {
		assert_eq!(block_on(async { 7 }), Some(7));
	}

	#[rstest]
	#[serial]
	fn test_block_on_stalled_future_returns_none() {
		let (_tx, rx) = oneshot::channel::<u8>();

		assert_eq!(block_on(rx), None);
	}

	#[rstest]
	#[serial]
	fn test_microtask_wakes_spawned_task() {
		let (tx, rx) = oneshot::channel::<&'static str>();
		let received = Rc::new(RefCell::new(None));
		let received_clone = received.clone();

		spawn_local(async move {
			*received_clone.borrow_mut() = rx.await.ok();
		});
		queue_microtask(move || {
			let _ = tx.send("woken");
		});

		assert!(run_until_stalled());
		assert_eq!(*received.borrow(), Some("woken"));
	}

	#[rstest]
	#[serial]
	fn test_fallible_task_error_is_recorded() {
		spawn_local_fallible(async { Err::<(), _>("card not found") });
		spawn_local_fallible(async { Ok::<(), String>(()) });

		run_until_stalled();

		assert_eq!(take_unhandled_errors(), vec!["card not found".to_string()]);
		assert!(take_unhandled_errors().is_empty());
	}
}
