//! Callback types and event handler conversion traits.
//!
//! - **Callback<Args, Ret>**: a cloneable wrapper for handlers
//! - **IntoEventHandler**: converts closures and callbacks into DOM [`EventHandler`]s
//!
//! ## Example
//!
//! ```ignore
//! use cardkeep_pages::{Callback, html, on};
//!
//! let handle_click = Callback::new(|_event| {
//!     info_log!("Button clicked!");
//! });
//!
//! let view = html!("<button ", on("click", handle_click), ">Go</button>")?;
//! ```

use std::rc::Rc;

use cardkeep_dom::{Event, EventHandler};

/// A cloneable callback wrapper.
///
/// ## Type Parameters
///
/// - `Args`: the argument type the callback receives (defaults to [`Event`])
/// - `Ret`: the return type of the callback (defaults to `()`)
pub struct Callback<Args = Event, Ret = ()> {
	inner: Rc<dyn Fn(Args) -> Ret + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}

/// Trait for converting handler types to a DOM [`EventHandler`].
///
/// Implemented for closures taking an [`Event`], for [`Callback<Event, ()>`]
/// and for [`EventHandler`] itself.
pub trait IntoEventHandler {
	/// Converts self into an [`EventHandler`].
	fn into_event_handler(self) -> EventHandler;
}

impl<F> IntoEventHandler for F
where
	F: Fn(Event) + 'static,
{
	fn into_event_handler(self) -> EventHandler {
		Rc::new(self)
	}
}

impl IntoEventHandler for Callback<Event, ()> {
	fn into_event_handler(self) -> EventHandler {
		self.inner
	}
}

impl IntoEventHandler for EventHandler {
	fn into_event_handler(self) -> EventHandler {
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use cardkeep_dom::{ListenerOptions, Node};
	use std::cell::{Cell, RefCell};

	fn recorder() -> (Rc<RefCell<Vec<String>>>, Callback<Event, ()>) {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let callback = Callback::new({
			let seen = seen.clone();
			move |event: Event| {
				let id = event.target().get_attribute("id").unwrap_or_default();
				seen.borrow_mut().push(id);
			}
		});
		(seen, callback)
	}

	fn button(id: &str) -> Node {
		let button = Node::element("button");
		button.set_attribute("id", id).unwrap();
		button
	}

	#[test]
	fn test_clones_share_captured_state() {
		let (seen, callback) = recorder();
		let save = button("save");
		let delete = button("delete");

		let options = ListenerOptions::default();
		save.add_event_listener("click", callback.clone().into_event_handler(), options);
		delete.add_event_listener("click", callback.into_event_handler(), options);
		save.dispatch_event("click");
		delete.dispatch_event("click");

		assert_eq!(*seen.borrow(), vec!["save".to_string(), "delete".to_string()]);
	}

	#[test]
	fn test_callback_sees_bubbled_event_target() {
		let (seen, callback) = recorder();
		let list = Node::element("ul");
		let item = button("card.3");
		list.append_child(&item).unwrap();

		list.add_event_listener("click", callback.into_event_handler(), ListenerOptions::default());
		item.dispatch_event("click");

		assert_eq!(*seen.borrow(), vec!["card.3".to_string()]);
	}

	#[test]
	fn test_callback_called_directly_returns_value() {
		let callback: Callback<Event, bool> =
			Callback::new(|event: Event| event.event_type() == "click");

		assert!(callback.call(Event::new("click", Node::element("a"))));
		assert!(!callback.call(Event::new("focus", Node::element("a"))));
	}

	#[test]
	fn test_closure_handler_with_once() {
		let clicks = Rc::new(Cell::new(0));
		let handler = {
			let clicks = clicks.clone();
			move |_: Event| clicks.set(clicks.get() + 1)
		};
		let add = button("add");

		add.add_event_listener("click", handler.into_event_handler(), ListenerOptions::once());
		add.dispatch_event("click");
		add.dispatch_event("click");

		assert_eq!(clicks.get(), 1);
		assert_eq!(add.listener_count("click"), 0);
	}
}
