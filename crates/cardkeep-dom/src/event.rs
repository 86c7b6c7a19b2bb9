//! DOM events
//!
//! Listeners are registered per node and event type. [`Node::dispatch_event`]
//! walks from the target up through its ancestors, invoking matching
//! listeners on each node in registration order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::node::Node;

/// A shared listener callback.
pub type EventHandler = Rc<dyn Fn(Event)>;

static LISTENER_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identifies a registered listener for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
	fn next() -> Self {
		Self(LISTENER_COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

/// Options controlling how a listener is registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
	/// Remove the listener after its first invocation.
	pub once: bool,
}

impl ListenerOptions {
	/// Options for a listener that fires at most once.
	pub fn once() -> Self {
		Self { once: true }
	}
}

pub(crate) struct Listener {
	pub(crate) id: ListenerId,
	pub(crate) event_type: String,
	pub(crate) handler: EventHandler,
	pub(crate) once: bool,
}

struct EventInner {
	event_type: String,
	target: Node,
	current_target: RefCell<Option<Node>>,
	propagation_stopped: Cell<bool>,
	default_prevented: Cell<bool>,
}

/// An event being dispatched. Cloning shares the same event.
#[derive(Clone)]
pub struct Event(Rc<EventInner>);

impl Event {
	/// Creates an event of `event_type` targeting `target`.
	pub fn new(event_type: &str, target: Node) -> Self {
		Self(Rc::new(EventInner {
			event_type: event_type.to_string(),
			target,
			current_target: RefCell::new(None),
			propagation_stopped: Cell::new(false),
			default_prevented: Cell::new(false),
		}))
	}

	/// Returns the event type, e.g. `"click"`.
	pub fn event_type(&self) -> &str {
		&self.0.event_type
	}

	/// Returns the node the event was dispatched on.
	pub fn target(&self) -> Node {
		self.0.target.clone()
	}

	/// Returns the node whose listeners are currently running.
	pub fn current_target(&self) -> Option<Node> {
		self.0.current_target.borrow().clone()
	}

	/// Stops the event from bubbling past the current node.
	pub fn stop_propagation(&self) {
		self.0.propagation_stopped.set(true);
	}

	/// Returns whether [`Event::stop_propagation`] was called.
	pub fn is_propagation_stopped(&self) -> bool {
		self.0.propagation_stopped.get()
	}

	/// Marks the event's default action as cancelled.
	pub fn prevent_default(&self) {
		self.0.default_prevented.set(true);
	}

	/// Returns whether [`Event::prevent_default`] was called.
	pub fn default_prevented(&self) -> bool {
		self.0.default_prevented.get()
	}

	fn set_current_target(&self, node: Option<&Node>) {
		*self.0.current_target.borrow_mut() = node.cloned();
	}
}

impl std::fmt::Debug for Event {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Event")
			.field("type", &self.0.event_type)
			.field("target", &self.0.target)
			.finish()
	}
}

impl Node {
	/// Registers `handler` for events of `event_type` on this node.
	pub fn add_event_listener(
		&self,
		event_type: &str,
		handler: EventHandler,
		options: ListenerOptions,
	) -> ListenerId {
		let id = ListenerId::next();
		self.0.listeners.borrow_mut().push(Listener {
			id,
			event_type: event_type.to_string(),
			handler,
			once: options.once,
		});
		id
	}

	/// Removes a listener. Returns `false` if it was not registered here.
	pub fn remove_event_listener(&self, id: ListenerId) -> bool {
		let mut listeners = self.0.listeners.borrow_mut();
		let before = listeners.len();
		listeners.retain(|listener| listener.id != id);
		listeners.len() != before
	}

	/// Returns the number of listeners registered for `event_type`.
	pub fn listener_count(&self, event_type: &str) -> usize {
		self.0
			.listeners
			.borrow()
			.iter()
			.filter(|listener| listener.event_type == event_type)
			.count()
	}

	/// Dispatches a bubbling event of `event_type` from this node.
	///
	/// `once` listeners are unregistered before they run, so a handler that
	/// re-dispatches the same event never observes itself twice.
	pub fn dispatch_event(&self, event_type: &str) -> Event {
		let event = Event::new(event_type, self.clone());
		let mut current = Some(self.clone());
		while let Some(node) = current {
			event.set_current_target(Some(&node));
			let handlers: Vec<EventHandler> = {
				let mut listeners = node.0.listeners.borrow_mut();
				let handlers = listeners
					.iter()
					.filter(|listener| listener.event_type == event_type)
					.map(|listener| listener.handler.clone())
					.collect();
				listeners.retain(|listener| !(listener.once && listener.event_type == event_type));
				handlers
			};
			for handler in handlers {
				handler(event.clone());
			}
			if event.is_propagation_stopped() {
				break;
			}
			current = node.parent_node();
		}
		event.set_current_target(None);
		event
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &str) -> EventHandler {
		let log = log.clone();
		let label = label.to_string();
		Rc::new(move |event: Event| {
			let current = event
				.current_target()
				.map(|n| n.tag_name().to_string())
				.unwrap_or_default();
			log.borrow_mut().push(format!("{label}@{current}"));
		})
	}

	#[rstest]
	fn test_event_bubbles_to_ancestors() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let list = Node::element("ul");
		let item = Node::element("li");
		list.append_child(&item).unwrap();
		list.add_event_listener("click", recorder(&log, "list"), ListenerOptions::default());
		item.add_event_listener("click", recorder(&log, "item"), ListenerOptions::default());

		let event = item.dispatch_event("click");

		assert_eq!(*log.borrow(), vec!["item@li", "list@ul"]);
		assert!(event.target().ptr_eq(&item));
		assert!(event.current_target().is_none());
	}

	#[rstest]
	fn test_stop_propagation() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let outer = Node::element("div");
		let button = Node::element("button");
		outer.append_child(&button).unwrap();
		outer.add_event_listener("click", recorder(&log, "outer"), ListenerOptions::default());
		button.add_event_listener(
			"click",
			Rc::new(|event: Event| event.stop_propagation()),
			ListenerOptions::default(),
		);

		button.dispatch_event("click");

		assert!(log.borrow().is_empty());
	}

	#[rstest]
	fn test_once_listener_runs_once() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let button = Node::element("button");
		button.add_event_listener("click", recorder(&log, "b"), ListenerOptions::once());

		button.dispatch_event("click");
		button.dispatch_event("click");

		assert_eq!(log.borrow().len(), 1);
		assert_eq!(button.listener_count("click"), 0);
	}

	#[rstest]
	fn test_remove_event_listener() {
		let log = Rc::new(RefCell::new(Vec::new()));
		let button = Node::element("button");
		let id = button.add_event_listener("click", recorder(&log, "b"), ListenerOptions::default());

		assert!(button.remove_event_listener(id));
		assert!(!button.remove_event_listener(id));
		button.dispatch_event("click");

		assert!(log.borrow().is_empty());
	}

	#[rstest]
	fn test_listeners_not_cloned() {
		let button = Node::element("button");
		button.add_event_listener("click", Rc::new(|_| {}), ListenerOptions::default());

		let copy = button.clone_node(true);

		assert_eq!(copy.listener_count("click"), 0);
	}
}
