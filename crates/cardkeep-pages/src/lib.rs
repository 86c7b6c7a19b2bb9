//! Card Keeper Pages - tagged-template rendering for screen-based apps
//!
//! This crate turns HTML literals with holes into live DOM fragments:
//!
//! - **Compilation**: literal segments are joined with per-process markers,
//!   parsed once, and the marker positions recorded as [`Path`]s
//! - **Rendering**: each render clones the cached template and applies one
//!   [`Expression`] per hole
//! - **Mounting**: screens replace the children of a single container
//! - **Transitions**: a [`Machine`] decides which user actions a screen
//!   currently accepts
//!
//! Live values come from `cardkeep-reactive`: a [`live`] expression re-applies
//! itself whenever a signal it reads changes.
//!
//! ## Example
//!
//! ```ignore
//! use cardkeep_pages::{Machine, html, live, mount, on};
//! use cardkeep_reactive::signal;
//!
//! let (title, set_title) = signal(String::from("Cards"));
//! let machine: Machine<String> = Machine::new();
//!
//! mount(
//!     html!(
//!         "<h1>", live(move || title.get()), "</h1><button ",
//!         on("click", machine.transition("add")), ">Add</button>"
//!     )?,
//!     Some("home"),
//! )?;
//!
//! if machine.state(["add"], vec![]).await == "add" {
//!     set_title.set(String::from("New card"));
//! }
//! ```
//!
//! ## Feature flags
//!
//! - `debug-hooks`: emit `debug_log!` output in debug builds

#![warn(missing_docs)]

pub mod apply;
pub mod callback;
pub mod error;
pub mod expression;
pub mod logging;
pub mod machine;
pub mod marker;
pub mod mount;
pub mod path;
pub mod render;
pub mod settings;
pub mod template;

#[doc(hidden)]
pub mod __private {
	pub use tracing;
}

pub use apply::apply_expression;
pub use callback::{Callback, IntoEventHandler};
pub use error::{PagesError, PagesResult};
pub use expression::{
	Expression, ExpressionFn, IntoExpression, NodeRef, Primitive, TemplateExpression, attr, live,
	node_ref, on, on_with,
};
pub use machine::{Machine, Step};
pub use marker::{marker, marker_base};
pub use mount::{Mount, mount, save};
pub use path::{Path, PathStep, descend_paths, get_path};
pub use render::{render, render_owned, render_with};
pub use settings::PagesSettings;
pub use template::{
	OwnedTemplateStrings, Template, TemplateCache, TemplateStrings, compile, template_for,
	with_template_cache,
};

pub use cardkeep_dom::{Event, ListenerOptions, Node};
