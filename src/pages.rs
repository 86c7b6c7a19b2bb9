//! Template engine
//!
//! `html!` templates, the expression applier, mounting, and the view
//! transition machine.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cardkeep::pages::{Machine, html, mount, on};
//!
//! let machine: Machine<String> = Machine::new();
//! mount(
//!     html!("<button ", on("click", machine.transition("back")), ">Back</button>")?,
//!     Some("details"),
//! )?;
//! let outcome = machine.state(["back"], vec![]).await;
//! ```

pub use cardkeep_pages::*;
