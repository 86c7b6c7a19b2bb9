//! In-process DOM
//!
//! Node tree, events, HTML parsing and serialization, and the per-thread
//! document the renderer mounts into.
//!
//! ```rust
//! use cardkeep::dom::parse_fragment;
//!
//! let fragment = parse_fragment("<p>Hello</p>").unwrap();
//! assert_eq!(fragment.inner_html(), "<p>Hello</p>");
//! ```

pub use cardkeep_dom::*;
