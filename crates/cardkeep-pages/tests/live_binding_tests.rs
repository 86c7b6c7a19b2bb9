//! Live Binding Tests
//!
//! Signals driving text and attribute holes through `live`.

use std::cell::Cell;
use std::rc::Rc;

use cardkeep_pages::{Node, PagesError, apply_expression, html, live};
use cardkeep_reactive::{run_microtasks, signal};
use rstest::rstest;
use serial_test::serial;

/// Tests that a text hole follows its signal
#[rstest]
#[serial]
fn test_live_text_updates_in_place() {
	let (name, set_name) = signal(String::from("Library"));
	let fragment = html!("<h2>", live(move || name.get()), "</h2>").unwrap();
	let heading = fragment.first_child().unwrap();
	let text = heading.first_child().unwrap();

	assert_eq!(heading.inner_html(), "Library");

	set_name.set(String::from("Gym"));
	run_microtasks();

	assert_eq!(heading.inner_html(), "Gym");
	assert!(heading.first_child().unwrap().ptr_eq(&text));
}

/// Tests that an attribute hole follows its signal
#[rstest]
#[serial]
fn test_live_attribute_value() {
	let (color, set_color) = signal(3u8);
	let fragment = html!(
		"<div class=",
		live(move || format!("card color-{}", color.get())),
		"></div>"
	)
	.unwrap();
	let card = fragment.first_child().unwrap();

	assert_eq!(card.class_name(), "card color-3");

	set_color.set(7);
	run_microtasks();

	assert_eq!(card.class_name(), "card color-7");
}

/// Tests that writes within one turn re-apply once
#[rstest]
#[serial]
fn test_batched_writes_apply_once() {
	let (count, set_count) = signal(0u32);
	let runs = Rc::new(Cell::new(0));
	let fragment = html!(
		"<span>",
		live({
			let runs = runs.clone();
			move || {
				runs.set(runs.get() + 1);
				count.get()
			}
		}),
		"</span>"
	)
	.unwrap();

	set_count.set(1);
	set_count.set(2);
	set_count.set(3);
	run_microtasks();

	assert_eq!(runs.get(), 2);
	assert_eq!(fragment.text_content(), "3");
}

/// Tests that writing the current value does not re-apply
#[rstest]
#[serial]
fn test_unchanged_write_is_ignored() {
	let (count, set_count) = signal(5u32);
	let runs = Rc::new(Cell::new(0));
	let _fragment = html!(
		"<span>",
		live({
			let runs = runs.clone();
			move || {
				runs.set(runs.get() + 1);
				count.get()
			}
		}),
		"</span>"
	)
	.unwrap();

	set_count.set(5);
	run_microtasks();

	assert_eq!(runs.get(), 1);
}

/// Tests that a live binding cannot target an element
#[rstest]
fn test_live_rejects_element_position() {
	let element = Node::element("div");

	let result = apply_expression(live(|| "x"), &element);

	assert!(matches!(
		result,
		Err(PagesError::UnsupportedExpression { .. })
	));
}
