//! Screen Flow Integration Tests
//!
//! A small card-wallet app built from the facade: a home list, an add
//! screen fed by a barcode detector, and a details screen. Screens run as a
//! spawned task and the tests drive them by dispatching clicks.
//!
//! Test Categories:
//! - Category 1: Navigation
//! - Category 2: External update signal
//! - Category 3: Stale listeners

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use cardkeep::cards::Frame;
use cardkeep::prelude::*;
use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture, Shared};
use rstest::rstest;
use serial_test::serial;

type AppResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Clone, PartialEq)]
enum Screen {
	Home,
	Add,
	Details(String),
	Update,
}

struct FakeDetector {
	next: Option<Barcode>,
}

impl BarcodeDetector for FakeDetector {
	fn detect(&mut self, frame: &Frame) -> CardResult<Option<Barcode>> {
		if frame.is_empty() {
			return Ok(None);
		}
		Ok(self.next.take())
	}
}

struct App {
	cards: CardStore<MemoryStore>,
	machine: Machine<Screen>,
	detector: RefCell<FakeDetector>,
	update: Shared<LocalBoxFuture<'static, Screen>>,
}

impl App {
	fn new(next: Option<Barcode>) -> (Rc<Self>, oneshot::Sender<()>) {
		let (update_tx, update_rx) = oneshot::channel::<()>();
		let update = update_rx
			.then(|result| async move {
				match result {
					Ok(()) => Screen::Update,
					Err(_) => future::pending().await,
				}
			})
			.boxed_local()
			.shared();
		let app = Rc::new(Self {
			cards: CardStore::new(MemoryStore::new()),
			machine: Machine::new(),
			detector: RefCell::new(FakeDetector { next }),
			update,
		});
		(app, update_tx)
	}

	fn update(&self) -> LocalBoxFuture<'static, Screen> {
		self.update.clone().boxed_local()
	}
}

async fn home(app: &App) -> AppResult<Screen> {
	let items = app
		.cards
		.get_cards()?
		.into_iter()
		.map(|card| {
			let id = card.id.clone();
			let behaviours = vec![
				on(
					"click",
					app.machine
						.transition_with("open", move |_| Screen::Details(id.clone())),
				),
				attr("style", format!("--card-color: {}", card.color_entry().value)),
			];
			html!("<li ", behaviours, ">", card.name, "</li>")
		})
		.collect::<PagesResult<Vec<Node>>>()?;

	mount(
		html!(
			"<ul>",
			items,
			"</ul><button id=add ",
			on("click", app.machine.transition_with("add", |_| Screen::Add)),
			">Add Card</button>"
		)?,
		Some("home"),
	)?;
	Ok(app.machine.state(["add", "open"], vec![app.update()]).await)
}

async fn add(app: &App) -> AppResult<Screen> {
	mount(
		html!(
			"<p>Point the camera at a barcode</p><button id=cancel ",
			on("click", app.machine.transition_with("cancel", |_| Screen::Home)),
			">Cancel</button>"
		)?,
		Some("add"),
	)?;

	let frame = Frame {
		width: 2,
		height: 1,
		rgba: vec![0; 8],
	};
	let scanned = app.detector.borrow_mut().detect(&frame)?;
	let scan = match scanned {
		Some(barcode) => {
			let mut card = app.cards.create(&barcode)?;
			card.name = "Library".to_string();
			card.color = 5;
			app.cards.save(&card)?;
			future::ready(Screen::Details(card.id)).boxed_local()
		}
		None => future::pending().boxed_local(),
	};
	Ok(app.machine.state(["cancel"], vec![scan, app.update()]).await)
}

async fn details(app: &App, id: &str) -> AppResult<Screen> {
	let card = app.cards.load(id)?;
	let delete = {
		let cards = app.cards.clone();
		let id = id.to_string();
		move |_: Event| {
			cards.delete(&id);
			Screen::Home
		}
	};

	mount(
		html!(
			"<h2>",
			card.name.clone(),
			"</h2><p class=card-data>",
			format_raw_value(&card),
			"</p><button id=back ",
			on("click", app.machine.transition_with("back", |_| Screen::Home)),
			">Back</button><button id=delete ",
			on("click", app.machine.transition_with("delete", delete)),
			">Delete</button>"
		)?,
		Some("details"),
	)?;
	Ok(app.machine.state(["back", "delete"], vec![app.update()]).await)
}

async fn run(app: Rc<App>) -> AppResult<()> {
	let mut screen = Screen::Home;
	loop {
		screen = match screen {
			Screen::Home => home(&app).await?,
			Screen::Add => add(&app).await?,
			Screen::Details(id) => details(&app, &id).await?,
			Screen::Update => {
				mount("A new version is available", Some("update"))?;
				return Ok(());
			}
		};
	}
}

fn main_element() -> Node {
	document()
		.query_selector("main")
		.expect("app shell has a <main>")
}

fn click(selector: &str) {
	document()
		.query_selector(selector)
		.unwrap_or_else(|| panic!("no element matches {selector}"))
		.dispatch_event("click");
}

fn start(next: Option<Barcode>) -> (Rc<App>, oneshot::Sender<()>) {
	set_document(Document::app_shell().expect("app shell parses"));
	let (app, update_tx) = App::new(next);
	cardkeep::reactive::spawn_local_fallible(run(app.clone()));
	run_until_stalled();
	(app, update_tx)
}

// ============================================================================
// Category 1: Navigation
// ============================================================================

/// Tests adding a card, viewing it, going back and deleting it
#[rstest]
#[serial(document)]
fn test_add_view_back_delete() {
	let (app, _update) = start(Some(Barcode::new("ean_13", "4006381333931")));
	assert_eq!(main_element().class_name(), "home");
	assert!(document().query_selector("li").is_none());

	click("#add");
	run_until_stalled();

	assert_eq!(main_element().class_name(), "details");
	let data = document().query_selector(".card-data").unwrap();
	assert_eq!(data.text_content(), "#4006381333931");
	assert_eq!(document().query_selector("h2").unwrap().text_content(), "Library");

	click("#back");
	run_until_stalled();

	assert_eq!(main_element().class_name(), "home");
	let items = document().query_selector_all("li");
	assert_eq!(items.len(), 1);
	assert_eq!(items[0].text_content(), "Library");
	assert_eq!(
		items[0].get_attribute("style").as_deref(),
		Some("--card-color: #1A779F")
	);

	click("li");
	run_until_stalled();
	assert_eq!(main_element().class_name(), "details");

	click("#delete");
	run_until_stalled();

	assert_eq!(main_element().class_name(), "home");
	assert!(document().query_selector("li").is_none());
	assert!(app.cards.get_cards().unwrap().is_empty());
	assert!(cardkeep::reactive::take_unhandled_errors().is_empty());
}

/// Tests cancelling the add screen when nothing is scanned
#[rstest]
#[serial(document)]
fn test_cancel_add_without_scan() {
	let (app, _update) = start(None);

	click("#add");
	run_until_stalled();
	assert_eq!(main_element().class_name(), "add");

	click("#cancel");
	run_until_stalled();

	assert_eq!(main_element().class_name(), "home");
	assert!(app.cards.get_cards().unwrap().is_empty());
}

// ============================================================================
// Category 2: External update signal
// ============================================================================

/// Tests that the update signal wins over any armed transition
#[rstest]
#[serial(document)]
fn test_update_signal_ends_flow() {
	let (_app, update) = start(None);

	click("#add");
	run_until_stalled();
	update.send(()).unwrap();
	run_until_stalled();

	let main = main_element();
	assert_eq!(main.class_name(), "update");
	assert_eq!(main.text_content(), "A new version is available");
}

// ============================================================================
// Category 3: Stale listeners
// ============================================================================

/// Tests that buttons from an earlier screen stay inert
#[rstest]
#[serial(document)]
fn test_detached_button_is_inert() {
	let (app, _update) = start(None);
	let stale_add = document().query_selector("#add").unwrap();

	click("#add");
	run_until_stalled();
	assert_eq!(main_element().class_name(), "add");

	stale_add.dispatch_event("click");
	run_until_stalled();

	assert_eq!(main_element().class_name(), "add");
	assert!(app.machine.is_armed("cancel"));
	assert!(!app.machine.is_armed("add"));
}
