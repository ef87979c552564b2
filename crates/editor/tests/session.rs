//! End-to-end editing scenarios driven through the public session API.

use std::time::{Duration, Instant};

use folio_editor::{
	Buffer, Command, CommandOutcome, EditorConfig, EditorSession, History, InsertionRequest, Key, Selection,
};
use pretty_assertions::assert_eq;

fn session(text: &str) -> EditorSession {
	EditorSession::new("doc".into(), text, EditorConfig::default())
}

#[test]
fn bold_then_undo() {
	let mut s = session("hello world");
	s.set_selection(Selection::new(0, 5));
	s.execute(Command::Bold).unwrap();
	assert_eq!(s.buffer().to_string(), "**hello** world");
	assert_eq!(s.selection(), Selection::new(2, 7));

	s.execute(Command::Undo).unwrap();
	assert_eq!(s.buffer().to_string(), "hello world");
}

#[test]
fn bold_twice_restores_text_and_selection() {
	let mut s = session("hello world");
	s.set_selection(Selection::new(6, 11));
	s.execute(Command::Bold).unwrap();
	s.execute(Command::Bold).unwrap();
	assert_eq!(s.buffer().to_string(), "hello world");
	assert_eq!(s.selection(), Selection::new(6, 11));
}

#[test]
fn link_insertion_replaces_selection() {
	let mut s = session("see docs here");
	s.set_selection(Selection::new(4, 8));
	s.execute(Command::OpenLink).unwrap();

	let text = match s.modal().map(|m| &m.request) {
		Some(InsertionRequest::Link(req)) => req.text.clone(),
		other => panic!("expected link dialog, got {other:?}"),
	};
	assert_eq!(text, "docs");

	s.set_link(&text, "https://x.com").unwrap();
	s.execute(Command::SubmitModal).unwrap();
	assert_eq!(s.buffer().to_string(), "see [docs](https://x.com) here");
}

#[test]
fn malformed_formula_still_renders_surrounding_text() {
	let s = session("before\n\n$$\\frac{1}{$$\n\nafter");
	let preview = s.preview();
	assert_eq!(preview.diagnostics.len(), 1);
	assert!(preview.html.contains("math-error"));
	assert!(preview.html.contains("<p>before</p>"));
	assert!(preview.html.contains("<p>after</p>"));
}

#[test]
fn redo_branch_is_lost_after_new_commit() {
	let mut history = History::new(Buffer::new("A"));
	history.commit_formatting(Buffer::new("B"));
	history.commit_formatting(Buffer::new("C"));
	history.undo();
	history.undo();
	history.commit_formatting(Buffer::new("D"));

	let entries: Vec<String> = history.entries().map(ToString::to_string).collect();
	assert_eq!(entries, ["A", "D"]);
	assert_eq!(history.current(), &Buffer::new("D"));
	assert!(!history.can_redo());
}

#[test]
fn history_evicts_oldest_entries() {
	let mut history = History::new(Buffer::new("seed"));
	let k = 7;
	for i in 0..folio_editor::config::MAX_HISTORY + k {
		history.commit(Buffer::new(&format!("entry {i}")));
	}
	assert_eq!(history.len(), folio_editor::config::MAX_HISTORY);
	assert_eq!(history.entries().next(), Some(&Buffer::new(&format!("entry {k}"))));
}

#[test]
fn three_footnotes_number_in_order() {
	let mut s = session("");
	for body in ["one", "two", "three"] {
		s.set_selection(Selection::point(s.buffer().len_chars()));
		s.execute(Command::OpenFootnote).unwrap();
		s.set_footnote(body).unwrap();
		s.execute(Command::SubmitModal).unwrap();
	}
	let text = s.buffer().to_string();
	let markers: Vec<usize> = ["[^1]", "[^2]", "[^3]"].iter().map(|m| text.find(m).unwrap()).collect();
	assert!(markers.windows(2).all(|w| w[0] < w[1]));
	let defs: Vec<usize> = ["[^1]: one", "[^2]: two", "[^3]: three"]
		.iter()
		.map(|d| text.find(d).unwrap())
		.collect();
	assert!(defs.windows(2).all(|w| w[0] < w[1]));
	assert!(text.ends_with("[^3]: three"));
}

#[test]
fn typing_pause_creates_a_single_entry() {
	let mut s = session("");
	let start = Instant::now();
	for (i, text) in ["a", "ab", "abc"].iter().enumerate() {
		s.input(text, Selection::point(i + 1), start + Duration::from_millis(i as u64 * 100));
	}
	let deadline = s.next_deadline().unwrap();
	assert_eq!(deadline, start + Duration::from_millis(700));
	assert!(s.tick(deadline));
	assert_eq!(s.history().len(), 2);

	s.execute(Command::Undo).unwrap();
	assert_eq!(s.buffer().to_string(), "");
}

#[test]
fn keyboard_undo_redo() {
	let mut s = session("x");
	s.set_selection(Selection::new(0, 1));
	s.execute(Command::Strikethrough).unwrap();
	assert_eq!(s.buffer().to_string(), "~~x~~");

	s.handle_key(&Key::ctrl('z')).unwrap().unwrap();
	assert_eq!(s.buffer().to_string(), "x");
	let redo = s.handle_key(&Key::ctrl('y')).unwrap().unwrap();
	assert!(matches!(redo, CommandOutcome::Applied(_)));
	assert_eq!(s.buffer().to_string(), "~~x~~");
}

#[test]
fn config_limits_apply_to_sessions() {
	let config = EditorConfig::from_toml_str(
		r#"
		[history]
		max-entries = 2

		[table]
		max-rows = 1
		"#,
	)
	.unwrap();
	let mut s = EditorSession::new("doc".into(), "", config);
	for heading in 1..=4 {
		s.set_selection(Selection::point(0));
		s.execute(Command::Heading(heading)).unwrap();
	}
	assert_eq!(s.history().len(), 2);

	s.execute(Command::OpenTable).unwrap();
	s.set_table(5, 2).unwrap();
	s.execute(Command::SubmitModal).unwrap();
	assert_eq!(s.buffer().to_string().matches("Cell").count(), 2);
}
