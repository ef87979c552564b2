use std::time::{Duration, Instant};

use proptest::prelude::*;

use super::*;

fn buf(text: &str) -> Buffer {
	Buffer::new(text)
}

#[test]
fn seeded_history_cannot_move() {
	let mut history = History::new(buf("start"));
	assert_eq!(history.len(), 1);
	assert!(!history.can_undo());
	assert!(!history.can_redo());
	assert!(history.undo().is_none());
	assert!(history.redo().is_none());
	assert_eq!(history.current(), &buf("start"));
}

#[test]
fn commit_then_undo_and_redo() {
	let mut history = History::new(buf("a"));
	assert!(history.commit(buf("ab")));
	assert!(history.commit(buf("abc")));
	assert_eq!(history.cursor(), 2);

	assert_eq!(history.undo(), Some(&buf("ab")));
	assert_eq!(history.undo(), Some(&buf("a")));
	assert!(history.undo().is_none());
	assert_eq!(history.redo(), Some(&buf("ab")));
	assert!(history.can_redo());
}

#[test]
fn identical_commit_is_ignored() {
	let mut history = History::new(buf("same"));
	assert!(!history.commit(buf("same")));
	assert_eq!(history.len(), 1);
}

#[test]
fn commit_after_undo_drops_redo_branch() {
	let mut history = History::new(buf("A"));
	history.commit(buf("B"));
	history.commit(buf("C"));
	history.undo();
	history.commit(buf("D"));

	let entries: Vec<_> = history.entries().map(Buffer::to_string).collect();
	assert_eq!(entries, ["A", "B", "D"]);
	assert!(!history.can_redo());
	assert!(history.redo().is_none());
}

#[test]
fn oldest_entries_are_evicted() {
	let mut history = History::new(buf("0"));
	for i in 1..=100 {
		history.commit(buf(&i.to_string()));
	}
	assert_eq!(history.len(), MAX_HISTORY);
	assert_eq!(history.cursor(), MAX_HISTORY - 1);
	assert_eq!(history.entries().next(), Some(&buf("1")));
	assert_eq!(history.current(), &buf("100"));
}

#[test]
fn typing_is_debounced_into_one_entry() {
	let t0 = Instant::now();
	let mut history = History::new(buf(""));
	history.commit_typing(buf("h"), t0);
	history.commit_typing(buf("he"), t0 + Duration::from_millis(100));
	history.commit_typing(buf("hey"), t0 + Duration::from_millis(300));

	assert_eq!(history.visible(), &buf("hey"));
	assert_eq!(history.current(), &buf(""));
	assert!(!history.poll(t0 + Duration::from_millis(700)));
	assert_eq!(history.deadline(), Some(t0 + Duration::from_millis(800)));
	assert!(history.poll(t0 + Duration::from_millis(800)));

	assert_eq!(history.len(), 2);
	assert_eq!(history.current(), &buf("hey"));
	assert!(history.pending().is_none());
}

#[test]
fn formatting_flushes_pending_typing_first() {
	let t0 = Instant::now();
	let mut history = History::new(buf("x"));
	history.commit_typing(buf("xy"), t0);
	assert!(history.commit_formatting(buf("**xy**")));

	let entries: Vec<_> = history.entries().map(Buffer::to_string).collect();
	assert_eq!(entries, ["x", "xy", "**xy**"]);
	assert!(history.deadline().is_none());
	assert!(!history.poll(t0 + Duration::from_secs(5)));
}

#[test]
fn undo_flushes_pending_burst() {
	let t0 = Instant::now();
	let mut history = History::new(buf("a"));
	history.commit_typing(buf("ab"), t0);
	assert!(history.can_undo());
	assert!(!history.can_redo());

	assert_eq!(history.undo(), Some(&buf("a")));
	assert_eq!(history.redo(), Some(&buf("ab")));
}

#[test]
fn pending_edit_disables_redo() {
	let t0 = Instant::now();
	let mut history = History::new(buf("a"));
	history.commit(buf("ab"));
	history.undo();
	assert!(history.can_redo());
	history.commit_typing(buf("ax"), t0);
	assert!(!history.can_redo());
}

#[test]
fn configured_limits_apply() {
	let config = HistoryConfig {
		max_entries: 3,
		debounce_ms: 50,
	};
	let mut history = History::with_config(buf("0"), &config);
	for i in 1..10 {
		history.commit(buf(&i.to_string()));
	}
	assert_eq!(history.len(), 3);
	assert_eq!(history.debounce(), Duration::from_millis(50));
}

#[derive(Debug, Clone)]
enum Op {
	Commit(u8),
	Undo,
	Redo,
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		3 => any::<u8>().prop_map(Op::Commit),
		1 => Just(Op::Undo),
		1 => Just(Op::Redo),
	]
}

proptest! {
	#[test]
	fn cursor_and_length_stay_in_bounds(max in 1usize..8, ops in prop::collection::vec(op(), 0..200)) {
		let mut history = History::with_limits(buf(""), max, Duration::ZERO);
		for op in ops {
			match op {
				Op::Commit(n) => {
					history.commit(buf(&n.to_string()));
				}
				Op::Undo => {
					history.undo();
				}
				Op::Redo => {
					history.redo();
				}
			}
			prop_assert!(history.len() >= 1);
			prop_assert!(history.len() <= max);
			prop_assert!(history.cursor() < history.len());
		}
	}
}
