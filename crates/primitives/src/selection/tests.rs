use proptest::prelude::*;

use super::*;

#[test]
fn point_selection_is_caret() {
	let sel = Selection::point(5);
	assert!(sel.is_empty());
	assert_eq!(sel.len(), 0);
	assert_eq!(sel.range(), 5..5);
}

#[test]
fn reversed_offsets_are_normalised() {
	let sel = Selection::new(10, 4);
	assert_eq!(sel.start(), 4);
	assert_eq!(sel.end(), 10);
	assert_eq!(sel.len(), 6);
}

#[test]
fn clamp_to_shorter_buffer() {
	let sel = Selection::new(3, 12);
	assert_eq!(sel.clamp(8), Selection::new(3, 8));
	assert_eq!(sel.clamp(2), Selection::point(2));
}

#[test]
fn contains_excludes_end() {
	let sel = Selection::new(2, 4);
	assert!(!sel.contains(1));
	assert!(sel.contains(2));
	assert!(sel.contains(3));
	assert!(!sel.contains(4));
}

#[test]
fn collapse_keeps_end() {
	assert_eq!(Selection::new(1, 7).collapse_to_end(), Selection::point(7));
}

proptest! {
	#[test]
	fn always_ordered(a in 0usize..1000, b in 0usize..1000) {
		let sel = Selection::new(a, b);
		prop_assert!(sel.start() <= sel.end());
		prop_assert_eq!(sel.len(), a.abs_diff(b));
	}

	#[test]
	fn clamp_stays_in_bounds(a in 0usize..1000, b in 0usize..1000, max in 0usize..1000) {
		let sel = Selection::new(a, b).clamp(max);
		prop_assert!(sel.start() <= sel.end());
		prop_assert!(sel.end() <= max);
	}
}
