use folio_primitives::{Buffer, Edit, Selection};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::error::ValidationError;

fn apply(f: impl Fn(&Buffer, Selection) -> Edit, text: &str, start: usize, end: usize) -> (String, usize, usize) {
	let edit = f(&Buffer::new(text), Selection::new(start, end));
	(edit.buffer.to_string(), edit.selection.start(), edit.selection.end())
}

#[test]
fn bold_wraps_selection() {
	assert_eq!(apply(toggle_bold, "hello world", 0, 5), ("**hello** world".into(), 2, 7));
}

#[test]
fn bold_unwraps_selection() {
	assert_eq!(apply(toggle_bold, "**hello** world", 2, 7), ("hello world".into(), 0, 5));
}

#[test]
fn empty_selection_is_noop() {
	assert_eq!(apply(toggle_bold, "abc", 1, 1), ("abc".into(), 1, 1));
	assert_eq!(apply(inline_code, "abc", 1, 1), ("abc".into(), 1, 1));
	assert_eq!(apply(blockquote, "abc", 1, 1), ("abc".into(), 1, 1));
}

#[test]
fn italic_does_not_unwrap_bold() {
	assert_eq!(apply(toggle_italic, "**a**", 2, 3), ("***a***".into(), 3, 4));
}

#[test]
fn italic_unwraps_inside_bold_italic() {
	assert_eq!(apply(toggle_italic, "***a***", 3, 4), ("**a**".into(), 2, 3));
	assert_eq!(apply(toggle_italic, "*a*", 1, 2), ("a".into(), 0, 1));
}

#[test]
fn strikethrough_round_trip() {
	let (text, s, e) = apply(toggle_strikethrough, "gone", 0, 4);
	assert_eq!((text.as_str(), s, e), ("~~gone~~", 2, 6));
	assert_eq!(apply(toggle_strikethrough, &text, s, e), ("gone".into(), 0, 4));
}

#[test]
fn inline_code_always_wraps() {
	assert_eq!(apply(inline_code, "`x`", 1, 2), ("``x``".into(), 2, 3));
}

#[test]
fn heading_sets_and_replaces_level() {
	assert_eq!(apply(|b, s| heading(b, s, 2), "Title", 0, 0), ("## Title".into(), 3, 3));
	assert_eq!(apply(|b, s| heading(b, s, 1), "### Title", 4, 9), ("# Title".into(), 2, 7));
	assert_eq!(apply(|b, s| heading(b, s, 0), "## Title", 3, 3), ("Title".into(), 0, 0));
	assert_eq!(apply(|b, s| heading(b, s, 9), "x", 0, 1).0, "###### x");
}

#[test]
fn heading_touches_only_first_line() {
	let (text, _, _) = apply(|b, s| heading(b, s, 1), "one\ntwo", 0, 7);
	assert_eq!(text, "# one\ntwo");
}

#[test]
fn unordered_list_prefixes_every_line() {
	let (text, s, e) = apply(unordered_list, "a\nb\nc", 0, 5);
	assert_eq!(text, "- a\n- b\n- c");
	assert_eq!((s, e), (2, 11));
}

#[test]
fn ordered_list_renumbers_existing_markers() {
	let (text, _, _) = apply(ordered_list, "- a\n* b\n7. c", 0, 12);
	assert_eq!(text, "1. a\n2. b\n3. c");
}

#[test]
fn list_span_extends_to_whole_lines() {
	let (text, s, e) = apply(unordered_list, "intro\nfirst\nsecond\noutro", 8, 14);
	assert_eq!(text, "intro\n- first\n- second\noutro");
	assert_eq!((s, e), (10, 18));
}

#[test]
fn blockquote_replaces_existing_quote() {
	let (text, _, _) = apply(blockquote, ">a\n> b", 0, 6);
	assert_eq!(text, "> a\n> b");
}

#[test]
fn color_span_validates() {
	let buffer = Buffer::new("warm");
	let edit = color_span(&buffer, Selection::new(0, 4), "#ff8800").unwrap();
	assert_eq!(edit.buffer, "<span style=\"color: #ff8800\">warm</span>");
	assert_eq!(edit.buffer.text(edit.selection.range()), "warm");

	assert_eq!(
		color_span(&buffer, Selection::new(0, 4), "red;x:y"),
		Err(ValidationError::InvalidColor("red;x:y".into()))
	);
	assert_eq!(color_span(&buffer, Selection::point(0), "red"), Err(ValidationError::EmptySelection));
}

fn marker() -> impl Strategy<Value = Marker> {
	prop_oneof![Just(Marker::Bold), Just(Marker::Italic), Just(Marker::Strikethrough)]
}

proptest! {
	#[test]
	fn toggle_twice_restores(text in "[a-z *~\n]{1,30}", a in 0usize..32, b in 0usize..32, marker in marker()) {
		let buffer = Buffer::new(&text);
		let len = buffer.len_chars();
		let sel = Selection::new(a.min(len), b.min(len));
		let first = toggle(&buffer, sel, marker);
		let wrapped = first.buffer.len_chars() > len;
		if wrapped {
			let second = toggle(&first.buffer, first.selection, marker);
			prop_assert_eq!(second.buffer, buffer);
			prop_assert_eq!(second.selection, sel);
		}
	}

	#[test]
	fn toggle_keeps_selected_text(text in "[a-z *~]{1,30}", a in 0usize..32, b in 0usize..32, marker in marker()) {
		let buffer = Buffer::new(&text);
		let len = buffer.len_chars();
		let sel = Selection::new(a.min(len), b.min(len));
		let edit = toggle(&buffer, sel, marker);
		prop_assert_eq!(edit.buffer.text(edit.selection.range()), buffer.text(sel.range()));
	}

	#[test]
	fn line_ops_keep_selection_in_bounds(text in "[a-z#>\\- \n]{0,40}", a in 0usize..42, b in 0usize..42, level in 0u8..8) {
		let buffer = Buffer::new(&text);
		let len = buffer.len_chars();
		let sel = Selection::new(a.min(len), b.min(len));
		for edit in [
			heading(&buffer, sel, level),
			ordered_list(&buffer, sel),
			unordered_list(&buffer, sel),
			blockquote(&buffer, sel),
		] {
			prop_assert!(edit.selection.end() <= edit.buffer.len_chars());
		}
	}
}
