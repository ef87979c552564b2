//! Line-scoped block formatting: headings, lists and blockquotes.
//!
//! Each operation rewrites every line touched by the selection, from the
//! start of the line holding `start` to the end of the line holding `end`.

use std::sync::LazyLock;

use folio_primitives::{Buffer, CharIdx, Edit, Selection};
use regex::Regex;
use tracing::trace;

static HEADING_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}\s*").expect("valid regex"));
static LIST_PREFIX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+\.)\s+").expect("valid regex"));
static QUOTE_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s*").expect("valid regex"));

/// Deepest markdown heading level.
pub const MAX_HEADING: u8 = 6;

/// Sets the heading level of the first touched line.
///
/// Level 0 removes the heading; levels above 6 are treated as 6.
pub fn heading(buffer: &Buffer, sel: Selection, level: u8) -> Edit {
	let level = level.min(MAX_HEADING);
	let prefix = if level == 0 {
		String::new()
	} else {
		format!("{} ", "#".repeat(level.into()))
	};
	rewrite_lines(buffer, sel, |index, line| {
		if index == 0 {
			format!("{prefix}{}", HEADING_PREFIX.replace(line, ""))
		} else {
			line.to_string()
		}
	})
}

/// Turns touched lines into a numbered list starting at 1.
pub fn ordered_list(buffer: &Buffer, sel: Selection) -> Edit {
	rewrite_lines(buffer, sel, |index, line| {
		format!("{}. {}", index + 1, LIST_PREFIX.replace(line, ""))
	})
}

/// Turns touched lines into a bulleted list.
pub fn unordered_list(buffer: &Buffer, sel: Selection) -> Edit {
	rewrite_lines(buffer, sel, |_, line| format!("- {}", LIST_PREFIX.replace(line, "")))
}

/// Quotes touched lines. An empty selection is left alone.
pub fn blockquote(buffer: &Buffer, sel: Selection) -> Edit {
	if sel.is_empty() {
		return Edit::unchanged(buffer, sel);
	}
	rewrite_lines(buffer, sel, |_, line| format!("> {}", QUOTE_PREFIX.replace(line, "")))
}

/// Rewrites every line in the touched span with `f(index, line)`.
///
/// The selection start moves by the first line's length change (never before
/// the span start); the end moves by the total change.
fn rewrite_lines(buffer: &Buffer, sel: Selection, mut f: impl FnMut(usize, &str) -> String) -> Edit {
	let span_start = buffer.line_start(sel.start());
	let span_end = buffer.line_end(sel.end());
	let old = buffer.text(span_start..span_end);

	let mut first_delta = 0isize;
	let mut lines = Vec::new();
	for (index, line) in old.split('\n').enumerate() {
		let new = f(index, line);
		if index == 0 {
			first_delta = char_delta(line, &new);
		}
		lines.push(new);
	}
	let new = lines.join("\n");
	let total_delta = char_delta(&old, &new);

	let out = buffer.splice(span_start..span_end, &new);
	let start = shift(sel.start(), first_delta).max(span_start);
	let end = shift(sel.end(), total_delta).clamp(start, out.len_chars());
	trace!(span_start, span_end, lines = lines.len(), first_delta, total_delta, "lines rewritten");
	Edit::new(out, Selection::new(start, end))
}

fn char_delta(old: &str, new: &str) -> isize {
	new.chars().count() as isize - old.chars().count() as isize
}

fn shift(pos: CharIdx, delta: isize) -> CharIdx {
	pos.saturating_add_signed(delta)
}
