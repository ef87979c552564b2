use std::sync::LazyLock;

use folio_primitives::{Buffer, Edit, Selection};
use regex::Regex;
use tracing::trace;

use super::required;
use crate::error::ValidationError;

static FOOTNOTE_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\^(\d+)\]").expect("valid regex"));

/// Footnote dialog fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteRequest {
	pub body: String,
}

impl FootnoteRequest {
	pub fn is_ready(&self) -> bool {
		!self.body.trim().is_empty()
	}
}

/// Numbers of every `[^n]` reference or definition in the buffer.
pub fn footnote_numbers(buffer: &Buffer) -> Vec<u64> {
	let text = buffer.to_string();
	FOOTNOTE_REF
		.captures_iter(&text)
		.filter_map(|caps| caps.get(1)?.as_str().parse().ok())
		.collect()
}

/// One more than the largest footnote number in the buffer, or 1.
///
/// Gaps left by deleted footnotes are never filled.
pub fn next_footnote_number(buffer: &Buffer) -> u64 {
	footnote_numbers(buffer).into_iter().max().map_or(1, |n| n.saturating_add(1))
}

/// Inserts `[^n]` at the caret and appends `[^n]: body` to the document.
pub fn insert_footnote(buffer: &Buffer, sel: Selection, body: &str) -> Result<Edit, ValidationError> {
	let body = required(body, "footnote text")?;
	let n = next_footnote_number(buffer);
	let marker = format!("[^{n}]");
	let at = sel.end().min(buffer.len_chars());

	let out = buffer.insert(at, &marker).append(&format!("\n\n{marker}: {body}"));
	trace!(number = n, at, "footnote inserted");
	Ok(Edit::new(out, Selection::point(at + marker.chars().count())))
}
