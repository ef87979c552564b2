//! Markdown table skeletons.

use folio_primitives::{Buffer, CharIdx, Edit, Selection};
use tracing::trace;

use crate::config::TableLimits;

/// Table dialog fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRequest {
	/// Number of data rows, excluding the header.
	pub rows: usize,
	pub cols: usize,
}

impl Default for TableRequest {
	fn default() -> Self {
		Self { rows: 3, cols: 3 }
	}
}

/// Builds a table with default limits; see [`generate_table_with`].
pub fn generate_table(rows: usize, cols: usize) -> String {
	generate_table_with(rows, cols, &TableLimits::default())
}

/// Builds a pipe table: a `Header N` row, a `---` separator and `rows` rows
/// of `Cell R-C` placeholders, followed by a blank line.
///
/// `rows` and `cols` are clamped to `1..=limits.max_*`.
pub fn generate_table_with(rows: usize, cols: usize, limits: &TableLimits) -> String {
	let rows = rows.clamp(1, limits.max_rows.max(1));
	let cols = cols.clamp(1, limits.max_cols.max(1));

	let row = |cells: Vec<String>| format!("| {} |", cells.join(" | "));
	let mut lines = Vec::with_capacity(rows + 2);
	lines.push(row((1..=cols).map(|c| format!("Header {c}")).collect()));
	lines.push(row(vec!["---".to_string(); cols]));
	for r in 1..=rows {
		lines.push(row((1..=cols).map(|c| format!("Cell {r}-{c}")).collect()));
	}
	let mut table = lines.join("\n");
	table.push_str("\n\n");
	table
}

/// Inserts a table at the start of the line after the caret.
///
/// A caret already at a line start inserts in place. On the last line the
/// table is appended after a newline. The caret lands after the table.
pub fn insert_table(buffer: &Buffer, sel: Selection, rows: usize, cols: usize, limits: &TableLimits) -> Edit {
	let table = generate_table_with(rows, cols, limits);
	let (at, text) = insertion_point(buffer, sel.end(), table);
	let caret = at + text.chars().count();
	trace!(at, rows, cols, "table inserted");
	Edit::new(buffer.insert(at, &text), Selection::point(caret))
}

fn insertion_point(buffer: &Buffer, caret: CharIdx, table: String) -> (CharIdx, String) {
	let caret = caret.min(buffer.len_chars());
	if buffer.line_start(caret) == caret {
		return (caret, table);
	}
	let line_end = buffer.line_end(caret);
	if line_end < buffer.len_chars() {
		(line_end + 1, table)
	} else {
		(line_end, format!("\n{table}"))
	}
}
