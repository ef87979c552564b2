//! Content insertion protocols.
//!
//! Each protocol has two phases. Opening a dialog seeds an
//! [`InsertionRequest`] and remembers the origin selection. Committing
//! validates the fields, computes the inserted text and splices it in; the
//! session then commits the result to history as a formatting step.
//!
//! The functions here are the pure second phase; the dialog lifecycle lives
//! in [`EditorSession`](crate::EditorSession).

mod footnote;
mod formula;
mod image;
mod link;
mod modal;
mod table;

use folio_primitives::{Buffer, Edit, Selection};

pub use footnote::{FootnoteRequest, footnote_numbers, insert_footnote, next_footnote_number};
pub use formula::{FormulaRequest, insert_formula};
pub use image::{FileSource, ImageRequest, SelectedFile, UploadTicket, insert_image, select_file};
pub use link::{LinkRequest, insert_link};
pub use modal::{InsertionRequest, Modal, ModalKind, StatusKind};
pub use table::{TableRequest, generate_table, generate_table_with, insert_table};

use crate::error::ValidationError;

/// Trims `value`, rejecting it if nothing is left.
fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
	let value = value.trim();
	if value.is_empty() {
		Err(ValidationError::EmptyField { field })
	} else {
		Ok(value)
	}
}

/// Replaces the selection with `text`, leaving the caret after it.
fn replace_selection(buffer: &Buffer, sel: Selection, text: &str) -> Edit {
	let sel = sel.clamp(buffer.len_chars());
	let caret = sel.start() + text.chars().count();
	Edit::new(buffer.splice(sel.range(), text), Selection::point(caret))
}
