use folio_primitives::{Buffer, Edit, Selection};

use super::{replace_selection, required};
use crate::error::ValidationError;

/// Link dialog fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRequest {
	pub text: String,
	pub url: String,
}

impl LinkRequest {
	/// Prefills the link text with the selected text.
	pub fn from_selection(buffer: &Buffer, sel: Selection) -> Self {
		Self {
			text: buffer.text(sel.range()),
			url: String::new(),
		}
	}

	pub fn is_ready(&self) -> bool {
		!self.text.trim().is_empty() && !self.url.trim().is_empty()
	}
}

/// Replaces the selection with `[text](url)` and puts the caret after it.
pub fn insert_link(buffer: &Buffer, sel: Selection, text: &str, url: &str) -> Result<Edit, ValidationError> {
	let text = required(text, "link text")?;
	let url = required(url, "URL")?;
	Ok(replace_selection(buffer, sel, &format!("[{text}]({url})")))
}
