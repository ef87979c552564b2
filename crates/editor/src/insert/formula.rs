use folio_primitives::{Buffer, Edit, Selection};

use super::{replace_selection, required};
use crate::error::ValidationError;

/// Formula dialog fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaRequest {
	pub latex: String,
}

impl FormulaRequest {
	/// Prefills the formula with the selected text.
	pub fn from_selection(buffer: &Buffer, sel: Selection) -> Self {
		Self {
			latex: buffer.text(sel.range()),
		}
	}

	pub fn is_ready(&self) -> bool {
		!self.latex.trim().is_empty()
	}
}

/// Replaces the selection with display math `$$latex$$`.
pub fn insert_formula(buffer: &Buffer, sel: Selection, latex: &str) -> Result<Edit, ValidationError> {
	let latex = required(latex, "formula")?;
	Ok(replace_selection(buffer, sel, &format!("$${latex}$$")))
}
