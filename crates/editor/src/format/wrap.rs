//! Inline marker wrapping: emphasis toggles, inline code and color spans.

use folio_primitives::{Buffer, Edit, Selection};
use folio_render::sanitize::{color_span_open, is_safe_color};
use tracing::trace;

use crate::error::ValidationError;

/// Inline emphasis that toggles on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
	Bold,
	Italic,
	Strikethrough,
}

impl Marker {
	/// Markdown delimiter for this emphasis.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Bold => "**",
			Self::Italic => "*",
			Self::Strikethrough => "~~",
		}
	}

	/// Returns true if the selection is already wrapped in this marker.
	fn wraps(self, buffer: &Buffer, sel: Selection) -> bool {
		match self {
			// A `*` run of exactly two on both sides is bold, not italic.
			Self::Italic => {
				let before = buffer.run_before(sel.start(), '*');
				let after = buffer.run_after(sel.end(), '*');
				before >= 1 && after >= 1 && !(before == 2 && after == 2)
			}
			_ => {
				let marker = self.as_str();
				buffer.ends_with_at(sel.start(), marker) && buffer.starts_with_at(sel.end(), marker)
			}
		}
	}
}

/// Wraps the selection in `marker`, or removes it if already present.
///
/// The same text stays selected either way, so toggling twice restores both
/// buffer and selection. An empty selection is left alone.
pub fn toggle(buffer: &Buffer, sel: Selection, marker: Marker) -> Edit {
	if sel.is_empty() {
		return Edit::unchanged(buffer, sel);
	}
	let text = marker.as_str();
	let m = text.chars().count();
	let (start, end) = (sel.start(), sel.end());

	if marker.wraps(buffer, sel) {
		trace!(?marker, start, end, "unwrap");
		let buffer = buffer.splice(end..end + m, "").splice(start - m..start, "");
		Edit::new(buffer, Selection::new(start - m, end - m))
	} else {
		trace!(?marker, start, end, "wrap");
		let buffer = buffer.insert(end, text).insert(start, text);
		Edit::new(buffer, Selection::new(start + m, end + m))
	}
}

pub fn toggle_bold(buffer: &Buffer, sel: Selection) -> Edit {
	toggle(buffer, sel, Marker::Bold)
}

pub fn toggle_italic(buffer: &Buffer, sel: Selection) -> Edit {
	toggle(buffer, sel, Marker::Italic)
}

pub fn toggle_strikethrough(buffer: &Buffer, sel: Selection) -> Edit {
	toggle(buffer, sel, Marker::Strikethrough)
}

/// Wraps a non-empty selection in single backticks. Never unwraps.
pub fn inline_code(buffer: &Buffer, sel: Selection) -> Edit {
	wrap_with(buffer, sel, "`", "`")
}

/// Wraps a non-empty selection in a `<span style="color: ...">`.
pub fn color_span(buffer: &Buffer, sel: Selection, color: &str) -> Result<Edit, ValidationError> {
	if sel.is_empty() {
		return Err(ValidationError::EmptySelection);
	}
	if !is_safe_color(color) {
		return Err(ValidationError::InvalidColor(color.to_string()));
	}
	Ok(wrap_with(buffer, sel, &color_span_open(color), "</span>"))
}

fn wrap_with(buffer: &Buffer, sel: Selection, open: &str, close: &str) -> Edit {
	if sel.is_empty() {
		return Edit::unchanged(buffer, sel);
	}
	let shift = open.chars().count();
	let out = buffer.insert(sel.end(), close).insert(sel.start(), open);
	Edit::new(out, sel.map(|pos| pos + shift))
}
