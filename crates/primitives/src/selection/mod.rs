use std::ops::Range;

use crate::buffer::{CharIdx, CharLen};

#[cfg(test)]
mod tests;

/// The active cursor or selection range, in character offsets.
///
/// Always normalised so that `start <= end`. A selection with
/// `start == end` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
	start: CharIdx,
	end: CharIdx,
}

impl Selection {
	/// Creates a selection between two offsets, in either order.
	pub fn new(a: CharIdx, b: CharIdx) -> Self {
		Self {
			start: a.min(b),
			end: a.max(b),
		}
	}

	/// Creates a caret (zero-width selection) at `pos`.
	pub fn point(pos: CharIdx) -> Self {
		Self::new(pos, pos)
	}

	/// Start offset (inclusive).
	#[inline]
	pub fn start(&self) -> CharIdx {
		self.start
	}

	/// End offset (exclusive).
	#[inline]
	pub fn end(&self) -> CharIdx {
		self.end
	}

	/// Returns the selected range.
	#[inline]
	pub fn range(&self) -> Range<CharIdx> {
		self.start..self.end
	}

	/// Returns the number of selected characters.
	#[inline]
	pub fn len(&self) -> CharLen {
		self.end - self.start
	}

	/// Returns true for a caret with nothing selected.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns a caret at the end of this selection.
	pub fn collapse_to_end(&self) -> Self {
		Self::point(self.end)
	}

	/// Clamps both offsets to `[0, max_char]`.
	pub fn clamp(&self, max_char: CharIdx) -> Self {
		Self::new(self.start.min(max_char), self.end.min(max_char))
	}

	/// Applies a function to both offsets.
	pub fn map(self, mut f: impl FnMut(CharIdx) -> CharIdx) -> Self {
		Self::new(f(self.start), f(self.end))
	}

	/// Returns true if `pos` lies inside the selection (exclusive of the end).
	pub fn contains(&self, pos: CharIdx) -> bool {
		pos >= self.start && pos < self.end
	}
}

impl From<Range<CharIdx>> for Selection {
	fn from(range: Range<CharIdx>) -> Self {
		Self::new(range.start, range.end)
	}
}
