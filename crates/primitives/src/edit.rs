//! Result of a buffer transformation.

use crate::buffer::Buffer;
use crate::selection::Selection;

/// A new buffer plus the selection the host should apply after it.
///
/// Transformations are pure: they never touch a live text surface. The host
/// applies `selection` once `buffer` has been written back to its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
	/// Buffer after the transformation.
	pub buffer: Buffer,
	/// Selection to restore after the transformation.
	pub selection: Selection,
}

impl Edit {
	/// Creates an edit result.
	pub fn new(buffer: Buffer, selection: Selection) -> Self {
		Self { buffer, selection }
	}

	/// Creates a result that leaves `buffer` and `selection` as they were.
	pub fn unchanged(buffer: &Buffer, selection: Selection) -> Self {
		Self {
			buffer: buffer.clone(),
			selection,
		}
	}

	/// Returns true if the buffer differs from `before`.
	pub fn changes(&self, before: &Buffer) -> bool {
		self.buffer != *before
	}
}
