//! Core types for the folio editor: text buffers, selections, edits and keys.

/// Immutable rope-backed text snapshots.
pub mod buffer;
/// Result of a buffer transformation.
pub mod edit;
/// Key and modifier types for the keyboard surface.
pub mod key;
/// Character-offset selection ranges.
pub mod selection;

pub use buffer::{Buffer, CharIdx, CharLen};
pub use edit::Edit;
pub use key::{Key, KeyCode, Modifiers};
pub use ropey::{Rope, RopeSlice};
pub use selection::Selection;
