//! Immutable text buffer snapshots.
//!
//! A [`Buffer`] wraps a [`Rope`] and never changes after construction. Every
//! splice returns a new buffer; clones share the underlying chunks, which keeps
//! history snapshots cheap to store and compare.
//!
//! All offsets are character offsets. Line helpers only treat `\n` as a line
//! break, matching how a browser text area reports its content.

use std::fmt;
use std::ops::Range;

use ropey::{Rope, RopeSlice};

/// A position in the text, measured in characters (not bytes).
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
pub type CharLen = usize;

/// Immutable markdown source snapshot.
#[derive(Clone)]
pub struct Buffer {
	rope: Rope,
}

impl Buffer {
	/// Creates a buffer holding `text`.
	pub fn new(text: &str) -> Self {
		Self {
			rope: Rope::from_str(text),
		}
	}

	/// Creates an empty buffer.
	pub fn empty() -> Self {
		Self { rope: Rope::new() }
	}

	/// Returns the underlying rope.
	pub fn rope(&self) -> &Rope {
		&self.rope
	}

	/// Returns the buffer length in characters.
	#[inline]
	pub fn len_chars(&self) -> CharLen {
		self.rope.len_chars()
	}

	/// Returns true if the buffer holds no text.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.rope.len_chars() == 0
	}

	/// Returns a slice of the buffer, clamped to its bounds.
	pub fn slice(&self, range: Range<CharIdx>) -> RopeSlice<'_> {
		let (start, end) = self.clamp_range(range);
		self.rope.slice(start..end)
	}

	/// Returns the text of `range` as an owned string, clamped to the buffer bounds.
	pub fn text(&self, range: Range<CharIdx>) -> String {
		self.slice(range).to_string()
	}

	/// Returns the character at `idx`, if any.
	pub fn char_at(&self, idx: CharIdx) -> Option<char> {
		self.rope.get_char(idx)
	}

	/// Returns true if the text immediately before `idx` equals `pat`.
	pub fn ends_with_at(&self, idx: CharIdx, pat: &str) -> bool {
		let n = pat.chars().count();
		idx <= self.len_chars() && idx >= n && self.rope.slice(idx - n..idx).chars().eq(pat.chars())
	}

	/// Returns true if the text starting at `idx` begins with `pat`.
	pub fn starts_with_at(&self, idx: CharIdx, pat: &str) -> bool {
		let n = pat.chars().count();
		idx + n <= self.len_chars() && self.rope.slice(idx..idx + n).chars().eq(pat.chars())
	}

	/// Counts consecutive `ch` characters ending right before `idx`.
	pub fn run_before(&self, idx: CharIdx, ch: char) -> CharLen {
		let idx = idx.min(self.len_chars());
		let mut chars = self.rope.chars_at(idx);
		let mut run = 0;
		while chars.prev() == Some(ch) {
			run += 1;
		}
		run
	}

	/// Counts consecutive `ch` characters starting at `idx`.
	pub fn run_after(&self, idx: CharIdx, ch: char) -> CharLen {
		let idx = idx.min(self.len_chars());
		self.rope.chars_at(idx).take_while(|&c| c == ch).count()
	}

	/// Returns the start of the line containing `idx`.
	///
	/// Scans backward to the character after the preceding `\n`, or to 0.
	pub fn line_start(&self, idx: CharIdx) -> CharIdx {
		let mut pos = idx.min(self.len_chars());
		let mut chars = self.rope.chars_at(pos);
		while let Some(c) = chars.prev() {
			if c == '\n' {
				break;
			}
			pos -= 1;
		}
		pos
	}

	/// Returns the end of the line containing `idx` (the offset of the next
	/// `\n`, or the buffer length).
	pub fn line_end(&self, idx: CharIdx) -> CharIdx {
		let start = idx.min(self.len_chars());
		start + self.rope.chars_at(start).take_while(|&c| c != '\n').count()
	}

	/// Returns a new buffer with `range` replaced by `text`.
	pub fn splice(&self, range: Range<CharIdx>, text: &str) -> Self {
		let (start, end) = self.clamp_range(range);
		let mut rope = self.rope.clone();
		if start < end {
			rope.remove(start..end);
		}
		if !text.is_empty() {
			rope.insert(start, text);
		}
		Self { rope }
	}

	/// Returns a new buffer with `text` inserted at `idx`.
	pub fn insert(&self, idx: CharIdx, text: &str) -> Self {
		let idx = idx.min(self.len_chars());
		self.splice(idx..idx, text)
	}

	/// Returns a new buffer with `text` appended at the end.
	pub fn append(&self, text: &str) -> Self {
		self.insert(self.len_chars(), text)
	}

	fn clamp_range(&self, range: Range<CharIdx>) -> (CharIdx, CharIdx) {
		let len = self.len_chars();
		let end = range.end.min(len);
		(range.start.min(end), end)
	}
}

impl Default for Buffer {
	fn default() -> Self {
		Self::empty()
	}
}

impl PartialEq for Buffer {
	fn eq(&self, other: &Self) -> bool {
		self.rope == other.rope
	}
}

impl Eq for Buffer {}

impl PartialEq<str> for Buffer {
	fn eq(&self, other: &str) -> bool {
		self.rope.len_bytes() == other.len() && self.rope.chars().eq(other.chars())
	}
}

impl PartialEq<&str> for Buffer {
	fn eq(&self, other: &&str) -> bool {
		*self == **other
	}
}

impl From<&str> for Buffer {
	fn from(text: &str) -> Self {
		Self::new(text)
	}
}

impl From<String> for Buffer {
	fn from(text: String) -> Self {
		Self::new(&text)
	}
}

impl From<Rope> for Buffer {
	fn from(rope: Rope) -> Self {
		Self { rope }
	}
}

impl fmt::Display for Buffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.rope, f)
	}
}

impl fmt::Debug for Buffer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Buffer").field(&self.rope.to_string()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splice_replaces_range() {
		let buf = Buffer::new("hello world");
		assert_eq!(buf.splice(0..5, "howdy"), "howdy world");
		assert_eq!(buf, "hello world");
	}

	#[test]
	fn splice_clamps_out_of_range() {
		let buf = Buffer::new("abc");
		assert_eq!(buf.splice(2..10, "Z"), "abZ");
		assert_eq!(buf.insert(99, "!"), "abc!");
	}

	#[test]
	fn line_bounds_only_break_on_newline() {
		let buf = Buffer::new("one\ntwo three\nfour");
		assert_eq!(buf.line_start(6), 4);
		assert_eq!(buf.line_end(6), 13);
		assert_eq!(buf.line_start(0), 0);
		assert_eq!(buf.line_end(15), 18);
	}

	#[test]
	fn line_bounds_at_newline_boundary() {
		let buf = Buffer::new("ab\ncd");
		assert_eq!(buf.line_start(3), 3);
		assert_eq!(buf.line_end(2), 2);
		assert_eq!(buf.line_start(2), 0);
	}

	#[test]
	fn marker_probes() {
		let buf = Buffer::new("**bold**");
		assert!(buf.ends_with_at(2, "**"));
		assert!(buf.starts_with_at(6, "**"));
		assert!(!buf.ends_with_at(1, "**"));
		assert!(!buf.starts_with_at(7, "**"));
		assert_eq!(buf.run_before(2, '*'), 2);
		assert_eq!(buf.run_after(6, '*'), 2);
	}

	#[test]
	fn char_offsets_are_not_bytes() {
		let buf = Buffer::new("héllo");
		assert_eq!(buf.len_chars(), 5);
		assert_eq!(buf.text(1..2), "é");
		assert_eq!(buf.splice(1..2, "e"), "hello");
	}
}
