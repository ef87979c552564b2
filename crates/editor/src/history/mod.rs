//! Bounded linear undo history with debounced typing.
//!
//! [`History`] keeps an ordered list of buffer snapshots and a cursor into
//! it. The snapshot under the cursor is what undo/redo shows. Typing does not
//! create an entry per keystroke: [`History::commit_typing`] parks the latest
//! buffer in a [`PendingEdit`] and [`History::poll`] commits it once the
//! debounce period has passed without further typing. Formatting and
//! insertions commit immediately through [`History::commit_formatting`], which
//! first flushes any pending burst so the two never coalesce.
//!
//! Time is always passed in by the caller. Nothing here reads a clock.
//!
//! ```text
//! entries: [e0, e1, e2, e3]      cursor = 2     pending: Some(typing)
//!                   ^ visible after undo/redo
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use folio_primitives::Buffer;
use tracing::trace;

use crate::config::{HistoryConfig, MAX_HISTORY, TYPING_DEBOUNCE};

#[cfg(test)]
mod tests;

/// An uncommitted typing burst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEdit {
	/// Latest buffer of the burst.
	pub buffer: Buffer,
	/// When the last keystroke of the burst happened.
	pub last_edit_at: Instant,
}

impl PendingEdit {
	/// Instant at which the burst becomes a history entry.
	pub fn deadline(&self, debounce: Duration) -> Instant {
		self.last_edit_at + debounce
	}

	/// Returns true once the debounce period has elapsed at `now`.
	pub fn is_due(&self, now: Instant, debounce: Duration) -> bool {
		now >= self.deadline(debounce)
	}
}

/// Linear undo history of buffer snapshots.
#[derive(Debug, Clone)]
pub struct History {
	entries: VecDeque<Buffer>,
	cursor: usize,
	max_entries: usize,
	debounce: Duration,
	pending: Option<PendingEdit>,
}

impl History {
	/// Creates a history seeded with `initial`, using default limits.
	pub fn new(initial: Buffer) -> Self {
		Self::with_limits(initial, MAX_HISTORY, TYPING_DEBOUNCE)
	}

	/// Creates a history seeded with `initial` from configuration.
	pub fn with_config(initial: Buffer, config: &HistoryConfig) -> Self {
		Self::with_limits(initial, config.max_entries, config.debounce())
	}

	/// Creates a history with explicit limits. `max_entries` is at least 1.
	pub fn with_limits(initial: Buffer, max_entries: usize, debounce: Duration) -> Self {
		Self {
			entries: VecDeque::from([initial]),
			cursor: 0,
			max_entries: max_entries.max(1),
			debounce,
			pending: None,
		}
	}

	/// Snapshot under the cursor.
	pub fn current(&self) -> &Buffer {
		// entries is never empty and cursor always indexes into it
		&self.entries[self.cursor]
	}

	/// Buffer the user sees: the pending burst if any, else [`Self::current`].
	pub fn visible(&self) -> &Buffer {
		self.pending.as_ref().map_or_else(|| self.current(), |p| &p.buffer)
	}

	/// The in-flight typing burst, if any.
	pub fn pending(&self) -> Option<&PendingEdit> {
		self.pending.as_ref()
	}

	/// When the pending burst will be committed, if there is one.
	pub fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|p| p.deadline(self.debounce))
	}

	pub fn debounce(&self) -> Duration {
		self.debounce
	}

	pub fn max_entries(&self) -> usize {
		self.max_entries
	}

	/// Number of retained entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Always false: a history holds at least its seed entry.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Index of the visible entry; 0 is the oldest retained.
	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Iterates over retained entries, oldest first.
	pub fn entries(&self) -> impl Iterator<Item = &Buffer> {
		self.entries.iter()
	}

	/// Records a keystroke. The buffer is visible at once; it becomes an
	/// entry when [`Self::poll`] finds the debounce elapsed.
	pub fn commit_typing(&mut self, buffer: Buffer, now: Instant) {
		let restarted = self.pending.is_some();
		self.pending = Some(PendingEdit {
			buffer,
			last_edit_at: now,
		});
		trace!(restarted, debounce_ms = self.debounce.as_millis() as u64, "typing deferred");
	}

	/// Commits the pending burst if its deadline has passed.
	///
	/// Returns true if an entry was added.
	pub fn poll(&mut self, now: Instant) -> bool {
		match &self.pending {
			Some(pending) if pending.is_due(now, self.debounce) => self.flush(),
			_ => false,
		}
	}

	/// Commits the pending burst immediately, cancelling its deadline.
	///
	/// Returns true if an entry was added.
	pub fn flush(&mut self) -> bool {
		match self.pending.take() {
			Some(pending) => self.commit(pending.buffer),
			None => false,
		}
	}

	/// Commits a formatting or insertion result.
	///
	/// Any pending typing is committed first as its own entry.
	pub fn commit_formatting(&mut self, buffer: Buffer) -> bool {
		let flushed = self.flush();
		let committed = self.commit(buffer);
		trace!(flushed, committed, "formatting committed");
		committed
	}

	/// Appends `buffer` as the newest entry.
	///
	/// A buffer equal to the current entry is ignored. Entries after the
	/// cursor are discarded first, and the oldest entries are evicted past the
	/// size limit. Returns true if an entry was added.
	pub fn commit(&mut self, buffer: Buffer) -> bool {
		if buffer == *self.current() {
			trace!(cursor = self.cursor, "commit skipped: unchanged");
			return false;
		}

		let discarded = self.entries.len() - self.cursor - 1;
		if discarded > 0 {
			self.entries.truncate(self.cursor + 1);
			trace!(discarded, "redo branch discarded");
		}

		self.entries.push_back(buffer);
		let mut evicted = 0;
		while self.entries.len() > self.max_entries {
			self.entries.pop_front();
			evicted += 1;
		}
		self.cursor = self.entries.len() - 1;

		trace!(
			entries = self.entries.len(),
			cursor = self.cursor,
			evicted,
			"history entry committed"
		);
		true
	}

	/// Returns true if [`Self::undo`] would change the visible buffer.
	pub fn can_undo(&self) -> bool {
		self.cursor > 0 || self.pending.as_ref().is_some_and(|p| p.buffer != *self.current())
	}

	/// Returns true if [`Self::redo`] would change the visible buffer.
	///
	/// A pending burst differing from the current entry discards the redo
	/// branch when flushed, so it disables redo.
	pub fn can_redo(&self) -> bool {
		let branch_survives = self.pending.as_ref().is_none_or(|p| p.buffer == *self.current());
		branch_survives && self.cursor + 1 < self.entries.len()
	}

	/// Steps back one entry, flushing pending typing first.
	///
	/// Returns the newly visible buffer, or `None` at the oldest entry.
	pub fn undo(&mut self) -> Option<&Buffer> {
		self.flush();
		if self.cursor == 0 {
			trace!("undo: nothing to undo");
			return None;
		}
		self.cursor -= 1;
		trace!(cursor = self.cursor, entries = self.entries.len(), "undo");
		Some(self.current())
	}

	/// Steps forward one entry, flushing pending typing first.
	///
	/// Returns the newly visible buffer, or `None` at the newest entry.
	pub fn redo(&mut self) -> Option<&Buffer> {
		self.flush();
		if self.cursor + 1 >= self.entries.len() {
			trace!("redo: nothing to redo");
			return None;
		}
		self.cursor += 1;
		trace!(cursor = self.cursor, entries = self.entries.len(), "redo");
		Some(self.current())
	}
}
