//! Modal state for insertion dialogs.

use std::fmt;

use folio_primitives::{Buffer, Selection};

use super::{FootnoteRequest, FormulaRequest, ImageRequest, LinkRequest, TableRequest};

/// Which insertion dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
	Link,
	Table,
	Footnote,
	Formula,
	Image,
}

impl ModalKind {
	pub const fn name(self) -> &'static str {
		match self {
			Self::Link => "link",
			Self::Table => "table",
			Self::Footnote => "footnote",
			Self::Formula => "formula",
			Self::Image => "image",
		}
	}

	/// Multi-line dialogs commit on Ctrl/Cmd+Enter instead of plain Enter.
	pub const fn is_multiline(self) -> bool {
		matches!(self, Self::Formula)
	}
}

impl fmt::Display for ModalKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Severity kind for modal status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
	Info,
	Warn,
	Error,
}

/// Parameters of an open insertion dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertionRequest {
	Link(LinkRequest),
	Table(TableRequest),
	Footnote(FootnoteRequest),
	Formula(FormulaRequest),
	Image(ImageRequest),
}

impl InsertionRequest {
	/// Seeds a request for `kind` from the current buffer and selection.
	pub fn open(kind: ModalKind, buffer: &Buffer, sel: Selection) -> Self {
		match kind {
			ModalKind::Link => Self::Link(LinkRequest::from_selection(buffer, sel)),
			ModalKind::Table => Self::Table(TableRequest::default()),
			ModalKind::Footnote => Self::Footnote(FootnoteRequest::default()),
			ModalKind::Formula => Self::Formula(FormulaRequest::from_selection(buffer, sel)),
			ModalKind::Image => Self::Image(ImageRequest::default()),
		}
	}

	pub fn kind(&self) -> ModalKind {
		match self {
			Self::Link(_) => ModalKind::Link,
			Self::Table(_) => ModalKind::Table,
			Self::Footnote(_) => ModalKind::Footnote,
			Self::Formula(_) => ModalKind::Formula,
			Self::Image(_) => ModalKind::Image,
		}
	}

	/// Returns true if every required field is filled in.
	pub fn is_ready(&self) -> bool {
		match self {
			Self::Link(req) => req.is_ready(),
			Self::Table(_) => true,
			Self::Footnote(req) => req.is_ready(),
			Self::Formula(req) => req.is_ready(),
			Self::Image(req) => req.file.is_some() && !req.is_busy(),
		}
	}
}

/// An open insertion dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
	/// Distinguishes this dialog from earlier ones, so late upload results
	/// for a closed dialog can be recognised.
	pub(crate) id: u64,
	pub request: InsertionRequest,
	/// Selection when the dialog opened; restored on cancel.
	pub origin: Selection,
	pub status: Option<(StatusKind, String)>,
}

impl Modal {
	pub(crate) fn new(id: u64, request: InsertionRequest, origin: Selection) -> Self {
		Self {
			id,
			request,
			origin,
			status: None,
		}
	}

	pub fn kind(&self) -> ModalKind {
		self.request.kind()
	}

	/// Sets the status message.
	pub fn set_status(&mut self, kind: StatusKind, msg: impl Into<String>) {
		self.status = Some((kind, msg.into()));
	}

	/// Clears the status message.
	pub fn clear_status(&mut self) {
		self.status = None;
	}
}
