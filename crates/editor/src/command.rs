//! Explicit editor commands.
//!
//! The host UI turns toolbar clicks and key presses into [`Command`]s and
//! hands them to [`EditorSession::execute`](crate::EditorSession::execute).

use folio_primitives::{Edit, Selection};

use crate::insert::{ModalKind, UploadTicket};

/// An action the host can ask the session to perform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
	Bold,
	Italic,
	Strikethrough,
	InlineCode,
	/// Heading level 0..=6; 0 removes the heading.
	Heading(u8),
	OrderedList,
	UnorderedList,
	Blockquote,
	/// Wraps the selection in a color span.
	Color(String),
	Undo,
	Redo,
	Save,
	OpenLink,
	OpenTable,
	OpenFootnote,
	OpenFormula,
	OpenImage,
	/// Commits the open dialog.
	SubmitModal,
	/// Closes the open dialog without inserting anything.
	CloseModal,
}

impl Command {
	/// The dialog this command opens, if any.
	pub fn opens(&self) -> Option<ModalKind> {
		match self {
			Self::OpenLink => Some(ModalKind::Link),
			Self::OpenTable => Some(ModalKind::Table),
			Self::OpenFootnote => Some(ModalKind::Footnote),
			Self::OpenFormula => Some(ModalKind::Formula),
			Self::OpenImage => Some(ModalKind::Image),
			_ => None,
		}
	}
}

/// What executing a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
	/// The buffer changed; the host applies the new text and selection.
	Applied(Edit),
	/// Nothing changed.
	Unchanged,
	/// The host should persist the document (see `EditorSession::save`).
	SaveRequested,
	ModalOpened(ModalKind),
	/// The dialog closed; the host restores `origin` and releases
	/// `preview_url` if one was attached.
	ModalClosed {
		origin: Selection,
		preview_url: Option<String>,
	},
	/// An image upload started; the host awaits the uploader and passes
	/// the result to `EditorSession::finish_upload` with this ticket.
	UploadStarted(UploadTicket),
}
