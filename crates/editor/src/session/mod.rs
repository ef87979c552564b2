//! The editing session aggregate.
//!
//! [`EditorSession`] owns everything one open document needs: the visible
//! buffer and selection, the undo history with its pending typing burst, the
//! scroll position, the dirty flag, at most one insertion dialog and the
//! rendered preview. The host UI reports typing through
//! [`EditorSession::input`], drives the debounce with [`EditorSession::tick`]
//! and sends everything else as a [`Command`].
//!
//! # Dialog lifecycle
//!
//! ```text
//! Open* ──► Modal { request, origin, status }
//!             │ set_* / select_image        (fields, validation status)
//!             ├── CloseModal / Escape ──► closed, origin selection restored
//!             └── SubmitModal / Enter ──► validate ──► splice ──► history
//!                    image: begin_upload ──► (host awaits upload) ──► finish_upload
//! ```

use std::time::Instant;

use folio_primitives::{Buffer, CharIdx, Edit, Key, Selection};
use folio_render::{Preview, Renderer};
use tracing::{debug, trace, warn};

use crate::command::{Command, CommandOutcome};
use crate::config::EditorConfig;
use crate::error::{EditorError, Result, ServiceError, ValidationError};
use crate::format;
use crate::history::History;
use crate::insert::{
	self, InsertionRequest, Modal, ModalKind, SelectedFile, StatusKind, UploadTicket,
};
use crate::keymap;
use crate::services::{DocumentId, DocumentStore, ImageUploader, UploadedImage};


/// Editing state of one document.
#[derive(Debug)]
pub struct EditorSession {
	document: DocumentId,
	buffer: Buffer,
	selection: Selection,
	history: History,
	scroll: usize,
	dirty: bool,
	modal: Option<Modal>,
	next_modal_id: u64,
	config: EditorConfig,
	renderer: Renderer,
	preview: Preview,
}

impl EditorSession {
	/// Creates a session for `content`, with the caret at the start.
	pub fn new(document: DocumentId, content: &str, config: EditorConfig) -> Self {
		let buffer = Buffer::new(content);
		let renderer = Renderer::new(config.render.clone());
		let preview = renderer.render(content);
		Self {
			document,
			history: History::with_config(buffer.clone(), &config.history),
			buffer,
			selection: Selection::point(0),
			scroll: 0,
			dirty: false,
			modal: None,
			next_modal_id: 0,
			config,
			renderer,
			preview,
		}
	}

	/// Loads `id` from `store` and seeds a session with its content.
	pub async fn load(store: &dyn DocumentStore, id: DocumentId, config: EditorConfig) -> Result<Self> {
		let document = store.load(&id).await.inspect_err(|error| {
			warn!(document = %id, %error, "document load failed");
		})?;
		debug!(document = %id, chars = document.content.chars().count(), "document loaded");
		Ok(Self::new(id, &document.content, config))
	}

	/// Persists the visible content, committing any pending typing first.
	///
	/// Clears the dirty flag on success. History is not otherwise touched.
	pub async fn save(&mut self, store: &dyn DocumentStore) -> Result<()> {
		self.history.flush();
		let content = self.buffer.to_string();
		match store.save(&self.document, &content).await {
			Ok(()) => {
				self.dirty = false;
				debug!(document = %self.document, chars = self.buffer.len_chars(), "document saved");
				Ok(())
			}
			Err(error) => {
				warn!(document = %self.document, %error, "document save failed");
				Err(error.into())
			}
		}
	}

	pub fn document_id(&self) -> &DocumentId {
		&self.document
	}

	/// The visible buffer.
	pub fn buffer(&self) -> &Buffer {
		&self.buffer
	}

	pub fn selection(&self) -> Selection {
		self.selection
	}

	/// Records a selection change from the host, clamped to the buffer.
	pub fn set_selection(&mut self, selection: Selection) {
		self.selection = selection.clamp(self.buffer.len_chars());
	}

	pub fn scroll(&self) -> usize {
		self.scroll
	}

	pub fn set_scroll(&mut self, scroll: usize) {
		self.scroll = scroll;
	}

	/// Returns true if the buffer changed since the last load or save.
	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	pub fn history(&self) -> &History {
		&self.history
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	/// The open insertion dialog, if any.
	pub fn modal(&self) -> Option<&Modal> {
		self.modal.as_ref()
	}

	/// Rendered preview of the visible buffer.
	pub fn preview(&self) -> &Preview {
		&self.preview
	}

	/// Records typed text reported by the host.
	///
	/// The text is visible immediately; it enters history once typing pauses
	/// for the debounce period (see [`Self::tick`]).
	pub fn input(&mut self, content: &str, selection: Selection, now: Instant) {
		let buffer = Buffer::new(content);
		if buffer == self.buffer {
			self.set_selection(selection);
			return;
		}
		self.history.commit_typing(buffer.clone(), now);
		self.show(buffer, selection);
	}

	/// Commits the pending typing burst if its debounce has elapsed.
	pub fn tick(&mut self, now: Instant) -> bool {
		self.history.poll(now)
	}

	/// When the host should next call [`Self::tick`].
	pub fn next_deadline(&self) -> Option<Instant> {
		self.history.deadline()
	}

	/// Resolves a key press and executes its command.
	///
	/// Returns `None` if the key is not bound, so the host treats it as typing.
	pub fn handle_key(&mut self, key: &Key) -> Option<Result<CommandOutcome>> {
		let command = keymap::lookup(key, self.modal.as_ref().map(Modal::kind))?;
		trace!(?key, ?command, "key bound");
		Some(self.execute(command))
	}

	/// Executes a command against the visible buffer and selection.
	pub fn execute(&mut self, command: Command) -> Result<CommandOutcome> {
		let (buffer, sel) = (&self.buffer, self.selection);
		let edit = match command {
			Command::Bold => format::toggle_bold(buffer, sel),
			Command::Italic => format::toggle_italic(buffer, sel),
			Command::Strikethrough => format::toggle_strikethrough(buffer, sel),
			Command::InlineCode => format::inline_code(buffer, sel),
			Command::Heading(level) => format::heading(buffer, sel, level),
			Command::OrderedList => format::ordered_list(buffer, sel),
			Command::UnorderedList => format::unordered_list(buffer, sel),
			Command::Blockquote => format::blockquote(buffer, sel),
			Command::Color(color) => format::color_span(buffer, sel, &color)?,
			Command::Undo => return Ok(self.undo()),
			Command::Redo => return Ok(self.redo()),
			Command::Save => return Ok(CommandOutcome::SaveRequested),
			open @ (Command::OpenLink
			| Command::OpenTable
			| Command::OpenFootnote
			| Command::OpenFormula
			| Command::OpenImage) => {
				let kind = open.opens().ok_or(ValidationError::NoModal)?;
				self.open_modal(kind);
				return Ok(CommandOutcome::ModalOpened(kind));
			}
			Command::SubmitModal => return self.submit_modal(),
			Command::CloseModal => return Ok(self.close_modal().unwrap_or(CommandOutcome::Unchanged)),
		};
		Ok(self.apply(edit))
	}

	/// Commits a formatting result to history and makes it visible.
	///
	/// A result that leaves the text as it is only moves the selection and
	/// returns before [`History::commit_formatting`], so a pending typing
	/// burst stays pending until its own deadline.
	fn apply(&mut self, edit: Edit) -> CommandOutcome {
		if !edit.changes(&self.buffer) {
			self.selection = edit.selection;
			return CommandOutcome::Unchanged;
		}
		self.history.commit_formatting(edit.buffer.clone());
		self.show(edit.buffer.clone(), edit.selection);
		CommandOutcome::Applied(edit)
	}

	fn show(&mut self, buffer: Buffer, selection: Selection) {
		self.buffer = buffer;
		self.selection = selection.clamp(self.buffer.len_chars());
		self.dirty = true;
		self.refresh_preview();
	}

	fn refresh_preview(&mut self) {
		self.preview = self.renderer.render(&self.buffer.to_string());
		if !self.preview.diagnostics.is_empty() {
			trace!(failures = self.preview.diagnostics.len(), "preview has math errors");
		}
	}

	/// Steps back in history. The selection is clamped; scroll is kept.
	pub fn undo(&mut self) -> CommandOutcome {
		match self.history.undo().cloned() {
			Some(buffer) => self.restore(buffer),
			None => CommandOutcome::Unchanged,
		}
	}

	/// Steps forward in history. The selection is clamped; scroll is kept.
	pub fn redo(&mut self) -> CommandOutcome {
		match self.history.redo().cloned() {
			Some(buffer) => self.restore(buffer),
			None => CommandOutcome::Unchanged,
		}
	}

	fn restore(&mut self, buffer: Buffer) -> CommandOutcome {
		let selection = self.selection;
		self.show(buffer, selection);
		CommandOutcome::Applied(Edit::new(self.buffer.clone(), self.selection))
	}

	/// Opens an insertion dialog, replacing any open one.
	pub fn open_modal(&mut self, kind: ModalKind) -> &mut Modal {
		if let Some(old) = &self.modal {
			debug!(old = %old.kind(), new = %kind, "dialog replaced");
		}
		self.next_modal_id += 1;
		let request = InsertionRequest::open(kind, &self.buffer, self.selection);
		debug!(modal = %kind, origin = ?self.selection, "dialog opened");
		self.modal.insert(Modal::new(self.next_modal_id, request, self.selection))
	}

	/// Closes the dialog without inserting and restores its origin
	/// selection. A running upload for it is abandoned.
	///
	/// Returns [`CommandOutcome::ModalClosed`], carrying the image preview URL
	/// the host should release, or `None` if no dialog was open.
	pub fn close_modal(&mut self) -> Option<CommandOutcome> {
		let modal = self.modal.take()?;
		debug!(modal = %modal.kind(), "dialog cancelled");
		self.selection = modal.origin.clamp(self.buffer.len_chars());
		let preview_url = match modal.request {
			InsertionRequest::Image(req) => req.preview_url,
			_ => None,
		};
		Some(CommandOutcome::ModalClosed {
			origin: self.selection,
			preview_url,
		})
	}

	/// Sets the link dialog fields.
	pub fn set_link(&mut self, text: &str, url: &str) -> Result<()> {
		if let InsertionRequest::Link(req) = &mut self.modal_of(ModalKind::Link)?.request {
			req.text = text.to_string();
			req.url = url.to_string();
		}
		Ok(())
	}

	/// Sets the table dialog dimensions.
	pub fn set_table(&mut self, rows: usize, cols: usize) -> Result<()> {
		if let InsertionRequest::Table(req) = &mut self.modal_of(ModalKind::Table)?.request {
			req.rows = rows;
			req.cols = cols;
		}
		Ok(())
	}

	/// Sets the footnote dialog body.
	pub fn set_footnote(&mut self, body: &str) -> Result<()> {
		if let InsertionRequest::Footnote(req) = &mut self.modal_of(ModalKind::Footnote)?.request {
			req.body = body.to_string();
		}
		Ok(())
	}

	/// Sets the formula dialog LaTeX.
	pub fn set_formula(&mut self, latex: &str) -> Result<()> {
		if let InsertionRequest::Formula(req) = &mut self.modal_of(ModalKind::Formula)?.request {
			req.latex = latex.to_string();
		}
		Ok(())
	}

	/// Attaches a validated image file (and its local preview URL) to the
	/// image dialog.
	pub fn select_image(&mut self, file: SelectedFile, preview_url: Option<String>) -> Result<()> {
		let modal = self.modal_of(ModalKind::Image)?;
		if let InsertionRequest::Image(req) = &mut modal.request {
			if req.is_busy() {
				return Err(ValidationError::Busy.into());
			}
			trace!(?file, "image selected");
			req.file = Some(file);
			req.preview_url = preview_url;
		}
		modal.clear_status();
		Ok(())
	}

	/// Returns the open dialog if it is of `kind`.
	fn modal_of(&mut self, kind: ModalKind) -> std::result::Result<&mut Modal, ValidationError> {
		match self.modal.as_mut() {
			Some(modal) if modal.kind() == kind => Ok(modal),
			Some(modal) => Err(ValidationError::WrongModal {
				expected: kind,
				found: modal.kind(),
			}),
			None => Err(ValidationError::NoModal),
		}
	}

	/// Validates and commits the open dialog.
	///
	/// On failure the dialog stays open with an error status and the buffer
	/// is untouched. Submitting the image dialog starts its upload instead
	/// (see [`Self::begin_upload`]).
	pub fn submit_modal(&mut self) -> Result<CommandOutcome> {
		let kind = self.modal.as_ref().map(Modal::kind).ok_or(ValidationError::NoModal)?;
		if kind == ModalKind::Image {
			return self.begin_upload().map(CommandOutcome::UploadStarted);
		}

		let result = match self.modal.as_ref().map(|m| (&m.request, m.origin)) {
			Some((request, origin)) => {
				let sel = origin.clamp(self.buffer.len_chars());
				let buffer = &self.buffer;
				match request {
					InsertionRequest::Link(req) => insert::insert_link(buffer, sel, &req.text, &req.url),
					InsertionRequest::Table(req) => Ok(insert::insert_table(
						buffer,
						sel,
						req.rows,
						req.cols,
						&self.config.table,
					)),
					InsertionRequest::Footnote(req) => insert::insert_footnote(buffer, sel, &req.body),
					InsertionRequest::Formula(req) => insert::insert_formula(buffer, sel, &req.latex),
					InsertionRequest::Image(_) => Err(ValidationError::NoFile),
				}
			}
			None => Err(ValidationError::NoModal),
		};

		match result {
			Ok(edit) => {
				self.modal = None;
				debug!(modal = %kind, "dialog committed");
				Ok(self.apply(edit))
			}
			Err(error) => {
				if let Some(modal) = self.modal.as_mut() {
					modal.set_status(StatusKind::Error, error.to_string());
				}
				debug!(modal = %kind, %error, "dialog submit rejected");
				Err(error.into())
			}
		}
	}

	/// Starts uploading the selected image.
	///
	/// Marks the dialog busy and returns a ticket the host must pass to
	/// [`Self::finish_upload`] with the uploader's result.
	pub fn begin_upload(&mut self) -> Result<UploadTicket> {
		let caret = self.modal.as_ref().map_or(self.selection, |m| m.origin).end();
		let modal = self.modal_of(ModalKind::Image)?;
		let modal_id = modal.id;
		let InsertionRequest::Image(req) = &mut modal.request else {
			return Err(ValidationError::NoModal.into());
		};
		if req.is_busy() {
			return Err(ValidationError::Busy.into());
		}
		if req.file.is_none() {
			modal.set_status(StatusKind::Error, ValidationError::NoFile.to_string());
			return Err(ValidationError::NoFile.into());
		}
		req.attempts += 1;
		req.in_flight = Some(req.attempts);
		let ticket = UploadTicket {
			modal: modal_id,
			attempt: req.attempts,
			caret,
		};
		modal.set_status(StatusKind::Info, "uploading...");
		debug!(modal = modal_id, attempt = ticket.attempt, caret, "upload started");
		Ok(ticket)
	}

	/// Applies an upload result.
	///
	/// Results for a dialog that was cancelled or replaced, or for an
	/// earlier attempt, are discarded and `None` is returned. On success the
	/// image is inserted at the caret captured before the upload and the
	/// dialog closes; release the returned preview URL. On failure the
	/// dialog stays open with an error status and the buffer is untouched.
	pub fn finish_upload(
		&mut self,
		ticket: UploadTicket,
		result: std::result::Result<UploadedImage, ServiceError>,
	) -> Option<UploadFinished> {
		let Some(modal) = self.modal.as_mut().filter(|m| m.id == ticket.modal) else {
			debug!(modal = ticket.modal, "upload result discarded: dialog closed");
			return None;
		};
		let InsertionRequest::Image(req) = &mut modal.request else {
			return None;
		};
		if req.in_flight != Some(ticket.attempt) {
			debug!(attempt = ticket.attempt, "upload result discarded: stale attempt");
			return None;
		}
		req.in_flight = None;

		match result {
			Ok(image) => {
				let preview_url = req.preview_url.take();
				self.modal = None;
				debug!(url = %image.url, caret = ticket.caret, "upload finished");
				let edit = insert::insert_image(&self.buffer, ticket.caret, &image.alt, &image.url);
				let outcome = self.apply(edit);
				Some(UploadFinished::Inserted { outcome, preview_url })
			}
			Err(error) => {
				warn!(%error, "upload failed");
				modal.set_status(StatusKind::Error, error.to_string());
				Some(UploadFinished::Failed(error))
			}
		}
	}

	/// Runs the whole image upload: begin, await the uploader, finish, and
	/// release the preview URL.
	pub async fn upload_image(&mut self, uploader: &dyn ImageUploader) -> Result<CommandOutcome> {
		let ticket = self.begin_upload()?;
		let (bytes, mime) = match self.modal.as_ref().map(|m| &m.request) {
			Some(InsertionRequest::Image(req)) => match &req.file {
				Some(file) => (file.bytes.clone(), file.mime.clone()),
				None => return Err(ValidationError::NoFile.into()),
			},
			_ => return Err(ValidationError::NoModal.into()),
		};
		let result = uploader.upload(&bytes, &mime).await;
		match self.finish_upload(ticket, result) {
			Some(UploadFinished::Inserted { outcome, preview_url }) => {
				if let Some(url) = preview_url {
					uploader.release_preview(&url).await;
				}
				Ok(outcome)
			}
			Some(UploadFinished::Failed(error)) => Err(EditorError::Service(error)),
			None => Ok(CommandOutcome::Unchanged),
		}
	}

	/// Caret position used for insertions.
	pub fn caret(&self) -> CharIdx {
		self.selection.end()
	}
}

/// Result of [`EditorSession::finish_upload`] for a current ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFinished {
	/// The image was inserted; release `preview_url` if present.
	Inserted {
		outcome: CommandOutcome,
		preview_url: Option<String>,
	},
	/// The upload failed; the dialog shows the error.
	Failed(ServiceError),
}
