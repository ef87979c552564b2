//! Editor core for the folio markdown editor.
//!
//! The crate is UI-agnostic. A host reports typing and selection changes to
//! an [`EditorSession`], sends it [`Command`]s for toolbar and keyboard
//! actions, and writes the resulting buffer and selection back to its text
//! surface. The pieces:
//!
//! * [`history`]: bounded snapshot history with debounced typing.
//! * [`format`]: pure formatting transforms over a buffer and selection.
//! * [`insert`]: link, table, footnote, formula and image insertion.
//! * [`services`]: collaborator traits for persistence and image upload.
//! * [`session`]: the aggregate tying them to the rendered preview.

pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod insert;
pub mod keymap;
pub mod services;
pub mod session;

pub use command::{Command, CommandOutcome};
pub use config::{EditorConfig, HistoryConfig, TableLimits};
pub use error::{ConfigError, EditorError, Result, ServiceError, ValidationError};
pub use folio_primitives::{Buffer, Edit, Key, KeyCode, Modifiers, Selection};
pub use folio_render::{Preview, RenderConfig};
pub use history::History;
pub use insert::{InsertionRequest, Modal, ModalKind, StatusKind, UploadTicket};
pub use services::{Document, DocumentId, DocumentStore, ImageUploader, Tag, TagStore, UploadedImage};
pub use session::{EditorSession, UploadFinished};
