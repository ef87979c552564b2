//! Error types for the editor core.

use std::path::PathBuf;

use thiserror::Error;

use crate::insert::ModalKind;

/// A modal submission or formatting request that cannot be applied.
///
/// Validation failures never mutate the buffer; sessions record them in the
/// open modal's status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// A required field is empty after trimming.
	#[error("{field} must not be empty")]
	EmptyField {
		/// Human-readable field name.
		field: &'static str,
	},
	/// A dropped, pasted or picked file is not an image.
	#[error("unsupported file type '{0}', expected an image")]
	NotAnImage(String),
	/// No image has been selected yet.
	#[error("no image selected")]
	NoFile,
	/// A color span value that is not a safe CSS color.
	#[error("invalid color '{0}'")]
	InvalidColor(String),
	/// The operation requires an open modal.
	#[error("no insertion dialog is open")]
	NoModal,
	/// The open modal is of a different kind.
	#[error("expected the {expected} dialog, but the {found} dialog is open")]
	WrongModal {
		/// Modal the operation needs.
		expected: ModalKind,
		/// Modal that is open.
		found: ModalKind,
	},
	/// An upload is already running for this modal.
	#[error("an upload is already in progress")]
	Busy,
	/// The operation needs a non-empty selection.
	#[error("select some text first")]
	EmptySelection,
}

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
	/// The requested document does not exist.
	#[error("document not found: {0}")]
	NotFound(String),
	/// The collaborator rejected the request.
	#[error("request rejected: {0}")]
	Rejected(String),
	/// The collaborator could not be reached or failed.
	#[error("service unavailable: {0}")]
	Unavailable(String),
}

/// Errors from loading editor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML.
	#[error("invalid configuration{}: {error}", location(.path))]
	Parse {
		/// File the text came from, if any.
		path: Option<PathBuf>,
		/// The underlying parse error.
		error: toml::de::Error,
	},

	/// A value is outside its allowed range.
	#[error("invalid value for {field}: {reason}")]
	InvalidValue {
		/// Dotted key of the offending field.
		field: &'static str,
		/// What is wrong with it.
		reason: String,
	},
}

fn location(path: &Option<PathBuf>) -> String {
	path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default()
}

/// Any failure surfaced by an [`EditorSession`](crate::EditorSession)
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
	#[error(transparent)]
	Validation(#[from] ValidationError),
	#[error(transparent)]
	Service(#[from] ServiceError),
}

/// Result type for editor session operations.
pub type Result<T> = std::result::Result<T, EditorError>;
