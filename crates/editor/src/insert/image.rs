//! Image insertion: file selection, upload tickets and the final splice.

use folio_primitives::{Buffer, CharIdx, Edit, Selection};

use crate::error::ValidationError;

/// Where a picked image came from. All sources share one validation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
	Picker,
	Drop,
	Paste,
}

/// An image file chosen for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
	pub name: String,
	pub mime: String,
	pub bytes: Vec<u8>,
	pub source: FileSource,
}

impl std::fmt::Debug for SelectedFile {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SelectedFile")
			.field("name", &self.name)
			.field("mime", &self.mime)
			.field("bytes", &self.bytes.len())
			.field("source", &self.source)
			.finish()
	}
}

/// Accepts a file if its MIME type is `image/*`.
pub fn select_file(
	name: impl Into<String>,
	mime: &str,
	bytes: Vec<u8>,
	source: FileSource,
) -> Result<SelectedFile, ValidationError> {
	let mime = mime.trim().to_ascii_lowercase();
	let is_image = mime
		.strip_prefix("image/")
		.is_some_and(|subtype| !subtype.is_empty());
	if !is_image {
		return Err(ValidationError::NotAnImage(mime));
	}
	Ok(SelectedFile {
		name: name.into(),
		mime,
		bytes,
		source,
	})
}

/// Image dialog fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRequest {
	pub file: Option<SelectedFile>,
	/// Local preview URL the host created for `file`.
	pub preview_url: Option<String>,
	/// Attempt number of the running upload, if any.
	pub(crate) in_flight: Option<u64>,
	pub(crate) attempts: u64,
}

impl ImageRequest {
	/// Returns true while an upload is running.
	pub fn is_busy(&self) -> bool {
		self.in_flight.is_some()
	}
}

/// Handle for one running upload.
///
/// Returned by `begin_upload`; passing it back to `finish_upload` applies
/// the result only if the same dialog and attempt are still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
	pub(crate) modal: u64,
	pub(crate) attempt: u64,
	/// Caret position captured before the upload started.
	pub caret: CharIdx,
}

/// Splices `![alt](url)` at `caret` and puts the caret after it.
pub fn insert_image(buffer: &Buffer, caret: CharIdx, alt: &str, url: &str) -> Edit {
	let at = caret.min(buffer.len_chars());
	let markdown = format!("![{}]({})", alt.trim(), url.trim());
	let end = at + markdown.chars().count();
	Edit::new(buffer.insert(at, &markdown), Selection::point(end))
}
