//! Collaborator interfaces implemented by the host.
//!
//! Persistence, image storage and tag management live outside the editor
//! core. The session talks to them through these traits and never assumes a
//! transport.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Identifier of a stored document (post, project, review...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for DocumentId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

/// A stored document as loaded for editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
	/// Markdown source.
	pub content: String,
	/// Host-defined fields (title, slug, tags...). Opaque to the editor.
	#[serde(default)]
	pub metadata: serde_json::Value,
}

impl Document {
	pub fn new(content: impl Into<String>) -> Self {
		Self {
			content: content.into(),
			metadata: serde_json::Value::Null,
		}
	}
}

/// Result of a successful image upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
	/// Public URL of the stored image.
	pub url: String,
	/// Alt text to use in the inserted markdown.
	#[serde(default)]
	pub alt: String,
}

/// A tag as exposed by the tag store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
	pub id: u64,
	pub name: String,
	#[serde(default)]
	pub colors: Vec<String>,
}

/// Loads and saves document content.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	async fn load(&self, id: &DocumentId) -> Result<Document, ServiceError>;

	async fn save(&self, id: &DocumentId, content: &str) -> Result<(), ServiceError>;
}

/// Stores image bytes and returns a public URL.
#[async_trait]
pub trait ImageUploader: Send + Sync {
	async fn upload(&self, bytes: &[u8], mime: &str) -> Result<UploadedImage, ServiceError>;

	/// Releases a local preview URL created for the picked file.
	async fn release_preview(&self, _url: &str) {}
}

/// Tag management, used by the host's tag UI.
#[async_trait]
pub trait TagStore: Send + Sync {
	async fn list_tags(&self) -> Result<Vec<Tag>, ServiceError>;

	async fn create_tag(&self, name: &str) -> Result<Tag, ServiceError>;
}
