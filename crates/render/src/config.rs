//! Renderer configuration.

use serde::{Deserialize, Serialize};

use crate::highlight::DEFAULT_THEME;

/// Options for the preview renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
	/// Bundled syntect theme used for code blocks.
	pub highlight_theme: String,
	/// Highlight fenced code blocks; when off, code renders as plain text.
	pub highlight_code: bool,
	/// Let `<span style="color: ...">` through the raw HTML filter.
	pub allow_color_spans: bool,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self {
			highlight_theme: DEFAULT_THEME.to_string(),
			highlight_code: true,
			allow_color_spans: true,
		}
	}
}
