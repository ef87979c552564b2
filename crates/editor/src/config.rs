//! Editor configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or none at all) yields the
//! stock editor:
//!
//! ```toml
//! [history]
//! max-entries = 100
//! debounce-ms = 500
//!
//! [table]
//! max-rows = 100
//! max-cols = 8
//!
//! [render]
//! highlight-theme = "InspiredGitHub"
//! highlight-code = true
//! allow-color-spans = true
//! ```

use std::path::Path;
use std::time::Duration;

use folio_render::RenderConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Default number of retained history entries.
pub const MAX_HISTORY: usize = 100;

/// Default quiet period before a typing burst becomes a history entry.
pub const TYPING_DEBOUNCE: Duration = Duration::from_millis(500);

/// Default upper bound on generated table data rows.
pub const MAX_TABLE_ROWS: usize = 100;

/// Default upper bound on generated table columns.
pub const MAX_TABLE_COLS: usize = 8;

/// Top-level editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
	pub history: HistoryConfig,
	pub table: TableLimits,
	pub render: RenderConfig,
}

/// Undo history settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HistoryConfig {
	/// Maximum retained snapshots, including the current one.
	pub max_entries: usize,
	/// Typing debounce in milliseconds.
	pub debounce_ms: u64,
}

impl HistoryConfig {
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

impl Default for HistoryConfig {
	fn default() -> Self {
		Self {
			max_entries: MAX_HISTORY,
			debounce_ms: TYPING_DEBOUNCE.as_millis() as u64,
		}
	}
}

/// Clamp bounds for generated tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TableLimits {
	pub max_rows: usize,
	pub max_cols: usize,
}

impl Default for TableLimits {
	fn default() -> Self {
		Self {
			max_rows: MAX_TABLE_ROWS,
			max_cols: MAX_TABLE_COLS,
		}
	}
}

impl EditorConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text).map_err(|error| ConfigError::Parse { path: None, error })?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config: Self = toml::from_str(&text).map_err(|error| ConfigError::Parse {
			path: Some(path.to_path_buf()),
			error,
		})?;
		config.validate()?;
		debug!(path = %path.display(), "loaded editor config");
		Ok(config)
	}

	/// Renders the configuration as TOML.
	pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
		toml::to_string_pretty(self)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.history.max_entries == 0 {
			return Err(ConfigError::InvalidValue {
				field: "history.max-entries",
				reason: "must be at least 1".into(),
			});
		}
		if self.table.max_rows == 0 {
			return Err(ConfigError::InvalidValue {
				field: "table.max-rows",
				reason: "must be at least 1".into(),
			});
		}
		if self.table.max_cols == 0 {
			return Err(ConfigError::InvalidValue {
				field: "table.max-cols",
				reason: "must be at least 1".into(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_is_default() {
		assert_eq!(EditorConfig::from_toml_str("").unwrap(), EditorConfig::default());
	}

	#[test]
	fn partial_sections_keep_defaults() {
		let config = EditorConfig::from_toml_str("[history]\ndebounce-ms = 250\n[table]\nmax-cols = 4\n").unwrap();
		assert_eq!(config.history.max_entries, MAX_HISTORY);
		assert_eq!(config.history.debounce(), Duration::from_millis(250));
		assert_eq!(config.table.max_rows, MAX_TABLE_ROWS);
		assert_eq!(config.table.max_cols, 4);
		assert!(config.render.highlight_code);
	}

	#[test]
	fn rejects_zero_history() {
		let err = EditorConfig::from_toml_str("[history]\nmax-entries = 0\n").unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { field: "history.max-entries", .. }));
	}

	#[test]
	fn rejects_unknown_section() {
		let err = EditorConfig::from_toml_str("[colors]\n").unwrap_err();
		assert!(matches!(err, ConfigError::Parse { path: None, .. }));
	}

	#[test]
	fn missing_file_reports_path() {
		let err = EditorConfig::load("/nonexistent/folio.toml").unwrap_err();
		match err {
			ConfigError::Io { path, .. } => assert_eq!(path, Path::new("/nonexistent/folio.toml")),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn serialises_back_to_toml() {
		let text = EditorConfig::default().to_toml_string().unwrap();
		assert!(text.contains("max-entries = 100"), "{text}");
		assert_eq!(EditorConfig::from_toml_str(&text).unwrap(), EditorConfig::default());
	}
}
