//! Fenced code block highlighting using syntect with inline styles.

use std::sync::LazyLock;

use html_escape::{encode_double_quoted_attribute, encode_text};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use tracing::{debug, warn};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Theme used when the configured one is not bundled.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Highlights fenced code blocks with one bundled theme.
#[derive(Debug, Clone)]
pub struct Highlighter {
	theme: Option<&'static Theme>,
}

impl Highlighter {
	/// Creates a highlighter for the named bundled theme.
	///
	/// Unknown names fall back to [`DEFAULT_THEME`].
	pub fn new(theme_name: &str) -> Self {
		let themes = &THEME_SET.themes;
		let theme = themes.get(theme_name).or_else(|| {
			warn!(theme = theme_name, fallback = DEFAULT_THEME, "unknown highlight theme");
			themes.get(DEFAULT_THEME).or_else(|| themes.values().next())
		});
		Self { theme }
	}

	fn syntax(&self, language: &str) -> Option<&'static SyntaxReference> {
		let lower = language.to_lowercase();
		let token = match lower.as_str() {
			"js" | "jsx" | "ts" | "tsx" | "typescript" => "javascript",
			"py" => "python",
			"rb" => "ruby",
			"rs" => "rust",
			"sh" | "bash" | "zsh" | "shell" => "Bourne Again Shell (bash)",
			"yml" => "yaml",
			"md" => "markdown",
			"c++" => "cpp",
			"golang" => "go",
			_ => lower.as_str(),
		};
		SYNTAX_SET
			.find_syntax_by_token(token)
			.or_else(|| SYNTAX_SET.find_syntax_by_name(token))
			.or_else(|| SYNTAX_SET.find_syntax_by_extension(token))
	}

	/// Renders `code` as a highlighted `<pre>` block.
	///
	/// Unknown or missing languages produce escaped plain code.
	pub fn highlight(&self, language: Option<&str>, code: &str) -> String {
		let language = language.map(str::trim).filter(|l| !l.is_empty());
		let (Some(syntax), Some(theme)) = (language.and_then(|l| self.syntax(l)), self.theme) else {
			return plain_code(language, code);
		};
		match highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme) {
			Ok(html) => html,
			Err(error) => {
				debug!(language = syntax.name.as_str(), %error, "highlighting failed");
				plain_code(language, code)
			}
		}
	}
}

impl Default for Highlighter {
	fn default() -> Self {
		Self::new(DEFAULT_THEME)
	}
}

/// Escaped code block without highlighting.
pub fn plain_code(language: Option<&str>, code: &str) -> String {
	match language {
		Some(lang) => format!(
			"<pre><code class=\"language-{}\">{}</code></pre>\n",
			encode_double_quoted_attribute(lang),
			encode_text(code)
		),
		None => format!("<pre><code>{}</code></pre>\n", encode_text(code)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_language_gets_inline_styles() {
		let html = Highlighter::default().highlight(Some("rs"), "fn main() {}\n");
		assert!(html.starts_with("<pre style=\""), "{html}");
		assert!(html.contains("<span style=\"color:"));
	}

	#[test]
	fn unknown_language_falls_back_to_plain() {
		let html = Highlighter::default().highlight(Some("nosuchlang"), "a < b\n");
		assert_eq!(html, "<pre><code class=\"language-nosuchlang\">a &lt; b\n</code></pre>\n");
	}

	#[test]
	fn missing_language_is_plain() {
		let html = Highlighter::default().highlight(None, "<x>");
		assert_eq!(html, "<pre><code>&lt;x&gt;</code></pre>\n");
	}

	#[test]
	fn unknown_theme_falls_back() {
		let html = Highlighter::new("no-such-theme").highlight(Some("python"), "x = 1\n");
		assert!(html.starts_with("<pre style=\""), "{html}");
	}
}
