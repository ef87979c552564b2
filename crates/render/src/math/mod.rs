//! Math support: delimiter preprocessing, LaTeX typesetting and placeholder
//! resolution.
//!
//! Each span is typeset independently. A span that fails to typeset renders
//! as an inline error box carrying the escaped source, and a
//! [`MathDiagnostic`] is recorded; neighbouring spans are unaffected.

mod delimiters;
mod symbols;
mod typeset;

use std::borrow::Cow;

use delimiters::{CLOSE, OPEN};
pub use delimiters::{MathSpan, Preprocessed, preprocess};
pub(crate) use delimiters::placeholder;
use html_escape::encode_text;
use tracing::debug;
pub use typeset::{MAX_DEPTH, MathError, typeset};

/// A math span that failed to typeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathDiagnostic {
	/// Index of the span in document order.
	pub index: usize,
	/// LaTeX source of the span.
	pub source: String,
	/// True for display math.
	pub display: bool,
	/// Typesetter failure.
	pub error: MathError,
}

/// Outcome of rendering one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MathResult {
	/// MathML wrapped in its container element.
	Success { html: String },
	/// Error box plus the failure that produced it.
	Error { html: String, error: MathError },
}

impl MathResult {
	/// Returns the HTML fragment regardless of outcome.
	pub fn html(&self) -> &str {
		match self {
			Self::Success { html } | Self::Error { html, .. } => html,
		}
	}
}

/// Renders one span into its container element.
pub fn render_span(span: &MathSpan) -> MathResult {
	let (tag, class) = container(span.display);
	match typeset(span.source.trim(), span.display) {
		Ok(mathml) => MathResult::Success {
			html: format!("<{tag} class=\"{class}\">{mathml}</{tag}>"),
		},
		Err(error) => MathResult::Error {
			html: error_html(span, &error),
			error,
		},
	}
}

fn container(display: bool) -> (&'static str, &'static str) {
	if display {
		("div", "math-display")
	} else {
		("span", "math-inline")
	}
}

/// Error box for a span that failed to typeset.
pub fn error_html(span: &MathSpan, error: &MathError) -> String {
	let tag = if span.display { "div" } else { "span" };
	format!(
		"<{tag} class=\"math-error\" title=\"{title}\"><code>{source}</code> \
		 <span class=\"math-error-message\">{message}</span></{tag}>",
		title = html_escape::encode_double_quoted_attribute(&error.to_string()),
		source = encode_text(&span.source),
		message = encode_text(&error.to_string()),
	)
}

/// A run of text between placeholder tokens, or the span a token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
	Text(&'a str),
	Math(usize),
}

/// Returns true if `text` holds at least one placeholder token.
pub fn has_placeholder(text: &str) -> bool {
	text.contains(OPEN)
}

/// Splits `text` at placeholder tokens.
pub fn pieces(text: &str) -> Vec<Piece<'_>> {
	let mut out = Vec::new();
	let mut start = 0;
	let mut cursor = 0;
	while let Some(found) = text[cursor..].find(OPEN) {
		let digits = cursor + found + OPEN.len_utf8();
		cursor = digits;
		let Some(len) = text[digits..].find(CLOSE) else {
			break;
		};
		let Ok(index) = text[digits..digits + len].parse() else {
			continue;
		};
		let open = digits - OPEN.len_utf8();
		if open > start {
			out.push(Piece::Text(&text[start..open]));
		}
		out.push(Piece::Math(index));
		start = digits + len + CLOSE.len_utf8();
		cursor = start;
	}
	if start < text.len() {
		out.push(Piece::Text(&text[start..]));
	}
	out
}

/// Puts the original delimited source back in place of each token.
///
/// Used where markup cannot hold math: attribute values, labels and code.
pub fn restore_source(text: &str, spans: &[MathSpan]) -> String {
	pieces(text)
		.into_iter()
		.map(|piece| match piece {
			Piece::Text(text) => Cow::Borrowed(text),
			Piece::Math(index) => match spans.get(index) {
				Some(span) => Cow::Borrowed(span.raw.as_str()),
				None => Cow::Owned(placeholder(index)),
			},
		})
		.collect()
}

/// Typesets spans as the pipeline reaches them and collects failures.
#[derive(Debug, Default)]
pub struct Typesetter {
	diagnostics: Vec<MathDiagnostic>,
}

impl Typesetter {
	/// Returns the HTML for span `index`, recording a diagnostic on failure.
	pub fn render(&mut self, index: usize, span: &MathSpan) -> String {
		match render_span(span) {
			MathResult::Success { html } => html,
			MathResult::Error { html, error } => {
				debug!(index, display = span.display, %error, "math span failed to typeset");
				self.diagnostics.push(MathDiagnostic {
					index,
					source: span.source.clone(),
					display: span.display,
					error,
				});
				html
			}
		}
	}

	/// Failures in span index order.
	pub fn into_diagnostics(mut self) -> Vec<MathDiagnostic> {
		self.diagnostics.sort_by_key(|d| d.index);
		self.diagnostics
	}
}
