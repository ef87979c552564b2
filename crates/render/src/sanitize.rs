//! Raw HTML policy and URL neutralisation.
//!
//! Markdown authors may only use one kind of raw HTML: a color span,
//! `<span style="color: VALUE">` and its closing `</span>`. Everything else
//! found in raw HTML is escaped and shown as text.

use std::sync::LazyLock;

use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;

static HEX_COLOR: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

static RGB_COLOR: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^rgba?\(\s*\d{1,3}%?\s*,\s*\d{1,3}%?\s*,\s*\d{1,3}%?\s*(?:,\s*(?:0|1|0?\.\d+)\s*)?\)$")
		.expect("valid regex")
});

static NAMED_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]{3,20}$").expect("valid regex"));

static OPEN_COLOR_SPAN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?i)^<span\s+style\s*=\s*["']\s*color\s*:\s*([^"';]+?)\s*;?\s*["']\s*>$"#).expect("valid regex")
});

static CLOSE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^</span\s*>$").expect("valid regex"));

/// Returns true if `value` is a color the editor allows in a color span.
///
/// Accepts `#rgb`, `#rrggbb`, `rgb(..)`/`rgba(..)` with numeric channels, and
/// a bare CSS color word. Whitespace is trimmed first.
pub fn is_safe_color(value: &str) -> bool {
	let value = value.trim();
	HEX_COLOR.is_match(value) || RGB_COLOR.is_match(value) || NAMED_COLOR.is_match(value)
}

/// Returns the markup of an opening color span.
pub fn color_span_open(color: &str) -> String {
	format!("<span style=\"color: {}\">", encode_double_quoted_attribute(color.trim()))
}

/// Returns true if `url` uses a script-capable scheme.
///
/// `javascript:`, `vbscript:` and non-image `data:` URLs are unsafe. Embedded
/// whitespace and control characters are ignored when reading the scheme.
pub fn is_unsafe_url(url: &str) -> bool {
	let normalized: String = url
		.chars()
		.filter(|c| !c.is_whitespace() && !c.is_control())
		.take(32)
		.collect::<String>()
		.to_ascii_lowercase();

	normalized.starts_with("javascript:")
		|| normalized.starts_with("vbscript:")
		|| (normalized.starts_with("data:") && !is_image_data(&normalized))
}

fn is_image_data(normalized: &str) -> bool {
	["data:image/png", "data:image/gif", "data:image/jpeg", "data:image/webp"]
		.iter()
		.any(|prefix| normalized.starts_with(prefix))
}

/// Filters raw HTML fragments for one document.
///
/// Tracks open color spans so that [`HtmlPolicy::finish`] can close the ones
/// the author left open.
#[derive(Debug, Clone, Default)]
pub struct HtmlPolicy {
	allow_color_spans: bool,
	open_spans: usize,
}

impl HtmlPolicy {
	pub fn new(allow_color_spans: bool) -> Self {
		Self {
			allow_color_spans,
			open_spans: 0,
		}
	}

	/// Number of color spans currently open.
	pub fn open_spans(&self) -> usize {
		self.open_spans
	}

	/// Rewrites one raw HTML fragment into safe HTML.
	pub fn filter(&mut self, raw: &str) -> String {
		let mut out = String::with_capacity(raw.len());
		let mut rest = raw;
		while let Some(lt) = rest.find('<') {
			out.push_str(&encode_text(&rest[..lt]));
			rest = &rest[lt..];
			let Some(gt) = rest.find('>') else {
				break;
			};
			let tag = &rest[..=gt];
			match self.allowed_tag(tag) {
				Some(safe) => out.push_str(&safe),
				None => out.push_str(&encode_text(tag)),
			}
			rest = &rest[gt + 1..];
		}
		out.push_str(&encode_text(rest));
		out
	}

	fn allowed_tag(&mut self, tag: &str) -> Option<String> {
		if !self.allow_color_spans {
			return None;
		}
		if let Some(caps) = OPEN_COLOR_SPAN.captures(tag) {
			let color = caps.get(1)?.as_str();
			if !is_safe_color(color) {
				return None;
			}
			self.open_spans += 1;
			return Some(color_span_open(color));
		}
		if CLOSE_SPAN.is_match(tag) && self.open_spans > 0 {
			self.open_spans -= 1;
			return Some("</span>".to_string());
		}
		None
	}

	/// Closes any spans left open and resets the policy.
	pub fn finish(&mut self) -> String {
		let closing = "</span>".repeat(self.open_spans);
		self.open_spans = 0;
		closing
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn colors() {
		for ok in ["#fff", "#A1b2C3", "red", " rebeccapurple ", "rgb(1, 2, 3)", "rgba(10%,20%,30%,0.5)"] {
			assert!(is_safe_color(ok), "{ok}");
		}
		for bad in ["", "#ff", "#gggggg", "red;background:url(x)", "expression(alert(1))", "url(x)", "a b"] {
			assert!(!is_safe_color(bad), "{bad}");
		}
	}

	#[test]
	fn urls() {
		for ok in ["https://example.com", "/uploads/a.png", "data:image/png;base64,AAAA", "mailto:a@b.c"] {
			assert!(!is_unsafe_url(ok), "{ok}");
		}
		for bad in [
			"javascript:alert(1)",
			" JavaScript:alert(1)",
			"java\tscript:alert(1)",
			"vbscript:msgbox",
			"data:text/html;base64,AAAA",
		] {
			assert!(is_unsafe_url(bad), "{bad}");
		}
	}

	#[test]
	fn color_span_passes_and_script_is_escaped() {
		let mut policy = HtmlPolicy::new(true);
		assert_eq!(policy.filter("<span style=\"color: red\">"), "<span style=\"color: red\">");
		assert_eq!(policy.open_spans(), 1);
		assert_eq!(policy.filter("</span>"), "</span>");
		assert_eq!(policy.filter("<script>alert(1)</script>"), "&lt;script&gt;alert(1)&lt;/script&gt;");
	}

	#[test]
	fn unsafe_color_span_is_escaped() {
		let mut policy = HtmlPolicy::new(true);
		let out = policy.filter("<span style=\"color: url(x)\">");
		assert!(out.starts_with("&lt;span"), "{out}");
		assert_eq!(policy.open_spans(), 0);
	}

	#[test]
	fn stray_close_is_escaped() {
		let mut policy = HtmlPolicy::new(true);
		assert_eq!(policy.filter("</span>"), "&lt;/span&gt;");
	}

	#[test]
	fn finish_closes_open_spans() {
		let mut policy = HtmlPolicy::new(true);
		policy.filter("<span style='color:#00f'>");
		policy.filter("<span style=\"color: blue;\">");
		assert_eq!(policy.finish(), "</span></span>");
		assert_eq!(policy.finish(), "");
	}

	#[test]
	fn spans_disabled() {
		let mut policy = HtmlPolicy::new(false);
		assert_eq!(policy.filter("<span style=\"color: red\">"), "&lt;span style=\"color: red\"&gt;");
	}
}
