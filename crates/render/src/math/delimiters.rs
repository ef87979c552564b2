//! Math delimiter normalisation.
//!
//! Runs before markdown parsing. Every recognised math span is lifted out of
//! the source and replaced by an opaque placeholder token, so markdown never
//! sees (or mangles) LaTeX. Dollar signs that do not form a valid pair are
//! escaped so they render literally.
//!
//! Recognised forms, outside code spans and fenced blocks:
//!
//! | form          | kind    |
//! |---------------|---------|
//! | `$$ ... $$`   | display |
//! | `\[ ... \]`   | display |
//! | `$ ... $`     | inline  |
//! | `\( ... \)`   | inline  |
//!
//! An inline `$` pair needs a non-space after the opener, a non-space before
//! the closer, a closer not followed by a digit, and must stay on one line.
//! Display spans may cross lines but not a blank line.

/// Placeholder opening character (private use area).
pub(crate) const OPEN: char = '\u{E000}';
/// Placeholder closing character (private use area).
pub(crate) const CLOSE: char = '\u{E001}';

/// A math span lifted out of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSpan {
	/// LaTeX between the delimiters.
	pub source: String,
	/// The span as written, delimiters included.
	pub raw: String,
	/// True for block (display) math.
	pub display: bool,
}

/// Source with math spans replaced by placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preprocessed {
	/// Markdown text with placeholders.
	pub text: String,
	/// Spans in placeholder index order.
	pub spans: Vec<MathSpan>,
}

impl Preprocessed {
	/// Records a span and returns its index.
	pub(crate) fn add_span(&mut self, source: String, raw: String, display: bool) -> usize {
		self.spans.push(MathSpan { source, raw, display });
		self.spans.len() - 1
	}

	fn push_span(&mut self, source: &[char], delims: (&str, &str), display: bool) {
		let source: String = source.iter().collect();
		let raw = format!("{}{source}{}", delims.0, delims.1);
		let index = self.add_span(source, raw, display);
		self.text.push_str(&placeholder(index));
	}
}

/// Returns the placeholder token for span `index`.
pub(crate) fn placeholder(index: usize) -> String {
	format!("{OPEN}{index}{CLOSE}")
}

/// Lifts math spans out of `source`.
pub fn preprocess(source: &str) -> Preprocessed {
	// Placeholder characters typed by the author would be mistaken for ours.
	let cleaned: String = source
		.chars()
		.map(|c| if c == OPEN || c == CLOSE { '\u{FFFD}' } else { c })
		.collect();

	let mut out = Preprocessed::default();
	let mut prose = String::new();
	let mut fence: Option<Fence> = None;

	for line in cleaned.split_inclusive('\n') {
		if let Some(open) = &fence {
			out.text.push_str(line);
			if open.closed_by(line) {
				fence = None;
			}
			continue;
		}
		match Fence::opening(line) {
			Some(open) => {
				scan_prose(&prose, &mut out);
				prose.clear();
				out.text.push_str(line);
				fence = Some(open);
			}
			None => prose.push_str(line),
		}
	}
	scan_prose(&prose, &mut out);
	out
}

/// An open fenced code block.
#[derive(Debug, Clone, Copy)]
struct Fence {
	ch: char,
	len: usize,
}

impl Fence {
	fn opening(line: &str) -> Option<Self> {
		let rest = strip_indent(line)?;
		let ch = rest.chars().next().filter(|c| *c == '`' || *c == '~')?;
		let len = rest.chars().take_while(|&c| c == ch).count();
		if len < 3 || (ch == '`' && rest[len..].contains('`')) {
			return None;
		}
		Some(Self { ch, len })
	}

	fn closed_by(&self, line: &str) -> bool {
		let Some(rest) = strip_indent(line) else {
			return false;
		};
		let rest = rest.trim_end();
		rest.chars().count() >= self.len && rest.chars().all(|c| c == self.ch)
	}
}

/// Strips up to three spaces of indentation; `None` for deeper indents.
fn strip_indent(line: &str) -> Option<&str> {
	let rest = line.trim_start_matches(' ');
	(line.len() - rest.len() <= 3).then_some(rest)
}

fn scan_prose(text: &str, out: &mut Preprocessed) {
	let chars: Vec<char> = text.chars().collect();
	let mut i = 0;
	while i < chars.len() {
		match chars[i] {
			'\\' => match chars.get(i + 1) {
				Some('[') => match find_closer(&chars, i + 2, &['\\', ']'], true) {
					Some(end) => {
						out.push_span(&chars[i + 2..end], ("\\[", "\\]"), true);
						i = end + 2;
					}
					None => {
						out.text.push_str("\\[");
						i += 2;
					}
				},
				Some('(') => match find_closer(&chars, i + 2, &['\\', ')'], false) {
					Some(end) => {
						out.push_span(&chars[i + 2..end], ("\\(", "\\)"), false);
						i = end + 2;
					}
					None => {
						out.text.push_str("\\(");
						i += 2;
					}
				},
				Some(&next) => {
					out.text.push('\\');
					out.text.push(next);
					i += 2;
				}
				None => {
					out.text.push('\\');
					i += 1;
				}
			},
			'`' => {
				let run = run_len(&chars, i, '`');
				let end = match find_backtick_run(&chars, i + run, run) {
					Some(close) => close + run,
					None => i + run,
				};
				out.text.extend(&chars[i..end]);
				i = end;
			}
			'$' if chars.get(i + 1) == Some(&'$') => match find_closer(&chars, i + 2, &['$', '$'], true) {
				Some(end) => {
					out.push_span(&chars[i + 2..end], ("$$", "$$"), true);
					i = end + 2;
				}
				None => {
					out.text.push_str("\\$\\$");
					i += 2;
				}
			},
			'$' => match find_inline_closer(&chars, i + 1) {
				Some(end) => {
					out.push_span(&chars[i + 1..end], ("$", "$"), false);
					i = end + 1;
				}
				None => {
					out.text.push_str("\\$");
					i += 1;
				}
			},
			c => {
				out.text.push(c);
				i += 1;
			}
		}
	}
}

fn run_len(chars: &[char], from: usize, ch: char) -> usize {
	chars[from..].iter().take_while(|&&c| c == ch).count()
}

/// Finds the next backtick run of exactly `len` characters.
fn find_backtick_run(chars: &[char], from: usize, len: usize) -> Option<usize> {
	let mut j = from;
	while j < chars.len() {
		if chars[j] == '`' {
			let run = run_len(chars, j, '`');
			if run == len {
				return Some(j);
			}
			j += run;
		} else {
			j += 1;
		}
	}
	None
}

/// Finds the start of the two-character closer `pat`, skipping escaped
/// characters. Stops at a blank line (or at any newline unless `multiline`).
fn find_closer(chars: &[char], from: usize, pat: &[char; 2], multiline: bool) -> Option<usize> {
	let mut j = from;
	while j < chars.len() {
		if chars[j..].starts_with(pat) {
			return Some(j);
		}
		match chars[j] {
			'\n' if !multiline || is_paragraph_break(chars, j) => return None,
			'\\' => j += 2,
			_ => j += 1,
		}
	}
	None
}

fn find_inline_closer(chars: &[char], from: usize) -> Option<usize> {
	let first = *chars.get(from)?;
	if first.is_whitespace() || first == '$' {
		return None;
	}
	let mut j = from;
	while j < chars.len() {
		match chars[j] {
			'\n' => return None,
			'\\' => j += 2,
			'$' => {
				let tight = !chars[j - 1].is_whitespace();
				let digit_follows = chars.get(j + 1).is_some_and(char::is_ascii_digit);
				if tight && !digit_follows {
					return Some(j);
				}
				j += 1;
			}
			_ => j += 1,
		}
	}
	None
}

/// True if the newline at `at` is followed by a whitespace-only line.
fn is_paragraph_break(chars: &[char], at: usize) -> bool {
	chars[at + 1..]
		.iter()
		.find(|c| !matches!(c, ' ' | '\t' | '\r'))
		.is_some_and(|&c| c == '\n')
}
