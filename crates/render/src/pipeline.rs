//! Markdown to preview HTML.
//!
//! Stages, in order: math preprocessing, markdown parsing, raw HTML
//! filtering and URL neutralisation, code highlighting, then math typesetting
//! for each placeholder that landed in text.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use tracing::{debug, trace};

use crate::config::RenderConfig;
use crate::highlight::{Highlighter, plain_code};
use crate::math::{self, MathDiagnostic, MathSpan, Piece, Typesetter};
use crate::sanitize::{HtmlPolicy, is_unsafe_url};

/// Info string that marks a fenced block as display math.
pub const MATH_FENCE: &str = "math";

static DEFAULT_RENDERER: LazyLock<Renderer> = LazyLock::new(Renderer::default);

/// Rendered preview of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
	/// Sanitised HTML.
	pub html: String,
	/// One entry per math span that failed to typeset.
	pub diagnostics: Vec<MathDiagnostic>,
}

/// Renders markdown documents to preview HTML.
#[derive(Debug, Clone)]
pub struct Renderer {
	config: RenderConfig,
	highlighter: Highlighter,
}

impl Renderer {
	pub fn new(config: RenderConfig) -> Self {
		let highlighter = Highlighter::new(&config.highlight_theme);
		Self { config, highlighter }
	}

	/// Shared renderer with default configuration.
	pub fn shared() -> &'static Renderer {
		&DEFAULT_RENDERER
	}

	pub fn config(&self) -> &RenderConfig {
		&self.config
	}

	/// Renders `source` to HTML. Never fails; math errors are reported in
	/// [`Preview::diagnostics`] and rendered inline.
	///
	/// Formulas are typeset only where they appear as text. Inside image alt
	/// text, titles, destinations, labels and code the original delimited
	/// source is put back instead.
	pub fn render(&self, source: &str) -> Preview {
		let mut pre = math::preprocess(source);
		let text = std::mem::take(&mut pre.text);

		let mut policy = HtmlPolicy::new(self.config.allow_color_spans);
		let mut typesetter = Typesetter::default();
		let mut events: Vec<Event<'_>> = Vec::new();
		let mut code: Option<(Option<String>, String)> = None;
		let mut image_depth = 0usize;
		// Position of a display formula that is the only content of its paragraph.
		let mut lone_display: Option<usize> = None;

		for event in Parser::new_ext(&text, markdown_options()) {
			if let Some((_, body)) = code.as_mut() {
				match event {
					Event::Text(chunk) => body.push_str(&chunk),
					Event::End(TagEnd::CodeBlock) => {
						if let Some((lang, body)) = code.take() {
							let body = math::restore_source(&body, &pre.spans);
							let block = match lang.as_deref() {
								Some(MATH_FENCE) => {
									let index = pre.add_span(body.clone(), body, true);
									typesetter.render(index, &pre.spans[index])
								}
								lang => self.code_block(lang, &body),
							};
							events.push(Event::Html(block.into()));
						}
					}
					_ => {}
				}
				continue;
			}

			match event {
				Event::Start(Tag::CodeBlock(kind)) => {
					let lang = match kind {
						CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
						CodeBlockKind::Indented => None,
					};
					code = Some((lang, String::new()));
				}
				Event::Text(chunk) if image_depth > 0 => {
					events.push(Event::Text(restore(chunk, &pre.spans)));
				}
				Event::Text(chunk) if math::has_placeholder(&chunk) => {
					let pieces = math::pieces(&chunk);
					if let [Piece::Math(index)] = pieces[..]
						&& pre.spans.get(index).is_some_and(|span| span.display)
						&& matches!(events.last(), Some(Event::Start(Tag::Paragraph)))
					{
						lone_display = Some(events.len());
					}
					push_pieces(&mut events, &pieces, Event::Text, &pre.spans, &mut typesetter);
				}
				Event::End(TagEnd::Paragraph) => match lone_display.take() {
					Some(at) if at + 1 == events.len() => {
						events.remove(at - 1);
					}
					_ => events.push(Event::End(TagEnd::Paragraph)),
				},
				Event::Html(raw) | Event::InlineHtml(raw) if image_depth > 0 => {
					events.push(Event::Text(restore(raw, &pre.spans)));
				}
				Event::Html(raw) => {
					let filtered = policy.filter(&raw);
					push_pieces(&mut events, &math::pieces(&filtered), Event::Html, &pre.spans, &mut typesetter);
				}
				Event::InlineHtml(raw) => {
					let filtered = policy.filter(&raw);
					push_pieces(
						&mut events,
						&math::pieces(&filtered),
						Event::InlineHtml,
						&pre.spans,
						&mut typesetter,
					);
				}
				Event::Code(span) => events.push(Event::Code(restore(span, &pre.spans))),
				Event::FootnoteReference(label) => events.push(Event::FootnoteReference(restore(label, &pre.spans))),
				Event::Start(Tag::FootnoteDefinition(label)) => {
					events.push(Event::Start(Tag::FootnoteDefinition(restore(label, &pre.spans))));
				}
				Event::Start(Tag::Link {
					link_type,
					dest_url,
					title,
					id,
				}) => events.push(Event::Start(Tag::Link {
					link_type,
					dest_url: neutralise(restore(dest_url, &pre.spans)),
					title: restore(title, &pre.spans),
					id,
				})),
				Event::Start(Tag::Image {
					link_type,
					dest_url,
					title,
					id,
				}) => {
					image_depth += 1;
					events.push(Event::Start(Tag::Image {
						link_type,
						dest_url: neutralise(restore(dest_url, &pre.spans)),
						title: restore(title, &pre.spans),
						id,
					}));
				}
				Event::End(TagEnd::Image) => {
					image_depth = image_depth.saturating_sub(1);
					events.push(Event::End(TagEnd::Image));
				}
				other => events.push(other),
			}
		}

		let closing = policy.finish();
		if !closing.is_empty() {
			trace!(closing = closing.len() / "</span>".len(), "closed unbalanced color spans");
			events.push(Event::Html(closing.into()));
		}

		let mut html = String::with_capacity(text.len() * 3 / 2);
		html::push_html(&mut html, events.into_iter());

		let diagnostics = typesetter.into_diagnostics();
		debug!(
			bytes = html.len(),
			math_spans = pre.spans.len(),
			math_failures = diagnostics.len(),
			"rendered preview"
		);
		Preview { html, diagnostics }
	}

	fn code_block(&self, lang: Option<&str>, body: &str) -> String {
		if self.config.highlight_code {
			self.highlighter.highlight(lang, body)
		} else {
			plain_code(lang, body)
		}
	}
}

impl Default for Renderer {
	fn default() -> Self {
		Self::new(RenderConfig::default())
	}
}

fn markdown_options() -> Options {
	Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES | Options::ENABLE_TASKLISTS
}

/// Replaces placeholder tokens in `value` with the source they stand for.
fn restore<'a>(value: CowStr<'a>, spans: &[MathSpan]) -> CowStr<'a> {
	if math::has_placeholder(&value) {
		math::restore_source(&value, spans).into()
	} else {
		value
	}
}

/// Pushes text pieces through `wrap` and typesets the math between them.
fn push_pieces<'a>(
	events: &mut Vec<Event<'a>>,
	pieces: &[Piece<'_>],
	wrap: fn(CowStr<'a>) -> Event<'a>,
	spans: &[MathSpan],
	typesetter: &mut Typesetter,
) {
	for piece in pieces {
		match *piece {
			Piece::Text(text) => events.push(wrap(text.to_owned().into())),
			Piece::Math(index) => match spans.get(index) {
				Some(span) => events.push(Event::Html(typesetter.render(index, span).into())),
				None => events.push(Event::Text(math::placeholder(index).into())),
			},
		}
	}
}

fn neutralise(url: CowStr<'_>) -> CowStr<'_> {
	if is_unsafe_url(&url) {
		trace!(url = &*url, "neutralised unsafe url");
		CowStr::Borrowed("#")
	} else {
		url
	}
}

/// Renders `source` with the default configuration and returns the HTML.
pub fn render(source: &str) -> String {
	Renderer::shared().render(source).html
}
