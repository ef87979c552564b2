use folio_render::math::MAX_DEPTH;
use folio_render::{MathError, RenderConfig, Renderer, render};
use pretty_assertions::assert_eq;

#[test]
fn malformed_formula_is_isolated() {
	let preview = Renderer::default().render("before\n\n$$\\frac{1}{$$\n\nafter");
	assert!(preview.html.contains("<p>before</p>"), "{}", preview.html);
	assert!(preview.html.contains("<p>after</p>"), "{}", preview.html);
	assert!(preview.html.contains("<div class=\"math-error\""), "{}", preview.html);
	assert!(preview.html.contains("<code>\\frac{1}{</code>"), "{}", preview.html);

	assert_eq!(preview.diagnostics.len(), 1);
	let diagnostic = &preview.diagnostics[0];
	assert!(diagnostic.display);
	assert_eq!(diagnostic.source, "\\frac{1}{");
	assert_eq!(diagnostic.error, MathError::UnexpectedEnd { expected: "'}'" });
}

#[test]
fn deeply_nested_formula_is_isolated() {
	let source = format!("before $${}x{}$$ after", "{".repeat(20_000), "}".repeat(20_000));
	let preview = Renderer::default().render(&source);
	assert!(preview.html.starts_with("<p>before <div class=\"math-error\""));
	assert!(preview.html.ends_with(" after</p>\n"));
	assert_eq!(preview.diagnostics.len(), 1);
	assert_eq!(preview.diagnostics[0].error, MathError::TooDeep { limit: MAX_DEPTH });
}

#[test]
fn currency_renders_literally() {
	let html = render("It costs $5 or $10.");
	assert_eq!(html, "<p>It costs $5 or $10.</p>\n");
}

#[test]
fn inline_math_is_typeset() {
	let preview = Renderer::default().render("Euler: $e^{i\\pi} + 1 = 0$");
	assert!(preview.diagnostics.is_empty());
	assert!(preview.html.contains("<span class=\"math-inline\"><math"), "{}", preview.html);
	assert!(preview.html.contains("<msup>"), "{}", preview.html);
}

#[test]
fn display_math_replaces_paragraph() {
	let html = render("$$\\sum_{i=1}^{n} i$$");
	assert!(html.starts_with("<div class=\"math-display\"><math"), "{html}");
	assert!(html.contains("display=\"block\""));
	assert!(!html.contains("<p>"));
}

#[test]
fn display_math_with_text_keeps_paragraph() {
	let html = render("see $$x$$ here");
	assert!(html.starts_with("<p>see <div class=\"math-display\">"), "{html}");
	assert!(html.ends_with("here</p>\n"), "{html}");
}

#[test]
fn math_fence_is_display_math() {
	let preview = Renderer::default().render("```math\nx^2\n```\n");
	assert!(preview.html.contains("<div class=\"math-display\">"), "{}", preview.html);
	assert!(preview.html.contains("<msup><mi>x</mi><mn>2</mn></msup>"), "{}", preview.html);
	assert!(!preview.html.contains("<pre"));
}

#[test]
fn code_keeps_dollars() {
	let html = render("`$x$` and\n\n```\n$y$\n```\n");
	assert!(html.contains("<code>$x$</code>"), "{html}");
	assert!(html.contains("$y$"), "{html}");
	assert!(!html.contains("math-inline"));
}

#[test]
fn indented_code_keeps_formula_source() {
	let preview = Renderer::default().render("para\n\n    cost $x$ here\n");
	assert!(!preview.html.contains("math-inline"), "{}", preview.html);
	assert!(preview.html.contains("cost $x$ here"), "{}", preview.html);
	assert!(!preview.html.contains('\u{E000}'), "{}", preview.html);
	assert!(preview.diagnostics.is_empty());
}

#[test]
fn attributes_keep_formula_source() {
	let html = render("![area $x^2$ here](a.png) and [t](u \"title $y$\")");
	assert!(html.contains("alt=\"area $x^2$ here\""), "{html}");
	assert!(html.contains("title=\"title $y$\""), "{html}");
	assert!(!html.contains("math-inline"), "{html}");
	assert!(!html.contains('\u{E000}'), "{html}");
}

#[test]
fn link_text_still_typesets() {
	let html = render("[$x$](u)");
	assert!(html.contains("<a href=\"u\"><span class=\"math-inline\">"), "{html}");
}

#[test]
fn color_span_survives_and_script_is_escaped() {
	let html = render("<span style=\"color: red\">hot</span> <script>alert(1)</script>");
	assert!(html.contains("<span style=\"color: red\">hot</span>"), "{html}");
	assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"), "{html}");
	assert!(!html.contains("<script>"));
}

#[test]
fn unsafe_color_is_escaped() {
	let html = render("<span style=\"color: expression(alert(1))\">x</span>");
	assert!(!html.contains("<span"), "{html}");
}

#[test]
fn unbalanced_span_is_closed() {
	let html = render("<span style=\"color: blue\">open");
	assert_eq!(html.matches("<span").count(), html.matches("</span>").count(), "{html}");
	assert!(html.ends_with("</span>"), "{html}");
}

#[test]
fn script_urls_are_neutralised() {
	let html = render("[x](javascript:alert(1)) ![y](data:text/html;base64,AAAA)");
	assert!(html.contains("<a href=\"#\">x</a>"), "{html}");
	assert!(html.contains("<img src=\"#\""), "{html}");
	assert!(!html.contains("javascript"));
}

#[test]
fn extensions_are_enabled() {
	let html = render("~~gone~~\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n- [ ] todo\n\nnote[^1]\n\n[^1]: body\n");
	assert!(html.contains("<del>gone</del>"), "{html}");
	assert!(html.contains("<table>"), "{html}");
	assert!(html.contains("type=\"checkbox\""), "{html}");
	assert!(html.contains("footnote-reference"), "{html}");
	assert!(html.contains("footnote-definition"), "{html}");
}

#[test]
fn fenced_code_is_highlighted() {
	let html = render("```rust\nlet x = 1;\n```\n");
	assert!(html.starts_with("<pre style=\""), "{html}");
}

#[test]
fn highlighting_can_be_disabled() {
	let renderer = Renderer::new(RenderConfig {
		highlight_code: false,
		..RenderConfig::default()
	});
	let html = renderer.render("```rust\nlet x = 1 < 2;\n```\n").html;
	assert_eq!(html, "<pre><code class=\"language-rust\">let x = 1 &lt; 2;\n</code></pre>\n");
}

#[test]
fn config_from_toml_fills_defaults() {
	let config: RenderConfig = toml::from_str("highlight-theme = \"base16-ocean.dark\"\n").unwrap();
	assert_eq!(config.highlight_theme, "base16-ocean.dark");
	assert!(config.highlight_code);
	assert!(config.allow_color_spans);
}
