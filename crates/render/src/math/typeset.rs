//! LaTeX subset to MathML typesetter.
//!
//! The parser is a small recursive descent over characters. It produces a
//! node tree which is then written as presentation MathML. Every failure is a
//! [`MathError`]; nothing here panics on malformed input.

use std::fmt::Write as _;

use html_escape::encode_text;
use thiserror::Error;

use super::symbols::{self, Symbol};

const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// Deepest nesting of groups, arguments and environments a formula may use.
pub const MAX_DEPTH: usize = 64;

/// Why a formula could not be typeset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
	/// Input ended while a construct was still open.
	#[error("unexpected end of formula, expected {expected}")]
	UnexpectedEnd {
		/// What the parser was waiting for.
		expected: &'static str,
	},
	/// A closing brace without an opening one.
	#[error("unmatched '}}' at offset {offset}")]
	UnmatchedBrace {
		/// Character offset of the brace within the formula.
		offset: usize,
	},
	/// A command that needs an argument had none.
	#[error("missing argument for \\{command}")]
	MissingArgument {
		/// Command name without the backslash.
		command: String,
	},
	/// A control sequence that the typesetter does not know.
	#[error("undefined control sequence \\{0}")]
	UnknownCommand(String),
	/// An environment name that the typesetter does not know.
	#[error("unknown environment '{0}'")]
	UnknownEnvironment(String),
	/// `\begin{a}` closed by `\end{b}`.
	#[error("\\begin{{{expected}}} ended by \\end{{{found}}}")]
	MismatchedEnvironment {
		/// Environment that was opened.
		expected: String,
		/// Environment named by the `\end`.
		found: String,
	},
	/// `\end{..}` without a matching `\begin`.
	#[error("\\end{{{0}}} without matching \\begin")]
	UnmatchedEnd(String),
	/// Two superscripts or two subscripts on one base.
	#[error("double {0}")]
	DoubleScript(&'static str),
	/// `\left` without `\right`.
	#[error("\\left without matching \\right")]
	UnmatchedLeft,
	/// `\right` without `\left`.
	#[error("\\right without matching \\left")]
	UnmatchedRight,
	/// `\left`/`\right` not followed by a delimiter.
	#[error("missing or invalid delimiter after \\{0}")]
	MissingDelimiter(String),
	/// A character that is not valid where it appeared.
	#[error("unexpected '{0}'")]
	Unexpected(char),
	/// Groups or arguments nested deeper than [`MAX_DEPTH`].
	#[error("formula nested deeper than {limit} levels")]
	TooDeep {
		/// The nesting limit that was exceeded.
		limit: usize,
	},
}

/// Typesets `latex` as a MathML `<math>` element.
///
/// `display` selects block layout (limits under/over large operators).
pub fn typeset(latex: &str, display: bool) -> Result<String, MathError> {
	let mut parser = Parser::new(latex);
	let nodes = parser.parse_top()?;

	let mut out = String::with_capacity(latex.len() * 4 + 128);
	let _ = write!(
		out,
		"<math xmlns=\"{MATHML_NS}\" display=\"{}\"><semantics>",
		if display { "block" } else { "inline" }
	);
	Writer { display }.node(&Node::Row(nodes), &mut out);
	let _ = write!(
		out,
		"<annotation encoding=\"application/x-tex\">{}</annotation></semantics></math>",
		encode_text(latex.trim())
	);
	Ok(out)
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
	Ident(String),
	Number(String),
	Operator { text: String, large: bool, limits: bool },
	Function { name: String, limits: bool },
	Text(String),
	Row(Vec<Node>),
	Frac { num: Box<Node>, den: Box<Node>, line: bool },
	Sqrt(Box<Node>),
	Root { base: Box<Node>, index: Box<Node> },
	Scripts { base: Box<Node>, sub: Option<Box<Node>>, sup: Option<Box<Node>> },
	Accent { base: Box<Node>, accent: &'static str, over: bool },
	Fenced { open: String, close: String, body: Box<Node> },
	Styled { variant: &'static str, body: Box<Node> },
	Table { rows: Vec<Vec<Node>>, open: &'static str, close: &'static str, align: Option<&'static str> },
	Space(&'static str),
	LineBreak,
}

impl Node {
	fn op(text: &str) -> Self {
		Node::Operator {
			text: text.to_string(),
			large: false,
			limits: false,
		}
	}

	fn has_limits(&self) -> bool {
		match self {
			Node::Operator { limits, .. } | Node::Function { limits, .. } => *limits,
			_ => false,
		}
	}
}

impl From<Symbol> for Node {
	fn from(sym: Symbol) -> Self {
		match sym {
			Symbol::Ident(s) => Node::Ident(s.to_string()),
			Symbol::Operator(s) => Node::op(s),
			Symbol::Large(s, limits) => Node::Operator {
				text: s.to_string(),
				large: true,
				limits,
			},
			Symbol::Function(name, limits) => Node::Function {
				name: name.to_string(),
				limits,
			},
			Symbol::Space(width) => Node::Space(width),
		}
	}
}

/// Why a sequence stopped.
#[derive(Debug, Clone, PartialEq)]
enum Stop {
	End,
	Brace,
	Bracket,
	Ampersand,
	RowBreak,
	Right(String),
	EndEnv(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
	Top,
	Group,
	Optional,
	Cell,
	Left,
}

enum Parsed {
	Node(Node),
	Stop(Stop),
}

struct Parser {
	chars: Vec<char>,
	pos: usize,
	depth: usize,
}

impl Parser {
	fn new(src: &str) -> Self {
		Self {
			chars: src.chars().collect(),
			pos: 0,
			depth: 0,
		}
	}

	/// Runs `f` one nesting level deeper, failing past [`MAX_DEPTH`].
	fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, MathError>) -> Result<T, MathError> {
		if self.depth >= MAX_DEPTH {
			return Err(MathError::TooDeep { limit: MAX_DEPTH });
		}
		self.depth += 1;
		let result = f(self);
		self.depth -= 1;
		result
	}

	fn peek(&self) -> Option<char> {
		self.chars.get(self.pos).copied()
	}

	fn peek_at(&self, offset: usize) -> Option<char> {
		self.chars.get(self.pos + offset).copied()
	}

	fn skip_ws(&mut self) {
		while self.peek().is_some_and(char::is_whitespace) {
			self.pos += 1;
		}
	}

	fn parse_top(&mut self) -> Result<Vec<Node>, MathError> {
		let (nodes, stop) = self.parse_seq(Context::Top)?;
		match stop {
			Stop::End => Ok(nodes),
			other => Err(self.misplaced(other)),
		}
	}

	/// Maps a stop that the current construct cannot accept to an error.
	fn misplaced(&self, stop: Stop) -> MathError {
		match stop {
			Stop::End => MathError::UnexpectedEnd { expected: "'}'" },
			Stop::Brace => MathError::UnmatchedBrace {
				offset: self.pos.saturating_sub(1),
			},
			Stop::Bracket => MathError::Unexpected(']'),
			Stop::Ampersand => MathError::Unexpected('&'),
			Stop::RowBreak => MathError::Unexpected('\\'),
			Stop::Right(_) => MathError::UnmatchedRight,
			Stop::EndEnv(name) => MathError::UnmatchedEnd(name),
		}
	}

	fn parse_seq(&mut self, ctx: Context) -> Result<(Vec<Node>, Stop), MathError> {
		self.nested(|p| p.seq(ctx))
	}

	fn seq(&mut self, ctx: Context) -> Result<(Vec<Node>, Stop), MathError> {
		let mut nodes = Vec::new();
		loop {
			self.skip_ws();
			let Some(c) = self.peek() else {
				return Ok((nodes, Stop::End));
			};
			match c {
				'}' => {
					self.pos += 1;
					return Ok((nodes, Stop::Brace));
				}
				']' if ctx == Context::Optional => {
					self.pos += 1;
					return Ok((nodes, Stop::Bracket));
				}
				'&' if ctx == Context::Cell => {
					self.pos += 1;
					return Ok((nodes, Stop::Ampersand));
				}
				'&' => return Err(MathError::Unexpected('&')),
				'^' | '_' => {
					self.pos += 1;
					self.attach_script(&mut nodes, c)?;
				}
				'{' => {
					self.pos += 1;
					nodes.push(self.parse_group()?);
				}
				'\\' => match self.parse_command(ctx)? {
					Parsed::Node(node) => nodes.push(node),
					Parsed::Stop(stop) => return Ok((nodes, stop)),
				},
				c if c.is_ascii_digit() => nodes.push(self.parse_number()),
				_ => {
					self.pos += 1;
					nodes.push(atom(c));
				}
			}
		}
	}

	/// Parses the remainder of a `{...}` group (the opening brace is consumed).
	fn parse_group(&mut self) -> Result<Node, MathError> {
		let (nodes, stop) = self.parse_seq(Context::Group)?;
		match stop {
			Stop::Brace => Ok(Node::Row(nodes)),
			other => Err(self.misplaced(other)),
		}
	}

	fn parse_number(&mut self) -> Node {
		let mut digits = String::new();
		while let Some(c) = self.peek() {
			let fraction_dot = c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit());
			if !(c.is_ascii_digit() || fraction_dot) {
				break;
			}
			digits.push(c);
			self.pos += 1;
		}
		Node::Number(digits)
	}

	fn attach_script(&mut self, nodes: &mut Vec<Node>, marker: char) -> Result<(), MathError> {
		let base = nodes.pop().unwrap_or(Node::Row(Vec::new()));
		let arg = Box::new(self.parse_argument(if marker == '^' { "^" } else { "_" })?);
		let node = match (base, marker) {
			(Node::Scripts { sup: Some(_), .. }, '^') => return Err(MathError::DoubleScript("superscript")),
			(Node::Scripts { sub: Some(_), .. }, '_') => return Err(MathError::DoubleScript("subscript")),
			(Node::Scripts { base, sub, .. }, '^') => Node::Scripts { base, sub, sup: Some(arg) },
			(Node::Scripts { base, sup, .. }, _) => Node::Scripts { base, sub: Some(arg), sup },
			(base, '^') => Node::Scripts {
				base: Box::new(base),
				sub: None,
				sup: Some(arg),
			},
			(base, _) => Node::Scripts {
				base: Box::new(base),
				sub: Some(arg),
				sup: None,
			},
		};
		nodes.push(node);
		Ok(())
	}

	/// Parses one argument: a group, a command, or a single character.
	fn parse_argument(&mut self, command: &str) -> Result<Node, MathError> {
		self.nested(|p| p.argument(command))
	}

	fn argument(&mut self, command: &str) -> Result<Node, MathError> {
		self.skip_ws();
		let missing = || MathError::MissingArgument {
			command: command.to_string(),
		};
		match self.peek() {
			None | Some('}' | '&' | '^' | '_') => Err(missing()),
			Some('{') => {
				self.pos += 1;
				self.parse_group()
			}
			Some('\\') => match self.parse_command(Context::Group)? {
				Parsed::Node(node) => Ok(node),
				Parsed::Stop(_) => Err(missing()),
			},
			Some(c) => {
				self.pos += 1;
				Ok(if c.is_ascii_digit() {
					Node::Number(c.to_string())
				} else {
					atom(c)
				})
			}
		}
	}

	fn read_command_name(&mut self) -> Result<String, MathError> {
		let Some(first) = self.peek() else {
			return Err(MathError::UnexpectedEnd {
				expected: "a command name",
			});
		};
		self.pos += 1;
		if !first.is_ascii_alphabetic() {
			return Ok(first.to_string());
		}
		let mut name = String::from(first);
		while let Some(c) = self.peek().filter(char::is_ascii_alphabetic) {
			name.push(c);
			self.pos += 1;
		}
		if self.peek() == Some('*') {
			name.push('*');
			self.pos += 1;
		}
		Ok(name)
	}

	/// Reads a brace group verbatim, without interpreting its contents.
	fn read_raw_group(&mut self, command: &str) -> Result<String, MathError> {
		self.skip_ws();
		if self.peek() != Some('{') {
			return Err(MathError::MissingArgument {
				command: command.to_string(),
			});
		}
		self.pos += 1;
		let mut depth = 1usize;
		let mut text = String::new();
		while let Some(c) = self.peek() {
			self.pos += 1;
			match c {
				'{' => depth += 1,
				'}' => {
					depth -= 1;
					if depth == 0 {
						return Ok(text);
					}
				}
				'\\' => {
					if let Some(next) = self.peek() {
						self.pos += 1;
						text.push(c);
						text.push(next);
						continue;
					}
				}
				_ => {}
			}
			text.push(c);
		}
		Err(MathError::UnexpectedEnd { expected: "'}'" })
	}

	fn read_delimiter(&mut self, command: &str) -> Result<String, MathError> {
		self.skip_ws();
		let invalid = || MathError::MissingDelimiter(command.to_string());
		let Some(c) = self.peek() else {
			return Err(invalid());
		};
		self.pos += 1;
		let delim = match c {
			'.' => "",
			'(' => "(",
			')' => ")",
			'[' => "[",
			']' => "]",
			'|' => "|",
			'/' => "/",
			'<' => "⟨",
			'>' => "⟩",
			'\\' => {
				let name = self.read_command_name()?;
				symbols::delimiter(&name).ok_or_else(invalid)?
			}
			_ => return Err(invalid()),
		};
		Ok(delim.to_string())
	}

	fn parse_command(&mut self, ctx: Context) -> Result<Parsed, MathError> {
		self.pos += 1;
		let name = self.read_command_name()?;
		let node = match name.as_str() {
			"\\" if ctx == Context::Cell => return Ok(Parsed::Stop(Stop::RowBreak)),
			"\\" => Node::LineBreak,
			"frac" | "dfrac" | "tfrac" | "cfrac" => {
				let num = Box::new(self.parse_argument(&name)?);
				let den = Box::new(self.parse_argument(&name)?);
				Node::Frac { num, den, line: true }
			}
			"binom" => {
				let num = Box::new(self.parse_argument(&name)?);
				let den = Box::new(self.parse_argument(&name)?);
				Node::Fenced {
					open: "(".into(),
					close: ")".into(),
					body: Box::new(Node::Frac { num, den, line: false }),
				}
			}
			"sqrt" => self.parse_sqrt()?,
			"text" | "textrm" | "textnormal" | "mbox" => Node::Text(self.read_raw_group(&name)?),
			"operatorname" => Node::Function {
				name: self.read_raw_group(&name)?,
				limits: false,
			},
			"left" => {
				let open = self.read_delimiter(&name)?;
				let (body, stop) = self.parse_seq(Context::Left)?;
				match stop {
					Stop::Right(close) => Node::Fenced {
						open,
						close,
						body: Box::new(Node::Row(body)),
					},
					Stop::End => return Err(MathError::UnmatchedLeft),
					other => return Err(self.misplaced(other)),
				}
			}
			"right" => {
				let close = self.read_delimiter(&name)?;
				if ctx != Context::Left {
					return Err(MathError::UnmatchedRight);
				}
				return Ok(Parsed::Stop(Stop::Right(close)));
			}
			"begin" => {
				let env = self.read_raw_group(&name)?;
				self.parse_environment(env.trim())?
			}
			"end" => {
				let env = self.read_raw_group(&name)?;
				return Ok(Parsed::Stop(Stop::EndEnv(env.trim().to_string())));
			}
			"{" | "}" | "%" | "$" | "#" | "&" | "_" => Node::op(&name),
			"|" => Node::op("‖"),
			_ => {
				if let Some((accent, over)) = symbols::accent(&name) {
					Node::Accent {
						base: Box::new(self.parse_argument(&name)?),
						accent,
						over,
					}
				} else if let Some(variant) = symbols::variant(&name) {
					Node::Styled {
						variant,
						body: Box::new(self.parse_argument(&name)?),
					}
				} else if let Some(sym) = symbols::lookup(&name) {
					Node::from(sym)
				} else {
					return Err(MathError::UnknownCommand(name.clone()));
				}
			}
		};
		Ok(Parsed::Node(node))
	}

	fn parse_sqrt(&mut self) -> Result<Node, MathError> {
		self.skip_ws();
		if self.peek() != Some('[') {
			return Ok(Node::Sqrt(Box::new(self.parse_argument("sqrt")?)));
		}
		self.pos += 1;
		let (index, stop) = self.parse_seq(Context::Optional)?;
		match stop {
			Stop::Bracket => {}
			Stop::End => return Err(MathError::UnexpectedEnd { expected: "']'" }),
			other => return Err(self.misplaced(other)),
		}
		let base = self.parse_argument("sqrt")?;
		Ok(Node::Root {
			base: Box::new(base),
			index: Box::new(Node::Row(index)),
		})
	}

	fn parse_environment(&mut self, env: &str) -> Result<Node, MathError> {
		let (open, close, align) = match env {
			"matrix" | "smallmatrix" => ("", "", None),
			"pmatrix" => ("(", ")", None),
			"bmatrix" => ("[", "]", None),
			"Bmatrix" => ("{", "}", None),
			"vmatrix" => ("|", "|", None),
			"Vmatrix" => ("‖", "‖", None),
			"cases" => ("{", "", Some("left left")),
			"aligned" | "align" | "align*" | "split" => ("", "", Some("right left")),
			"gathered" | "gather" | "gather*" => ("", "", Some("center")),
			_ => return Err(MathError::UnknownEnvironment(env.to_string())),
		};

		let mut rows = Vec::new();
		let mut row = Vec::new();
		loop {
			let (cell, stop) = self.parse_seq(Context::Cell)?;
			row.push(Node::Row(cell));
			match stop {
				Stop::Ampersand => {}
				Stop::RowBreak => rows.push(std::mem::take(&mut row)),
				Stop::EndEnv(found) if found == env => {
					let trailing_empty = matches!(row.as_slice(), [Node::Row(cell)] if cell.is_empty());
					if !trailing_empty || rows.is_empty() {
						rows.push(row);
					}
					break;
				}
				Stop::EndEnv(found) => {
					return Err(MathError::MismatchedEnvironment {
						expected: env.to_string(),
						found,
					});
				}
				Stop::End => return Err(MathError::UnexpectedEnd { expected: "\\end" }),
				other => return Err(self.misplaced(other)),
			}
		}
		Ok(Node::Table {
			rows,
			open,
			close,
			align,
		})
	}
}

/// Maps a plain character to its MathML atom.
fn atom(c: char) -> Node {
	match c {
		'-' => Node::op("−"),
		'*' => Node::op("∗"),
		'\'' => Node::op("′"),
		'~' => Node::Space("0.2778em"),
		c if c.is_alphabetic() => Node::Ident(c.to_string()),
		c if c.is_numeric() => Node::Number(c.to_string()),
		c => Node::op(&c.to_string()),
	}
}

struct Writer {
	display: bool,
}

impl Writer {
	fn node(&self, node: &Node, out: &mut String) {
		match node {
			Node::Ident(s) => leaf(out, "mi", s),
			Node::Number(s) => leaf(out, "mn", s),
			Node::Text(s) => leaf(out, "mtext", s),
			Node::Function { name, .. } => leaf(out, "mi", name),
			Node::Operator { text, large, .. } => {
				if *large && self.display {
					let _ = write!(out, "<mo largeop=\"true\">{}</mo>", encode_text(text));
				} else {
					leaf(out, "mo", text);
				}
			}
			Node::Row(children) => match children.as_slice() {
				[only] => self.node(only, out),
				_ => {
					out.push_str("<mrow>");
					for child in children {
						self.node(child, out);
					}
					out.push_str("</mrow>");
				}
			},
			Node::Frac { num, den, line } => {
				out.push_str(if *line { "<mfrac>" } else { "<mfrac linethickness=\"0\">" });
				self.node(num, out);
				self.node(den, out);
				out.push_str("</mfrac>");
			}
			Node::Sqrt(body) => {
				out.push_str("<msqrt>");
				self.node(body, out);
				out.push_str("</msqrt>");
			}
			Node::Root { base, index } => {
				out.push_str("<mroot>");
				self.node(base, out);
				self.node(index, out);
				out.push_str("</mroot>");
			}
			Node::Scripts { base, sub, sup } => {
				let limits = self.display && base.has_limits();
				let tag = match (sub.is_some(), sup.is_some(), limits) {
					(true, true, true) => "munderover",
					(true, false, true) => "munder",
					(false, _, true) => "mover",
					(true, true, false) => "msubsup",
					(true, false, false) => "msub",
					(false, _, false) => "msup",
				};
				let _ = write!(out, "<{tag}>");
				self.node(base, out);
				for script in [sub, sup].into_iter().flatten() {
					self.node(script, out);
				}
				let _ = write!(out, "</{tag}>");
			}
			Node::Accent { base, accent, over } => {
				let (tag, attr) = if *over { ("mover", "accent") } else { ("munder", "accentunder") };
				let _ = write!(out, "<{tag} {attr}=\"true\">");
				self.node(base, out);
				let _ = write!(out, "<mo stretchy=\"true\">{}</mo></{tag}>", encode_text(accent));
			}
			Node::Fenced { open, close, body } => {
				out.push_str("<mrow>");
				fence(out, open);
				self.node(body, out);
				fence(out, close);
				out.push_str("</mrow>");
			}
			Node::Styled { variant, body } => {
				let _ = write!(out, "<mstyle mathvariant=\"{variant}\">");
				self.node(body, out);
				out.push_str("</mstyle>");
			}
			Node::Table { rows, open, close, align } => {
				out.push_str("<mrow>");
				fence(out, open);
				match align {
					Some(align) => {
						let _ = write!(out, "<mtable columnalign=\"{align}\">");
					}
					None => out.push_str("<mtable>"),
				}
				for row in rows {
					out.push_str("<mtr>");
					for cell in row {
						out.push_str("<mtd>");
						self.node(cell, out);
						out.push_str("</mtd>");
					}
					out.push_str("</mtr>");
				}
				out.push_str("</mtable>");
				fence(out, close);
				out.push_str("</mrow>");
			}
			Node::Space(width) => {
				let _ = write!(out, "<mspace width=\"{width}\"/>");
			}
			Node::LineBreak => out.push_str("<mspace linebreak=\"newline\"/>"),
		}
	}
}

fn leaf(out: &mut String, tag: &str, text: &str) {
	let _ = write!(out, "<{tag}>{}</{tag}>", encode_text(text));
}

fn fence(out: &mut String, delim: &str) {
	if !delim.is_empty() {
		let _ = write!(
			out,
			"<mo fence=\"true\" stretchy=\"true\">{}</mo>",
			encode_text(delim)
		);
	}
}
