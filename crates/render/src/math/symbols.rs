//! Control-sequence tables for the typesetter.

/// What a bare control sequence (one without arguments) stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Symbol {
	/// An identifier-like glyph (`\alpha`, `\infty`).
	Ident(&'static str),
	/// A binary operator, relation, arrow or delimiter.
	Operator(&'static str),
	/// A large operator; `true` when scripts become limits in display mode.
	Large(&'static str, bool),
	/// A named function rendered upright (`\sin`); `true` for limits.
	Function(&'static str, bool),
	/// Horizontal space with the given width.
	Space(&'static str),
}

pub(super) fn lookup(name: &str) -> Option<Symbol> {
	use Symbol::*;

	let sym = match name {
		// Greek, lowercase.
		"alpha" => Ident("α"),
		"beta" => Ident("β"),
		"gamma" => Ident("γ"),
		"delta" => Ident("δ"),
		"epsilon" => Ident("ϵ"),
		"varepsilon" => Ident("ε"),
		"zeta" => Ident("ζ"),
		"eta" => Ident("η"),
		"theta" => Ident("θ"),
		"vartheta" => Ident("ϑ"),
		"iota" => Ident("ι"),
		"kappa" => Ident("κ"),
		"lambda" => Ident("λ"),
		"mu" => Ident("μ"),
		"nu" => Ident("ν"),
		"xi" => Ident("ξ"),
		"omicron" => Ident("ο"),
		"pi" => Ident("π"),
		"varpi" => Ident("ϖ"),
		"rho" => Ident("ρ"),
		"varrho" => Ident("ϱ"),
		"sigma" => Ident("σ"),
		"varsigma" => Ident("ς"),
		"tau" => Ident("τ"),
		"upsilon" => Ident("υ"),
		"phi" => Ident("ϕ"),
		"varphi" => Ident("φ"),
		"chi" => Ident("χ"),
		"psi" => Ident("ψ"),
		"omega" => Ident("ω"),
		// Greek, uppercase.
		"Gamma" => Ident("Γ"),
		"Delta" => Ident("Δ"),
		"Theta" => Ident("Θ"),
		"Lambda" => Ident("Λ"),
		"Xi" => Ident("Ξ"),
		"Pi" => Ident("Π"),
		"Sigma" => Ident("Σ"),
		"Upsilon" => Ident("Υ"),
		"Phi" => Ident("Φ"),
		"Psi" => Ident("Ψ"),
		"Omega" => Ident("Ω"),
		// Letter-like.
		"infty" => Ident("∞"),
		"partial" => Ident("∂"),
		"nabla" => Ident("∇"),
		"hbar" => Ident("ℏ"),
		"ell" => Ident("ℓ"),
		"Re" => Ident("ℜ"),
		"Im" => Ident("ℑ"),
		"aleph" => Ident("ℵ"),
		"emptyset" | "varnothing" => Ident("∅"),
		"angle" => Ident("∠"),
		"triangle" => Ident("△"),
		"ldots" | "dots" => Ident("…"),
		"cdots" => Ident("⋯"),
		"vdots" => Ident("⋮"),
		"ddots" => Ident("⋱"),
		// Binary operators.
		"times" => Operator("×"),
		"cdot" => Operator("⋅"),
		"div" => Operator("÷"),
		"pm" => Operator("±"),
		"mp" => Operator("∓"),
		"ast" => Operator("∗"),
		"star" => Operator("⋆"),
		"circ" => Operator("∘"),
		"bullet" => Operator("∙"),
		"cap" => Operator("∩"),
		"cup" => Operator("∪"),
		"wedge" | "land" => Operator("∧"),
		"vee" | "lor" => Operator("∨"),
		"oplus" => Operator("⊕"),
		"otimes" => Operator("⊗"),
		"setminus" => Operator("∖"),
		"neg" | "lnot" => Operator("¬"),
		"forall" => Operator("∀"),
		"exists" => Operator("∃"),
		"bmod" => Operator("mod"),
		"prime" => Operator("′"),
		// Relations.
		"leq" | "le" => Operator("≤"),
		"geq" | "ge" => Operator("≥"),
		"neq" | "ne" => Operator("≠"),
		"approx" => Operator("≈"),
		"equiv" => Operator("≡"),
		"sim" => Operator("∼"),
		"simeq" => Operator("≃"),
		"cong" => Operator("≅"),
		"propto" => Operator("∝"),
		"ll" => Operator("≪"),
		"gg" => Operator("≫"),
		"in" => Operator("∈"),
		"notin" => Operator("∉"),
		"ni" => Operator("∋"),
		"subset" => Operator("⊂"),
		"supset" => Operator("⊃"),
		"subseteq" => Operator("⊆"),
		"supseteq" => Operator("⊇"),
		"mid" => Operator("∣"),
		"parallel" => Operator("∥"),
		"perp" => Operator("⊥"),
		// Arrows.
		"to" | "rightarrow" => Operator("→"),
		"gets" | "leftarrow" => Operator("←"),
		"leftrightarrow" => Operator("↔"),
		"Rightarrow" => Operator("⇒"),
		"Leftarrow" => Operator("⇐"),
		"Leftrightarrow" | "iff" => Operator("⇔"),
		"implies" => Operator("⟹"),
		"mapsto" => Operator("↦"),
		"uparrow" => Operator("↑"),
		"downarrow" => Operator("↓"),
		// Delimiters.
		"langle" => Operator("⟨"),
		"rangle" => Operator("⟩"),
		"lfloor" => Operator("⌊"),
		"rfloor" => Operator("⌋"),
		"lceil" => Operator("⌈"),
		"rceil" => Operator("⌉"),
		"vert" => Operator("|"),
		"Vert" => Operator("‖"),
		"lbrace" => Operator("{"),
		"rbrace" => Operator("}"),
		// Large operators.
		"sum" => Large("∑", true),
		"prod" => Large("∏", true),
		"coprod" => Large("∐", true),
		"bigcup" => Large("⋃", true),
		"bigcap" => Large("⋂", true),
		"bigoplus" => Large("⨁", true),
		"bigotimes" => Large("⨂", true),
		"int" => Large("∫", false),
		"iint" => Large("∬", false),
		"iiint" => Large("∭", false),
		"oint" => Large("∮", false),
		// Named functions.
		"lim" => Function("lim", true),
		"limsup" => Function("lim sup", true),
		"liminf" => Function("lim inf", true),
		"max" => Function("max", true),
		"min" => Function("min", true),
		"sup" => Function("sup", true),
		"inf" => Function("inf", true),
		"det" => Function("det", true),
		"gcd" => Function("gcd", true),
		"sin" | "cos" | "tan" | "cot" | "sec" | "csc" | "arcsin" | "arccos" | "arctan" | "sinh"
		| "cosh" | "tanh" | "coth" | "log" | "ln" | "lg" | "exp" | "deg" | "dim" | "ker" | "arg"
		| "hom" => return function_name(name).map(|n| Function(n, false)),
		// Spacing.
		"," | "thinspace" => Space("0.1667em"),
		":" | ">" | "medspace" => Space("0.2222em"),
		";" | "thickspace" | " " => Space("0.2778em"),
		"!" => Space("-0.1667em"),
		"quad" => Space("1em"),
		"qquad" => Space("2em"),
		_ => return None,
	};
	Some(sym)
}

/// Maps a function control sequence to its static display name.
fn function_name(name: &str) -> Option<&'static str> {
	const NAMES: &[&str] = &[
		"sin", "cos", "tan", "cot", "sec", "csc", "arcsin", "arccos", "arctan", "sinh", "cosh",
		"tanh", "coth", "log", "ln", "lg", "exp", "deg", "dim", "ker", "arg", "hom",
	];
	NAMES.iter().copied().find(|n| *n == name)
}

/// Accent control sequences: glyph and whether it sits above the base.
pub(super) fn accent(name: &str) -> Option<(&'static str, bool)> {
	let acc = match name {
		"hat" | "widehat" => ("^", true),
		"bar" | "overline" => ("¯", true),
		"vec" | "overrightarrow" => ("→", true),
		"dot" => ("˙", true),
		"ddot" => ("¨", true),
		"tilde" | "widetilde" => ("~", true),
		"underline" => ("_", false),
		_ => return None,
	};
	Some(acc)
}

/// Font-variant commands and the MathML `mathvariant` they map to.
pub(super) fn variant(name: &str) -> Option<&'static str> {
	let v = match name {
		"mathrm" => "normal",
		"mathbf" | "boldsymbol" => "bold",
		"mathit" => "italic",
		"mathbb" => "double-struck",
		"mathcal" => "script",
		"mathfrak" => "fraktur",
		"mathsf" => "sans-serif",
		"mathtt" => "monospace",
		_ => return None,
	};
	Some(v)
}

/// Delimiter used after `\left`/`\right` when written as a control sequence.
pub(super) fn delimiter(name: &str) -> Option<&'static str> {
	let d = match name {
		"{" | "lbrace" => "{",
		"}" | "rbrace" => "}",
		"|" | "Vert" => "‖",
		"vert" => "|",
		"langle" => "⟨",
		"rangle" => "⟩",
		"lfloor" => "⌊",
		"rfloor" => "⌋",
		"lceil" => "⌈",
		"rceil" => "⌉",
		_ => return None,
	};
	Some(d)
}
