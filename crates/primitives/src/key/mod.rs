mod modifiers;

pub use modifiers::Modifiers;

/// A key identifier independent of modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
	/// A printable character.
	Char(char),
	Enter,
	Escape,
	Tab,
	Backspace,
	Delete,
}

/// A key press: code plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
	pub code: KeyCode,
	pub modifiers: Modifiers,
}

impl Key {
	/// Creates a key with explicit modifiers.
	pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
		Self { code, modifiers }
	}

	/// Creates an unmodified character key.
	pub const fn char(c: char) -> Self {
		Self::new(KeyCode::Char(c), Modifiers::NONE)
	}

	/// Creates a Ctrl+`c` key.
	pub const fn ctrl(c: char) -> Self {
		Self::new(KeyCode::Char(c), Modifiers::CTRL)
	}

	/// Creates a Cmd+`c` key.
	pub const fn cmd(c: char) -> Self {
		Self::new(KeyCode::Char(c), Modifiers::META)
	}

	/// Creates an unmodified key from a code.
	pub const fn plain(code: KeyCode) -> Self {
		Self::new(code, Modifiers::NONE)
	}

	/// Returns a copy with Shift added.
	pub fn with_shift(self) -> Self {
		Self {
			modifiers: self.modifiers.shift(),
			..self
		}
	}

	/// Returns the character for `Char` keys, lowercased so that Shift
	/// does not change which binding matches.
	pub fn normalized_char(&self) -> Option<char> {
		match self.code {
			KeyCode::Char(c) => Some(c.to_ascii_lowercase()),
			_ => None,
		}
	}
}

impl From<KeyCode> for Key {
	fn from(code: KeyCode) -> Self {
		Self::plain(code)
	}
}
