//! Keyboard bindings.
//!
//! | keys                               | command        |
//! |------------------------------------|----------------|
//! | Ctrl/Cmd+B                         | bold           |
//! | Ctrl/Cmd+I                         | italic         |
//! | Ctrl/Cmd+Z                         | undo           |
//! | Ctrl/Cmd+Shift+Z, Ctrl/Cmd+Y       | redo           |
//! | Ctrl/Cmd+S                         | save           |
//! | Escape (dialog open)               | close dialog   |
//! | Enter (dialog open)                | submit dialog  |
//! | Ctrl/Cmd+Enter (formula dialog)    | submit dialog  |
//!
//! Cmd is the `meta` modifier and binds the same as Ctrl.

use folio_primitives::{Key, KeyCode};

use crate::command::Command;
use crate::insert::ModalKind;

/// Resolves a key press to a command.
///
/// `modal` is the kind of the open dialog, if any. While a dialog is open
/// only its Escape/Enter bindings and save apply; everything else is typing.
pub fn lookup(key: &Key, modal: Option<ModalKind>) -> Option<Command> {
	if let Some(kind) = modal {
		return modal_binding(key, kind).or_else(|| save_binding(key));
	}
	if !key.modifiers.command() || key.modifiers.alt {
		return None;
	}
	let shift = key.modifiers.shift;
	match key.normalized_char()? {
		'b' if !shift => Some(Command::Bold),
		'i' if !shift => Some(Command::Italic),
		'z' if shift => Some(Command::Redo),
		'z' => Some(Command::Undo),
		'y' => Some(Command::Redo),
		's' => Some(Command::Save),
		_ => None,
	}
}

fn save_binding(key: &Key) -> Option<Command> {
	(key.modifiers.command() && key.normalized_char() == Some('s')).then_some(Command::Save)
}

fn modal_binding(key: &Key, kind: ModalKind) -> Option<Command> {
	match key.code {
		KeyCode::Escape => Some(Command::CloseModal),
		KeyCode::Enter if kind.is_multiline() => key.modifiers.command().then_some(Command::SubmitModal),
		KeyCode::Enter if !key.modifiers.shift => Some(Command::SubmitModal),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use folio_primitives::Modifiers;

	use super::*;

	#[test]
	fn ctrl_and_cmd_bind_the_same() {
		assert_eq!(lookup(&Key::ctrl('b'), None), Some(Command::Bold));
		assert_eq!(lookup(&Key::cmd('b'), None), Some(Command::Bold));
		assert_eq!(lookup(&Key::cmd('i'), None), Some(Command::Italic));
		assert_eq!(lookup(&Key::ctrl('s'), None), Some(Command::Save));
	}

	#[test]
	fn redo_bindings() {
		assert_eq!(lookup(&Key::ctrl('z'), None), Some(Command::Undo));
		assert_eq!(lookup(&Key::ctrl('z').with_shift(), None), Some(Command::Redo));
		assert_eq!(lookup(&Key::cmd('Z').with_shift(), None), Some(Command::Redo));
		assert_eq!(lookup(&Key::ctrl('y'), None), Some(Command::Redo));
	}

	#[test]
	fn plain_keys_are_typing() {
		assert_eq!(lookup(&Key::char('b'), None), None);
		assert_eq!(lookup(&Key::plain(KeyCode::Escape), None), None);
		let alt = Key::new(KeyCode::Char('b'), Modifiers::CTRL.alt());
		assert_eq!(lookup(&alt, None), None);
	}

	#[test]
	fn dialog_keys() {
		let esc = Key::plain(KeyCode::Escape);
		let enter = Key::plain(KeyCode::Enter);
		assert_eq!(lookup(&esc, Some(ModalKind::Link)), Some(Command::CloseModal));
		assert_eq!(lookup(&enter, Some(ModalKind::Link)), Some(Command::SubmitModal));
		assert_eq!(lookup(&enter, Some(ModalKind::Formula)), None);
		let ctrl_enter = Key::new(KeyCode::Enter, Modifiers::CTRL);
		assert_eq!(lookup(&ctrl_enter, Some(ModalKind::Formula)), Some(Command::SubmitModal));
		assert_eq!(lookup(&Key::ctrl('b'), Some(ModalKind::Link)), None);
		assert_eq!(lookup(&Key::cmd('s'), Some(ModalKind::Table)), Some(Command::Save));
	}
}
