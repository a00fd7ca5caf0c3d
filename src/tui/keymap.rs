//! Terminal key events to session [`Key`]s.
//!
//! The mapping is context free; what a key means depends on the session
//! state and is decided by the reducer.

use iocraft::prelude::{KeyCode, KeyEventKind, KeyModifiers};

use super::model::Key;

/// Convert a key event to a [`Key`] (pure function)
///
/// Returns `None` for releases and keys the session ignores.
pub fn key_from_event(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Option<Key> {
    if kind == KeyEventKind::Release {
        return None;
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Key::Interrupt),
            _ => None,
        };
    }

    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Tab if modifiers.contains(KeyModifiers::SHIFT) => Some(Key::BackTab),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::BackTab => Some(Key::BackTab),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        _ => None,
    }
}

/// Vim-style direction for `hjkl`, used on the grid when not searching
pub fn vim_direction(c: char) -> Option<Key> {
    match c {
        'h' => Some(Key::Left),
        'j' => Some(Key::Down),
        'k' => Some(Key::Up),
        'l' => Some(Key::Right),
        _ => None,
    }
}
