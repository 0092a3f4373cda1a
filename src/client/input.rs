//! Keyboard mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Whether keys drive the quiz or feed the jump prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Digits typed after `g`, one-based.
    Jump(String),
}

/// A user intent, decoupled from the key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    CursorUp,
    CursorDown,
    /// Answer (single choice) or toggle (multi-choice) the option under the cursor.
    Choose,
    /// Submit the multi-choice draft.
    SubmitDraft,
    Next,
    Prev,
    ToggleStar,
    ToggleExplanations,
    BeginJump,
    JumpDigit(char),
    JumpBackspace,
    ConfirmJump,
    CancelJump,
}

pub fn map_key(key: KeyEvent, mode: &InputMode) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    match mode {
        InputMode::Jump(_) => match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => Some(Command::JumpDigit(c)),
            KeyCode::Backspace => Some(Command::JumpBackspace),
            KeyCode::Enter => Some(Command::ConfirmJump),
            KeyCode::Esc => Some(Command::CancelJump),
            _ => None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Command::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::CursorDown),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Choose),
            KeyCode::Char('s') => Some(Command::SubmitDraft),
            KeyCode::Right | KeyCode::Char('n') => Some(Command::Next),
            KeyCode::Left | KeyCode::Char('p') => Some(Command::Prev),
            KeyCode::Char('*') => Some(Command::ToggleStar),
            KeyCode::Char('e') => Some(Command::ToggleExplanations),
            KeyCode::Char('g') => Some(Command::BeginJump),
            _ => None,
        },
    }
}
