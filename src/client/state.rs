//! Client-side presentation state.
//!
//! Everything here is local to the terminal: the option cursor, the jump
//! prompt and the status line. Quiz state lives in the session.

use super::input::InputMode;

/// Severity of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// One-line message shown under the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Client application state.
#[derive(Debug, Default)]
pub struct ClientApp {
    /// Highlighted option, zero-based.
    pub cursor: usize,
    pub input: InputMode,
    pub notice: Option<Notice>,
    /// Whether the client should quit.
    pub should_quit: bool,
}

impl ClientApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Move the highlight down, wrapping around `count` options.
    pub fn cursor_down(&mut self, count: usize) {
        if count > 0 {
            self.cursor = (self.cursor + 1) % count;
        }
    }

    /// Move the highlight up, wrapping around `count` options.
    pub fn cursor_up(&mut self, count: usize) {
        if count > 0 {
            self.cursor = (self.cursor + count - 1) % count;
        }
    }

    /// Called whenever a different question is shown.
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    pub fn begin_jump(&mut self) {
        self.input = InputMode::Jump(String::new());
    }

    pub fn push_jump_digit(&mut self, digit: char) {
        if let InputMode::Jump(buffer) = &mut self.input {
            if buffer.len() < 6 {
                buffer.push(digit);
            }
        }
    }

    pub fn pop_jump_digit(&mut self) {
        if let InputMode::Jump(buffer) = &mut self.input {
            buffer.pop();
        }
    }

    pub fn cancel_jump(&mut self) {
        self.input = InputMode::Normal;
    }

    /// Leave the jump prompt and return the zero-based index typed, if any.
    pub fn take_jump(&mut self) -> Option<usize> {
        let InputMode::Jump(buffer) = std::mem::take(&mut self.input) else {
            return None;
        };
        buffer.parse::<usize>().ok()?.checked_sub(1)
    }

    /// Text of the jump prompt while it is open.
    pub fn jump_prompt(&self) -> Option<&str> {
        match &self.input {
            InputMode::Jump(buffer) => Some(buffer),
            InputMode::Normal => None,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        });
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Warning,
            text: text.into(),
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
