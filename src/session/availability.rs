//! Per-session answer eligibility for tag sessions.

use std::collections::HashSet;

/// Questions that may still get their one fresh attempt this session.
///
/// Seeded from the active list at session start and only ever shrinks.
/// Never persisted: a reload seeds it again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionAvailability {
    remaining: HashSet<String>,
}

impl SessionAvailability {
    pub fn from_list(list: &[String]) -> Self {
        Self {
            remaining: list.iter().cloned().collect(),
        }
    }

    pub fn is_available(&self, uid: &str) -> bool {
        self.remaining.contains(uid)
    }

    /// Remove `uid` for the rest of the session. Returns whether it was present.
    pub fn consume(&mut self, uid: &str) -> bool {
        self.remaining.remove(uid)
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Entering a tag session hides pre-existing history on the first question
/// shown; every later question is displayed normally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Entering,
    Steady,
}

impl SessionPhase {
    pub fn hides_history(self) -> bool {
        matches!(self, Self::Entering)
    }

    /// Called once the first question has been rendered.
    pub fn settle(&mut self) {
        *self = Self::Steady;
    }
}
