//! Request and response bodies for the quiz backend.
//!
//! All bodies are JSON. Field names follow the backend.

use serde::{Deserialize, Serialize};

use crate::models::Selection;

/// Body of `POST answer`.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerRequest<'a> {
    pub uid: &'a str,
    pub selected: &'a Selection,
}

/// Scoring verdict returned for a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerVerdict {
    pub correct: bool,
    /// The correct answer. Absent only if the bank has none recorded.
    #[serde(default)]
    pub answer: Option<Selection>,
}

/// Star endpoint actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarAction {
    Toggle,
}

/// Body of `POST star`.
#[derive(Debug, Clone, Serialize)]
pub struct StarRequest<'a> {
    pub uid: &'a str,
    pub action: StarAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarResponse {
    pub starred: bool,
}

/// Body of `POST progress/save`.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressSave<'a> {
    pub key: &'a str,
    pub pos: usize,
}

/// Generic acknowledgement.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
}

/// Error body the backend sends alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Which list a new session is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StartMode {
    /// A unit's questions in bank order, resuming saved progress.
    Sequential {
        #[serde(skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    /// The learner's wrong or starred set.
    Tag { tag: String },
    /// A fresh random sample of the bank.
    Random { count: usize },
}

/// Default sample size for random sessions.
pub const DEFAULT_RANDOM_COUNT: usize = 50;

/// Body of `POST start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartRequest {
    #[serde(flatten)]
    pub mode: StartMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal: Option<bool>,
}

impl StartRequest {
    pub fn sequential(unit: Option<String>) -> Self {
        Self {
            mode: StartMode::Sequential { unit },
            reveal: None,
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            mode: StartMode::Tag { tag: tag.into() },
            reveal: None,
        }
    }

    pub fn random(count: usize) -> Self {
        Self {
            mode: StartMode::Random { count },
            reveal: None,
        }
    }

    pub fn with_reveal(mut self, reveal: bool) -> Self {
        self.reveal = Some(reveal);
        self
    }
}

/// Session the backend created or resumed for a start request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartResponse {
    #[serde(default)]
    pub list: Vec<String>,
    #[serde(default)]
    pub pos: usize,
    #[serde(default)]
    pub reveal: bool,
    pub key: String,
}

/// Body of `POST flags`. Unset fields are left alone by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlagsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_explanations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_mode: Option<bool>,
}

/// Body of `POST clear_unit`.
#[derive(Debug, Clone, Serialize)]
pub struct ClearUnitRequest<'a> {
    pub unit: &'a str,
}
