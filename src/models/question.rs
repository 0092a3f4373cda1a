use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum QuestionKind {
    /// One option, submitted on click.
    #[default]
    SingleChoice,
    /// Two options, submitted on click.
    TrueFalse,
    /// Any subset of options, submitted explicitly.
    MultiChoice,
}

impl QuestionKind {
    /// Parse a backend type label. Unknown labels fall back to single-choice.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "true_false" | "truefalse" | "judge" | "判断题" => Self::TrueFalse,
            "multi" | "multi_choice" | "multiple" | "多选题" => Self::MultiChoice,
            _ => Self::SingleChoice,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::SingleChoice => "single",
            Self::TrueFalse => "true_false",
            Self::MultiChoice => "multi",
        }
    }

    pub fn is_multi(self) -> bool {
        matches!(self, Self::MultiChoice)
    }
}

impl From<Option<String>> for QuestionKind {
    fn from(label: Option<String>) -> Self {
        label.as_deref().map(Self::from_label).unwrap_or_default()
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        kind.label().to_string()
    }
}

/// A chosen option key, or a set of them for multi-choice questions.
///
/// Also used for correct answers, which share the same wire shape.
///
/// The default is the empty set, which is what a recorded `null` decodes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
}

impl Default for Selection {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl Selection {
    pub fn one(key: impl Into<String>) -> Self {
        Self::One(key.into())
    }

    /// Build a set selection. Keys are sorted and deduplicated so two
    /// selections of the same keys compare equal regardless of click order.
    pub fn many<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        keys.sort();
        keys.dedup();
        Self::Many(keys)
    }

    pub fn contains(&self, key: &str) -> bool {
        match self {
            Self::One(k) => k == key,
            Self::Many(keys) => keys.iter().any(|k| k == key),
        }
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::One(k) => vec![k.as_str()],
            Self::Many(keys) => keys.iter().map(String::as_str).collect(),
        }
    }

    /// Human-readable form used in feedback lines, e.g. `B` or `A, C`.
    pub fn describe(&self) -> String {
        match self {
            Self::One(k) => k.clone(),
            Self::Many(keys) if keys.is_empty() => "(none)".to_string(),
            Self::Many(keys) => keys.join(", "),
        }
    }
}

/// A question as served by the backend.
///
/// `answer` is only present when disclosure was requested or permitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub uid: String,
    #[serde(
        rename = "question",
        alias = "prompt",
        default,
        deserialize_with = "null_as_default"
    )]
    pub prompt: String,
    #[serde(rename = "type", default)]
    pub kind: QuestionKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Selection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn is_disclosed(&self) -> bool {
        self.answer.is_some()
    }
}
