//! Question view-model.
//!
//! [`render_question`] is a pure function from a question plus the resolved
//! session state to a [`QuestionView`]. The terminal layer only draws what it
//! is handed, so every interactivity and marking rule lives here.

use std::collections::BTreeSet;

use crate::models::{AnswerRecord, Question, QuestionKind};

use super::mode::Mode;

/// Inputs for one render.
///
/// `history` must already be resolved for the mode: `None` for questions that
/// are still fresh in a tag session, whatever the cache holds.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub question: &'a Question,
    pub mode: &'a Mode,
    pub history: Option<&'a AnswerRecord>,
    /// Keys toggled on a multi-choice question that has not been submitted.
    pub draft: &'a BTreeSet<String>,
    pub show_explanations: bool,
    pub starred: bool,
    /// Zero-based position in the list.
    pub index: usize,
    pub total: usize,
}

/// Visual state of one option. The three marks are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionMarks {
    pub selected: bool,
    pub correct: bool,
    pub wrong: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub key: String,
    pub text: String,
    pub marks: OptionMarks,
}

/// How options take input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionLayout {
    /// Single-choice and true/false: choosing an option submits it.
    SubmitOnChoose,
    /// Multi-choice: options toggle, a separate action submits the set.
    ToggleThenSubmit,
}

impl OptionLayout {
    pub fn for_kind(kind: QuestionKind) -> Self {
        if kind.is_multi() {
            Self::ToggleThenSubmit
        } else {
            Self::SubmitOnChoose
        }
    }
}

/// Colour of a question's square in the navigation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMark {
    Correct,
    Incorrect,
}

impl GridMark {
    pub fn from_correct(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }
}

/// Correctness line shown under an answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    /// Disclosed answer, when it should be spelled out.
    pub answer: Option<String>,
}

impl Feedback {
    pub fn line(&self) -> String {
        match (self.correct, &self.answer) {
            (true, None) => "✓ Correct".to_string(),
            (true, Some(answer)) => format!("✓ Correct (answer: {answer})"),
            (false, None) => "✗ Incorrect".to_string(),
            (false, Some(answer)) => format!("✗ Incorrect, correct answer: {answer}"),
        }
    }
}

/// Everything the presentation layer needs to draw a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub uid: String,
    /// One-based.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub kind: QuestionKind,
    pub layout: OptionLayout,
    pub options: Vec<OptionView>,
    pub interactive: bool,
    pub feedback: Option<Feedback>,
    pub explanation: Option<String>,
    pub starred: bool,
    pub grid_mark: Option<GridMark>,
}

impl QuestionView {
    pub fn title(&self) -> String {
        format!("{}. {}", self.number, self.prompt)
    }

    /// The separate submit action only exists for open multi-choice questions.
    pub fn shows_submit(&self) -> bool {
        self.interactive && self.layout == OptionLayout::ToggleThenSubmit
    }

    pub fn option(&self, key: &str) -> Option<&OptionView> {
        self.options.iter().find(|o| o.key == key)
    }
}

/// Whether the correct answer has to be fetched for this question.
pub fn needs_disclosure(mode: &Mode, history: Option<&AnswerRecord>) -> bool {
    mode.is_reveal() || history.is_some()
}

pub fn render_question(input: &RenderInput<'_>) -> QuestionView {
    let question = input.question;
    let reveal = input.mode.is_reveal();
    let history = if reveal { None } else { input.history };
    let answer = if reveal || history.is_some() {
        question.answer.as_ref()
    } else {
        None
    };

    let options = question
        .options
        .iter()
        .map(|(key, text)| {
            let mut marks = OptionMarks::default();
            if reveal {
                if let Some(answer) = answer {
                    marks.correct = answer.contains(key);
                    marks.wrong = !marks.correct;
                }
            } else if let Some(record) = history {
                marks.selected = record.selected.contains(key);
                if let Some(answer) = answer {
                    marks.correct = answer.contains(key);
                    marks.wrong = marks.selected && !marks.correct;
                }
            } else {
                marks.selected = input.draft.contains(key);
            }
            OptionView {
                key: key.to_string(),
                text: text.clone(),
                marks,
            }
        })
        .collect();

    let feedback = history.map(|record| Feedback {
        correct: record.correct,
        answer: answer
            .filter(|_| !record.correct || input.show_explanations)
            .map(|a| a.describe()),
    });

    let explanation = if reveal || (history.is_some() && input.show_explanations) {
        question.explanation.clone().filter(|e| !e.trim().is_empty())
    } else {
        None
    };

    QuestionView {
        uid: question.uid.clone(),
        number: input.index + 1,
        total: input.total,
        prompt: question.prompt.clone(),
        kind: question.kind,
        layout: OptionLayout::for_kind(question.kind),
        options,
        interactive: !reveal && history.is_none(),
        feedback,
        explanation,
        starred: input.starred,
        grid_mark: history.map(|record| GridMark::from_correct(record.correct)),
    }
}
