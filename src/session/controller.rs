//! Session controller.
//!
//! [`Session`] owns all per-session state (cache, list, cursor, mode,
//! availability, phase) and the backend handle. Every action takes
//! `&mut self` and awaits its requests in order, so two actions on the same
//! session can never interleave.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::api::QuizApi;
use crate::models::{AnswerRecord, Flags, Question, Selection};
use crate::protocol::{AnswerVerdict, FlagsUpdate, StartRequest};

use super::availability::{SessionAvailability, SessionPhase};
use super::cache::UserDataCache;
use super::error::SessionError;
use super::mode::Mode;
use super::render::{GridMark, QuestionView, RenderInput, needs_disclosure, render_question};
use super::selector::{self, SessionPlan};
use super::submit::{AnswerSubmitter, check_eligibility};

/// Result of a best-effort position save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Saved,
    /// No progress key, nothing to save against.
    Skipped,
    /// Logged and otherwise ignored; local state is kept.
    Failed,
}

impl Persistence {
    pub fn failed(self) -> bool {
        matches!(self, Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub verdict: AnswerVerdict,
    pub persistence: Persistence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarOutcome {
    pub starred: bool,
    pub persistence: Persistence,
}

/// One square of the navigation grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub index: usize,
    pub uid: String,
    pub mark: Option<GridMark>,
    pub starred: bool,
    pub active: bool,
}

/// What the presentation layer should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// The active list has no questions.
    Empty,
    /// The cursor sits past the last question.
    Completed,
    /// The question at the cursor has not been loaded (or failed to load).
    NotLoaded,
    Question(QuestionView),
}

#[derive(Debug, Clone)]
struct CurrentQuestion {
    index: usize,
    question: Question,
    draft: BTreeSet<String>,
    /// First question of a tag session: pre-existing history stays hidden.
    entering: bool,
}

pub struct Session<A> {
    api: A,
    cache: UserDataCache,
    key: Option<String>,
    list: Vec<String>,
    pos: usize,
    mode: Mode,
    flags: Flags,
    availability: SessionAvailability,
    phase: SessionPhase,
    current: Option<CurrentQuestion>,
}

impl<A: QuizApi> Session<A> {
    /// Fetch user data and flags and resolve the active progress list.
    ///
    /// No question is loaded yet; call [`Session::load_current`] next.
    pub async fn start(api: A) -> Result<Self, SessionError> {
        let (cache, plan) = selector::load(&api).await?;
        Ok(Self::from_plan(api, cache, plan))
    }

    /// Ask the backend to create (or resume) a session, then start it.
    pub async fn begin(api: A, request: &StartRequest) -> Result<Self, SessionError> {
        let started = api.start(request).await?;
        info!(key = %started.key, questions = started.list.len(), "backend started session");
        Self::start(api).await
    }

    pub fn from_plan(api: A, cache: UserDataCache, plan: SessionPlan) -> Self {
        let availability = if plan.mode.is_tag() {
            SessionAvailability::from_list(&plan.list)
        } else {
            SessionAvailability::default()
        };

        Self {
            api,
            cache,
            key: plan.key,
            list: plan.list,
            pos: plan.pos,
            mode: plan.mode,
            flags: plan.flags,
            availability,
            phase: SessionPhase::Entering,
            current: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn list(&self) -> &[String] {
        &self.list
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn cache(&self) -> &UserDataCache {
        &self.cache
    }

    pub fn availability(&self) -> &SessionAvailability {
        &self.availability
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn current_uid(&self) -> Option<&str> {
        self.list.get(self.pos).map(String::as_str)
    }

    /// History to display for `uid`, resolved for the session mode.
    pub fn history(&self, uid: &str) -> Option<&AnswerRecord> {
        match &self.mode {
            Mode::Reveal => None,
            Mode::Normal => self.cache.record(uid),
            Mode::TagFiltered(_) if self.availability.is_available(uid) => None,
            Mode::TagFiltered(_) => self.cache.record(uid),
        }
    }

    fn history_at(&self, index: usize) -> Option<&AnswerRecord> {
        if let Some(current) = &self.current {
            if current.index == index && current.entering {
                return None;
            }
        }
        self.history(self.list.get(index)?)
    }

    /// Fetch the question at the cursor, disclosing its answer when the mode
    /// or its history calls for it.
    ///
    /// A failed disclosure fetch is logged and the question renders without
    /// the answer.
    pub async fn load_current(&mut self) -> Result<(), SessionError> {
        self.current = None;
        let Some(uid) = self.list.get(self.pos).cloned() else {
            return Ok(());
        };

        let entering = self.mode.is_tag() && self.phase.hides_history();
        let history = if entering {
            None
        } else {
            self.history(&uid).cloned()
        };

        let mut question = self.api.question(&uid, self.mode.is_reveal()).await?;
        if needs_disclosure(&self.mode, history.as_ref()) && !question.is_disclosed() {
            match self.api.question(&uid, true).await {
                Ok(disclosed) => question.answer = disclosed.answer,
                Err(err) => {
                    warn!(uid = %uid, error = %err, "answer disclosure failed, rendering without it");
                }
            }
        }

        let draft = match &history {
            Some(record) if question.kind.is_multi() => {
                record.selected.keys().into_iter().map(str::to_string).collect()
            }
            _ => BTreeSet::new(),
        };

        debug!(uid = %uid, pos = self.pos, history = history.is_some(), entering, "question loaded");
        self.current = Some(CurrentQuestion {
            index: self.pos,
            question,
            draft,
            entering,
        });
        self.phase.settle();
        Ok(())
    }

    pub fn screen(&self) -> Screen {
        if self.list.is_empty() {
            return Screen::Empty;
        }
        if self.pos >= self.list.len() {
            return Screen::Completed;
        }
        match &self.current {
            Some(current) if current.index == self.pos => Screen::Question(self.render(current)),
            _ => Screen::NotLoaded,
        }
    }

    fn render(&self, current: &CurrentQuestion) -> QuestionView {
        let uid = &self.list[current.index];
        render_question(&RenderInput {
            question: &current.question,
            mode: &self.mode,
            history: self.history_at(current.index),
            draft: &current.draft,
            show_explanations: self.flags.show_explanations,
            starred: self.cache.is_starred(uid),
            index: current.index,
            total: self.list.len(),
        })
    }

    pub fn grid(&self) -> Vec<GridCell> {
        self.list
            .iter()
            .enumerate()
            .map(|(index, uid)| GridCell {
                index,
                uid: uid.clone(),
                mark: self
                    .history_at(index)
                    .map(|record| GridMark::from_correct(record.correct)),
                starred: self.cache.is_starred(uid),
                active: index == self.pos,
            })
            .collect()
    }

    fn loaded(&self) -> Result<&CurrentQuestion, SessionError> {
        self.current
            .as_ref()
            .filter(|c| c.index == self.pos)
            .ok_or(SessionError::NoQuestion)
    }

    /// Flip `key` in the multi-choice draft. Returns whether it is now on.
    pub fn toggle_option(&mut self, key: &str) -> Result<bool, SessionError> {
        let current = self.loaded()?;
        let uid = self.list[current.index].clone();
        check_eligibility(&self.mode, &self.cache, &self.availability, &uid)?;

        let Some(current) = self.current.as_mut() else {
            return Err(SessionError::NoQuestion);
        };
        if !current.question.options.contains_key(key) {
            return Ok(false);
        }
        if current.draft.remove(key) {
            Ok(false)
        } else {
            current.draft.insert(key.to_string());
            Ok(true)
        }
    }

    /// Submit a single option. Multi-choice questions receive it as a
    /// one-element set.
    pub async fn choose(&mut self, key: &str) -> Result<SubmitOutcome, SessionError> {
        let selection = if self.loaded()?.question.kind.is_multi() {
            Selection::many([key])
        } else {
            Selection::one(key)
        };
        self.submit(selection).await
    }

    /// Submit the toggled multi-choice set. An empty set is a valid answer.
    pub async fn submit_draft(&mut self) -> Result<SubmitOutcome, SessionError> {
        let selection = Selection::many(self.loaded()?.draft.iter().cloned());
        self.submit(selection).await
    }

    /// Submit `selection` for the question at the cursor.
    pub async fn submit(&mut self, selection: Selection) -> Result<SubmitOutcome, SessionError> {
        let uid = self.list[self.loaded()?.index].clone();

        let verdict = AnswerSubmitter::new(
            &self.api,
            &self.mode,
            &mut self.cache,
            &mut self.availability,
        )
        .submit(&uid, selection.clone())
        .await?;

        if let Some(current) = self.current.as_mut() {
            // Marks follow the verdict, not whatever was disclosed earlier.
            current.question.answer = verdict.answer.clone();
            current.entering = false;
            current.draft = if current.question.kind.is_multi() {
                selection.keys().into_iter().map(str::to_string).collect()
            } else {
                BTreeSet::new()
            };
        }

        let persistence = self.persist_position().await;
        Ok(SubmitOutcome {
            verdict,
            persistence,
        })
    }

    /// Toggle the star on the question at the cursor.
    pub async fn toggle_star(&mut self) -> Result<StarOutcome, SessionError> {
        let uid = self
            .current_uid()
            .map(str::to_string)
            .ok_or(SessionError::NoQuestion)?;
        self.toggle_star_for(&uid).await
    }

    /// Toggle the star on `uid`. The backend's reported state is adopted as-is.
    pub async fn toggle_star_for(&mut self, uid: &str) -> Result<StarOutcome, SessionError> {
        let starred = self.api.toggle_star(uid).await?;
        self.cache.set_starred(uid, starred);
        info!(uid, starred, "star toggled");

        let persistence = self.persist_position().await;
        Ok(StarOutcome {
            starred,
            persistence,
        })
    }

    pub async fn next(&mut self) -> Result<Persistence, SessionError> {
        let target = (self.pos + 1).min(self.list.len().saturating_sub(1));
        self.go_to(target).await
    }

    pub async fn prev(&mut self) -> Result<Persistence, SessionError> {
        let target = self.pos.saturating_sub(1).min(self.list.len().saturating_sub(1));
        self.go_to(target).await
    }

    /// Jump straight to a grid entry.
    pub async fn jump(&mut self, index: usize) -> Result<Persistence, SessionError> {
        if index >= self.list.len() {
            return Err(SessionError::OutOfRange {
                index,
                len: self.list.len(),
            });
        }
        self.go_to(index).await
    }

    async fn go_to(&mut self, index: usize) -> Result<Persistence, SessionError> {
        if self.list.is_empty() {
            return Ok(Persistence::Skipped);
        }
        self.pos = index;
        let persistence = self.persist_position().await;
        self.load_current().await?;
        Ok(persistence)
    }

    /// Turn explanation display on or off, adopting the flags the backend returns.
    pub async fn set_show_explanations(&mut self, on: bool) -> Result<bool, SessionError> {
        let update = FlagsUpdate {
            show_explanations: Some(on),
            ..FlagsUpdate::default()
        };
        self.flags = self.api.update_flags(update).await?;
        info!(show_explanations = self.flags.show_explanations, "flags updated");
        Ok(self.flags.show_explanations)
    }

    async fn persist_position(&mut self) -> Persistence {
        let Some(key) = self.key.clone() else {
            return Persistence::Skipped;
        };
        self.cache.set_position(&key, self.pos);

        match self.api.save_progress(&key, self.pos).await {
            Ok(()) => {
                debug!(key = %key, pos = self.pos, "position saved");
                Persistence::Saved
            }
            Err(err) => {
                warn!(key = %key, pos = self.pos, error = %err, "position save failed");
                Persistence::Failed
            }
        }
    }
}

impl<A> std::fmt::Debug for Session<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("pos", &self.pos)
            .field("len", &self.list.len())
            .field("mode", &self.mode)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
