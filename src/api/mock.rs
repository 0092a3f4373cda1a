//! In-memory quiz backend for tests.
//!
//! [`MockQuizApi`] keeps a question bank and a server-side [`UserData`],
//! scores answers the way the real backend does, and records every call so
//! tests can assert on network traffic (or its absence). Clones share state.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::models::{AnswerRecord, Flags, ProgressEntry, Question, Selection, UserData};
use crate::protocol::{AnswerVerdict, FlagsUpdate, StartMode, StartRequest, StartResponse};

use super::{ApiError, QuizApi};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    UserData,
    Flags,
    UpdateFlags(FlagsUpdate),
    Question { uid: String, reveal: bool },
    Answer { uid: String, selected: Selection },
    ToggleStar { uid: String },
    SaveProgress { key: String, pos: usize },
    Start(StartRequest),
    ClearUnit { unit: String },
}

/// Endpoints that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    UserData,
    Flags,
    /// Question fetches without `reveal`.
    Question,
    /// Question fetches with `reveal=1`.
    Disclosure,
    Answer,
    Star,
    SaveProgress,
    Start,
    ClearUnit,
}

impl Endpoint {
    fn name(self) -> &'static str {
        match self {
            Self::UserData => "/api/user/data",
            Self::Flags => "/api/flags",
            Self::Question | Self::Disclosure => "/api/question",
            Self::Answer => "/api/answer",
            Self::Star => "/api/star",
            Self::SaveProgress => "/api/progress/save",
            Self::Start => "/api/start",
            Self::ClearUnit => "/api/clear_unit",
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    bank: IndexMap<String, Question>,
    user_data: UserData,
    flags: Flags,
    calls: Vec<ApiCall>,
    failing: HashSet<Endpoint>,
}

/// Test double for [`QuizApi`].
#[derive(Debug, Clone, Default)]
pub struct MockQuizApi {
    state: Arc<Mutex<MockState>>,
}

impl MockQuizApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a question to the bank. Its `answer` is what scoring uses.
    pub fn with_question(self, question: Question) -> Self {
        self.lock().bank.insert(question.uid.clone(), question);
        self
    }

    pub fn with_user_data(self, data: UserData) -> Self {
        self.lock().user_data = data;
        self
    }

    pub fn with_flags(self, flags: Flags) -> Self {
        self.lock().flags = flags;
        self
    }

    /// Make every call to `endpoint` fail with a 503 until [`Self::recover`].
    pub fn fail(&self, endpoint: Endpoint) {
        self.lock().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.lock().failing.remove(&endpoint);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Number of answer submissions that reached the backend.
    pub fn answer_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ApiCall::Answer { .. }))
            .count()
    }

    /// Positions saved, in order.
    pub fn saved_positions(&self) -> Vec<(String, usize)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                ApiCall::SaveProgress { key, pos } => Some((key.clone(), *pos)),
                _ => None,
            })
            .collect()
    }

    /// The backend's own copy of the learner state.
    pub fn server_user_data(&self) -> UserData {
        self.lock().user_data.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record `call`, then fail if `endpoint` is marked failing.
    fn enter(&self, call: ApiCall, endpoint: Endpoint) -> Result<MutexGuard<'_, MockState>, ApiError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(&endpoint) {
            return Err(ApiError::Status {
                endpoint: endpoint.name(),
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(state)
    }
}

fn score(selected: &Selection, answer: Option<&Selection>) -> bool {
    match (selected, answer) {
        (Selection::One(s), Some(Selection::One(a))) => s == a,
        (Selection::Many(s), Some(Selection::Many(a))) => {
            let s: HashSet<&String> = s.iter().collect();
            let a: HashSet<&String> = a.iter().collect();
            s == a
        }
        _ => false,
    }
}

#[async_trait]
impl QuizApi for MockQuizApi {
    async fn user_data(&self) -> Result<UserData, ApiError> {
        let state = self.enter(ApiCall::UserData, Endpoint::UserData)?;
        Ok(state.user_data.clone())
    }

    async fn flags(&self) -> Result<Flags, ApiError> {
        let state = self.enter(ApiCall::Flags, Endpoint::Flags)?;
        Ok(state.flags)
    }

    async fn update_flags(&self, update: FlagsUpdate) -> Result<Flags, ApiError> {
        let mut state = self.enter(ApiCall::UpdateFlags(update), Endpoint::Flags)?;
        if let Some(on) = update.show_explanations {
            state.flags.show_explanations = on;
        }
        if let Some(on) = update.reveal_mode {
            state.flags.reveal_mode = on;
        }
        Ok(state.flags)
    }

    async fn question(&self, uid: &str, reveal: bool) -> Result<Question, ApiError> {
        let endpoint = if reveal {
            Endpoint::Disclosure
        } else {
            Endpoint::Question
        };
        let call = ApiCall::Question {
            uid: uid.to_string(),
            reveal,
        };
        let state = self.enter(call, endpoint)?;
        let mut question = state.bank.get(uid).cloned().ok_or_else(|| ApiError::Status {
            endpoint: endpoint.name(),
            status: 404,
            message: "no such question".to_string(),
        })?;
        if !reveal {
            question.answer = None;
        }
        Ok(question)
    }

    async fn answer(&self, uid: &str, selected: &Selection) -> Result<AnswerVerdict, ApiError> {
        let call = ApiCall::Answer {
            uid: uid.to_string(),
            selected: selected.clone(),
        };
        let mut state = self.enter(call, Endpoint::Answer)?;
        let answer = state.bank.get(uid).and_then(|q| q.answer.clone());
        let correct = score(selected, answer.as_ref());

        state.user_data.global.record_verdict(uid, correct);
        state.user_data.last_choice.insert(
            uid.to_string(),
            AnswerRecord {
                correct,
                selected: selected.clone(),
            },
        );
        Ok(AnswerVerdict { correct, answer })
    }

    async fn toggle_star(&self, uid: &str) -> Result<bool, ApiError> {
        let call = ApiCall::ToggleStar {
            uid: uid.to_string(),
        };
        let mut state = self.enter(call, Endpoint::Star)?;
        let starred = !state.user_data.global.is_starred(uid);
        state.user_data.global.set_starred(uid, starred);
        Ok(starred)
    }

    async fn save_progress(&self, key: &str, pos: usize) -> Result<(), ApiError> {
        let call = ApiCall::SaveProgress {
            key: key.to_string(),
            pos,
        };
        let mut state = self.enter(call, Endpoint::SaveProgress)?;
        match state.user_data.progress.get_mut(key) {
            Some(entry) => entry.pos = pos,
            None => {
                state.user_data.progress.insert(
                    key.to_string(),
                    ProgressEntry {
                        pos,
                        ..ProgressEntry::default()
                    },
                );
            }
        }
        state.user_data.current_progress_key = Some(key.to_string());
        Ok(())
    }

    async fn start(&self, request: &StartRequest) -> Result<StartResponse, ApiError> {
        let mut state = self.enter(ApiCall::Start(request.clone()), Endpoint::Start)?;
        let reveal = request.reveal.unwrap_or(false);

        let (key, entry) = match &request.mode {
            StartMode::Sequential { unit } => {
                let key = match unit {
                    Some(unit) => format!("sequential:{unit}"),
                    None => "sequential".to_string(),
                };
                let entry = match state.user_data.progress.get(&key) {
                    Some(existing) => ProgressEntry {
                        reveal: request.reveal.unwrap_or(existing.reveal),
                        ..existing.clone()
                    },
                    None => {
                        let prefix = unit.as_ref().map(|u| format!("{u}-"));
                        let list = state
                            .bank
                            .keys()
                            .filter(|uid| prefix.as_ref().is_none_or(|p| uid.starts_with(p)))
                            .cloned()
                            .collect();
                        ProgressEntry { list, pos: 0, reveal }
                    }
                };
                (key, entry)
            }
            StartMode::Tag { tag } => {
                let list = match tag.as_str() {
                    "wrong" => state.user_data.global.wrong.iter().cloned().collect(),
                    "star" => state.user_data.global.star.iter().cloned().collect(),
                    _ => Vec::new(),
                };
                (format!("tag:{tag}"), ProgressEntry { list, pos: 0, reveal })
            }
            StartMode::Random { count } => {
                let list = state.bank.keys().take(*count).cloned().collect();
                (format!("random:{count}"), ProgressEntry { list, pos: 0, reveal })
            }
        };

        state.user_data.progress.insert(key.clone(), entry.clone());
        state.user_data.current_progress_key = Some(key.clone());
        Ok(StartResponse {
            list: entry.list,
            pos: entry.pos,
            reveal: entry.reveal,
            key,
        })
    }

    async fn clear_unit(&self, unit: &str) -> Result<(), ApiError> {
        let call = ApiCall::ClearUnit {
            unit: unit.to_string(),
        };
        let mut state = self.enter(call, Endpoint::ClearUnit)?;
        let prefix = format!("{unit}-");
        state
            .user_data
            .last_choice
            .retain(|uid, _| !uid.starts_with(&prefix));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;

    fn question(uid: &str, answer: &str) -> Question {
        Question {
            uid: uid.to_string(),
            prompt: format!("prompt {uid}"),
            kind: QuestionKind::SingleChoice,
            options: [("A".to_string(), "a".to_string()), ("B".to_string(), "b".to_string())]
                .into_iter()
                .collect(),
            answer: Some(Selection::one(answer)),
            explanation: None,
        }
    }

    #[tokio::test]
    async fn test_question_hides_answer_without_reveal() {
        let api = MockQuizApi::new().with_question(question("1-1", "A"));
        assert!(api.question("1-1", false).await.unwrap().answer.is_none());
        assert!(api.question("1-1", true).await.unwrap().answer.is_some());
    }

    #[tokio::test]
    async fn test_answer_updates_server_state() {
        let api = MockQuizApi::new().with_question(question("1-1", "A"));
        let verdict = api.answer("1-1", &Selection::one("B")).await.unwrap();
        assert!(!verdict.correct);
        assert!(api.server_user_data().global.is_wrong("1-1"));

        let verdict = api.answer("1-1", &Selection::one("A")).await.unwrap();
        assert!(verdict.correct);
        assert!(!api.server_user_data().global.is_wrong("1-1"));
    }

    #[tokio::test]
    async fn test_multi_scoring_ignores_order() {
        let mut q = question("1-2", "A");
        q.answer = Some(Selection::Many(vec!["C".into(), "A".into()]));
        let api = MockQuizApi::new().with_question(q);
        let verdict = api
            .answer("1-2", &Selection::many(["A", "C"]))
            .await
            .unwrap();
        assert!(verdict.correct);
    }

    #[tokio::test]
    async fn test_failing_endpoint_still_records_call() {
        let api = MockQuizApi::new();
        api.fail(Endpoint::Star);
        let err = api.toggle_star("1-1").await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(api.calls(), vec![ApiCall::ToggleStar { uid: "1-1".into() }]);
    }

    #[tokio::test]
    async fn test_start_random_and_tag() {
        let api = MockQuizApi::new()
            .with_question(question("1-1", "A"))
            .with_question(question("1-2", "A"))
            .with_question(question("2-1", "A"));
        let started = api.start(&StartRequest::random(2)).await.unwrap();
        assert_eq!(started.key, "random:2");
        assert_eq!(started.list, vec!["1-1", "1-2"]);

        api.answer("2-1", &Selection::one("B")).await.unwrap();
        let started = api.start(&StartRequest::tag("wrong")).await.unwrap();
        assert_eq!(started.key, "tag:wrong");
        assert_eq!(started.list, vec!["2-1"]);

        let started = api
            .start(&StartRequest::sequential(Some("1".into())))
            .await
            .unwrap();
        assert_eq!(started.list, vec!["1-1", "1-2"]);
        assert_eq!(
            api.server_user_data().current_progress_key.as_deref(),
            Some("sequential:1")
        );
    }
}
