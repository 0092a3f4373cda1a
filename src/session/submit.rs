//! Answer submission.

use tracing::{info, warn};

use crate::api::QuizApi;
use crate::models::Selection;
use crate::protocol::AnswerVerdict;

use super::availability::SessionAvailability;
use super::cache::UserDataCache;
use super::error::SessionError;
use super::mode::Mode;

/// Decide locally whether `uid` may be answered right now.
///
/// Normal sessions lock a question once any record exists. Tag sessions
/// allow one attempt per question per session. Study mode allows none.
pub fn check_eligibility(
    mode: &Mode,
    cache: &UserDataCache,
    availability: &SessionAvailability,
    uid: &str,
) -> Result<(), SessionError> {
    match mode {
        Mode::Reveal => Err(SessionError::RevealOnly),
        Mode::Normal if cache.record(uid).is_some() => Err(SessionError::Locked(uid.to_string())),
        Mode::TagFiltered(_) if !availability.is_available(uid) => {
            Err(SessionError::Unavailable(uid.to_string()))
        }
        _ => Ok(()),
    }
}

/// Scores one answer and applies the verdict to the session state.
pub struct AnswerSubmitter<'a, A: QuizApi + ?Sized> {
    api: &'a A,
    mode: &'a Mode,
    cache: &'a mut UserDataCache,
    availability: &'a mut SessionAvailability,
}

impl<'a, A: QuizApi + ?Sized> AnswerSubmitter<'a, A> {
    pub fn new(
        api: &'a A,
        mode: &'a Mode,
        cache: &'a mut UserDataCache,
        availability: &'a mut SessionAvailability,
    ) -> Self {
        Self {
            api,
            mode,
            cache,
            availability,
        }
    }

    /// Submit `selection` for `uid`.
    ///
    /// Ineligible questions are rejected without a request. On success the
    /// record is cached, the wrong set updated, and in tag sessions the
    /// question is spent for the rest of the session.
    pub async fn submit(self, uid: &str, selection: Selection) -> Result<AnswerVerdict, SessionError> {
        if let Err(rejection) = check_eligibility(self.mode, self.cache, self.availability, uid) {
            warn!(uid, %rejection, "answer rejected");
            return Err(rejection);
        }

        let verdict = self.api.answer(uid, &selection).await?;
        self.cache.record_answer(uid, selection, verdict.correct);
        if self.mode.is_tag() {
            self.availability.consume(uid);
        }

        info!(uid, correct = verdict.correct, "answer scored");
        Ok(verdict)
    }
}
