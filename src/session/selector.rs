//! Picks the progress list a session resumes and classifies its mode.

use tracing::info;

use crate::api::{ApiError, QuizApi};
use crate::models::{Flags, UserData};

use super::cache::UserDataCache;
use super::mode::Mode;

/// Everything decided at session start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub key: Option<String>,
    pub list: Vec<String>,
    pub pos: usize,
    pub mode: Mode,
    pub flags: Flags,
}

impl SessionPlan {
    /// Nothing to practise; the caller shows an empty state.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// `current_progress_key` if set, else the first progress key as received.
pub fn resolve_key(data: &UserData) -> Option<String> {
    data.current_progress_key
        .clone()
        .or_else(|| data.progress.keys().next().cloned())
}

/// Build the plan from a user-data snapshot. Missing entries resolve to an
/// empty list at position 0 with reveal off.
pub fn resolve_plan(data: &UserData, flags: Flags) -> SessionPlan {
    let key = resolve_key(data);
    let entry = key.as_deref().and_then(|k| data.progress.get(k));

    let (list, pos, reveal) = match entry {
        Some(entry) => (entry.list.clone(), entry.clamped_pos(), entry.reveal),
        None => (Vec::new(), 0, false),
    };
    let mode = Mode::classify(key.as_deref(), reveal);

    SessionPlan {
        key,
        list,
        pos,
        mode,
        flags,
    }
}

/// Fetch user data and flags, then resolve the plan.
pub async fn load<A: QuizApi + ?Sized>(api: &A) -> Result<(UserDataCache, SessionPlan), ApiError> {
    let data = api.user_data().await?;
    let flags = api.flags().await?;
    let plan = resolve_plan(&data, flags);

    info!(
        key = plan.key.as_deref().unwrap_or("<none>"),
        questions = plan.list.len(),
        pos = plan.pos,
        mode = %plan.mode.label(),
        "session plan resolved"
    );

    Ok((UserDataCache::new(data), plan))
}
