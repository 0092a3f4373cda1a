//! Local mirror of the learner state held by the backend.

use tracing::debug;

use crate::models::{AnswerRecord, GlobalStats, ProgressEntry, Selection, UserData};

/// In-memory copy of [`UserData`], fetched once per session and then patched
/// locally after every answer or star action. It is never pushed back whole;
/// the backend receives deltas through the dedicated endpoints instead.
#[derive(Debug, Clone, Default)]
pub struct UserDataCache {
    data: UserData,
}

impl UserDataCache {
    pub fn new(data: UserData) -> Self {
        Self { data }
    }

    pub fn snapshot(&self) -> &UserData {
        &self.data
    }

    pub fn record(&self, uid: &str) -> Option<&AnswerRecord> {
        self.data.last_choice.get(uid)
    }

    pub fn global(&self) -> &GlobalStats {
        &self.data.global
    }

    pub fn is_starred(&self, uid: &str) -> bool {
        self.data.global.is_starred(uid)
    }

    pub fn is_wrong(&self, uid: &str) -> bool {
        self.data.global.is_wrong(uid)
    }

    pub fn progress(&self, key: &str) -> Option<&ProgressEntry> {
        self.data.progress.get(key)
    }

    /// Store the verdict for `uid` and bring the wrong set in line with it.
    pub fn record_answer(&mut self, uid: &str, selected: Selection, correct: bool) {
        debug!(uid, correct, "caching answer record");
        self.data
            .last_choice
            .insert(uid.to_string(), AnswerRecord { correct, selected });
        self.data.global.record_verdict(uid, correct);
    }

    pub fn set_starred(&mut self, uid: &str, starred: bool) {
        self.data.global.set_starred(uid, starred);
    }

    /// Mirror a saved position so the cache matches what was persisted.
    pub fn set_position(&mut self, key: &str, pos: usize) {
        match self.data.progress.get_mut(key) {
            Some(entry) => entry.pos = pos,
            None => {
                self.data.progress.insert(
                    key.to_string(),
                    ProgressEntry {
                        pos,
                        ..ProgressEntry::default()
                    },
                );
            }
        }
        self.data.current_progress_key = Some(key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_answer_tracks_wrong_set() {
        let mut cache = UserDataCache::default();
        cache.record_answer("q1", Selection::one("B"), false);
        assert!(cache.is_wrong("q1"));
        assert_eq!(cache.record("q1").map(|r| r.correct), Some(false));

        cache.record_answer("q1", Selection::one("A"), true);
        assert!(!cache.is_wrong("q1"));
        assert_eq!(cache.record("q1").map(|r| &r.selected), Some(&Selection::one("A")));
    }

    #[test]
    fn test_set_starred_is_idempotent() {
        let mut cache = UserDataCache::default();
        cache.set_starred("q1", true);
        cache.set_starred("q1", true);
        assert_eq!(cache.global().star.len(), 1);
        cache.set_starred("q1", false);
        assert!(!cache.is_starred("q1"));
    }

    #[test]
    fn test_set_position_creates_entry() {
        let mut cache = UserDataCache::default();
        cache.set_position("random:5", 3);
        assert_eq!(cache.progress("random:5").map(|e| e.pos), Some(3));
        assert_eq!(
            cache.snapshot().current_progress_key.as_deref(),
            Some("random:5")
        );
    }
}
