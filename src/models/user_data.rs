//! Server-held learner state, as returned by the user-data endpoint.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::{Selection, null_as_default};

/// The learner's most recent answer to one question.
///
/// A `null` selection is kept as the empty set: the verdict still counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub correct: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected: Selection,
}

/// Decode `last_choice`, dropping entries that are not answer records.
///
/// One bad entry must not make the whole snapshot unreadable.
fn lenient_records<'de, D>(deserializer: D) -> Result<HashMap<String, AnswerRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    let records = raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(uid, value)| match serde_json::from_value(value) {
            Ok(record) => Some((uid, record)),
            Err(e) => {
                warn!(%uid, error = %e, "Dropping unreadable answer record");
                None
            }
        })
        .collect();
    Ok(records)
}

/// Cumulative wrong and starred sets, independent of any progress list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    #[serde(default)]
    pub wrong: BTreeSet<String>,
    #[serde(default)]
    pub star: BTreeSet<String>,
}

impl GlobalStats {
    /// Keep `wrong` in step with the latest verdict for `uid`.
    pub fn record_verdict(&mut self, uid: &str, correct: bool) {
        if correct {
            self.wrong.remove(uid);
        } else {
            self.wrong.insert(uid.to_string());
        }
    }

    pub fn set_starred(&mut self, uid: &str, starred: bool) {
        if starred {
            self.star.insert(uid.to_string());
        } else {
            self.star.remove(uid);
        }
    }

    pub fn is_wrong(&self, uid: &str) -> bool {
        self.wrong.contains(uid)
    }

    pub fn is_starred(&self, uid: &str) -> bool {
        self.star.contains(uid)
    }
}

/// One saved question list with a cursor into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    #[serde(default)]
    pub list: Vec<String>,
    #[serde(default)]
    pub pos: usize,
    #[serde(default)]
    pub reveal: bool,
}

impl ProgressEntry {
    /// `pos` limited to `[0, list.len()]`.
    pub fn clamped_pos(&self) -> usize {
        self.pos.min(self.list.len())
    }
}

/// Snapshot of everything the backend stores for the learner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, deserialize_with = "lenient_records")]
    pub last_choice: HashMap<String, AnswerRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub global: GlobalStats,
    /// Keyed progress lists in the order the backend sent them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: IndexMap<String, ProgressEntry>,
    #[serde(default)]
    pub current_progress_key: Option<String>,
}

/// Feature flags stored with the learner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default)]
    pub show_explanations: bool,
    #[serde(default)]
    pub reveal_mode: bool,
}
