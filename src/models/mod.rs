mod question;
mod user_data;

use serde::{Deserialize, Deserializer};

pub use question::{Question, QuestionKind, Selection};
pub use user_data::{AnswerRecord, Flags, GlobalStats, ProgressEntry, UserData};

/// Decode an explicit `null` as the field's default value.
///
/// The backend echoes missing bank fields as `null` rather than omitting them.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
