//! Progress and answer state machine.
//!
//! The pieces compose bottom-up: [`UserDataCache`] holds the learner state,
//! [`selector`] picks the list to resume, [`SessionAvailability`] gates tag
//! sessions, [`render_question`] builds the view, [`AnswerSubmitter`] scores
//! answers, and [`Session`] ties them together with navigation and stars.

mod availability;
mod cache;
mod controller;
mod error;
mod mode;
mod render;
pub mod selector;
mod submit;

pub use availability::{SessionAvailability, SessionPhase};
pub use cache::UserDataCache;
pub use controller::{GridCell, Persistence, Screen, Session, StarOutcome, SubmitOutcome};
pub use error::SessionError;
pub use mode::{Mode, RANDOM_PREFIX, STAR_KEY, TAG_PREFIX, TagKind, WRONG_KEY};
pub use render::{
    Feedback, GridMark, OptionLayout, OptionMarks, OptionView, QuestionView, RenderInput,
    needs_disclosure, render_question,
};
pub use selector::SessionPlan;
pub use submit::{AnswerSubmitter, check_eligibility};
