//! # quiz-progress
//!
//! Client-side progress and answer state machine for a question-bank
//! practice backend, with a terminal front end.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_progress::{ClientConfig, HttpQuizApi, QuizError, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = ClientConfig::from_env();
//!     let api = HttpQuizApi::new(&config)?;
//!
//!     // Resume whatever list the learner was last working through
//!     let mut session = Session::start(api).await?;
//!     session.load_current().await?;
//!
//!     if let Some(uid) = session.current_uid() {
//!         println!("at {uid}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod models;
pub mod protocol;
pub mod session;
pub mod terminal;

use std::io;

use thiserror::Error;

pub use api::{ApiError, HttpQuizApi, QuizApi};
pub use config::ClientConfig;
pub use models::{Flags, Question, QuestionKind, Selection, UserData};
pub use session::{Mode, Screen, Session, SessionError};

/// Top-level error for running the client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("could not open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: io::Error,
    },
}
