//! Backend seam.
//!
//! [`QuizApi`] lists every endpoint the client consumes. The session state
//! machine only talks to this trait, so it runs unchanged against the real
//! HTTP backend ([`HttpQuizApi`]) or the in-memory double ([`mock::MockQuizApi`]).

mod http;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Flags, Question, Selection, UserData};
use crate::protocol::{AnswerVerdict, FlagsUpdate, StartRequest, StartResponse};

pub use http::HttpQuizApi;

/// Errors from a backend call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned status {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
    #[error("invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Endpoints of the quiz backend.
#[async_trait]
pub trait QuizApi: Send + Sync {
    /// `GET user/data`
    async fn user_data(&self) -> Result<UserData, ApiError>;

    /// `GET flags`
    async fn flags(&self) -> Result<Flags, ApiError>;

    /// `POST flags`, returning the flag set after the update.
    async fn update_flags(&self, update: FlagsUpdate) -> Result<Flags, ApiError>;

    /// `GET question?uid=..[&reveal=1]`
    async fn question(&self, uid: &str, reveal: bool) -> Result<Question, ApiError>;

    /// `POST answer`
    async fn answer(&self, uid: &str, selected: &Selection) -> Result<AnswerVerdict, ApiError>;

    /// `POST star` with the toggle action. Returns the server's new state.
    async fn toggle_star(&self, uid: &str) -> Result<bool, ApiError>;

    /// `POST progress/save`
    async fn save_progress(&self, key: &str, pos: usize) -> Result<(), ApiError>;

    /// `POST start`
    async fn start(&self, request: &StartRequest) -> Result<StartResponse, ApiError>;

    /// `POST clear_unit`
    async fn clear_unit(&self, unit: &str) -> Result<(), ApiError>;
}
