use thiserror::Error;

use crate::api::ApiError;

/// Errors from session actions.
///
/// The first group are rejections decided locally, before any request is
/// sent. `Api` wraps a failed backend call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question {0} has already been answered")]
    Locked(String),
    #[error("question {0} was already attempted in this session")]
    Unavailable(String),
    #[error("answering is disabled in study mode")]
    RevealOnly,
    #[error("no question is loaded")]
    NoQuestion,
    #[error("position {index} is outside the list of {len} questions")]
    OutOfRange { index: usize, len: usize },
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SessionError {
    /// True for rejections that never reached the network.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Api(_))
    }
}
