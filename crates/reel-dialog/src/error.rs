use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the dialog layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DialogError {
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("session already ended: {0}")]
    SessionEnded(Uuid),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reel_core::ReelError> for DialogError {
    fn from(err: reel_core::ReelError) -> Self {
        DialogError::Internal(err.to_string())
    }
}
