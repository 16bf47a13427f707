use thiserror::Error;

/// Top-level error type for the Reel workspace.
///
/// Dialog processing itself never fails (a turn always yields a decision);
/// errors only arise at the edges: configuration, I/O, serialization, and
/// session management. Crates with richer failure modes define their own
/// error types and convert via `From`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ReelError {
    fn from(err: toml::de::Error) -> Self {
        ReelError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ReelError {
    fn from(err: toml::ser::Error) -> Self {
        ReelError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ReelError {
    fn from(err: serde_json::Error) -> Self {
        ReelError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Reel operations.
pub type Result<T> = std::result::Result<T, ReelError>;
