use thiserror::Error;

/// Errors raised by the branch listing library.
#[derive(Debug, Error)]
pub enum Error {
    /// A record could not be constructed from the given input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Git(#[from] git2::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A settings file or command line value could not be used.
    #[error("configuration error: {0}")]
    Config(String),
}
