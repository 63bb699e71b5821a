use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A parameter value the visits endpoint cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to encode filters: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write report: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
