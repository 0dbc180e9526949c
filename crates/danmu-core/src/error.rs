//! Error types for danmu analysis

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for danmu analysis operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The comment source could not produce comments (bad id, network, status code)
    #[error("comment source unavailable: {0}")]
    SourceUnavailable(String),

    /// Remote classification failed; recovered by the local classifier
    #[error("remote classification error: {0}")]
    RemoteClassification(String),

    /// Remote tokenization failed; recovered by local tokenization
    #[error("remote tokenization error: {0}")]
    RemoteTokenization(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport errors
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// The operation was cancelled by a newer analysis session
    #[error("operation cancelled")]
    Cancelled,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new source-unavailable error
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Create a new remote classification error
    pub fn remote_classification(msg: impl Into<String>) -> Self {
        Self::RemoteClassification(msg.into())
    }

    /// Create a new remote tokenization error
    pub fn remote_tokenization(msg: impl Into<String>) -> Self {
        Self::RemoteTokenization(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error came from the comment source
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}
