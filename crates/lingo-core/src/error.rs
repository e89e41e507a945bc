use thiserror::Error;

/// Top-level error type for lingo.
#[derive(Debug, Error)]
pub enum LingoError {
    /// Error from a translation source (language list or export fetch).
    #[error("source error: {0}")]
    Source(String),

    /// Error establishing or reading the live-update feed.
    #[error("feed error: {0}")]
    Feed(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
