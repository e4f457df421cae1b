use thiserror::Error;

/// Failures reported by the messaging transport, classified by meaning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The referenced forum thread no longer exists (deleted or unusable topic).
    #[error("Message thread not found")]
    ThreadNotFound,

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Error, Debug)]
pub enum RelayError {
    /// Error annotation supplied by the calling context; echoed back to the sender.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Caption too long: {0} characters")]
    CaptionTooLong(usize),

    #[error("Unsupported content type")]
    UnsupportedContent,

    #[error("Message has no sender")]
    NoSender,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;

pub type TransportResult<T> = std::result::Result<T, TransportError>;
