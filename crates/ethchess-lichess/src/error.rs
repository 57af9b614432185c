//! Error types for the Lichess adapter.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, LichessError>;

/// Errors that can occur talking to Lichess.
#[derive(Debug, thiserror::Error)]
pub enum LichessError {
    /// Network/HTTP error, including timeouts.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider returned a non-success status. The body is kept
    /// verbatim so callers can surface it unchanged.
    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    /// The provider returned a success status but an unparseable body.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for LichessError {
    fn from(e: reqwest::Error) -> Self {
        LichessError::Network(e.to_string())
    }
}
