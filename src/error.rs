/// Error types shared by the API client and the host adapters
use thiserror::Error;

/// Failures talking to the rating API. `Display` is what the popup shows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Error text supplied by the server
    #[error("{0}")]
    Server(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Score must be between 1 and 10, got {0}")]
    InvalidScore(u8),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Failures reaching extension capabilities (tabs, badge, messaging)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("{0} is not available in this context")]
    Unavailable(&'static str),

    #[error("Extension call failed: {0}")]
    Js(String),

    #[error("Message channel closed before a response arrived")]
    ChannelClosed,

    #[error("Failed to parse host value: {0}")]
    Decode(String),
}
