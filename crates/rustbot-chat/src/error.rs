//! Error types for chat operations

use rustbot_search::SearchError;
use thiserror::Error;

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors raised while talking to the chat model or saving transcripts
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Chat API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid chat response: {0}")]
    InvalidResponse(String),

    /// The model answered with nothing
    #[error("Chat model returned an empty reply")]
    EmptyReply,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Retrieval failed: {0}")]
    Search(#[from] SearchError),

    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl ChatError {
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
