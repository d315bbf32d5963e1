//! Error types for the interaction cycle
//!
//! Every variant's message is what the result display shows after `Error: `.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read
    #[error("{0}")]
    Transport(String),

    /// The response body is not JSON
    #[error("{0}")]
    Parse(String),

    /// The response body is JSON but not the shape its status promises
    #[error("{0}")]
    MalformedResponse(String),

    #[error("Unknown button: {0}")]
    UnknownButton(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest keeps the useful part (connection refused, dns failure) in the source chain
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ClientError::Transport(message)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Parse(e.to_string())
    }
}
