//! Error types for calcweb

use thiserror::Error;

/// Result type alias using calcweb Error
pub type Result<T> = std::result::Result<T, Error>;

/// calcweb error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Inputs must be numbers or numeric strings")]
    InvalidOperand,

    #[error("Result is not a finite number")]
    NonFiniteResult,

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error was caused by the caller's operands rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::DivisionByZero
                | Error::InvalidOperand
                | Error::NonFiniteResult
                | Error::UnknownOperation(_)
        )
    }
}
