//! calcweb Common Library
//!
//! Shared types for the calcweb calculator: the four operations, the wire
//! bodies exchanged between page and backend, and the number handling both
//! sides must agree on.

pub mod error;
pub mod number;
pub mod types;
pub mod wire;

// Re-export commonly used types
pub use error::{Error, Result};
pub use number::{coerce_number, format_number};
pub use types::Operation;
pub use wire::{FailureBody, HealthBody, OperandValue, OperandsBody, OperandsPayload, SuccessBody};

/// calcweb version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL the page, CLI and browser tests target when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Listen address of the backend when nothing else is configured
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
