//! Core types for calcweb

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};

/// One of the four arithmetic operations the backend exposes.
///
/// Each operation owns a fixed endpoint name, which doubles as the request
/// path (`/add`) and the page's button id (`btn-add`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    /// All operations, in page order
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    /// Endpoint name
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Request path on the backend
    pub fn path(&self) -> String {
        format!("/{}", self.endpoint())
    }

    /// Id of the page button bound to this operation
    pub fn button_id(&self) -> String {
        format!("btn-{}", self.endpoint())
    }

    /// Operator symbol used in log lines
    pub fn symbol(&self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '*',
            Operation::Divide => '/',
        }
    }

    /// Capitalised name used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Add => "Add",
            Operation::Subtract => "Subtract",
            Operation::Multiply => "Multiply",
            Operation::Divide => "Divide",
        }
    }

    /// Apply the operation with IEEE semantics.
    ///
    /// Dividing by exactly zero is rejected instead of producing an infinity,
    /// and so is any result that overflows to an infinity or NaN.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64> {
        let result = match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => {
                if b == 0.0 {
                    return Err(Error::DivisionByZero);
                }
                a / b
            }
        };
        if result.is_finite() {
            Ok(result)
        } else {
            Err(Error::NonFiniteResult)
        }
    }

    /// Look up the operation bound to a button id
    pub fn from_button_id(id: &str) -> Option<Self> {
        let endpoint = id.strip_prefix("btn-")?;
        endpoint.parse().ok()
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.endpoint())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "multiply" => Ok(Operation::Multiply),
            "divide" => Ok(Operation::Divide),
            other => Err(Error::UnknownOperation(other.to_string())),
        }
    }
}
