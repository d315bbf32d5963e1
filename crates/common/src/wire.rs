//! JSON bodies exchanged between the page and the backend

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Request body sent by the page: `{"a": .., "b": ..}`.
///
/// Non-finite operands serialise as `null`, matching `JSON.stringify`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperandsBody {
    pub a: f64,
    pub b: f64,
}

/// Request body as received by the backend.
///
/// Operands may arrive as numbers or numeric strings; anything else is kept
/// so the backend can reject it with a readable detail.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OperandsPayload {
    pub a: OperandValue,
    pub b: OperandValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperandValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl OperandValue {
    /// Numeric value of the operand. Strings are trimmed and parsed as floats;
    /// `"nan"`, `"inf"` and other non-finite spellings are rejected.
    pub fn to_f64(&self) -> Result<f64> {
        let value = match self {
            OperandValue::Number(n) => *n,
            OperandValue::Text(s) => s.trim().parse().map_err(|_| Error::InvalidOperand)?,
            OperandValue::Other(_) => return Err(Error::InvalidOperand),
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Error::InvalidOperand)
        }
    }
}

impl OperandsPayload {
    pub fn operands(&self) -> Result<(f64, f64)> {
        Ok((self.a.to_f64()?, self.b.to_f64()?))
    }
}

/// 2xx body: `{"result": ..}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuccessBody {
    pub result: f64,
}

/// Non-2xx body: `{"detail": ".."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBody {
    pub detail: String,
}

impl FailureBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

/// `GET /health` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
}

impl HealthBody {
    pub fn ok() -> Self {
        Self { status: "ok".to_string() }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
