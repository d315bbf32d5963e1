//! Operation request built from the operand fields

use calcweb_common::{coerce_number, Operation, OperandsBody};

/// One click's worth of request: both operands already coerced, plus the
/// endpoint they are sent to. Built fresh per click and dropped once the
/// response has been rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationRequest {
    pub a: f64,
    pub b: f64,
    pub endpoint: Operation,
}

impl OperationRequest {
    /// Coerce raw field text with `Number()` rules. Non-numeric text becomes
    /// `NaN` and is still sent.
    pub fn from_fields(endpoint: Operation, a: &str, b: &str) -> Self {
        Self {
            a: coerce_number(a),
            b: coerce_number(b),
            endpoint,
        }
    }

    pub fn path(&self) -> String {
        self.endpoint.path()
    }

    pub fn body(&self) -> OperandsBody {
        OperandsBody { a: self.a, b: self.b }
    }
}
