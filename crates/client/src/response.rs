//! Tagged operation response and the outcome shown to the user

use calcweb_common::format_number;
use serde_json::Value;

use crate::error::ClientError;

/// Backend reply, selected by HTTP status rather than payload shape
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResponse {
    /// 2xx with a numeric `result`
    Success { result: f64 },
    /// Non-2xx; `detail` is absent when missing, `null` or empty
    Failure { detail: Option<String> },
}

/// A response together with the JSON it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub response: OperationResponse,
    pub data: Value,
}

impl ParsedResponse {
    /// Parse a settled reply.
    ///
    /// The body is decoded as JSON before the status is looked at, so an
    /// undecodable body is an error whatever the status. A 2xx body must
    /// carry a numeric `result`.
    pub fn parse(status: u16, body: &[u8]) -> Result<Self, ClientError> {
        let data: Value = serde_json::from_slice(body)?;

        let response = if (200..300).contains(&status) {
            let result = data
                .get("result")
                .and_then(Value::as_f64)
                .ok_or_else(|| ClientError::MalformedResponse("response is missing a numeric result".to_string()))?;
            OperationResponse::Success { result }
        } else {
            OperationResponse::Failure {
                detail: detail_text(data.get("detail")),
            }
        };

        Ok(Self { response, data })
    }
}

fn detail_text(detail: Option<&Value>) -> Option<String> {
    match detail {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

/// What the result display shows once a request has settled
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Result(f64),
    Error(String),
}

impl Outcome {
    pub fn display_text(&self) -> String {
        match self {
            Outcome::Result(value) => format!("Result: {}", format_number(*value)),
            Outcome::Error(message) => format!("Error: {}", message),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<OperationResponse> for Outcome {
    fn from(response: OperationResponse) -> Self {
        match response {
            OperationResponse::Success { result } => Outcome::Result(result),
            OperationResponse::Failure { detail } => {
                Outcome::Error(detail.unwrap_or_else(|| "Unknown error".to_string()))
            }
        }
    }
}

impl From<ClientError> for Outcome {
    fn from(e: ClientError) -> Self {
        Outcome::Error(e.to_string())
    }
}
