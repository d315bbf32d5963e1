//! calcweb Client
//!
//! The request/response cycle bound to the calculator's four buttons:
//! read two operand fields, `POST` them to the operation's endpoint, and
//! render either `Result: ..` or `Error: ..` into the result display.
//!
//! # Architecture
//!
//! ```text
//! Calculator ── click("btn-add") ──▶ InteractionHandler::perform_operation(Add)
//!                                      ├── OperandInputs::read()      (field text)
//!                                      ├── Transport::post_json()     (suspends here)
//!                                      ├── ParsedResponse::parse()    (tagged by status)
//!                                      └── ResultDisplay::render()    (if token is current)
//! ```

pub mod calculator;
pub mod error;
pub mod handler;
pub mod page;
pub mod request;
pub mod response;
pub mod transport;

pub use calculator::Calculator;
pub use error::ClientError;
pub use handler::{InteractionHandler, RenderPolicy};
pub use page::{OperandInputs, ResultDisplay, TextDisplay, TextField, TextFields};
pub use request::OperationRequest;
pub use response::{OperationResponse, Outcome, ParsedResponse};
pub use transport::{HttpTransport, RawResponse, Transport};
