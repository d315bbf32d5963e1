//! Subcommand implementations

use calcweb_client::{Calculator, HttpTransport, InteractionHandler, Outcome, TextFields};
use calcweb_common::{HealthBody, Operation};
use tracing::debug;

use crate::display::TerminalDisplay;
use crate::output::OutputFormat;

/// Fill the two fields with the raw arguments and click the operation's
/// button, exactly as the page would.
///
/// The outcome has already been printed by the time this returns.
pub async fn run_operation(
    base_url: &str,
    operation: Operation,
    a: &str,
    b: &str,
    format: OutputFormat,
) -> anyhow::Result<Outcome> {
    let transport = HttpTransport::new(base_url)?;
    let handler = InteractionHandler::new(transport, TextFields::new(a, b), TerminalDisplay::new(format));
    let calculator = Calculator::new(handler);

    debug!(%operation, base_url, "clicking {}", operation.button_id());
    let outcome = calculator.click(&operation.button_id())?.await?;
    Ok(outcome)
}

/// `GET /health` on the backend
pub async fn check_status(base_url: &str) -> anyhow::Result<HealthBody> {
    let transport = HttpTransport::new(base_url)?;
    Ok(transport.health().await?)
}
