//! Button bindings

use calcweb_common::Operation;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::error::ClientError;
use crate::handler::InteractionHandler;
use crate::page::{OperandInputs, ResultDisplay};
use crate::response::Outcome;
use crate::transport::Transport;

/// The four operation buttons, each bound to the shared handler when the
/// calculator is built
pub struct Calculator<T, I, D> {
    handler: Arc<InteractionHandler<T, I, D>>,
    bindings: HashMap<String, Operation>,
}

impl<T, I, D> Calculator<T, I, D>
where
    T: Transport + 'static,
    I: OperandInputs + 'static,
    D: ResultDisplay + 'static,
{
    pub fn new(handler: InteractionHandler<T, I, D>) -> Self {
        let bindings = Operation::ALL
            .iter()
            .map(|op| (op.button_id(), *op))
            .collect();
        Self {
            handler: Arc::new(handler),
            bindings,
        }
    }

    pub fn handler(&self) -> &Arc<InteractionHandler<T, I, D>> {
        &self.handler
    }

    /// Bound button ids, in page order
    pub fn buttons(&self) -> Vec<String> {
        Operation::ALL.iter().map(Operation::button_id).collect()
    }

    /// Click a button.
    ///
    /// The cycle runs as its own task; the caller may await the handle or
    /// drop it. Clicking again before it settles starts a second, fully
    /// independent cycle.
    pub fn click(&self, button_id: &str) -> Result<JoinHandle<Outcome>, ClientError> {
        let endpoint = self
            .bindings
            .get(button_id)
            .copied()
            .ok_or_else(|| ClientError::UnknownButton(button_id.to_string()))?;

        let handler = Arc::clone(&self.handler);
        Ok(tokio::spawn(async move { handler.perform_operation(endpoint).await }))
    }
}
