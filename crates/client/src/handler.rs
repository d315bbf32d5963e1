//! Interaction handler: one request/response cycle per click

use calcweb_common::Operation;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::page::{OperandInputs, ResultDisplay};
use crate::request::OperationRequest;
use crate::response::{Outcome, ParsedResponse};
use crate::transport::Transport;

/// Which settled request gets to write the result display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPolicy {
    /// Only the most recently issued request renders; earlier ones that
    /// settle late are dropped
    #[default]
    LastClickWins,
    /// Every request renders when it settles, so the last to complete wins
    LastCompleteWins,
}

/// Drives the cycle for every operation button.
///
/// Each call to [`perform_operation`](Self::perform_operation) is independent:
/// no retries, no timeout of its own, no cancellation. The only suspension
/// point is the transport exchange.
pub struct InteractionHandler<T, I, D> {
    transport: T,
    inputs: I,
    display: D,
    policy: RenderPolicy,
    /// Token of the most recently issued request
    latest: AtomicU64,
    /// Serialises the token check with the render that follows it
    render_lock: Mutex<()>,
}

impl<T, I, D> InteractionHandler<T, I, D>
where
    T: Transport,
    I: OperandInputs,
    D: ResultDisplay,
{
    pub fn new(transport: T, inputs: I, display: D) -> Self {
        Self {
            transport,
            inputs,
            display,
            policy: RenderPolicy::default(),
            latest: AtomicU64::new(0),
            render_lock: Mutex::new(()),
        }
    }

    pub fn with_policy(mut self, policy: RenderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RenderPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn inputs(&self) -> &I {
        &self.inputs
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Token of the most recently issued request, `0` before the first
    pub fn latest_token(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Run one cycle for `endpoint` and return its outcome.
    ///
    /// Failures never escape: transport, decoding and shape errors all come
    /// back as [`Outcome::Error`] and are rendered like any other outcome.
    /// The returned outcome is this request's own, whether or not the render
    /// policy let it reach the display.
    pub async fn perform_operation(&self, endpoint: Operation) -> Outcome {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let (a, b) = self.inputs.read();
        let request = OperationRequest::from_fields(endpoint, &a, &b);
        debug!(%endpoint, token, a = request.a, b = request.b, "issuing operation request");

        let outcome = match self.exchange(&request).await {
            Ok(parsed) => {
                info!(%endpoint, response = %parsed.data, "operation settled");
                Outcome::from(parsed.response)
            }
            Err(e) => Outcome::from(e),
        };

        self.settle(token, endpoint, &outcome);
        outcome
    }

    async fn exchange(&self, request: &OperationRequest) -> Result<ParsedResponse, ClientError> {
        let raw = self.transport.post_json(&request.path(), &request.body()).await?;
        ParsedResponse::parse(raw.status, &raw.body)
    }

    fn settle(&self, token: u64, endpoint: Operation, outcome: &Outcome) {
        let _guard = self.render_lock.lock();

        if self.policy == RenderPolicy::LastClickWins {
            let latest = self.latest.load(Ordering::SeqCst);
            if token != latest {
                debug!(%endpoint, token, latest, "dropping stale outcome");
                return;
            }
        }

        self.display.render(&outcome.display_text());
    }
}
