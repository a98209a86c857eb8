//! Oracle Transport Adapter
//!
//! Implements `OracleTransport` by recording submitted requests in memory.
//! Responses are delivered separately through the gate's fulfillment
//! callback, as the real oracle network would.

use crate::domain::{GateError, GateResult, RequestId};
use crate::ports::outbound::OracleTransport;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

/// A request as submitted to the oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentRequest {
    /// Correlation id assigned at submission.
    pub request_id: RequestId,
    /// Positional arguments; `args[0]` is the proposal id.
    pub args: Vec<String>,
}

/// In-memory oracle transport for testing and local wiring.
#[derive(Debug, Default)]
pub struct InMemoryOracleTransport {
    sent: RwLock<Vec<SentRequest>>,
    should_fail: bool,
}

impl InMemoryOracleTransport {
    /// Create a transport that accepts every request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that rejects every request.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Requests submitted so far, in order.
    pub fn requests(&self) -> Vec<SentRequest> {
        self.sent.read().clone()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<SentRequest> {
        self.sent.read().last().cloned()
    }
}

#[async_trait]
impl OracleTransport for InMemoryOracleTransport {
    async fn send_request(&self, args: Vec<String>) -> GateResult<RequestId> {
        if self.should_fail {
            return Err(GateError::Transport("oracle unavailable".to_string()));
        }

        let request_id = RequestId::random();
        debug!(%request_id, ?args, "Oracle request submitted");
        self.sent.write().push(SentRequest { request_id, args });
        Ok(request_id)
    }
}
