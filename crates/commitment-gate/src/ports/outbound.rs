//! # Outbound Ports
//!
//! Traits for external dependencies: call execution, oracle submission and
//! event delivery.

use crate::domain::{GateResult, ProposalCall, RequestId};
use crate::events::GateEvent;
use async_trait::async_trait;

/// Executes an external call.
///
/// The callee is untrusted. Implementations report failure through
/// [`DispatchOutcome`] and never panic on a reverting target.
#[async_trait]
pub trait TransactionDispatcher: Send + Sync {
    /// Dispatch `call` in the mode named by `call.operation`.
    async fn dispatch(&self, call: &ProposalCall) -> DispatchOutcome;
}

/// Tagged result of a dispatch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Whether the call succeeded.
    pub success: bool,
    /// Return data on success, failure payload on failure.
    pub return_data: Vec<u8>,
}

impl DispatchOutcome {
    /// Successful call with `return_data`.
    pub fn succeeded(return_data: Vec<u8>) -> Self {
        Self {
            success: true,
            return_data,
        }
    }

    /// Failed call with the callee's failure payload (possibly empty).
    pub fn failed(return_data: Vec<u8>) -> Self {
        Self {
            success: false,
            return_data,
        }
    }
}

/// Oracle network client - outbound port.
///
/// Submits a resolution request and returns the correlation id the response
/// will later carry. Delivery is asynchronous and happens through the gate's
/// fulfillment callback.
#[async_trait]
pub trait OracleTransport: Send + Sync {
    /// Submit a request; `args[0]` is the proposal id.
    async fn send_request(&self, args: Vec<String>) -> GateResult<RequestId>;
}

/// Receives gate events after the transition they describe is durable.
pub trait GateObserver: Send + Sync {
    /// Called once per event, in emission order.
    fn on_event(&self, event: &GateEvent);
}
