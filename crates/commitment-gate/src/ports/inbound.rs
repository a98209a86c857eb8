//! # Inbound Ports
//!
//! API trait defining what the execution gate can do.

use crate::domain::{
    Address, CommitOutcome, GateResult, OracleResponse, ProposalCall, ProposalId, RequestId,
};
use async_trait::async_trait;

/// Execution gate API - inbound port.
#[async_trait]
pub trait ExecutionGateApi: Send + Sync {
    /// Submit a resolution request for `proposal_id`.
    ///
    /// Fails with `AlreadyExecuted` once the proposal has been dispatched.
    async fn begin_resolution(&self, proposal_id: &ProposalId) -> GateResult<RequestId>;

    /// Oracle callback delivering the response for `request_id`.
    ///
    /// Only the trusted oracle may call this.
    fn fulfill(
        &self,
        caller: Address,
        request_id: RequestId,
        response: OracleResponse,
    ) -> GateResult<CommitOutcome>;

    /// Execute the call committed at index 0.
    async fn execute_proposal(
        &self,
        proposal_id: &ProposalId,
        call: ProposalCall,
    ) -> GateResult<Vec<u8>>;

    /// Execute the call committed at `tx_index`.
    ///
    /// No next-index is tracked: any stored index may be presented.
    async fn execute_proposal_with_index(
        &self,
        proposal_id: &ProposalId,
        call: ProposalCall,
        tx_index: usize,
    ) -> GateResult<Vec<u8>>;

    /// Whether the proposal's action has been dispatched.
    fn has_completely_executed(&self, proposal_id: &ProposalId) -> bool;

    /// Replace the trusted oracle. Owner only.
    fn set_oracle(&self, caller: Address, new_oracle: Address) -> GateResult<()>;
}
