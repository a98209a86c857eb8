//! # Proposal Registry
//!
//! Sole owner of per-proposal state and request correlations.
//!
//! ## Persisted Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `RequestId` | `RequestCorrelation` (proposal id, consumed flag) |
//! | `ProposalId` | `Proposal` (ordered commitments, executed flag, pending request) |
//!
//! All mutations happen under a single lock, giving one total order per
//! registry. The executed flag is only ever flipped through
//! [`ProposalRegistry::claim_execution`], which performs check-then-set and
//! hash verification as one step.

use crate::domain::{
    decode_commitments, invariant_commitment_matches, invariant_commitments_unset,
    invariant_executed_has_commitments, truncated_len, Commitment, CommitOutcome, GateError,
    GateResult, OracleResponse, Proposal, ProposalId, ProposalStatus, RequestCorrelation,
    RequestId,
};
use crate::ports::outbound::OracleTransport;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct RegistryState {
    requests: HashMap<RequestId, RequestCorrelation>,
    proposals: HashMap<ProposalId, Proposal>,
}

/// Keyed store of proposals and request correlations.
#[derive(Debug, Default)]
pub struct ProposalRegistry {
    state: Mutex<RegistryState>,
}

impl ProposalRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a resolution request through `transport` and record its
    /// correlation.
    ///
    /// Fails with `AlreadyExecuted` if the proposal was dispatched.
    pub async fn begin_resolution<T>(
        &self,
        proposal_id: &ProposalId,
        transport: &T,
    ) -> GateResult<RequestId>
    where
        T: OracleTransport + ?Sized,
    {
        if self.is_executed(proposal_id) {
            return Err(GateError::AlreadyExecuted(proposal_id.clone()));
        }

        let request_id = transport.send_request(vec![proposal_id.to_string()]).await?;

        let mut state = self.state.lock();
        // Execution may have completed while the request was in flight.
        let proposal = state.proposals.entry(proposal_id.clone()).or_default();
        if proposal.executed {
            return Err(GateError::AlreadyExecuted(proposal_id.clone()));
        }
        proposal.pending_request = Some(request_id);
        state.requests.insert(
            request_id,
            RequestCorrelation {
                proposal_id: proposal_id.clone(),
                consumed: false,
            },
        );

        debug!(%proposal_id, %request_id, "Resolution request recorded");
        Ok(request_id)
    }

    /// Apply the oracle response for `request_id`.
    ///
    /// The first response for a request id is applied; redelivery is a
    /// no-op. Commitments are written only if the proposal holds none.
    pub fn commit(
        &self,
        request_id: &RequestId,
        response: OracleResponse,
    ) -> GateResult<CommitOutcome> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let correlation = state
            .requests
            .get_mut(request_id)
            .ok_or(GateError::UnknownRequest(*request_id))?;
        let proposal_id = correlation.proposal_id.clone();

        if correlation.consumed {
            debug!(%proposal_id, %request_id, "Ignoring redelivered response");
            return Ok(CommitOutcome::Duplicate { proposal_id });
        }
        correlation.consumed = true;

        let proposal = state.proposals.entry(proposal_id.clone()).or_default();
        if proposal.pending_request.as_ref() == Some(request_id) {
            proposal.pending_request = None;
        }

        match response {
            OracleResponse::Error(reason) => {
                warn!(
                    %proposal_id,
                    %request_id,
                    reason = %String::from_utf8_lossy(&reason),
                    "Oracle reported resolution error"
                );
                Ok(CommitOutcome::ResolutionFailed {
                    proposal_id,
                    reason,
                })
            }
            OracleResponse::Result(payload) => {
                if !invariant_commitments_unset(proposal) {
                    warn!(%proposal_id, %request_id, "Commitments already set; ignoring result");
                    return Ok(CommitOutcome::AlreadyCommitted { proposal_id });
                }

                let dropped = truncated_len(&payload);
                if dropped > 0 {
                    warn!(%proposal_id, dropped, "Payload not word-aligned; trailing bytes dropped");
                }

                proposal.commitments = decode_commitments(&payload);
                let count = proposal.commitments.len();
                info!(%proposal_id, %request_id, count, "Commitments stored");
                Ok(CommitOutcome::Stored { proposal_id, count })
            }
        }
    }

    /// Atomically check, set and verify the executed flag.
    ///
    /// 1. `AlreadyExecuted` if the flag is set.
    /// 2. Set the flag.
    /// 3. Compare `candidate` against the commitment at `index`; on mismatch
    ///    restore the flag and fail with `HashMismatch`.
    ///
    /// The returned claim keeps the flag set. Only
    /// [`ExecutionClaim::release`] clears it again; a claim that is dropped
    /// (including by a cancelled dispatch) leaves the proposal executed.
    pub fn claim_execution(
        &self,
        proposal_id: &ProposalId,
        index: usize,
        candidate: Commitment,
    ) -> GateResult<ExecutionClaim<'_>> {
        let mut state = self.state.lock();
        let mismatch = |expected: Option<Commitment>| GateError::HashMismatch {
            proposal_id: proposal_id.clone(),
            index,
            expected,
            actual: candidate,
        };

        let Some(proposal) = state.proposals.get_mut(proposal_id) else {
            return Err(mismatch(None));
        };
        if proposal.executed {
            return Err(GateError::AlreadyExecuted(proposal_id.clone()));
        }

        proposal.executed = true;

        let expected = proposal.commitments.get(index);
        if !invariant_commitment_matches(expected, &candidate) {
            let expected = expected.copied();
            proposal.executed = false;
            return Err(mismatch(expected));
        }
        debug_assert!(invariant_executed_has_commitments(proposal));

        Ok(ExecutionClaim {
            registry: self,
            proposal_id: proposal_id.clone(),
        })
    }

    fn release_claim(&self, proposal_id: &ProposalId) {
        if let Some(proposal) = self.state.lock().proposals.get_mut(proposal_id) {
            proposal.executed = false;
        }
        debug!(%proposal_id, "Execution claim rolled back");
    }

    /// Whether the proposal's action was dispatched.
    pub fn is_executed(&self, proposal_id: &ProposalId) -> bool {
        self.state
            .lock()
            .proposals
            .get(proposal_id)
            .is_some_and(|p| p.executed)
    }

    /// Stored commitments, in order. Empty if none.
    pub fn commitments(&self, proposal_id: &ProposalId) -> Vec<Commitment> {
        self.state
            .lock()
            .proposals
            .get(proposal_id)
            .map(|p| p.commitments.clone())
            .unwrap_or_default()
    }

    /// Proposal a request id was issued for.
    pub fn proposal_for(&self, request_id: &RequestId) -> Option<ProposalId> {
        self.state
            .lock()
            .requests
            .get(request_id)
            .map(|c| c.proposal_id.clone())
    }

    /// Lifecycle status of a proposal.
    pub fn status(&self, proposal_id: &ProposalId) -> ProposalStatus {
        self.state
            .lock()
            .proposals
            .get(proposal_id)
            .map_or(ProposalStatus::Unknown, Proposal::status)
    }
}

/// Holds a proposal's executed flag between hash verification and dispatch.
///
/// The flag stays set unless the claim is explicitly released after the
/// dispatcher reported failure. A dispatch whose outcome is unknown counts
/// as executed.
#[must_use = "the claim should be confirmed or released once dispatch returns"]
#[derive(Debug)]
pub struct ExecutionClaim<'a> {
    registry: &'a ProposalRegistry,
    proposal_id: ProposalId,
}

impl ExecutionClaim<'_> {
    /// Keep the executed flag after a successful dispatch.
    pub fn confirm(self) {
        debug!(proposal_id = %self.proposal_id, "Execution claim confirmed");
    }

    /// Clear the executed flag after a dispatch that reported failure.
    pub fn release(self) {
        self.registry.release_claim(&self.proposal_id);
    }

    /// Proposal this claim holds.
    pub fn proposal_id(&self) -> &ProposalId {
        &self.proposal_id
    }
}
