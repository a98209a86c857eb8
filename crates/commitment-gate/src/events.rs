//! # Gate Events
//!
//! Notifications published after a state transition is durable. Observers
//! never see an event for a transition that was rolled back.

use crate::domain::{Address, Commitment, ProposalId, RequestId};
use serde::{Deserialize, Serialize};

/// Post-commit notification emitted by the execution gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateEvent {
    /// A resolution request was submitted to the oracle.
    ResolutionRequested {
        /// Proposal being resolved
        proposal_id: ProposalId,
        /// Correlation id assigned by the transport
        request_id: RequestId,
    },
    /// At least one commitment was stored for a proposal.
    CommitmentsStored {
        /// Proposal that received commitments
        proposal_id: ProposalId,
        /// Request that delivered them
        request_id: RequestId,
        /// Number of commitments stored
        count: usize,
    },
    /// The oracle reported an error for a request.
    ResolutionFailed {
        /// Proposal whose resolution failed
        proposal_id: ProposalId,
        /// Request that failed
        request_id: RequestId,
        /// Raw error bytes
        reason: Vec<u8>,
    },
    /// A committed call was dispatched successfully.
    ProposalExecuted {
        /// Executed proposal
        proposal_id: ProposalId,
        /// Commitment index that was executed
        tx_index: usize,
        /// Commitment the call matched
        commitment: Commitment,
    },
    /// The trusted oracle address changed.
    OracleUpdated {
        /// Previous oracle
        previous: Address,
        /// New oracle
        current: Address,
    },
}

impl GateEvent {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResolutionRequested { .. } => "ResolutionRequested",
            Self::CommitmentsStored { .. } => "CommitmentsStored",
            Self::ResolutionFailed { .. } => "ResolutionFailed",
            Self::ProposalExecuted { .. } => "ProposalExecuted",
            Self::OracleUpdated { .. } => "OracleUpdated",
        }
    }
}
