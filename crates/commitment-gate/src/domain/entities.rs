//! # Domain Entities
//!
//! Proposals, request correlations and the call tuple a commitment binds.

use super::codec::decode_commitments;
use super::value_objects::{Address, Commitment, Operation, ProposalId, RequestId, U256};
use serde::{Deserialize, Serialize};

/// The `(to, value, data, operation)` tuple that is hashed and dispatched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalCall {
    /// Call target.
    pub to: Address,
    /// Value transferred by a direct call.
    pub value: U256,
    /// Call data.
    pub data: Vec<u8>,
    /// Execution mode.
    pub operation: Operation,
}

impl ProposalCall {
    /// Create a new call.
    pub fn new(to: Address, value: U256, data: Vec<u8>, operation: Operation) -> Self {
        Self {
            to,
            value,
            data,
            operation,
        }
    }
}

/// Raw bytes holding zero or more concatenated 32-byte commitments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentPayload(pub Vec<u8>);

impl CommitmentPayload {
    /// Borrow the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Decode into the ordered commitment list.
    #[must_use]
    pub fn commitments(&self) -> Vec<Commitment> {
        decode_commitments(&self.0)
    }
}

/// What the oracle delivers for one request: exactly one of result or error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleResponse {
    /// Successful resolution carrying a commitment payload.
    Result(Vec<u8>),
    /// Failed resolution carrying the oracle's error bytes.
    Error(Vec<u8>),
}

/// Per-proposal persisted state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Proposal {
    /// Ordered commitments; empty until a result arrives, immutable afterwards.
    pub commitments: Vec<Commitment>,
    /// Monotonic false -> true.
    pub executed: bool,
    /// Most recent request still awaiting a response.
    pub pending_request: Option<RequestId>,
}

impl Proposal {
    /// Lifecycle status derived from stored state.
    #[must_use]
    pub fn status(&self) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if !self.commitments.is_empty() {
            ProposalStatus::Committed
        } else if self.pending_request.is_some() {
            ProposalStatus::AwaitingResolution
        } else {
            ProposalStatus::Unresolved
        }
    }
}

/// Maps one request id to exactly one proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestCorrelation {
    /// Proposal the request was issued for.
    pub proposal_id: ProposalId,
    /// Set by the first response delivered for this request.
    pub consumed: bool,
}

/// Proposal lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Never seen by the registry.
    Unknown,
    /// A resolution request is in flight.
    AwaitingResolution,
    /// Last resolution failed or produced no commitments.
    Unresolved,
    /// Commitments stored, not yet executed.
    Committed,
    /// Action dispatched; terminal.
    Executed,
}

/// Result of delivering an oracle response to the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Commitments decoded and stored.
    Stored {
        /// Proposal that received the commitments
        proposal_id: ProposalId,
        /// Number of commitments decoded
        count: usize,
    },
    /// The oracle reported an error; nothing stored.
    ResolutionFailed {
        /// Proposal whose resolution failed
        proposal_id: ProposalId,
        /// Raw error bytes from the oracle
        reason: Vec<u8>,
    },
    /// The request id was already consumed; ignored.
    Duplicate {
        /// Proposal the request belonged to
        proposal_id: ProposalId,
    },
    /// The proposal already holds commitments; ignored.
    AlreadyCommitted {
        /// Proposal that already holds commitments
        proposal_id: ProposalId,
    },
}

impl CommitOutcome {
    /// Proposal this outcome refers to.
    #[must_use]
    pub fn proposal_id(&self) -> &ProposalId {
        match self {
            Self::Stored { proposal_id, .. }
            | Self::ResolutionFailed { proposal_id, .. }
            | Self::Duplicate { proposal_id }
            | Self::AlreadyCommitted { proposal_id } => proposal_id,
        }
    }
}
