//! # Domain Errors
//!
//! Error types for vote resolution.

use super::vote::ScoresState;
use commitment_gate::ProposalId;
use thiserror::Error;

/// Decision resolver error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolverError {
    /// Scores may still change.
    #[error("Proposal {proposal_id} not finalized: scores state is {state:?}")]
    NotFinalized {
        /// Proposal being resolved
        proposal_id: ProposalId,
        /// Reported scores state
        state: ScoresState,
    },

    /// Total vote weight below quorum.
    #[error("Quorum not reached for proposal {proposal_id}: {scores_total}/{quorum}")]
    QuorumNotReached {
        /// Proposal being resolved
        proposal_id: ProposalId,
        /// Total vote weight cast
        scores_total: f64,
        /// Required vote weight
        quorum: f64,
    },

    /// A required field of the vote payload is missing or unparsable.
    #[error("Malformed vote payload for proposal {proposal_id}: {field}")]
    MalformedVotePayload {
        /// Proposal being resolved
        proposal_id: ProposalId,
        /// Path of the offending field
        field: String,
    },

    /// The vote service has no such proposal.
    #[error("Proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    /// The vote service could not be queried.
    #[error("Vote service error: {0}")]
    VoteService(String),

    /// A resolution request arrived without arguments.
    #[error("Missing proposal id argument")]
    MissingProposalId,
}

impl ResolverError {
    /// Shorthand for `MalformedVotePayload`.
    pub fn malformed(proposal_id: &ProposalId, field: impl Into<String>) -> Self {
        Self::MalformedVotePayload {
            proposal_id: proposal_id.clone(),
            field: field.into(),
        }
    }
}

/// Result type for resolver operations.
pub type ResolverResult<T> = Result<T, ResolverError>;
