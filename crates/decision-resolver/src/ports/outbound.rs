//! Outbound ports (driven side).

use crate::domain::{ResolverResult, VoteResult};
use async_trait::async_trait;
use commitment_gate::ProposalId;

/// Source of vote results.
#[async_trait]
pub trait VoteService: Send + Sync {
    /// Fetch the current vote result for a proposal.
    ///
    /// Returns `ProposalNotFound` when the service has no such proposal.
    async fn fetch_proposal(&self, proposal_id: &ProposalId) -> ResolverResult<VoteResult>;
}
