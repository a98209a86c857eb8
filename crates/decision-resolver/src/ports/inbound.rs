//! Inbound ports (driving side).

use crate::domain::{Decision, ResolverResult};
use async_trait::async_trait;
use commitment_gate::ProposalId;

/// Resolver API used by an oracle node.
#[async_trait]
pub trait DecisionResolverApi: Send + Sync {
    /// Fetch and resolve the vote for `proposal_id`.
    async fn resolve(&self, proposal_id: &ProposalId) -> ResolverResult<Decision>;

    /// Handle an oracle request whose first argument is the proposal id.
    ///
    /// Returns the commitment payload, empty when the vote does not
    /// authorize execution.
    async fn resolve_request(&self, args: &[String]) -> ResolverResult<Vec<u8>>;
}
