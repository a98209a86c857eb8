//! Fixed vote results, for tests and offline replay.

use crate::domain::{ResolverError, ResolverResult, VoteResult};
use crate::ports::outbound::VoteService;
use async_trait::async_trait;
use commitment_gate::ProposalId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Vote service answering from an in-memory table.
#[derive(Default)]
pub struct StaticVoteService {
    votes: RwLock<HashMap<ProposalId, VoteResult>>,
}

impl StaticVoteService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the result returned for `proposal_id`.
    pub fn insert(&self, proposal_id: ProposalId, vote: VoteResult) {
        self.votes.write().insert(proposal_id, vote);
    }
}

#[async_trait]
impl VoteService for StaticVoteService {
    async fn fetch_proposal(&self, proposal_id: &ProposalId) -> ResolverResult<VoteResult> {
        self.votes
            .read()
            .get(proposal_id)
            .cloned()
            .ok_or_else(|| ResolverError::ProposalNotFound(proposal_id.clone()))
    }
}
