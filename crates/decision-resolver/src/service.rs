//! # Decision Resolver Service
//!
//! Fetches a vote through a `VoteService` and turns it into the commitment
//! payload an oracle delivers to the execution gate.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::SnapshotVoteClient;
use crate::domain::{decide, Decision, ResolverError, ResolverResult};
use crate::ports::inbound::DecisionResolverApi;
use crate::ports::outbound::VoteService;
use async_trait::async_trait;
use commitment_gate::ProposalId;
use tracing::{info, instrument, warn};

/// Default vote hub endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://hub.snapshot.org/graphql";

/// Default vote service request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// GraphQL endpoint of the vote service
    pub endpoint: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ResolverConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GB_VOTE_ENDPOINT`: vote service endpoint (default: hub.snapshot.org)
    /// - `GB_VOTE_TIMEOUT_MS`: request timeout (default: 10000)
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var("GB_VOTE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            request_timeout_ms: env::var("GB_VOTE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Resolves votes into commitment payloads.
pub struct DecisionResolver<V: VoteService> {
    votes: Arc<V>,
}

impl<V: VoteService> DecisionResolver<V> {
    /// Create a resolver over a vote service.
    pub fn new(votes: Arc<V>) -> Self {
        Self { votes }
    }

    /// Vote service in use.
    pub fn vote_service(&self) -> &Arc<V> {
        &self.votes
    }
}

impl DecisionResolver<SnapshotVoteClient> {
    /// Resolver backed by the GraphQL vote client described by `config`.
    pub fn from_config(config: &ResolverConfig) -> ResolverResult<Self> {
        let client = SnapshotVoteClient::new(config.endpoint.clone(), config.timeout())?;
        Ok(Self::new(Arc::new(client)))
    }
}

#[async_trait]
impl<V: VoteService> DecisionResolverApi for DecisionResolver<V> {
    #[instrument(skip(self, proposal_id), fields(proposal_id = %proposal_id))]
    async fn resolve(&self, proposal_id: &ProposalId) -> ResolverResult<Decision> {
        let vote = self.votes.fetch_proposal(proposal_id).await?;

        match decide(proposal_id, &vote) {
            Ok(decision) => {
                info!(
                    winning_choice = decision.winning_choice(),
                    execute = matches!(decision, Decision::Execute { .. }),
                    "Vote resolved"
                );
                Ok(decision)
            }
            Err(err) => {
                warn!(error = %err, "Vote rejected");
                Err(err)
            }
        }
    }

    #[instrument(skip(self, args), fields(args = args.len()))]
    async fn resolve_request(&self, args: &[String]) -> ResolverResult<Vec<u8>> {
        let proposal_id = args
            .first()
            .map(|id| ProposalId::new(id.as_str()))
            .ok_or(ResolverError::MissingProposalId)?;

        Ok(self.resolve(&proposal_id).await?.into_payload())
    }
}
