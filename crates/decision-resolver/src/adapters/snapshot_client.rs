//! GraphQL client for a Snapshot-style vote hub.

use std::time::Duration;

use crate::domain::{ResolverError, ResolverResult, VoteResult};
use crate::ports::outbound::VoteService;
use async_trait::async_trait;
use commitment_gate::ProposalId;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Fields the resolver needs from a proposal.
pub const PROPOSAL_QUERY: &str = "query Proposal($id: String!) { \
proposal(id: $id) { choices plugins quorum scores scores_state scores_total } }";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<ProposalData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct ProposalData {
    #[serde(default)]
    proposal: Option<VoteResult>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Vote service backed by a GraphQL endpoint.
pub struct SnapshotVoteClient {
    client: Client,
    endpoint: String,
}

impl SnapshotVoteClient {
    /// Create a client for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> ResolverResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| ResolverError::VoteService(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Endpoint queried.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// JSON body of the proposal query.
pub fn build_request_body(proposal_id: &ProposalId) -> serde_json::Value {
    json!({
        "query": PROPOSAL_QUERY,
        "variables": { "id": proposal_id.as_str() },
    })
}

/// Parse a raw GraphQL response body.
pub fn parse_response(proposal_id: &ProposalId, body: &str) -> ResolverResult<VoteResult> {
    let response: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| ResolverError::VoteService(format!("invalid response: {e}")))?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(ResolverError::VoteService(messages.join("; ")));
    }

    response
        .data
        .and_then(|d| d.proposal)
        .ok_or_else(|| ResolverError::ProposalNotFound(proposal_id.clone()))
}

#[async_trait]
impl VoteService for SnapshotVoteClient {
    async fn fetch_proposal(&self, proposal_id: &ProposalId) -> ResolverResult<VoteResult> {
        debug!(proposal_id = %proposal_id, endpoint = %self.endpoint, "Querying vote service");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&build_request_body(proposal_id))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ResolverError::VoteService(format!("Cannot connect to {}", self.endpoint))
                } else if e.is_timeout() {
                    ResolverError::VoteService(format!("Timed out querying {}", self.endpoint))
                } else {
                    ResolverError::VoteService(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ResolverError::VoteService(e.to_string()))?;

        if !status.is_success() {
            warn!(%proposal_id, %status, "Vote service returned error status");
            return Err(ResolverError::VoteService(format!("HTTP {status}")));
        }

        parse_response(proposal_id, &body)
    }
}
