//! # Execution Gate Service
//!
//! Orchestrates resolution requests, oracle fulfillment and hash-verified
//! dispatch on top of the [`ProposalRegistry`] and a
//! [`TransactionDispatcher`].
//!
//! ## Execution Algorithm
//!
//! 1. `AlreadyExecuted` if the proposal was dispatched.
//! 2. Set the executed flag (reentrancy guard).
//! 3. `candidate = keccak256(encode(to, value, data, operation))`.
//! 4. `HashMismatch` unless `candidate == commitments[tx_index]`; the flag
//!    write is undone.
//! 5. Dispatch. On failure the flag write is undone and the failure is
//!    reported (`SilentExecutionFailure` or the callee's payload verbatim).
//! 6. On success the flag stays set permanently.
//!
//! A dispatch that never returns (the caller's future is cancelled) leaves
//! the flag set: the callee may already have acted.
//!
//! Steps 1-4 run under the registry lock. Between step 4 and dispatch the
//! call is already pinned by its hash; a reentrant callee only ever observes
//! the flag as set.

use crate::domain::{
    call_hash, Address, CommitOutcome, GateError, GateResult, OracleResponse, ProposalCall,
    ProposalId, ProposalStatus, RequestId,
};
use crate::events::GateEvent;
use crate::ports::inbound::ExecutionGateApi;
use crate::ports::outbound::{GateObserver, OracleTransport, TransactionDispatcher};
use crate::registry::ProposalRegistry;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Execution gate configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Administrative owner; may replace the oracle.
    pub owner: Address,
    /// Trusted oracle; the only caller allowed to fulfill requests.
    pub oracle: Address,
}

impl GateConfig {
    /// Create a configuration.
    pub fn new(owner: Address, oracle: Address) -> Self {
        Self { owner, oracle }
    }
}

/// Statistics for the execution gate.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GateStats {
    /// Resolution requests submitted.
    pub resolutions_requested: u64,
    /// Oracle responses applied (first delivery per request).
    pub resolutions_fulfilled: u64,
    /// Execution attempts.
    pub executions_attempted: u64,
    /// Successful dispatches.
    pub executions_succeeded: u64,
    /// Attempts rejected by hash verification.
    pub hash_mismatches: u64,
    /// Attempts whose dispatch failed.
    pub dispatch_failures: u64,
}

/// The commitment-gated execution engine.
pub struct ExecutionGate<D: TransactionDispatcher, T: OracleTransport> {
    /// Owner and oracle addresses.
    config: RwLock<GateConfig>,
    /// Proposal state.
    registry: Arc<ProposalRegistry>,
    /// Call executor.
    dispatcher: Arc<D>,
    /// Oracle request submission.
    transport: Arc<T>,
    /// Post-commit event subscribers.
    observers: RwLock<Vec<Arc<dyn GateObserver>>>,
    /// Service statistics.
    stats: Mutex<GateStats>,
}

impl<D: TransactionDispatcher, T: OracleTransport> ExecutionGate<D, T> {
    /// Create a gate with a fresh registry.
    pub fn new(config: GateConfig, dispatcher: D, transport: T) -> Self {
        Self::with_registry(
            config,
            Arc::new(ProposalRegistry::new()),
            Arc::new(dispatcher),
            Arc::new(transport),
        )
    }

    /// Create a gate over shared components.
    pub fn with_registry(
        config: GateConfig,
        registry: Arc<ProposalRegistry>,
        dispatcher: Arc<D>,
        transport: Arc<T>,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            registry,
            dispatcher,
            transport,
            observers: RwLock::new(Vec::new()),
            stats: Mutex::new(GateStats::default()),
        }
    }

    /// Register an observer for post-commit events.
    pub fn subscribe(&self, observer: Arc<dyn GateObserver>) {
        self.observers.write().push(observer);
    }

    /// Underlying registry.
    pub fn registry(&self) -> &Arc<ProposalRegistry> {
        &self.registry
    }

    /// Underlying dispatcher.
    pub fn dispatcher(&self) -> &Arc<D> {
        &self.dispatcher
    }

    /// Underlying oracle transport.
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Current trusted oracle.
    pub fn oracle(&self) -> Address {
        self.config.read().oracle
    }

    /// Lifecycle status of a proposal.
    pub fn status(&self, proposal_id: &ProposalId) -> ProposalStatus {
        self.registry.status(proposal_id)
    }

    /// Current statistics.
    pub fn stats(&self) -> GateStats {
        self.stats.lock().clone()
    }

    fn notify(&self, event: GateEvent) {
        let observers = self.observers.read().clone();
        debug!(event = event.name(), observers = observers.len(), "Publishing gate event");
        for observer in observers {
            observer.on_event(&event);
        }
    }

    #[instrument(skip(self))]
    async fn request_resolution(&self, proposal_id: &ProposalId) -> GateResult<RequestId> {
        let request_id = self
            .registry
            .begin_resolution(proposal_id, self.transport.as_ref())
            .await?;

        self.stats.lock().resolutions_requested += 1;
        info!(%request_id, "Resolution requested");
        self.notify(GateEvent::ResolutionRequested {
            proposal_id: proposal_id.clone(),
            request_id,
        });
        Ok(request_id)
    }

    #[instrument(skip(self, caller, response), fields(caller = %caller))]
    fn apply_response(
        &self,
        caller: Address,
        request_id: RequestId,
        response: OracleResponse,
    ) -> GateResult<CommitOutcome> {
        let oracle = self.oracle();
        if caller != oracle {
            warn!(%oracle, "Fulfillment from untrusted caller rejected");
            return Err(GateError::UnauthorizedOracle(caller));
        }

        let outcome = self.registry.commit(&request_id, response)?;

        match &outcome {
            CommitOutcome::Stored { proposal_id, count: 0 } => {
                self.stats.lock().resolutions_fulfilled += 1;
                info!(%proposal_id, "Resolution authorized no execution");
            }
            CommitOutcome::Stored { proposal_id, count } => {
                self.stats.lock().resolutions_fulfilled += 1;
                self.notify(GateEvent::CommitmentsStored {
                    proposal_id: proposal_id.clone(),
                    request_id,
                    count: *count,
                });
            }
            CommitOutcome::ResolutionFailed {
                proposal_id,
                reason,
            } => {
                self.stats.lock().resolutions_fulfilled += 1;
                self.notify(GateEvent::ResolutionFailed {
                    proposal_id: proposal_id.clone(),
                    request_id,
                    reason: reason.clone(),
                });
            }
            CommitOutcome::AlreadyCommitted { .. } => {
                self.stats.lock().resolutions_fulfilled += 1;
            }
            CommitOutcome::Duplicate { .. } => {}
        }
        Ok(outcome)
    }

    #[instrument(skip(self, call), fields(to = %call.to, operation = ?call.operation))]
    async fn execute(
        &self,
        proposal_id: &ProposalId,
        call: ProposalCall,
        tx_index: usize,
    ) -> GateResult<Vec<u8>> {
        self.stats.lock().executions_attempted += 1;

        let candidate = call_hash(&call);
        let claim = match self
            .registry
            .claim_execution(proposal_id, tx_index, candidate)
        {
            Ok(claim) => claim,
            Err(err) => {
                if matches!(err, GateError::HashMismatch { .. }) {
                    self.stats.lock().hash_mismatches += 1;
                }
                warn!(error = %err, "Execution rejected");
                return Err(err);
            }
        };

        let outcome = self.dispatcher.dispatch(&call).await;

        if !outcome.success {
            claim.release();
            self.stats.lock().dispatch_failures += 1;
            let err = if outcome.return_data.is_empty() {
                GateError::SilentExecutionFailure(proposal_id.clone())
            } else {
                GateError::BubbledExecutionError {
                    proposal_id: proposal_id.clone(),
                    payload: outcome.return_data,
                }
            };
            warn!(error = %err, "Dispatch failed; execution rolled back");
            return Err(err);
        }

        claim.confirm();
        self.stats.lock().executions_succeeded += 1;
        info!(commitment = %candidate, "Proposal executed");
        self.notify(GateEvent::ProposalExecuted {
            proposal_id: proposal_id.clone(),
            tx_index,
            commitment: candidate,
        });
        Ok(outcome.return_data)
    }
}

// =============================================================================
// ExecutionGateApi Implementation
// =============================================================================

#[async_trait]
impl<D: TransactionDispatcher, T: OracleTransport> ExecutionGateApi for ExecutionGate<D, T> {
    async fn begin_resolution(&self, proposal_id: &ProposalId) -> GateResult<RequestId> {
        self.request_resolution(proposal_id).await
    }

    fn fulfill(
        &self,
        caller: Address,
        request_id: RequestId,
        response: OracleResponse,
    ) -> GateResult<CommitOutcome> {
        self.apply_response(caller, request_id, response)
    }

    async fn execute_proposal(
        &self,
        proposal_id: &ProposalId,
        call: ProposalCall,
    ) -> GateResult<Vec<u8>> {
        self.execute(proposal_id, call, 0).await
    }

    async fn execute_proposal_with_index(
        &self,
        proposal_id: &ProposalId,
        call: ProposalCall,
        tx_index: usize,
    ) -> GateResult<Vec<u8>> {
        self.execute(proposal_id, call, tx_index).await
    }

    fn has_completely_executed(&self, proposal_id: &ProposalId) -> bool {
        self.registry.is_executed(proposal_id)
    }

    fn set_oracle(&self, caller: Address, new_oracle: Address) -> GateResult<()> {
        let previous = {
            let mut config = self.config.write();
            if caller != config.owner {
                warn!(%caller, "Unauthorized oracle update rejected");
                return Err(GateError::Unauthorized(caller));
            }
            std::mem::replace(&mut config.oracle, new_oracle)
        };

        info!(%previous, current = %new_oracle, "Oracle updated");
        self.notify(GateEvent::OracleUpdated {
            previous,
            current: new_oracle,
        });
        Ok(())
    }
}
