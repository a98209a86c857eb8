//! # Reentrancy and Concurrency
//!
//! The dispatched callee is untrusted and may call back into the gate before
//! dispatch returns. The executed flag is set before dispatch, so every
//! nested or concurrent attempt observes the proposal as executed.

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use async_trait::async_trait;
    use commitment_gate::adapters::InMemoryOracleTransport;
    use commitment_gate::{
        call_hash, encode_commitments, DispatchOutcome, ExecutionGate, ExecutionGateApi,
        GateConfig, GateError, GateResult, Operation, OracleResponse, ProposalCall, ProposalId,
        ProposalRegistry, TransactionDispatcher, U256,
    };
    use parking_lot::Mutex;
    use std::sync::{Arc, OnceLock, Weak};
    use std::time::Duration;

    fn call() -> ProposalCall {
        ProposalCall::new(TARGET, U256::zero(), vec![0x42], Operation::Direct)
    }

    async fn commit_call<D: TransactionDispatcher>(
        gate: &ExecutionGate<D, InMemoryOracleTransport>,
        proposal_id: &ProposalId,
        call: &ProposalCall,
    ) {
        let request_id = gate.begin_resolution(proposal_id).await.unwrap();
        let payload = encode_commitments(&[call_hash(call)]);
        gate.fulfill(ORACLE, request_id, OracleResponse::Result(payload))
            .unwrap();
    }

    /// Callee that re-enters the gate it is dispatched from.
    #[derive(Default)]
    struct GateReenteringDispatcher {
        gate: OnceLock<Weak<ExecutionGate<GateReenteringDispatcher, InMemoryOracleTransport>>>,
        nested: Mutex<Vec<GateResult<Vec<u8>>>>,
        fail_outer: bool,
    }

    #[async_trait]
    impl TransactionDispatcher for GateReenteringDispatcher {
        async fn dispatch(&self, call: &ProposalCall) -> DispatchOutcome {
            let gate = self.gate.get().and_then(Weak::upgrade);
            if let Some(gate) = gate {
                let nested = gate
                    .execute_proposal(&ProposalId::new("p1"), call.clone())
                    .await;
                self.nested.lock().push(nested);
            }
            if self.fail_outer {
                DispatchOutcome::failed(Vec::new())
            } else {
                DispatchOutcome::succeeded(Vec::new())
            }
        }
    }

    fn reentering_gate(
        fail_outer: bool,
    ) -> Arc<ExecutionGate<GateReenteringDispatcher, InMemoryOracleTransport>> {
        let dispatcher = Arc::new(GateReenteringDispatcher {
            fail_outer,
            ..Default::default()
        });
        let gate = Arc::new(ExecutionGate::with_registry(
            GateConfig::new(OWNER, ORACLE),
            Arc::new(ProposalRegistry::new()),
            dispatcher.clone(),
            Arc::new(InMemoryOracleTransport::new()),
        ));
        let _ = dispatcher.gate.set(Arc::downgrade(&gate));
        gate
    }

    #[tokio::test]
    async fn test_reentrant_execution_sees_already_executed() {
        let gate = reentering_gate(false);
        let id = ProposalId::new("p1");
        commit_call(&gate, &id, &call()).await;

        gate.execute_proposal(&id, call()).await.unwrap();

        assert_eq!(
            *gate.dispatcher().nested.lock(),
            vec![Err(GateError::AlreadyExecuted(id.clone()))]
        );
        assert!(gate.has_completely_executed(&id));
        assert_eq!(gate.stats().executions_succeeded, 1);
    }

    #[tokio::test]
    async fn test_reentrant_attempt_cannot_survive_outer_failure() {
        let gate = reentering_gate(true);
        let id = ProposalId::new("p1");
        commit_call(&gate, &id, &call()).await;

        assert_eq!(
            gate.execute_proposal(&id, call()).await,
            Err(GateError::SilentExecutionFailure(id.clone()))
        );
        assert_eq!(
            *gate.dispatcher().nested.lock(),
            vec![Err(GateError::AlreadyExecuted(id.clone()))]
        );
        assert!(!gate.has_completely_executed(&id));
    }

    /// Callee that tries to claim the proposal directly on the registry.
    struct RegistryProbeDispatcher {
        registry: Arc<ProposalRegistry>,
        claim_attempt: Mutex<Option<GateResult<()>>>,
        flag_during_dispatch: Mutex<Option<bool>>,
    }

    #[async_trait]
    impl TransactionDispatcher for RegistryProbeDispatcher {
        async fn dispatch(&self, call: &ProposalCall) -> DispatchOutcome {
            let id = ProposalId::new("p1");
            *self.flag_during_dispatch.lock() = Some(self.registry.is_executed(&id));
            *self.claim_attempt.lock() =
                Some(self.registry.claim_execution(&id, 0, call_hash(call)).map(drop));
            DispatchOutcome::succeeded(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_flag_is_set_during_dispatch() {
        let registry = Arc::new(ProposalRegistry::new());
        let dispatcher = Arc::new(RegistryProbeDispatcher {
            registry: registry.clone(),
            claim_attempt: Mutex::new(None),
            flag_during_dispatch: Mutex::new(None),
        });
        let gate = ExecutionGate::with_registry(
            GateConfig::new(OWNER, ORACLE),
            registry,
            dispatcher.clone(),
            Arc::new(InMemoryOracleTransport::new()),
        );
        let id = ProposalId::new("p1");
        commit_call(&gate, &id, &call()).await;

        gate.execute_proposal(&id, call()).await.unwrap();

        assert_eq!(*dispatcher.flag_during_dispatch.lock(), Some(true));
        assert_eq!(
            *dispatcher.claim_attempt.lock(),
            Some(Err(GateError::AlreadyExecuted(id.clone())))
        );
        assert!(gate.has_completely_executed(&id));
    }

    /// Callee that takes a while and optionally fails.
    struct SlowDispatcher {
        delay: Duration,
        fail: Mutex<bool>,
        calls: Mutex<usize>,
    }

    impl SlowDispatcher {
        fn new(fail: bool) -> Self {
            Self {
                delay: Duration::from_millis(50),
                fail: Mutex::new(fail),
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl TransactionDispatcher for SlowDispatcher {
        async fn dispatch(&self, _call: &ProposalCall) -> DispatchOutcome {
            *self.calls.lock() += 1;
            tokio::time::sleep(self.delay).await;
            if *self.fail.lock() {
                DispatchOutcome::failed(b"reverted".to_vec())
            } else {
                DispatchOutcome::succeeded(Vec::new())
            }
        }
    }

    fn slow_gate(fail: bool) -> Arc<ExecutionGate<SlowDispatcher, InMemoryOracleTransport>> {
        Arc::new(ExecutionGate::new(
            GateConfig::new(OWNER, ORACLE),
            SlowDispatcher::new(fail),
            InMemoryOracleTransport::new(),
        ))
    }

    async fn race(
        gate: &Arc<ExecutionGate<SlowDispatcher, InMemoryOracleTransport>>,
        attempts: usize,
    ) -> Vec<GateResult<Vec<u8>>> {
        let handles: Vec<_> = (0..attempts)
            .map(|_| {
                let gate = gate.clone();
                tokio::spawn(async move {
                    gate.execute_proposal(&ProposalId::new("p1"), call()).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(attempts);
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_execution_dispatches_once() {
        let gate = slow_gate(false);
        let id = ProposalId::new("p1");
        commit_call(gate.as_ref(), &id, &call()).await;

        let results = race(&gate, 8).await;

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == GateError::AlreadyExecuted(id.clone())));
        assert_eq!(*gate.dispatcher().calls.lock(), 1);
        assert!(gate.has_completely_executed(&id));
    }

    #[tokio::test]
    async fn test_cancelled_dispatch_stays_executed() {
        let gate = slow_gate(false);
        let id = ProposalId::new("p1");
        commit_call(gate.as_ref(), &id, &call()).await;

        let first =
            tokio::time::timeout(Duration::from_millis(10), gate.execute_proposal(&id, call()))
                .await;
        assert!(first.is_err());
        assert!(gate.has_completely_executed(&id));

        assert_eq!(
            gate.execute_proposal(&id, call()).await,
            Err(GateError::AlreadyExecuted(id.clone()))
        );
        assert_eq!(*gate.dispatcher().calls.lock(), 1);
        assert_eq!(gate.stats().executions_succeeded, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failed_dispatch_releases_for_retry() {
        let gate = slow_gate(true);
        let id = ProposalId::new("p1");
        commit_call(gate.as_ref(), &id, &call()).await;

        let results = race(&gate, 4).await;
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 0);
        assert!(!gate.has_completely_executed(&id));

        *gate.dispatcher().fail.lock() = false;
        gate.execute_proposal(&id, call()).await.unwrap();
        assert!(gate.has_completely_executed(&id));
    }
}
