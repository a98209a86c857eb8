//! Transaction Dispatcher Adapter
//!
//! Implements `TransactionDispatcher` against an in-memory ledger.
//!
//! In production, this would submit the call through the executing account
//! (e.g. a multisig module). The simulation keeps the two operation kinds
//! distinct:
//!
//! - **Direct**: moves `value` from the executor to the target, then runs the
//!   target's scripted behaviour in the target's context.
//! - **Delegated**: moves no value and runs the target's behaviour in the
//!   executor's context.

use crate::domain::{Address, Operation, ProposalCall, U256};
use crate::ports::outbound::{DispatchOutcome, TransactionDispatcher};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Scripted response of a call target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetBehavior {
    /// Succeed with the given return data.
    Succeed(Vec<u8>),
    /// Fail with the given reason payload.
    Revert(Vec<u8>),
    /// Fail without any payload.
    RevertSilently,
}

impl Default for TargetBehavior {
    fn default() -> Self {
        Self::Succeed(Vec::new())
    }
}

/// Whose state a dispatched call ran against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallContext {
    /// The target's own context (direct call).
    Target(Address),
    /// The executor's context (delegated call).
    Caller(Address),
}

/// One dispatched call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchRecord {
    /// The call as dispatched.
    pub call: ProposalCall,
    /// Context it ran in.
    pub context: CallContext,
    /// Whether it succeeded.
    pub success: bool,
}

/// In-memory ledger dispatcher for testing.
pub struct InMemoryDispatcher {
    /// Account that executes calls.
    executor: Address,
    /// Balances per account.
    balances: RwLock<HashMap<Address, U256>>,
    /// Scripted behaviour per target; unknown targets succeed with no data.
    behaviors: RwLock<HashMap<Address, TargetBehavior>>,
    /// Every dispatched call, in order.
    history: RwLock<Vec<DispatchRecord>>,
}

impl InMemoryDispatcher {
    /// Create a dispatcher executing as `executor` with zero balance.
    pub fn new(executor: Address) -> Self {
        Self {
            executor,
            balances: RwLock::new(HashMap::new()),
            behaviors: RwLock::new(HashMap::new()),
            history: RwLock::new(Vec::new()),
        }
    }

    /// Fund the executor.
    pub fn with_balance(self, amount: U256) -> Self {
        self.balances.write().insert(self.executor, amount);
        self
    }

    /// Script a target's behaviour.
    pub fn set_behavior(&self, target: Address, behavior: TargetBehavior) {
        self.behaviors.write().insert(target, behavior);
    }

    /// Balance of an account.
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances
            .read()
            .get(account)
            .copied()
            .unwrap_or_default()
    }

    /// Executing account.
    pub fn executor(&self) -> Address {
        self.executor
    }

    /// Dispatched calls, in order.
    pub fn history(&self) -> Vec<DispatchRecord> {
        self.history.read().clone()
    }

    /// Number of dispatched calls.
    pub fn dispatch_count(&self) -> usize {
        self.history.read().len()
    }

    fn run_target(&self, target: &Address) -> DispatchOutcome {
        match self.behaviors.read().get(target).cloned().unwrap_or_default() {
            TargetBehavior::Succeed(data) => DispatchOutcome::succeeded(data),
            TargetBehavior::Revert(reason) => DispatchOutcome::failed(reason),
            TargetBehavior::RevertSilently => DispatchOutcome::failed(Vec::new()),
        }
    }

    fn dispatch_direct(&self, call: &ProposalCall) -> DispatchOutcome {
        // Balance check and debit share one guard.
        let mut balances = self.balances.write();
        let available = balances.get(&self.executor).copied().unwrap_or_default();
        if call.value > available {
            warn!(
                to = %call.to,
                value = %call.value,
                available = %available,
                "Insufficient balance for direct call"
            );
            return DispatchOutcome::failed(Vec::new());
        }

        let outcome = self.run_target(&call.to);
        if outcome.success && !call.value.is_zero() {
            balances.insert(self.executor, available - call.value);
            let target = balances.entry(call.to).or_default();
            *target = target.saturating_add(call.value);
        }
        outcome
    }
}

#[async_trait]
impl TransactionDispatcher for InMemoryDispatcher {
    async fn dispatch(&self, call: &ProposalCall) -> DispatchOutcome {
        let (outcome, context) = match call.operation {
            Operation::Direct => (self.dispatch_direct(call), CallContext::Target(call.to)),
            Operation::Delegated => (self.run_target(&call.to), CallContext::Caller(self.executor)),
        };

        debug!(
            to = %call.to,
            operation = ?call.operation,
            success = outcome.success,
            "Call dispatched"
        );

        self.history.write().push(DispatchRecord {
            call: call.clone(),
            context,
            success: outcome.success,
        });
        outcome
    }
}
