//! # Commitment Gate
//!
//! Hash commitment in, verified dispatch out.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Binds oracle-delivered hash commitments to a proposal and dispatches the
//! committed call at most once:
//! - Commitments decoded from 32-byte words, stored once per proposal
//! - Keccak-256 over the ABI encoding of `(to, value, data, operation)`
//! - Executed flag flipped by compare-and-set, rolled back on any failure
//!
//! ## Security Properties
//!
//! | Property | Enforcement |
//! |----------|-------------|
//! | At-most-once dispatch | `ProposalRegistry::claim_execution` |
//! | Call fully pinned before dispatch | `call_hash` checked under the registry lock |
//! | No partial state on failure | `ExecutionClaim::release` on reported failure |
//! | Cancelled dispatch stays executed | `ExecutionClaim` has no rollback on drop |
//! | Commitments immutable | `ProposalRegistry::commit` ignores later results |
//! | Trusted oracle only | `ExecutionGate::fulfill` checks the caller |
//!
//! ## Module Structure
//!
//! ```text
//! commitment-gate/
//! ├── domain/          # Values, entities, codec, errors, invariants
//! ├── ports/           # ExecutionGateApi, TransactionDispatcher, OracleTransport
//! ├── adapters/        # In-memory dispatcher, transport, observers
//! ├── registry.rs      # ProposalRegistry
//! ├── events.rs        # GateEvent
//! └── service.rs       # ExecutionGate
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod registry;
pub mod service;

// Re-exports
pub use domain::{
    call_hash, decode_commitments, encode_call, encode_commitments, keccak256, Address,
    CommitOutcome, Commitment, CommitmentPayload, GateError, GateResult, Hash, Operation,
    OracleResponse, Proposal, ProposalCall, ProposalId, ProposalStatus, RequestId, U256,
    COMMITMENT_WIDTH,
};
pub use events::GateEvent;
pub use ports::{
    DispatchOutcome, ExecutionGateApi, GateObserver, OracleTransport, TransactionDispatcher,
};
pub use registry::{ExecutionClaim, ProposalRegistry};
pub use service::{ExecutionGate, GateConfig, GateStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
