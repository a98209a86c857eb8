//! # Domain Errors
//!
//! Error types for commitment-gated execution.

use super::value_objects::{Address, Hash, ProposalId, RequestId};
use thiserror::Error;

/// Commitment gate error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The proposal's action has already been dispatched.
    #[error("Proposal already executed: {0}")]
    AlreadyExecuted(ProposalId),

    /// The presented call does not hash to the stored commitment.
    ///
    /// `expected` is `None` when no commitment exists at `index`.
    #[error("Hash mismatch for proposal {proposal_id} at index {index}: expected {expected:?}, got {actual:?}")]
    HashMismatch {
        /// Proposal being executed
        proposal_id: ProposalId,
        /// Commitment index presented by the caller
        index: usize,
        /// Stored commitment, if any
        expected: Option<Hash>,
        /// Hash of the presented call
        actual: Hash,
    },

    /// Dispatch failed and the callee returned no reason.
    #[error("Transaction execution failed silently for proposal {0}")]
    SilentExecutionFailure(ProposalId),

    /// Dispatch failed; `payload` is the callee's failure data, unchanged.
    #[error("Transaction execution failed for proposal {proposal_id}: 0x{}", hex::encode(.payload))]
    BubbledExecutionError {
        /// Proposal being executed
        proposal_id: ProposalId,
        /// Raw failure payload returned by the callee
        payload: Vec<u8>,
    },

    /// A response arrived for a request id that was never issued.
    #[error("Unknown request: {0}")]
    UnknownRequest(RequestId),

    /// Oracle callback from an address other than the trusted oracle.
    #[error("Unauthorized oracle: {0}")]
    UnauthorizedOracle(Address),

    /// Administrative call from an address other than the owner.
    #[error("Unauthorized caller: {0}")]
    Unauthorized(Address),

    /// Operation byte outside the known kinds.
    #[error("Invalid operation: {0}")]
    InvalidOperation(u8),

    /// Unparsable address text.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The oracle transport rejected the request.
    #[error("Oracle transport error: {0}")]
    Transport(String),
}

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;
