//! # Domain Invariants
//!
//! Rules the registry enforces on every state transition.

use super::entities::Proposal;
use super::value_objects::Commitment;

/// Invariant: an executed proposal holds commitments.
///
/// `executed == true` implies at least one commitment was verified and
/// dispatched, so the list cannot be empty.
pub fn invariant_executed_has_commitments(proposal: &Proposal) -> bool {
    !proposal.executed || !proposal.commitments.is_empty()
}

/// Invariant: the presented call hashes to the stored commitment.
///
/// A missing commitment never matches.
pub fn invariant_commitment_matches(expected: Option<&Commitment>, candidate: &Commitment) -> bool {
    expected == Some(candidate)
}

/// Invariant: commitments are set at most once.
pub fn invariant_commitments_unset(proposal: &Proposal) -> bool {
    proposal.commitments.is_empty()
}
