//! # Decision Logic
//!
//! Pure validation of a vote result and derivation of the commitment payload
//! it authorizes.
//!
//! Check order:
//! 1. `NotFinalized` unless scores are final.
//! 2. `QuorumNotReached` unless `scores_total >= quorum`.
//! 3. Schema: choices/scores present, aligned and finite.
//! 4. Winning choice: highest score, lowest index on ties.
//! 5. `NoExecution` unless `executableIf` names the winning choice.
//! 6. First transaction of the first batch, hashed into the payload.

use super::errors::{ResolverError, ResolverResult};
use super::vote::{RawTransaction, ScoresState, VoteResult};
use commitment_gate::{
    call_hash, encode_commitments, Address, CommitmentPayload, Operation, ProposalCall,
    ProposalId, U256,
};
use serde_json::Value;

/// Outcome of resolving a vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Execution authorized for `call`; `payload` carries its commitment.
    Execute {
        /// Winning choice label
        winning_choice: String,
        /// The single authorized call
        call: ProposalCall,
        /// Commitment payload to deliver to the gate
        payload: CommitmentPayload,
    },
    /// The vote is valid but does not authorize execution.
    NoExecution {
        /// Winning choice label
        winning_choice: String,
    },
}

impl Decision {
    /// Payload bytes for the oracle response; empty for `NoExecution`.
    pub fn into_payload(self) -> Vec<u8> {
        match self {
            Self::Execute { payload, .. } => payload.into_bytes(),
            Self::NoExecution { .. } => Vec::new(),
        }
    }

    /// Winning choice label.
    pub fn winning_choice(&self) -> &str {
        match self {
            Self::Execute { winning_choice, .. } | Self::NoExecution { winning_choice } => {
                winning_choice
            }
        }
    }
}

/// Index of the highest score; the lowest such index on ties.
pub fn winning_index(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

/// Resolve `vote` for `proposal_id`.
pub fn decide(proposal_id: &ProposalId, vote: &VoteResult) -> ResolverResult<Decision> {
    if vote.scores_state != ScoresState::Final {
        return Err(ResolverError::NotFinalized {
            proposal_id: proposal_id.clone(),
            state: vote.scores_state,
        });
    }

    if vote.scores_total < vote.quorum {
        return Err(ResolverError::QuorumNotReached {
            proposal_id: proposal_id.clone(),
            scores_total: vote.scores_total,
            quorum: vote.quorum,
        });
    }

    if vote.choices.is_empty() {
        return Err(ResolverError::malformed(proposal_id, "choices"));
    }
    if vote.scores.len() != vote.choices.len() || vote.scores.iter().any(|s| !s.is_finite()) {
        return Err(ResolverError::malformed(proposal_id, "scores"));
    }

    let winner = winning_index(&vote.scores)
        .ok_or_else(|| ResolverError::malformed(proposal_id, "scores"))?;
    let winning_choice = vote.choices[winner].clone();

    let safe_snap = vote
        .plugins
        .as_ref()
        .and_then(|p| p.safe_snap.as_ref())
        .ok_or_else(|| ResolverError::malformed(proposal_id, "plugins.safeSnap"))?;
    let executable_if = safe_snap
        .executable_if
        .as_deref()
        .ok_or_else(|| ResolverError::malformed(proposal_id, "plugins.safeSnap.executableIf"))?;

    if executable_if != winning_choice {
        return Ok(Decision::NoExecution { winning_choice });
    }

    let raw = vote.first_transaction().ok_or_else(|| {
        ResolverError::malformed(
            proposal_id,
            "plugins.safeSnap.safes[0].txs[0].transactions[0]",
        )
    })?;
    let call = parse_transaction(proposal_id, raw)?;
    let payload = CommitmentPayload(encode_commitments(&[call_hash(&call)]));

    Ok(Decision::Execute {
        winning_choice,
        call,
        payload,
    })
}

/// Convert a raw transaction into a typed call.
pub fn parse_transaction(
    proposal_id: &ProposalId,
    raw: &RawTransaction,
) -> ResolverResult<ProposalCall> {
    let field = |name: &str| format!("transactions[0].{name}");

    let to: Address = raw
        .to
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ResolverError::malformed(proposal_id, field("to")))?;

    let value = raw
        .value
        .as_ref()
        .and_then(parse_u256)
        .ok_or_else(|| ResolverError::malformed(proposal_id, field("value")))?;

    let data = raw
        .data
        .as_deref()
        .and_then(|s| hex::decode(s.strip_prefix("0x").unwrap_or(s)).ok())
        .ok_or_else(|| ResolverError::malformed(proposal_id, field("data")))?;

    let operation = raw
        .operation
        .as_ref()
        .and_then(parse_small_int)
        .and_then(|op| Operation::try_from(op).ok())
        .ok_or_else(|| ResolverError::malformed(proposal_id, field("operation")))?;

    Ok(ProposalCall::new(to, value, data, operation))
}

fn parse_u256(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) => match s.strip_prefix("0x") {
            Some(digits) => U256::from_str_radix(digits, 16).ok(),
            None => U256::from_dec_str(s).ok(),
        },
        _ => None,
    }
}

fn parse_small_int(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u8::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
