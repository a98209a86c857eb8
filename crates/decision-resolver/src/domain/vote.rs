//! # Vote Schema
//!
//! Shape of a vote result as returned by the vote service. Nested plugin
//! fields are optional here; `decision::decide` validates them explicitly
//! and fails fast when one is missing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether scores may still change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoresState {
    /// Voting open or tallies still being computed.
    #[default]
    Pending,
    /// Scores are final.
    Final,
    /// Vote service marked the tally invalid.
    Invalid,
    /// Any other state reported by the service.
    #[serde(other)]
    Unknown,
}

/// A vote result as consumed by the resolver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResult {
    /// Ordered choice labels.
    pub choices: Vec<String>,
    /// Scores, index-aligned with `choices`.
    pub scores: Vec<f64>,
    /// Finality of the scores.
    #[serde(alias = "scores_state", default)]
    pub scores_state: ScoresState,
    /// Minimum total weight required.
    #[serde(default)]
    pub quorum: f64,
    /// Total weight cast.
    #[serde(alias = "scores_total", default)]
    pub scores_total: f64,
    /// Plugin payloads.
    #[serde(default)]
    pub plugins: Option<Plugins>,
}

/// Plugin section of a vote.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Plugins {
    /// Execution plugin payload.
    #[serde(rename = "safeSnap", default)]
    pub safe_snap: Option<SafeSnap>,
}

/// Execution plugin payload: which choice authorizes execution, and what.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeSnap {
    /// Choice label that authorizes execution.
    #[serde(rename = "executableIf", default)]
    pub executable_if: Option<String>,
    /// Executing accounts and their transaction batches.
    #[serde(default)]
    pub safes: Vec<SafeEntry>,
}

/// One executing account's batches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SafeEntry {
    /// Transaction batches.
    #[serde(default)]
    pub txs: Vec<TransactionBatch>,
}

/// One batch of transactions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionBatch {
    /// Transactions in the batch.
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

/// A transaction exactly as the vote service encodes it.
///
/// `value` and `operation` arrive as either JSON strings or numbers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Target address, hex.
    #[serde(default)]
    pub to: Option<String>,
    /// Value, decimal string, `0x` hex string or number.
    #[serde(default)]
    pub value: Option<Value>,
    /// Call data, `0x` hex.
    #[serde(default)]
    pub data: Option<String>,
    /// Operation, `0` or `1`.
    #[serde(default)]
    pub operation: Option<Value>,
}

impl VoteResult {
    /// First transaction of the first batch of the first executing account.
    pub fn first_transaction(&self) -> Option<&RawTransaction> {
        self.plugins
            .as_ref()?
            .safe_snap
            .as_ref()?
            .safes
            .first()?
            .txs
            .first()?
            .transactions
            .first()
    }
}
