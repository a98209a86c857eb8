//! # Decision Resolver
//!
//! Turns a finalized off-chain vote into the hash commitment that authorizes
//! exactly one call through the execution gate.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Resolution Rules
//!
//! | Check | Failure |
//! |-------|---------|
//! | Scores final | `NotFinalized` |
//! | `scores_total >= quorum` | `QuorumNotReached` |
//! | Plugin payload complete | `MalformedVotePayload` |
//! | Winner equals `executableIf` | `NoExecution` (empty payload) |
//!
//! Only the first transaction of the first batch is committed.
//!
//! ## Module Structure
//!
//! ```text
//! decision-resolver/
//! ├── domain/          # Vote schema, decide(), errors
//! ├── ports/           # DecisionResolverApi, VoteService
//! ├── adapters/        # GraphQL client, static table
//! └── service.rs       # DecisionResolver, ResolverConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{SnapshotVoteClient, StaticVoteService};
pub use domain::{
    decide, winning_index, Decision, Plugins, RawTransaction, ResolverError, ResolverResult,
    SafeEntry, SafeSnap, ScoresState, TransactionBatch, VoteResult,
};
pub use ports::{DecisionResolverApi, VoteService};
pub use service::{DecisionResolver, ResolverConfig};
