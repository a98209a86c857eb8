//! Adapters layer: vote service implementations.

pub mod snapshot_client;
pub mod static_service;

pub use snapshot_client::SnapshotVoteClient;
pub use static_service::StaticVoteService;
