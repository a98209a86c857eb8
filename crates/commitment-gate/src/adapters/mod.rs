//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for the execution gate.

mod dispatcher;
mod observer;
mod oracle_transport;

pub use dispatcher::{CallContext, DispatchRecord, InMemoryDispatcher, TargetBehavior};
pub use observer::{RecordingObserver, TracingObserver};
pub use oracle_transport::{InMemoryOracleTransport, SentRequest};
