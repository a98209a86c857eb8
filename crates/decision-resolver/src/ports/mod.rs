//! Ports layer: inbound API and outbound vote service.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
