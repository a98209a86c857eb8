//! Cross-crate flows.
//!
//! Fixtures shared by the flow tests live in [`harness`].

pub mod redelivery;
pub mod reentrancy;
