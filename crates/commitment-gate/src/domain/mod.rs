//! # Domain Module
//!
//! Core domain types for commitment-gated execution.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use codec::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
