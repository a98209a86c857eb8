//! Domain layer for the decision resolver.

pub mod decision;
pub mod errors;
pub mod vote;

pub use decision::*;
pub use errors::*;
pub use vote::*;
