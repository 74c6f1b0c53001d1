//! Circuit representation: reduction, reference folding and validation.
//!
//! Parsed records are reduced to canonical integer nodes by [`reduce`], then
//! held by [`Circuit`] together with the chosen reference node and the last
//! computed solution.

mod graph;
mod reduce;
mod types;
mod validate;

pub use graph::{Circuit, ProbeNetwork};
pub use reduce::{reduce, Reduction, ReductionMode};
pub use types::*;
pub use validate::validate_branches;
