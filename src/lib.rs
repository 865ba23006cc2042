//! Text filters preparing edge lists and experiment logs.

pub mod error;
pub mod dialect;
pub mod relabel;
pub mod diagnostics;
pub mod mapped;
pub mod interleave;
pub mod counters;
pub mod cli;
