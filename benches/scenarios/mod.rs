//! Full-chain scenario benchmarks.
//!
//! These run the complete pitch, echo, chorus and reverb path the way a
//! host would drive it, one block per callback.

mod chain;

pub use chain::bench_chain;
