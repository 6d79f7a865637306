//! Low-level DSP primitives used by the effect chain stages.
//!
//! These components never allocate once sized, making them safe to drive from
//! the realtime callback. They stay focused on the signal-processing math so
//! the chain stages can layer on routing and parameter handling.

/// Multi-channel circular delay line with fractional read cursors.
pub mod delay;
/// LFO phase accumulator and unipolar/bipolar helpers.
pub mod lfo;
/// Freeverb-style block reverb and the block reverb contract.
pub mod reverb;

pub use delay::{CircularDelayLine, ReadCursor};
pub use lfo::LfoPhase;
pub use reverb::{BlockReverb, FreeverbStage, ReverbParams};

/// Replace subnormal values with zero.
///
/// Decaying feedback loops otherwise spend their last few thousand samples
/// in slow denormal arithmetic.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < f32::MIN_POSITIVE {
        0.0
    } else {
        x
    }
}
