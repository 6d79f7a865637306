//! Benchmarks for the effect chain and the primitives it is built from.
//!
//! A block has to finish well inside its own playback time. At 48 kHz the
//! chain scenarios get 1.33 ms for a 64-sample block, doubling with each
//! size step up to 10.67 ms at 512. The stereo chain runs two lanes through
//! every stage plus the cross-fed reverb, so it is the one to watch.
//!
//! Groups:
//!   - dsp/delay        integer echo taps, swept chorus reads, pitch heads
//!   - dsp/reverb       Freeverb block pass, mono and stereo
//!   - scenarios/chain  full chain in 1->1, 2->2 and 1->2 layouts

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f64 = 48_000.0;

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_delay,
    dsp::bench_reverb,
    // Complete chain
    scenarios::bench_chain,
);
criterion_main!(benches);
