//! Benchmarks for reverb processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use octave_chain::{BlockReverb, FreeverbStage, ReverbParams};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn reverb_with(room_size: f32, damping: f32) -> FreeverbStage {
    let mut reverb = FreeverbStage::new(SAMPLE_RATE);
    reverb.set_params(&ReverbParams {
        room_size,
        damping,
        ..ReverbParams::default()
    });
    reverb
}

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0) // Initial impulse
                } else {
                    (i as f32 * 0.05).sin() * 0.1 // Quiet tail
                }
            })
            .collect();

        let mut reverb = reverb_with(0.3, 0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("mono_small_room", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                reverb.process_mono(black_box(&mut buffer));
            })
        });

        let mut reverb = reverb_with(0.9, 0.3);
        let mut left = input.clone();
        let mut right = input.clone();
        group.bench_with_input(BenchmarkId::new("stereo_large_room", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                reverb.process_stereo(black_box(&mut left), black_box(&mut right));
            })
        });
    }

    group.finish();
}
