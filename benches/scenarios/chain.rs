//! Benchmarks for the complete effect chain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use octave_chain::{EffectChain, ParamId, ParamStore};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chain");

    // Every voice and effect audible
    let store = ParamStore::new();
    for (id, value) in [
        (ParamId::PitchDown12, 0.5),
        (ParamId::PitchUp12, 0.5),
        (ParamId::PitchUp24, 0.3),
        (ParamId::DelayFeedback, 0.6),
        (ParamId::ChorusMix, 0.5),
    ] {
        store.set(id, value).unwrap();
    }
    let params = store.snapshot();

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();

        let mut mono = EffectChain::new().with_channels(1, 1);
        mono.prepare(SAMPLE_RATE, size).unwrap();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("mono", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                mono.process_in_place(&mut [black_box(&mut buffer[..])], black_box(&params));
            })
        });

        let mut stereo = EffectChain::new();
        stereo.prepare(SAMPLE_RATE, size).unwrap();
        let mut left = input.clone();
        let mut right = input.clone();
        group.bench_with_input(BenchmarkId::new("stereo", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                stereo.process_in_place(
                    &mut [black_box(&mut left[..]), black_box(&mut right[..])],
                    black_box(&params),
                );
            })
        });

        // Mono input fanned out to stereo, with a fresh snapshot per block
        let mut widened = EffectChain::new().with_channels(1, 2);
        widened.prepare(SAMPLE_RATE, size).unwrap();
        let mut out_l = vec![0.0f32; size];
        let mut out_r = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("mono_to_stereo", size), &size, |b, _| {
            b.iter(|| {
                let snapshot = store.snapshot();
                widened.process(
                    &[black_box(&input[..])],
                    &mut [&mut out_l[..], &mut out_r[..]],
                    &snapshot,
                );
            })
        });
    }

    group.finish();
}
