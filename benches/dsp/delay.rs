//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use octave_chain::dsp::delay::{CircularDelayLine, ReadCursor};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");
    let capacity = (2.0 * SAMPLE_RATE) as usize;

    // Integer taps (echo)
    let delay_times: &[usize] = &[
        480,   // 10ms at 48kHz
        4800,  // 100ms at 48kHz
        48000, // 1 second at 48kHz
    ];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &delay_samples in delay_times {
            let delay_ms = delay_samples as f32 / 48.0;
            let mut line = CircularDelayLine::new(1, capacity);
            group.bench_with_input(
                BenchmarkId::new(format!("tap_{}ms", delay_ms as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for &sample in &input {
                            let tap = line.tap_behind(black_box(delay_samples));
                            let echoed = sample + line.read(0, tap) * 0.5;
                            line.write(0, echoed);
                            line.advance_write();
                            sum += echoed;
                        }
                        sum
                    })
                },
            );
        }

        // Fractional read swept like the chorus tap
        let mut line = CircularDelayLine::new(1, capacity);
        group.bench_with_input(BenchmarkId::new("read_linear", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &sample) in input.iter().enumerate() {
                    line.write(0, sample);
                    let delay = 480.0 + (i as f64 * 0.1).sin() * 48.0;
                    sum += line.read_linear(0, line.position_behind(black_box(delay)));
                    line.advance_write();
                }
                sum
            })
        });

        // Four resampling heads, as in the pitch bank
        let mut line = CircularDelayLine::new(1, capacity);
        let mut cursors = [0.5, 1.0, 2.0, 4.0].map(ReadCursor::new);
        group.bench_with_input(BenchmarkId::new("pitch_heads", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for &sample in &input {
                    line.write(0, sample);
                    for cursor in &mut cursors {
                        sum += line.read_linear(0, cursor.position());
                        cursor.advance(capacity);
                    }
                    line.advance_write();
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}
