use color_eyre::eyre::{ensure, Result as EyreResult};
use octave_chain::{EffectChain, ParamSnapshot, ProcessSpec};
use rustfft::{num_complex::Complex, FftPlanner};

use crate::tone;

pub struct RenderOptions {
    pub sample_rate: f64,
    pub block_size: usize,
    pub seconds: f64,
    pub freq: f32,
    pub output_channels: usize,
    pub params: ParamSnapshot,
}

pub fn run(opts: RenderOptions) -> EyreResult<()> {
    ensure!(opts.seconds > 0.0, "render length must be positive");

    let spec = ProcessSpec::new(opts.sample_rate, opts.block_size)
        .with_channels(1, opts.output_channels);
    let mut chain = EffectChain::new();
    chain.prepare_with(spec)?;

    let len = (opts.seconds * opts.sample_rate) as usize;
    let input = tone::sine(opts.freq, opts.sample_rate as f32, len);
    let mut outputs = vec![Vec::with_capacity(len); opts.output_channels];
    let mut lanes = vec![vec![0.0f32; opts.block_size]; opts.output_channels];

    for block in input.chunks(opts.block_size) {
        let mut views: Vec<&mut [f32]> = lanes.iter_mut().map(|l| &mut l[..block.len()]).collect();
        chain.process(&[block], &mut views, &opts.params);
        for (out, view) in outputs.iter_mut().zip(&views) {
            out.extend_from_slice(view);
        }
    }

    println!("=== octave_chain render ===");
    println!("Sample rate: {} Hz", opts.sample_rate);
    println!("Block size: {}", opts.block_size);
    println!("Input: {} Hz sine, {} samples", opts.freq, len);
    println!();
    for (ch, out) in outputs.iter().enumerate() {
        let report = Report::measure(out, opts.sample_rate);
        println!(
            "  ch{}: peak {:.4}  rms {:.4}  dominant {:.1} Hz",
            ch, report.peak, report.rms, report.dominant_hz
        );
    }
    Ok(())
}

struct Report {
    peak: f32,
    rms: f32,
    dominant_hz: f64,
}

impl Report {
    fn measure(signal: &[f32], sample_rate: f64) -> Self {
        let peak = signal.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        let rms = if signal.is_empty() {
            0.0
        } else {
            (signal.iter().map(|s| s * s).sum::<f32>() / signal.len() as f32).sqrt()
        };
        Self {
            peak,
            rms,
            dominant_hz: dominant_frequency(signal, sample_rate),
        }
    }
}

/// Frequency of the strongest bin below Nyquist, skipping DC.
fn dominant_frequency(signal: &[f32], sample_rate: f64) -> f64 {
    if signal.len() < 2 {
        return 0.0;
    }
    let mut spectrum: Vec<Complex<f32>> = signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
    FftPlanner::new()
        .plan_fft_forward(spectrum.len())
        .process(&mut spectrum);

    let bin = spectrum[1..spectrum.len() / 2]
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
        .map_or(0, |(i, _)| i + 1);
    bin as f64 * sample_rate / signal.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_frequency_of_sine() {
        let signal = tone::sine(250.0, 8_000.0, 8_000);
        let hz = dominant_frequency(&signal, 8_000.0);
        assert!((hz - 250.0).abs() <= 1.0, "got {}", hz);
    }

    #[test]
    fn test_report_of_silence() {
        let report = Report::measure(&[0.0; 64], 48_000.0);
        assert_eq!(report.peak, 0.0);
        assert_eq!(report.rms, 0.0);
    }
}
