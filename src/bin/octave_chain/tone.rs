use std::f32::consts::TAU;

/// Repeating plucked sine: instant attack, exponential decay, retriggered
/// every `interval` seconds.
pub struct Pluck {
    phase: f32,
    increment: f32,
    level: f32,
    decay: f32,
    interval: usize,
    counter: usize,
}

impl Pluck {
    pub fn new(freq: f32, sample_rate: f32, interval: f32) -> Self {
        Self {
            phase: 0.0,
            increment: TAU * freq / sample_rate,
            level: 0.0,
            // -60 dB over roughly 0.4 s
            decay: (-6.9 / (0.4 * sample_rate)).exp(),
            interval: (interval * sample_rate).max(1.0) as usize,
            counter: 0,
        }
    }

    pub fn fill(&mut self, block: &mut [f32]) {
        for sample in block {
            if self.counter == 0 {
                self.level = 0.5;
                self.phase = 0.0;
            }
            self.counter = (self.counter + 1) % self.interval;

            *sample = self.phase.sin() * self.level;
            self.level *= self.decay;
            self.phase += self.increment;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
        }
    }
}

/// Steady sine used by the offline renderer.
pub fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| (TAU * freq * n as f32 / sample_rate).sin() * 0.5)
        .collect()
}
