use crate::{dsp::delay::CircularDelayLine, dsp::flush_denormal, MAX_CHANNELS};

use super::Frame;

/// Feedback echo on the pitched wet signal.
///
/// ```text
/// y[n] = wet[n] + feedback * y[n - D]
/// ```
///
/// The tap position `w - d` is truncated to a whole slot, so a fractional
/// delay `d` lands `ceil(d)` samples behind the writer; the tap is not
/// interpolated. Feedback must stay below 1.0, which the parameter range
/// guarantees.
#[derive(Debug, Clone)]
pub struct EchoStage {
    line: CircularDelayLine,
}

impl EchoStage {
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            line: CircularDelayLine::new(num_channels, capacity),
        }
    }

    pub fn resize(&mut self, num_channels: usize, capacity: usize) {
        self.line.resize(num_channels, capacity);
    }

    pub fn reset(&mut self) {
        self.line.clear();
    }

    pub fn line(&self) -> &CircularDelayLine {
        &self.line
    }

    /// Echo time in (possibly fractional) samples for `seconds` at `sample_rate`.
    #[inline]
    pub fn delay_samples(seconds: f32, sample_rate: f64) -> f64 {
        seconds.max(0.0) as f64 * sample_rate
    }

    /// Slot read by the echo for a delay of `delay_samples`.
    #[inline]
    pub fn tap_index(&self, delay_samples: f64) -> usize {
        self.line.position_behind(delay_samples) as usize % self.line.capacity()
    }

    #[inline]
    pub fn process_frame(&mut self, wet: &Frame, delay_samples: f64, feedback: f32) -> Frame {
        let channels = self.line.num_channels().min(MAX_CHANNELS);
        let tap = self.tap_index(delay_samples);

        let mut out = [0.0; MAX_CHANNELS];
        for (ch, slot) in out.iter_mut().enumerate().take(channels) {
            let echoed = flush_denormal(wet[ch] + self.line.read(ch, tap) * feedback);
            self.line.write(ch, echoed);
            *slot = echoed;
        }
        self.line.advance_write();

        out
    }
}
