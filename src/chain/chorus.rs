use crate::{
    dsp::{
        delay::CircularDelayLine,
        lfo::{phase_increment, LfoPhase},
    },
    MAX_CHANNELS,
};

use super::Frame;

/*
Chorus Stage
============

One delay tap swept by a sine LFO, blended with the signal feeding it.

    lfo        = 0.5 + 0.5 * sin(phase)          (0..1)
    delay_ms   = 10 + 15 * lfo                   (10..25 ms)
    delay      = delay_ms * (sample_rate / 1000) * depth

As the tap slides, the read head moves slightly faster or slower than the
write head, detuning the copy by a few cents. Mixed back with the input,
that detuned copy thickens the sound.

Depth scales the whole delay, so depth 0 collapses the tap onto the write
cursor and the "wet" copy is the input itself.

The LFO is shared by all channels and advances once per sample, before the
tap is computed.
*/

const BASE_DELAY_MS: f32 = 10.0;
const SWEEP_MS: f32 = 15.0;

/// Per-block chorus controls derived from the parameter snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusSettings {
    /// LFO radians per sample
    pub phase_increment: f32,
    /// Samples per millisecond, scaled by depth
    pub depth_scale: f64,
    pub mix: f32,
}

impl ChorusSettings {
    pub fn new(rate_hz: f32, depth: f32, mix: f32, sample_rate: f64) -> Self {
        Self {
            phase_increment: phase_increment(rate_hz, sample_rate),
            depth_scale: sample_rate / 1000.0 * depth as f64,
            mix,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChorusStage {
    line: CircularDelayLine,
    lfo: LfoPhase,
}

impl ChorusStage {
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            line: CircularDelayLine::new(num_channels, capacity),
            lfo: LfoPhase::new(),
        }
    }

    pub fn resize(&mut self, num_channels: usize, capacity: usize) {
        self.line.resize(num_channels, capacity);
        self.lfo.reset();
    }

    pub fn reset(&mut self) {
        self.line.clear();
        self.lfo.reset();
    }

    pub fn line(&self) -> &CircularDelayLine {
        &self.line
    }

    pub fn lfo_phase(&self) -> f32 {
        self.lfo.phase()
    }

    #[inline]
    pub fn process_frame(&mut self, input: &Frame, settings: &ChorusSettings) -> Frame {
        self.lfo.advance(settings.phase_increment);
        let delay_ms = BASE_DELAY_MS + SWEEP_MS * self.lfo.unipolar();
        let read_pos = self
            .line
            .position_behind(delay_ms as f64 * settings.depth_scale);

        let channels = self.line.num_channels().min(MAX_CHANNELS);
        let mut out = [0.0; MAX_CHANNELS];
        for (ch, slot) in out.iter_mut().enumerate().take(channels) {
            let dry = input[ch];
            self.line.write(ch, dry);
            let wet = self.line.read_linear(ch, read_pos);
            *slot = dry * (1.0 - settings.mix) + wet * settings.mix;
        }
        self.line.advance_write();

        out
    }
}
