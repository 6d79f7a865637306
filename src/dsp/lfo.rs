//! Low Frequency Oscillator (LFO) phase tracking.

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at sub-audio rates (~0.1 to ~20 Hz). Its
output does not reach the speaker directly; it moves some other parameter
over time. The chorus stage uses one to sweep a delay tap back and forth.

Vocabulary
----------

  phase         Position within one cycle, in radians: [0, 2π).

  increment     Radians advanced per sample:

                    increment = 2π · rate / sample_rate

                At 1 Hz / 48 kHz the increment is ~0.000131 rad.

  bipolar       Output swings -1.0 .. +1.0 (raw sine).

  unipolar      Output swings 0.0 .. 1.0. Delay taps only move in one
                direction from their base, so the chorus uses this form:

                    unipolar = (bipolar + 1.0) * 0.5


Phase Wrapping
--------------

The accumulator subtracts 2π once it passes a full cycle instead of taking
a modulo. The increment is always far below 2π, so one subtraction is
enough, and the phase never drifts through repeated float division.

    phase:  ... 6.2829  ->  6.2831 - 2π = 0.00001  -> ...
*/

use std::f32::consts::TAU;

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Radians per sample for an oscillator at `rate_hz`.
#[inline]
pub fn phase_increment(rate_hz: f32, sample_rate: f64) -> f32 {
    (TAU as f64 * rate_hz as f64 / sample_rate) as f32
}

/// Phase accumulator for a sine LFO, kept in `[0, 2π)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LfoPhase {
    phase: f32,
}

impl LfoPhase {
    pub const fn new() -> Self {
        Self { phase: 0.0 }
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Step the phase forward and wrap by subtraction.
    #[inline]
    pub fn advance(&mut self, increment: f32) {
        self.phase += increment;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
    }

    /// Current value mapped to 0.0..1.0.
    #[inline]
    pub fn unipolar(&self) -> f32 {
        bipolar_to_unipolar(self.phase.sin())
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
