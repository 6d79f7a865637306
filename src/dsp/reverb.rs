//! Reverb - Room Simulation via Delay Networks
//!
//! Block-level stereo reverb in the Freeverb topology: eight parallel damped
//! comb filters feed four series allpass filters, per channel.
//!
//! # Architecture
//!
//! ```text
//!           ┌──→ [Comb 1] ──┐
//!           ├──→ [Comb 2] ──┤
//! (L+R)·g ──┼──→   ...    ──┼──→ (+) ──→ [AP 1] → [AP 2] → [AP 3] → [AP 4] ──→ wet
//!           └──→ [Comb 8] ──┘
//! ```
//!
//! The right channel runs the same network with every delay stretched by a
//! small stereo spread so the two tails decorrelate.
//!
//! ## Comb Filters
//!
//! ```text
//! y[n]   = buf[n - d]
//! lp[n]  = y[n] * (1 - damp) + lp[n-1] * damp
//! buf[n] = x[n] + lp[n] * feedback
//! ```
//!
//! The one-pole lowpass inside the loop absorbs high frequencies faster than
//! low ones, like soft furnishings in a real room.
//!
//! ## Allpass Filters
//!
//! ```text
//! y[n]   = buf[n - d] - x[n]
//! buf[n] = x[n] + buf[n - d] * 0.5
//! ```
//!
//! # Parameters
//!
//! - **Room Size**: comb feedback, `0.7 + 0.28 * room` (longer tail)
//! - **Damping**: in-loop lowpass, `0.4 * damping` (darker tail)
//! - **Wet / Dry**: output gains; dry is unity-scaled
//! - **Width**: crossfeed between the two wet tails
//!
//! Gain, damping and feedback changes ramp over 10 ms so automation does not
//! click. The first parameter set after `prepare`/`reset` lands immediately.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::flush_denormal;

/// Comb delays in samples at 44.1 kHz
const COMB_TUNINGS: [usize; NUM_COMBS] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
/// Allpass delays in samples at 44.1 kHz
const ALLPASS_TUNINGS: [usize; NUM_ALLPASSES] = [556, 441, 341, 225];
/// Extra delay for the right channel, in samples at 44.1 kHz
const STEREO_SPREAD: usize = 23;
const TUNING_RATE: f64 = 44_100.0;

const NUM_COMBS: usize = 8;
const NUM_ALLPASSES: usize = 4;
const NUM_LANES: usize = 2;

const INPUT_GAIN: f32 = 0.015;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;
const DAMP_SCALE: f32 = 0.4;
const WET_SCALE: f32 = 3.0;
const ALLPASS_FEEDBACK: f32 = 0.5;
const RAMP_SECONDS: f64 = 0.01;

/// Reverb controls, applied once per block.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParams {
    pub room_size: f32,
    pub damping: f32,
    pub wet_level: f32,
    pub dry_level: f32,
    pub width: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.33,
            dry_level: 0.4,
            width: 1.0,
        }
    }
}

/// Block-in/block-out reverb contract used by the effect chain.
///
/// Implementations keep their own state across blocks. `prepare` may
/// allocate; everything else must be realtime-safe.
pub trait BlockReverb: Send {
    fn prepare(&mut self, sample_rate: f64, num_channels: usize);

    fn set_params(&mut self, params: &ReverbParams);

    fn process_mono(&mut self, samples: &mut [f32]);

    fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]);

    fn reset(&mut self);
}

/// Damped feedback comb filter (pre-allocated, RT-safe)
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    write_pos: usize,
    filter_state: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            filter_state: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let output = self.buffer[self.write_pos];

        self.filter_state = flush_denormal(output * (1.0 - damp) + self.filter_state * damp);
        self.buffer[self.write_pos] = input + self.filter_state * feedback;

        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }

        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.write_pos = 0;
    }
}

/// Schroeder allpass used for diffusion (pre-allocated, RT-safe)
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let buffered = self.buffer[self.write_pos];

        self.buffer[self.write_pos] = flush_denormal(input + buffered * ALLPASS_FEEDBACK);

        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }

        buffered - input
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

/// Linear ramp toward a target over a fixed number of samples.
#[derive(Debug, Clone, Copy, Default)]
struct Ramp {
    current: f32,
    target: f32,
    step: f32,
    remaining: usize,
}

impl Ramp {
    fn snap(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.remaining = 0;
    }

    fn set_target(&mut self, target: f32, ramp_len: usize) {
        if target == self.target {
            return;
        }
        self.target = target;
        if ramp_len == 0 {
            self.snap(target);
            return;
        }
        self.step = (target - self.current) / ramp_len as f32;
        self.remaining = ramp_len;
    }

    #[inline]
    fn next(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current + self.step
            };
        }
        self.current
    }
}

/// Freeverb-style stereo reverb.
pub struct FreeverbStage {
    combs: [[CombFilter; NUM_COMBS]; NUM_LANES],
    allpasses: [[AllpassFilter; NUM_ALLPASSES]; NUM_LANES],
    params: ReverbParams,
    damping: Ramp,
    feedback: Ramp,
    dry_gain: Ramp,
    wet_gain1: Ramp,
    wet_gain2: Ramp,
    ramp_len: usize,
    primed: bool,
    sample_rate: f64,
}

impl FreeverbStage {
    /// Create a reverb with delay lines tuned for `sample_rate`.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            combs: Self::build_combs(sample_rate),
            allpasses: Self::build_allpasses(sample_rate),
            params: ReverbParams::default(),
            damping: Ramp::default(),
            feedback: Ramp::default(),
            dry_gain: Ramp::default(),
            wet_gain1: Ramp::default(),
            wet_gain2: Ramp::default(),
            ramp_len: (RAMP_SECONDS * sample_rate) as usize,
            primed: false,
            sample_rate,
        }
    }

    pub fn params(&self) -> &ReverbParams {
        &self.params
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Comb delay lengths of one lane, in samples.
    pub fn comb_lengths(&self, lane: usize) -> [usize; NUM_COMBS] {
        std::array::from_fn(|i| self.combs[lane][i].len())
    }

    fn scaled(tuning: usize, lane: usize, sample_rate: f64) -> usize {
        let samples = (tuning + lane * STEREO_SPREAD) as f64 * sample_rate / TUNING_RATE;
        (samples as usize).max(1)
    }

    fn build_combs(sample_rate: f64) -> [[CombFilter; NUM_COMBS]; NUM_LANES] {
        std::array::from_fn(|lane| {
            std::array::from_fn(|i| CombFilter::new(Self::scaled(COMB_TUNINGS[i], lane, sample_rate)))
        })
    }

    fn build_allpasses(sample_rate: f64) -> [[AllpassFilter; NUM_ALLPASSES]; NUM_LANES] {
        std::array::from_fn(|lane| {
            std::array::from_fn(|i| {
                AllpassFilter::new(Self::scaled(ALLPASS_TUNINGS[i], lane, sample_rate))
            })
        })
    }

    fn apply_targets(&mut self) {
        let p = self.params;
        let wet = p.wet_level * WET_SCALE;
        let targets = [
            p.damping * DAMP_SCALE,
            p.room_size * ROOM_SCALE + ROOM_OFFSET,
            p.dry_level,
            0.5 * wet * (1.0 + p.width),
            0.5 * wet * (1.0 - p.width),
        ];
        let ramps = [
            &mut self.damping,
            &mut self.feedback,
            &mut self.dry_gain,
            &mut self.wet_gain1,
            &mut self.wet_gain2,
        ];

        for (ramp, target) in ramps.into_iter().zip(targets) {
            if self.primed {
                ramp.set_target(target, self.ramp_len);
            } else {
                ramp.snap(target);
            }
        }
        self.primed = true;
    }
}

impl Default for FreeverbStage {
    fn default() -> Self {
        Self::new(48_000.0)
    }
}

impl BlockReverb for FreeverbStage {
    fn prepare(&mut self, sample_rate: f64, _num_channels: usize) {
        self.combs = Self::build_combs(sample_rate);
        self.allpasses = Self::build_allpasses(sample_rate);
        self.ramp_len = (RAMP_SECONDS * sample_rate) as usize;
        self.sample_rate = sample_rate;
        self.primed = false;
    }

    fn set_params(&mut self, params: &ReverbParams) {
        self.params = ReverbParams {
            room_size: params.room_size.clamp(0.0, 1.0),
            damping: params.damping.clamp(0.0, 1.0),
            wet_level: params.wet_level.clamp(0.0, 1.0),
            dry_level: params.dry_level.clamp(0.0, 1.0),
            width: params.width.clamp(0.0, 1.0),
        };
        self.apply_targets();
    }

    fn process_mono(&mut self, samples: &mut [f32]) {
        let [combs, _] = &mut self.combs;
        let [allpasses, _] = &mut self.allpasses;

        for sample in samples.iter_mut() {
            let input = *sample * INPUT_GAIN;
            let damp = self.damping.next();
            let feedback = self.feedback.next();

            let mut out = 0.0;
            for comb in combs.iter_mut() {
                out += comb.process(input, damp, feedback);
            }
            for allpass in allpasses.iter_mut() {
                out = allpass.process(out);
            }

            let dry = self.dry_gain.next();
            let wet1 = self.wet_gain1.next();
            self.wet_gain2.next();
            *sample = out * wet1 + *sample * dry;
        }
    }

    fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let [combs_l, combs_r] = &mut self.combs;
        let [allpasses_l, allpasses_r] = &mut self.allpasses;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let input = (*l + *r) * INPUT_GAIN;
            let damp = self.damping.next();
            let feedback = self.feedback.next();

            let mut out_l = 0.0;
            let mut out_r = 0.0;
            for (comb_l, comb_r) in combs_l.iter_mut().zip(combs_r.iter_mut()) {
                out_l += comb_l.process(input, damp, feedback);
                out_r += comb_r.process(input, damp, feedback);
            }
            for (ap_l, ap_r) in allpasses_l.iter_mut().zip(allpasses_r.iter_mut()) {
                out_l = ap_l.process(out_l);
                out_r = ap_r.process(out_r);
            }

            let dry = self.dry_gain.next();
            let wet1 = self.wet_gain1.next();
            let wet2 = self.wet_gain2.next();
            let dry_l = *l;
            let dry_r = *r;
            *l = out_l * wet1 + out_r * wet2 + dry_l * dry;
            *r = out_r * wet1 + out_l * wet2 + dry_r * dry;
        }
    }

    fn reset(&mut self) {
        for lane in &mut self.combs {
            for comb in lane.iter_mut() {
                comb.reset();
            }
        }
        for lane in &mut self.allpasses {
            for allpass in lane.iter_mut() {
                allpass.reset();
            }
        }
        self.primed = false;
    }
}
