use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ParamId;
use crate::dsp::reverb::ReverbParams;

/// Version written into [`ChainState`].
pub const CHAIN_STATE_VERSION: u32 = 1;

/// Per-block copy of every parameter value.
///
/// Taken once at the top of a block and read-only for the rest of it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    /// Voice weights for ratios 0.5, 1.0 (dry), 2.0 and 4.0
    pub pitch_mix: [f32; 4],
    pub reverb: ReverbParams,
    /// Seconds
    pub delay_time: f32,
    pub delay_feedback: f32,
    /// Hz
    pub chorus_rate: f32,
    pub chorus_depth: f32,
    pub chorus_mix: f32,
}

impl ParamSnapshot {
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::PitchDown12 => self.pitch_mix[0],
            ParamId::PitchDry => self.pitch_mix[1],
            ParamId::PitchUp12 => self.pitch_mix[2],
            ParamId::PitchUp24 => self.pitch_mix[3],
            ParamId::ReverbRoomSize => self.reverb.room_size,
            ParamId::ReverbDamping => self.reverb.damping,
            ParamId::ReverbWetLevel => self.reverb.wet_level,
            ParamId::ReverbDryLevel => self.reverb.dry_level,
            ParamId::DelayTime => self.delay_time,
            ParamId::DelayFeedback => self.delay_feedback,
            ParamId::ChorusRate => self.chorus_rate,
            ParamId::ChorusDepth => self.chorus_depth,
            ParamId::ChorusMix => self.chorus_mix,
        }
    }

    /// Set one value as given; range enforcement belongs to [`super::ParamStore`].
    pub fn set(&mut self, id: ParamId, value: f32) {
        let slot = match id {
            ParamId::PitchDown12 => &mut self.pitch_mix[0],
            ParamId::PitchDry => &mut self.pitch_mix[1],
            ParamId::PitchUp12 => &mut self.pitch_mix[2],
            ParamId::PitchUp24 => &mut self.pitch_mix[3],
            ParamId::ReverbRoomSize => &mut self.reverb.room_size,
            ParamId::ReverbDamping => &mut self.reverb.damping,
            ParamId::ReverbWetLevel => &mut self.reverb.wet_level,
            ParamId::ReverbDryLevel => &mut self.reverb.dry_level,
            ParamId::DelayTime => &mut self.delay_time,
            ParamId::DelayFeedback => &mut self.delay_feedback,
            ParamId::ChorusRate => &mut self.chorus_rate,
            ParamId::ChorusDepth => &mut self.chorus_depth,
            ParamId::ChorusMix => &mut self.chorus_mix,
        };
        *slot = value;
    }

    /// Builder-style [`ParamSnapshot::set`].
    pub fn with(mut self, id: ParamId, value: f32) -> Self {
        self.set(id, value);
        self
    }
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        let mut snapshot = Self {
            pitch_mix: [0.0; 4],
            reverb: ReverbParams::default(),
            delay_time: 0.0,
            delay_feedback: 0.0,
            chorus_rate: 0.0,
            chorus_depth: 0.0,
            chorus_mix: 0.0,
        };
        for id in ParamId::ALL {
            snapshot.set(id, id.default_value());
        }
        snapshot
    }
}

/// Minimal persisted state: parameter values keyed by identifier.
///
/// Delay-line contents are never part of the state; they restart silent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChainState {
    pub version: u32,
    pub params: BTreeMap<String, f32>,
}

impl ChainState {
    pub fn from_snapshot(snapshot: &ParamSnapshot) -> Self {
        let params = ParamId::ALL
            .iter()
            .map(|id| (id.as_str().to_string(), snapshot.get(*id)))
            .collect();
        Self {
            version: CHAIN_STATE_VERSION,
            params,
        }
    }
}
