//! Parameter identifiers, ranges and the lock-free store shared with the
//! audio thread.
//!
//! The control side writes through [`ParamStore`]; the audio side takes one
//! [`ParamSnapshot`] per block and never writes back.

mod snapshot;
mod store;

pub use snapshot::{ChainState, ParamSnapshot, CHAIN_STATE_VERSION};
pub use store::ParamStore;

use std::{fmt, str::FromStr};

use crate::error::ChainError;

/// Every parameter the chain recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamId {
    /// Mix of the octave-down voice
    PitchDown12,
    /// Mix of the unshifted (dry) voice
    PitchDry,
    /// Mix of the octave-up voice
    PitchUp12,
    /// Mix of the two-octaves-up voice
    PitchUp24,
    ReverbRoomSize,
    ReverbDamping,
    ReverbWetLevel,
    ReverbDryLevel,
    /// Echo time in seconds
    DelayTime,
    /// Echo feedback gain, kept below 1.0
    DelayFeedback,
    /// Chorus LFO rate in Hz
    ChorusRate,
    ChorusDepth,
    ChorusMix,
}

/// Static description of one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDef {
    pub id: ParamId,
    pub key: &'static str,
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamDef {
    /// Clamp `value` into this parameter's range.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

const fn def(id: ParamId, key: &'static str, name: &'static str, min: f32, max: f32, default: f32) -> ParamDef {
    ParamDef {
        id,
        key,
        name,
        min,
        max,
        default,
    }
}

/// Parameter table, indexed by `ParamId as usize`.
pub const PARAMS: [ParamDef; ParamId::COUNT] = [
    def(ParamId::PitchDown12, "pitch-12", "Mix -12", 0.0, 1.0, 0.0),
    def(ParamId::PitchDry, "pitch0", "Mix 0 (Dry)", 0.0, 1.0, 1.0),
    def(ParamId::PitchUp12, "pitch12", "Mix +12", 0.0, 1.0, 0.5),
    def(ParamId::PitchUp24, "pitch24", "Mix +24", 0.0, 1.0, 0.25),
    def(ParamId::ReverbRoomSize, "reverb_room_size", "Room Size", 0.0, 1.0, 0.5),
    def(ParamId::ReverbDamping, "reverb_damping", "Damping", 0.0, 1.0, 0.5),
    def(ParamId::ReverbWetLevel, "reverb_wet_level", "Reverb Wet", 0.0, 1.0, 0.33),
    def(ParamId::ReverbDryLevel, "reverb_dry_level", "Reverb Dry", 0.0, 1.0, 0.4),
    def(ParamId::DelayTime, "delay_time", "Delay Time", 0.01, 1.0, 0.5),
    def(ParamId::DelayFeedback, "delay_feedback", "Feedback", 0.0, 0.95, 0.5),
    def(ParamId::ChorusRate, "chorus_rate", "Chorus Rate", 0.1, 10.0, 1.0),
    def(ParamId::ChorusDepth, "chorus_depth", "Chorus Depth", 0.0, 1.0, 0.2),
    def(ParamId::ChorusMix, "chorus_mix", "Chorus Mix", 0.0, 1.0, 0.5),
];

impl ParamId {
    pub const COUNT: usize = 13;

    pub const ALL: [ParamId; ParamId::COUNT] = [
        ParamId::PitchDown12,
        ParamId::PitchDry,
        ParamId::PitchUp12,
        ParamId::PitchUp24,
        ParamId::ReverbRoomSize,
        ParamId::ReverbDamping,
        ParamId::ReverbWetLevel,
        ParamId::ReverbDryLevel,
        ParamId::DelayTime,
        ParamId::DelayFeedback,
        ParamId::ChorusRate,
        ParamId::ChorusDepth,
        ParamId::ChorusMix,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn def(self) -> &'static ParamDef {
        &PARAMS[self.index()]
    }

    /// Identifier used by hosts and saved state.
    pub fn as_str(self) -> &'static str {
        self.def().key
    }

    pub fn default_value(self) -> f32 {
        self.def().default
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamId {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PARAMS
            .iter()
            .find(|def| def.key == s)
            .map(|def| def.id)
            .ok_or_else(|| ChainError::UnknownParameter(s.to_string()))
    }
}
