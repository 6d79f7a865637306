//! Realtime-safe effect chain: octave pitch voices, feedback echo, LFO chorus
//! and a block reverb, driven one audio block at a time.
//!
//! ```no_run
//! use octave_chain::{EffectChain, ParamId, ParamStore};
//!
//! let store = ParamStore::new();
//! store.set(ParamId::DelayTime, 0.25).unwrap();
//!
//! let mut chain = EffectChain::new().with_channels(1, 1);
//! chain.prepare(48_000.0, 256).unwrap();
//!
//! let mut block = vec![0.0f32; 256];
//! chain.process_in_place(&mut [&mut block[..]], &store.snapshot());
//! ```

pub mod chain; // Pipeline driver and per-sample stages
pub mod config;
pub mod dsp;
pub mod error;
pub mod params; // Lock-free parameter store and saved state

pub use chain::{
    message::{ChainMessage, MessageReceiver},
    ChainStatus, EffectChain,
};
pub use config::ProcessSpec;
pub use dsp::reverb::{BlockReverb, FreeverbStage, ReverbParams};
pub use error::{ChainError, Result};
pub use params::{ChainState, ParamId, ParamSnapshot, ParamStore};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Channels carried through the per-sample stages.
pub const MAX_CHANNELS: usize = 2;
/// History held by every delay line, in seconds.
pub const BUFFER_SECONDS: f64 = 2.0;
pub const TAIL_SECONDS: f64 = 2.0;
pub(crate) const REVERB_WIDTH: f32 = 1.0;
