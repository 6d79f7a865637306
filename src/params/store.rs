use std::sync::atomic::{AtomicU32, Ordering};

use log::{debug, warn};

use super::{ChainState, ParamId, ParamSnapshot, CHAIN_STATE_VERSION, PARAMS};
use crate::error::{ChainError, Result};

/// Lock-free parameter store.
///
/// Each parameter lives in its own `AtomicU32` holding the f32 bit pattern,
/// so a reader can never observe half of a write. One control thread writes,
/// the audio thread reads one [`ParamSnapshot`] per block. Values are clamped
/// into range on the way in, which keeps the echo feedback below unity.
#[derive(Debug)]
pub struct ParamStore {
    cells: [AtomicU32; ParamId::COUNT],
}

impl ParamStore {
    /// Create a store holding every parameter's default value.
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|i| AtomicU32::new(PARAMS[i].default.to_bits())),
        }
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> f32 {
        f32::from_bits(self.cells[id.index()].load(Ordering::Relaxed))
    }

    /// Store `value` clamped into range and return what was stored.
    pub fn set(&self, id: ParamId, value: f32) -> Result<f32> {
        if !value.is_finite() {
            return Err(ChainError::NonFiniteValue {
                id: id.as_str().to_string(),
                value,
            });
        }
        let clamped = id.def().clamp(value);
        if clamped != value {
            debug!("{} clamped from {} to {}", id, value, clamped);
        }
        self.cells[id.index()].store(clamped.to_bits(), Ordering::Relaxed);
        Ok(clamped)
    }

    pub fn get_by_id(&self, key: &str) -> Result<f32> {
        Ok(self.get(key.parse()?))
    }

    pub fn set_by_id(&self, key: &str, value: f32) -> Result<f32> {
        self.set(key.parse()?, value)
    }

    /// Read every parameter once. Realtime-safe.
    pub fn snapshot(&self) -> ParamSnapshot {
        let mut snapshot = ParamSnapshot::default();
        for id in ParamId::ALL {
            snapshot.set(id, self.get(id));
        }
        snapshot
    }

    /// Write every parameter from `snapshot`, clamping into range.
    ///
    /// Non-finite entries keep their current value.
    pub fn restore(&self, snapshot: &ParamSnapshot) {
        for id in ParamId::ALL {
            if let Err(err) = self.set(id, snapshot.get(id)) {
                warn!("restore skipped: {}", err);
            }
        }
    }

    pub fn reset_to_defaults(&self) {
        for def in PARAMS.iter() {
            self.cells[def.id.index()].store(def.default.to_bits(), Ordering::Relaxed);
        }
    }

    /// Current values as a persistable state blob.
    pub fn state(&self) -> ChainState {
        ChainState::from_snapshot(&self.snapshot())
    }

    /// Apply a saved state and return how many values were taken.
    ///
    /// Unknown identifiers are skipped; identifiers missing from the state
    /// keep their current values.
    pub fn apply_state(&self, state: &ChainState) -> usize {
        if state.version > CHAIN_STATE_VERSION {
            warn!(
                "state version {} is newer than {}; applying known parameters",
                state.version, CHAIN_STATE_VERSION
            );
        }

        let mut applied = 0;
        for (key, &value) in &state.params {
            match self.set_by_id(key, value) {
                Ok(_) => applied += 1,
                Err(err) => warn!("state entry skipped: {}", err),
            }
        }
        debug!("applied {} of {} state entries", applied, state.params.len());
        applied
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}
