#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{ChainError, Result},
    BUFFER_SECONDS, MAX_CHANNELS,
};

/// Prepare-time configuration handed over by the host.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    pub sample_rate: f64,
    /// Largest block `process` will ever be given
    pub max_block_size: usize,
    pub input_channels: usize,
    pub output_channels: usize,
}

impl ProcessSpec {
    pub fn new(sample_rate: f64, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            ..Self::default()
        }
    }

    pub fn with_channels(mut self, input_channels: usize, output_channels: usize) -> Self {
        self.input_channels = input_channels;
        self.output_channels = output_channels;
        self
    }

    /// Accepts mono→mono, mono→stereo and stereo→stereo.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate < 1.0 {
            return Err(ChainError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 {
            return Err(ChainError::InvalidBlockSize(self.max_block_size));
        }
        let layout_ok = (1..=MAX_CHANNELS).contains(&self.output_channels)
            && (1..=self.output_channels).contains(&self.input_channels);
        if !layout_ok {
            return Err(ChainError::UnsupportedChannelLayout {
                inputs: self.input_channels,
                outputs: self.output_channels,
            });
        }
        Ok(())
    }

    /// Delay line length for every stage: two seconds of history.
    pub fn delay_capacity(&self) -> usize {
        ((BUFFER_SECONDS * self.sample_rate).round() as usize).max(1)
    }
}

impl Default for ProcessSpec {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            max_block_size: 512,
            input_channels: 2,
            output_channels: 2,
        }
    }
}
