use thiserror::Error;

/// Errors raised outside the realtime path (preparation and parameter I/O).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    #[error("Invalid maximum block size: {0}")]
    InvalidBlockSize(usize),

    #[error("Unsupported channel layout: {inputs} in, {outputs} out")]
    UnsupportedChannelLayout { inputs: usize, outputs: usize },

    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Non-finite value {value} for parameter {id}")]
    NonFiniteValue { id: String, value: f32 },
}

pub type Result<T> = std::result::Result<T, ChainError>;
