//! Decode error types

use thiserror::Error;

use crate::clip::ClipError;

/// Why a source could not be decoded
#[derive(Error, Debug)]
pub enum DecodeFailure {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("no audio track found")]
    NoAudioTrack,

    #[error("unknown sample rate")]
    UnknownSampleRate,

    #[error(transparent)]
    Codec(#[from] symphonia::core::errors::Error),

    #[error(transparent)]
    InvalidClip(#[from] ClipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A source failed to decode; carries the source's name
#[derive(Error, Debug)]
#[error("Failed to load {name}: {reason}")]
pub struct DecodeError {
    pub name: String,
    #[source]
    pub reason: DecodeFailure,
}

impl DecodeError {
    pub fn new(name: impl Into<String>, reason: impl Into<DecodeFailure>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;
