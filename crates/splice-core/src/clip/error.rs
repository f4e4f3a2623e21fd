//! Clip error types

use thiserror::Error;

/// Errors raised when building an [`AudioClip`](super::AudioClip)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    /// Decoder produced no channels at all
    #[error("Clip '{name}' has no channels")]
    NoChannels { name: String },

    /// Channel arrays disagree on length
    #[error("Clip '{name}': channel {channel} has {found} samples, expected {expected}")]
    ChannelLengthMismatch {
        name: String,
        channel: usize,
        expected: usize,
        found: usize,
    },

    /// Interleaved input does not divide into whole frames
    #[error("Clip '{name}': {samples} interleaved samples do not divide into {channels} channels")]
    PartialFrame {
        name: String,
        samples: usize,
        channels: usize,
    },

    /// Sample rate of zero
    #[error("Clip '{name}' has an invalid sample rate of 0 Hz")]
    InvalidSampleRate { name: String },
}

/// Errors raised by [`ClipSet`](super::ClipSet) edits
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipSetError {
    #[error("Clip index {index} out of range (set has {len} clips)")]
    IndexOutOfRange { index: usize, len: usize },
}
