//! WAV container error types

use thiserror::Error;

/// Errors that can occur while encoding a container
#[derive(Error, Debug)]
pub enum EncodeError {
    /// A cue points past the end of the audio (caller bug)
    #[error("Cue {index} at frame {position} is outside the audio ({frame_count} frames)")]
    CuePositionOutOfRange {
        index: usize,
        position: u64,
        frame_count: u64,
    },

    /// Output would not fit the 32-bit RIFF size fields
    #[error("Container of {bytes} bytes exceeds the 4 GiB RIFF limit")]
    ContainerTooLarge { bytes: u64 },

    /// Output buffer could not be allocated
    #[error("Cannot allocate {bytes} bytes for the encoded container")]
    Allocation { bytes: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while parsing a container
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Not a RIFF file")]
    NotRiff,

    #[error("Not a WAVE file")]
    NotWave,

    /// A chunk header or body runs past the end of the input
    #[error("Truncated '{chunk}' chunk")]
    Truncated { chunk: String },

    #[error("Missing required chunk: {0}")]
    MissingChunk(&'static str),

    #[error("Corrupted container: {0}")]
    Corrupted(String),

    #[error("Unsupported sample format: tag {format_tag}, {bits_per_sample} bits")]
    UnsupportedFormat { format_tag: u16, bits_per_sample: u16 },
}
