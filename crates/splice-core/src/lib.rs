//! Splice Core - merge audio clips into one cue-marked WAV
//!
//! Clips are concatenated into a 48 kHz stereo float buffer, one cue point is
//! placed at the start of each clip, and the result is encoded as a RIFF/WAVE
//! file with `cue ` and `LIST`/`adtl` label chunks.

pub mod clip;
pub mod config;
pub mod decode;
pub mod export;
pub mod merge;
pub mod types;
pub mod wav;

pub use clip::{format_duration, strip_extension, AudioClip, ClipSet};
pub use merge::{merge, merge_with_progress, CuePoint, MergedAudio, Merger};
pub use types::*;
pub use wav::encode;
