//! Cue-annotated WAV container
//!
//! Layout written by [`encode`]:
//!
//! ```text
//! RIFF <size> WAVE
//! fmt  (16 bytes)     IEEE float, 2 ch, 48000 Hz, 32 bit
//! cue  (4 + 24 * N)   only when there are cues
//! LIST adtl           one labl record per cue, only when there are cues
//! data                interleaved little-endian f32 frames
//! ```
//!
//! [`parse`] reads the same layout back (plus 16/24-bit PCM for inspecting
//! other files).

mod error;
mod reader;
mod writer;

pub use error::{EncodeError, ParseError};
pub use reader::{parse, parse_file, AudioFormat, ParsedCue, ParsedWav};
pub use writer::{cue_label, encode, write_wav, ContainerLayout};

/// `WAVE_FORMAT_PCM`
pub const FORMAT_PCM: u16 = 1;

/// `WAVE_FORMAT_IEEE_FLOAT`
pub const FORMAT_IEEE_FLOAT: u16 = 3;

/// Size of the master header plus fmt and data chunk headers
pub const MIN_HEADER_SIZE: u64 = 44;

/// Size of one record in the cue chunk
pub const CUE_RECORD_SIZE: u64 = 24;
