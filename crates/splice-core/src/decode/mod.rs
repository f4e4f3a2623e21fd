//! Decoder boundary
//!
//! A [`ClipDecoder`] turns raw file bytes plus a declared media type into an
//! [`AudioClip`]. [`SymphoniaDecoder`] is the bundled implementation;
//! anything else (a platform decoder, a test double) can stand in.
//!
//! [`load_clips`] is the loading step of the export workflow: it skips
//! sources whose media type is not `audio/*`, decodes the rest in parallel,
//! and returns clips in input order or the first failure in input order.

mod error;
mod symphonia_decoder;

pub use error::{DecodeError, DecodeFailure, Result};
pub use symphonia_decoder::SymphoniaDecoder;

use std::path::Path;

use rayon::prelude::*;

use crate::clip::AudioClip;

/// Raw bytes of one input file plus its declared media type
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name including extension
    pub name: String,
    /// MIME type, e.g. `audio/mpeg`
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file, deriving the media type from its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown")
            .to_string();

        Ok(Self {
            name,
            media_type: media_type_for_path(path).to_string(),
            bytes,
        })
    }

    pub fn is_audio(&self) -> bool {
        is_audio_media_type(&self.media_type)
    }

    /// Extension of `name`, if any
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name).extension().and_then(|e| e.to_str())
    }
}

/// Turns raw bytes into a validated clip
pub trait ClipDecoder: Send + Sync {
    /// Decode `source`; failures carry `source.name`
    fn decode(&self, source: SourceFile) -> Result<AudioClip>;

    /// Decoder name for logging
    fn name(&self) -> &'static str;
}

/// True for `audio/*` media types
pub fn is_audio_media_type(media_type: &str) -> bool {
    media_type.starts_with("audio/")
}

/// Guess a media type from a file extension
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("wav") | Some("wave") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("aif") | Some("aiff") => "audio/aiff",
        Some("webm") | Some("mka") => "audio/webm",
        _ => "application/octet-stream",
    }
}

/// Decode every audio source, preserving order
///
/// Non-audio sources are skipped with a warning. If any decode fails, the
/// earliest failing source (in input order) is reported and no clips are
/// returned.
pub fn load_clips<D: ClipDecoder + ?Sized>(
    decoder: &D,
    sources: Vec<SourceFile>,
) -> Result<Vec<AudioClip>> {
    let audio: Vec<SourceFile> = sources
        .into_iter()
        .filter(|source| {
            let keep = source.is_audio();
            if !keep {
                log::warn!(
                    "load_clips: skipping {} ({} is not an audio type)",
                    source.name,
                    source.media_type
                );
            }
            keep
        })
        .collect();

    log::info!("load_clips: decoding {} files with {}", audio.len(), decoder.name());

    let results: Vec<Result<AudioClip>> = audio
        .into_par_iter()
        .map(|source| decoder.decode(source))
        .collect();

    let clips = results.into_iter().collect::<Result<Vec<_>>>()?;
    for clip in &clips {
        log::debug!(
            "load_clips: {} ({} ch, {} Hz, {} frames)",
            clip.name(),
            clip.channel_count(),
            clip.sample_rate(),
            clip.frame_count()
        );
    }
    Ok(clips)
}
