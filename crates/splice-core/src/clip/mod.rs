//! Decoded audio clips
//!
//! An [`AudioClip`] is the fixed-shape record the decoder hands over: a name,
//! a native sample rate and one sample array per channel. Clips are validated
//! on construction so the merger never sees a clip without channels or with
//! ragged channel arrays.

mod error;
mod set;

pub use error::{ClipError, ClipSetError};
pub use set::ClipSet;

use crate::types::Sample;

/// A decoded audio clip
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    name: String,
    sample_rate: u32,
    channels: Vec<Vec<Sample>>,
    frame_count: usize,
}

impl AudioClip {
    /// Create a clip from planar channel data
    ///
    /// All channels must have the same length; that length becomes the
    /// clip's frame count.
    pub fn new(
        name: impl Into<String>,
        sample_rate: u32,
        channels: Vec<Vec<Sample>>,
    ) -> Result<Self, ClipError> {
        let name = name.into();

        if sample_rate == 0 {
            return Err(ClipError::InvalidSampleRate { name });
        }

        let frame_count = match channels.first() {
            Some(first) => first.len(),
            None => return Err(ClipError::NoChannels { name }),
        };

        if let Some((channel, data)) = channels
            .iter()
            .enumerate()
            .find(|(_, data)| data.len() != frame_count)
        {
            return Err(ClipError::ChannelLengthMismatch {
                name,
                channel,
                expected: frame_count,
                found: data.len(),
            });
        }

        Ok(Self {
            name,
            sample_rate,
            channels,
            frame_count,
        })
    }

    /// Create a clip from interleaved samples
    ///
    /// The sample count must be a whole number of frames.
    pub fn from_interleaved(
        name: impl Into<String>,
        sample_rate: u32,
        channel_count: usize,
        interleaved: &[Sample],
    ) -> Result<Self, ClipError> {
        let name = name.into();
        if channel_count == 0 {
            return Err(ClipError::NoChannels { name });
        }
        if interleaved.len() % channel_count != 0 {
            return Err(ClipError::PartialFrame {
                name,
                samples: interleaved.len(),
                channels: channel_count,
            });
        }

        let frames = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        Self::new(name, sample_rate, channels)
    }

    /// Identifying name (usually the source file name, extension included)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name with its trailing file extension removed, used for cue labels
    pub fn label(&self) -> &str {
        strip_extension(&self.name)
    }

    /// Native sample rate reported by the decoder
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels in the source
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Get a channel's samples, if the clip has that channel
    pub fn channel(&self, index: usize) -> Option<&[Sample]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// Duration at the clip's native rate
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }
}

/// Remove a trailing `.ext` suffix from a file name
///
/// Only the last extension goes (`"set.tar.gz"` → `"set.tar"`). A dot with
/// nothing after it, or a suffix containing a path separator, is left alone.
/// A name that is only an extension (`".wav"`) strips to the empty string.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => {
            let suffix = &name[dot + 1..];
            if suffix.is_empty() || suffix.contains('/') {
                name
            } else {
                &name[..dot]
            }
        }
        None => name,
    }
}

/// Format a duration as `m:ss`
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_frame_count_from_channels() {
        let clip = AudioClip::new("a.wav", 44100, vec![vec![0.0; 10], vec![0.5; 10]]).unwrap();
        assert_eq!(clip.frame_count(), 10);
        assert_eq!(clip.channel_count(), 2);
        assert_eq!(clip.channel(1).unwrap()[0], 0.5);
        assert!(clip.channel(2).is_none());
    }

    #[test]
    fn test_clip_rejects_ragged_channels() {
        let err = AudioClip::new("bad.wav", 48000, vec![vec![0.0; 10], vec![0.0; 9]]).unwrap_err();
        assert_eq!(
            err,
            ClipError::ChannelLengthMismatch {
                name: "bad.wav".to_string(),
                channel: 1,
                expected: 10,
                found: 9,
            }
        );
    }

    #[test]
    fn test_clip_rejects_missing_channels_and_rate() {
        assert!(matches!(
            AudioClip::new("x", 48000, Vec::new()),
            Err(ClipError::NoChannels { .. })
        ));
        assert!(matches!(
            AudioClip::new("x", 0, vec![vec![0.0]]),
            Err(ClipError::InvalidSampleRate { .. })
        ));
    }

    #[test]
    fn test_from_interleaved_deinterleaves() {
        let clip = AudioClip::from_interleaved("x", 48000, 2, &[1.0, -1.0, 2.0, -2.0]).unwrap();
        assert_eq!(clip.channel(0).unwrap(), &[1.0, 2.0]);
        assert_eq!(clip.channel(1).unwrap(), &[-1.0, -2.0]);
    }

    #[test]
    fn test_from_interleaved_rejects_partial_frame() {
        let err = AudioClip::from_interleaved("odd.wav", 48000, 2, &[1.0, -1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ClipError::PartialFrame {
                name: "odd.wav".to_string(),
                samples: 3,
                channels: 2,
            }
        );
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("a.mp3"), "a");
        assert_eq!(strip_extension("set.tar.gz"), "set.tar");
        assert_eq!(strip_extension("no_extension"), "no_extension");
        assert_eq!(strip_extension("trailing."), "trailing.");
        assert_eq!(strip_extension(".wav"), "");
        assert_eq!(strip_extension("dir.d/file"), "dir.d/file");
        assert_eq!(strip_extension("Café — Intro!.flac"), "Café — Intro!");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(9.99), "0:09");
        assert_eq!(format_duration(61.5), "1:01");
        assert_eq!(format_duration(3600.0), "60:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
    }

    #[test]
    fn test_duration_seconds() {
        let clip = AudioClip::new("a", 48000, vec![vec![0.0; 96000]]).unwrap();
        assert!((clip.duration_seconds() - 2.0).abs() < 1e-9);
        assert_eq!(clip.label(), "a");
    }
}
