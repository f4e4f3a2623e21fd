//! Clip merging
//!
//! Concatenates an ordered list of clips into one stereo buffer and derives a
//! cue point at the start of each clip.
//!
//! - Mono clips are upmixed by copying their single channel to both sides
//! - Clips with more than two channels contribute only channels 0 and 1
//! - Samples are copied verbatim (no gain, no resampling)
//!
//! The output is always stamped [`SAMPLE_RATE`]. Clips decoded at another rate
//! are not converted, so they play back at the wrong speed.
//!
//! [`Merger`] processes one clip per [`Merger::step`], which lets a caller
//! stop between clips. [`merge`] and [`merge_with_progress`] run it to the end.

mod error;

pub use error::{MergeError, Result};

use crate::clip::AudioClip;
use crate::types::{Sample, StereoBuffer, StereoSample, OUTPUT_CHANNELS, SAMPLE_RATE};

/// A named marker at a frame of the merged output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuePoint {
    /// Frame index into the merged output
    pub frame_position: u64,
    /// Display label (may be empty; the encoder substitutes `Cue N`)
    pub label: String,
}

impl CuePoint {
    pub fn new(frame_position: u64, label: impl Into<String>) -> Self {
        Self {
            frame_position,
            label: label.into(),
        }
    }
}

/// Concatenated stereo output of a merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergedAudio {
    samples: StereoBuffer,
}

impl MergedAudio {
    /// Wrap an existing stereo buffer
    pub fn new(samples: StereoBuffer) -> Self {
        Self { samples }
    }

    /// Always [`SAMPLE_RATE`], whatever the sources were
    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Always [`OUTPUT_CHANNELS`]
    pub fn channel_count(&self) -> u16 {
        OUTPUT_CHANNELS
    }

    /// Number of stereo frames
    pub fn frame_count(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &StereoBuffer {
        &self.samples
    }

    /// Frame-major interleaved view [L, R, L, R, ...]
    pub fn interleaved(&self) -> &[Sample] {
        self.samples.as_interleaved()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / SAMPLE_RATE as f64
    }
}

/// Receives merge progress as a fraction in `[0, 1]` after each clip
pub trait ProgressSink {
    fn report(&mut self, fraction: f32);
}

impl<F: FnMut(f32)> ProgressSink for F {
    fn report(&mut self, fraction: f32) {
        self(fraction)
    }
}

/// Step-wise merge over a borrowed clip list
pub struct Merger<'a> {
    clips: &'a [AudioClip],
    buffer: StereoBuffer,
    cues: Vec<CuePoint>,
    cursor: u64,
    next: usize,
}

impl<'a> Merger<'a> {
    /// Validate the input and allocate the full output buffer
    pub fn new(clips: &'a [AudioClip]) -> Result<Self> {
        if clips.is_empty() {
            return Err(MergeError::EmptyInput);
        }

        let total_frames = clips
            .iter()
            .try_fold(0u64, |acc, clip| acc.checked_add(clip.frame_count() as u64))
            .ok_or(MergeError::Allocation { frames: u64::MAX })?;

        let capacity = usize::try_from(total_frames)
            .map_err(|_| MergeError::Allocation { frames: total_frames })?;
        let buffer = StereoBuffer::try_with_capacity(capacity)
            .map_err(|_| MergeError::Allocation { frames: total_frames })?;

        let mut cues = Vec::new();
        cues.try_reserve_exact(clips.len())
            .map_err(|_| MergeError::Allocation { frames: total_frames })?;

        log::debug!(
            "Merger: {} clips, {} total frames ({:.1}s at {} Hz)",
            clips.len(),
            total_frames,
            total_frames as f64 / SAMPLE_RATE as f64,
            SAMPLE_RATE
        );

        Ok(Self {
            clips,
            buffer,
            cues,
            cursor: 0,
            next: 0,
        })
    }

    /// Copy the next clip into the output
    ///
    /// Returns the completed fraction `(clips merged) / (total clips)`, or
    /// `None` once every clip has been merged.
    pub fn step(&mut self) -> Option<f32> {
        let clip = self.clips.get(self.next)?;

        // First cue is pinned to the start of the output
        let position = if self.next == 0 { 0 } else { self.cursor };
        self.cues.push(CuePoint::new(position, clip.label()));

        let left = clip.channel(0).unwrap_or_default();
        let right = clip.channel(1).unwrap_or(left);
        self.buffer.extend(
            left.iter()
                .zip(right)
                .map(|(&l, &r)| StereoSample::new(l, r)),
        );

        if clip.sample_rate() != SAMPLE_RATE {
            log::debug!(
                "Merger: '{}' is {} Hz, copied unconverted into {} Hz output",
                clip.name(),
                clip.sample_rate(),
                SAMPLE_RATE
            );
        }

        self.cursor += clip.frame_count() as u64;
        self.next += 1;

        Some(self.next as f32 / self.clips.len() as f32)
    }

    /// Number of clips merged so far
    pub fn clips_merged(&self) -> usize {
        self.next
    }

    pub fn total_clips(&self) -> usize {
        self.clips.len()
    }

    /// Name of the clip the next [`step`](Self::step) will merge
    pub fn next_clip_name(&self) -> Option<&'a str> {
        self.clips.get(self.next).map(AudioClip::name)
    }

    pub fn is_finished(&self) -> bool {
        self.next == self.clips.len()
    }

    /// Merge any remaining clips and hand over the result
    pub fn finish(mut self) -> (MergedAudio, Vec<CuePoint>) {
        while self.step().is_some() {}
        (MergedAudio::new(self.buffer), self.cues)
    }
}

/// Merge clips in order into one stereo buffer plus one cue per clip
pub fn merge(clips: &[AudioClip]) -> Result<(MergedAudio, Vec<CuePoint>)> {
    merge_with_progress(clips, |_| {})
}

/// Like [`merge`], reporting the completed fraction after each clip
pub fn merge_with_progress<P: ProgressSink>(
    clips: &[AudioClip],
    mut progress: P,
) -> Result<(MergedAudio, Vec<CuePoint>)> {
    let mut merger = Merger::new(clips)?;
    while let Some(fraction) = merger.step() {
        progress.report(fraction);
    }
    Ok(merger.finish())
}
