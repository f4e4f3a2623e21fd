//! Common types for Splice
//!
//! Output format constants and the stereo buffer that holds merged audio.

use std::collections::TryReserveError;
use std::ops::Index;

/// Sample rate stamped on every merged output (48kHz)
///
/// Source clips are never resampled. A clip decoded at another rate is copied
/// as-is and plays back at this rate.
pub const SAMPLE_RATE: u32 = 48000;

/// Channel count of every merged output (stereo)
pub const OUTPUT_CHANNELS: u16 = 2;

/// Bits per encoded sample (IEEE float)
pub const BITS_PER_SAMPLE: u16 = 32;

/// Audio sample type
pub type Sample = f32;

/// A single stereo frame (left and right channels)
///
/// Uses `#[repr(C)]` so `&[StereoSample]` can be viewed as interleaved
/// `&[f32]` through bytemuck without copying.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StereoSample {
    pub left: Sample,
    pub right: Sample,
}

impl StereoSample {
    /// Create a new stereo sample
    #[inline]
    pub fn new(left: Sample, right: Sample) -> Self {
        Self { left, right }
    }
}

/// A frame-major buffer of stereo samples
///
/// Storage is interleaved `[L, R, L, R, ...]`, which is also the order the
/// container encoder writes the data chunk in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoBuffer {
    samples: Vec<StereoSample>,
}

impl StereoBuffer {
    /// Create an empty buffer with room for `frames` stereo frames
    ///
    /// Fails instead of aborting when the allocation cannot be satisfied.
    pub fn try_with_capacity(frames: usize) -> Result<Self, TryReserveError> {
        let mut samples = Vec::new();
        samples.try_reserve_exact(frames)?;
        Ok(Self { samples })
    }

    /// Get the number of stereo frames in the buffer
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get a zero-copy view of samples as interleaved f32 [L, R, L, R, ...]
    #[inline]
    pub fn as_interleaved(&self) -> &[Sample] {
        bytemuck::cast_slice(&self.samples)
    }

    /// Append the frames produced by `frames`
    ///
    /// Callers reserve capacity up front; this never reallocates when they do.
    pub fn extend<I>(&mut self, frames: I)
    where
        I: IntoIterator<Item = StereoSample>,
    {
        self.samples.extend(frames);
    }

    /// Test fixture: copy one channel (0 = left, else right) out as a planar vector
    #[cfg(test)]
    pub(crate) fn channel(&self, channel: usize) -> Vec<Sample> {
        self.samples
            .iter()
            .map(|s| if channel == 0 { s.left } else { s.right })
            .collect()
    }

    /// Test fixture: build a buffer from interleaved samples [L, R, L, R, ...]
    #[cfg(test)]
    pub(crate) fn from_interleaved(interleaved: &[Sample]) -> Self {
        let samples = interleaved
            .chunks_exact(2)
            .map(|chunk| StereoSample::new(chunk[0], chunk[1]))
            .collect();
        Self { samples }
    }
}

impl Index<usize> for StereoBuffer {
    type Output = StereoSample;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.samples[index]
    }
}
