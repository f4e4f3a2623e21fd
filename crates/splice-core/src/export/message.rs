//! Export progress messages
//!
//! Sent from the export worker to the caller over a crossbeam channel:
//!
//! Started → ClipMerged × N → Encoding → Complete / Failed / Cancelled

use std::time::Duration;

/// Splits overall export progress between the merge and encode phases
///
/// Merge fractions map onto `[0, merge_share]`, encoding is announced at
/// `encode_mark`, delivery completes at `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBudget {
    merge_share: f32,
    encode_mark: f32,
}

impl ProgressBudget {
    /// Clamps so that `0 <= merge_share <= encode_mark <= 1`
    pub fn new(merge_share: f32, encode_mark: f32) -> Self {
        let merge_share = sanitize(merge_share).clamp(0.0, 1.0);
        let encode_mark = sanitize(encode_mark).clamp(merge_share, 1.0);
        Self {
            merge_share,
            encode_mark,
        }
    }

    /// Overall progress after the merger reported `fraction`
    pub fn merge(&self, fraction: f32) -> f32 {
        sanitize(fraction).clamp(0.0, 1.0) * self.merge_share
    }

    /// Overall progress when encoding starts
    pub fn encode(&self) -> f32 {
        self.encode_mark
    }
}

impl Default for ProgressBudget {
    fn default() -> Self {
        Self::new(0.5, 0.6)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Progress messages for a merge-and-encode export
#[derive(Debug, Clone, PartialEq)]
pub enum ExportProgress {
    /// Export started
    Started {
        total_clips: usize,
        /// Sum of clip frame counts
        total_frames: u64,
    },

    /// A clip was copied into the merged buffer
    ClipMerged {
        name: String,
        /// Index in merge order (0-based)
        clip_index: usize,
        total_clips: usize,
        /// Overall export progress (0.0 to 1.0)
        progress: f32,
    },

    /// Merge finished, container encoding started
    Encoding {
        frame_count: usize,
        cue_count: usize,
        /// Overall export progress (0.0 to 1.0)
        progress: f32,
    },

    /// Container encoded and handed to the sink
    Complete {
        file_name: String,
        /// Encoded size in bytes
        bytes: u64,
        cue_count: usize,
        duration: Duration,
    },

    /// Export failed; nothing was delivered
    Failed { error: String },

    /// Export was cancelled between clips
    Cancelled,
}

impl ExportProgress {
    /// Get a human-readable description of this progress message
    pub fn description(&self) -> String {
        match self {
            Self::Started { total_clips, .. } => {
                format!("Merging {} clips", total_clips)
            }
            Self::ClipMerged {
                name,
                clip_index,
                total_clips,
                ..
            } => format!("Merged {}/{}: {}", clip_index + 1, total_clips, name),
            Self::Encoding { cue_count, .. } => {
                format!("Encoding WAV with {} cue points", cue_count)
            }
            Self::Complete {
                file_name,
                bytes,
                duration,
                ..
            } => format!(
                "Export complete: {} ({:.1} MB) in {:.1}s",
                file_name,
                *bytes as f64 / (1024.0 * 1024.0),
                duration.as_secs_f64()
            ),
            Self::Failed { error } => format!("Export failed: {}", error),
            Self::Cancelled => "Export cancelled".to_string(),
        }
    }

    /// Check if this is a terminal message
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Complete { .. } | Self::Failed { .. } | Self::Cancelled
        )
    }

    /// Overall progress (0.0 to 1.0), where the message carries one
    pub fn progress_fraction(&self) -> Option<f32> {
        match self {
            Self::Started { .. } => Some(0.0),
            Self::ClipMerged { progress, .. } | Self::Encoding { progress, .. } => Some(*progress),
            Self::Complete { .. } => Some(1.0),
            Self::Failed { .. } | Self::Cancelled => None,
        }
    }
}
