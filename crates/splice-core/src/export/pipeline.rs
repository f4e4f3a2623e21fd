//! Synchronous merge → encode pipeline

use std::sync::atomic::{AtomicBool, Ordering};

use super::{ExportError, ExportProgress, ProgressBudget, Result};
use crate::clip::AudioClip;
use crate::merge::{CuePoint, Merger};
use crate::wav;

/// Default name for the exported file
pub const DEFAULT_FILE_NAME: &str = "merged_audio.wav";

/// An encoded export, ready for a sink
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub frame_count: usize,
    pub cues: Vec<CuePoint>,
}

/// Merge and encode `clips`, reporting progress to `on_progress`
///
/// Emits `ClipMerged` after each clip and `Encoding` before the container is
/// built. `Started` and the terminal message belong to the caller.
pub fn export_clips<F>(
    clips: &[AudioClip],
    file_name: &str,
    budget: &ProgressBudget,
    on_progress: F,
) -> Result<ExportArtifact>
where
    F: FnMut(ExportProgress),
{
    run(clips, file_name, budget, None, on_progress)
}

/// Pipeline body; `cancel` is checked before each clip and before encoding
pub(crate) fn run<F>(
    clips: &[AudioClip],
    file_name: &str,
    budget: &ProgressBudget,
    cancel: Option<&AtomicBool>,
    mut on_progress: F,
) -> Result<ExportArtifact>
where
    F: FnMut(ExportProgress),
{
    let cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));

    let mut merger = Merger::new(clips)?;
    let total_clips = merger.total_clips();

    while !merger.is_finished() {
        if cancelled() {
            return Err(ExportError::Cancelled);
        }
        let name = merger.next_clip_name().unwrap_or_default();
        let clip_index = merger.clips_merged();
        let Some(fraction) = merger.step() else {
            break;
        };
        on_progress(ExportProgress::ClipMerged {
            name: name.to_string(),
            clip_index,
            total_clips,
            progress: budget.merge(fraction),
        });
    }

    if cancelled() {
        return Err(ExportError::Cancelled);
    }

    let (audio, cues) = merger.finish();
    on_progress(ExportProgress::Encoding {
        frame_count: audio.frame_count(),
        cue_count: cues.len(),
        progress: budget.encode(),
    });

    let bytes = wav::encode(&audio, &cues)?;
    log::info!(
        "export: {} clips → {} ({} frames, {:.1}s, {} bytes)",
        total_clips,
        file_name,
        audio.frame_count(),
        audio.duration_seconds(),
        bytes.len()
    );

    Ok(ExportArtifact {
        file_name: file_name.to_string(),
        bytes,
        frame_count: audio.frame_count(),
        cues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergeError;
    use crate::types::SAMPLE_RATE;

    fn clips() -> Vec<AudioClip> {
        vec![
            AudioClip::new("intro.wav", SAMPLE_RATE, vec![vec![0.1; 10]]).unwrap(),
            AudioClip::new("verse.mp3", SAMPLE_RATE, vec![vec![0.2; 5], vec![0.3; 5]]).unwrap(),
        ]
    }

    #[test]
    fn test_export_clips_reports_progress_in_order() {
        let mut messages = Vec::new();
        let artifact = export_clips(&clips(), DEFAULT_FILE_NAME, &ProgressBudget::default(), |m| {
            messages.push(m)
        })
        .unwrap();

        let fractions: Vec<f32> = messages.iter().filter_map(|m| m.progress_fraction()).collect();
        assert_eq!(fractions, [0.25, 0.5, 0.6]);
        assert!(matches!(&messages[0], ExportProgress::ClipMerged { name, .. } if name == "intro.wav"));
        assert!(matches!(messages[2], ExportProgress::Encoding { frame_count: 15, cue_count: 2, .. }));

        assert_eq!(artifact.file_name, "merged_audio.wav");
        assert_eq!(artifact.frame_count, 15);
        assert_eq!(artifact.cues[1], CuePoint::new(10, "verse"));
        assert_eq!(&artifact.bytes[0..4], b"RIFF");
    }

    #[test]
    fn test_export_clips_empty_input() {
        let err = export_clips(&[], DEFAULT_FILE_NAME, &ProgressBudget::default(), |_| {}).unwrap_err();
        assert!(matches!(err, ExportError::Merge(MergeError::EmptyInput)));
    }

    #[test]
    fn test_cancelled_before_first_clip() {
        let flag = AtomicBool::new(true);
        let mut messages = Vec::new();
        let err = run(&clips(), DEFAULT_FILE_NAME, &ProgressBudget::default(), Some(&flag), |m| {
            messages.push(m)
        })
        .unwrap_err();

        assert!(matches!(err, ExportError::Cancelled));
        assert!(messages.is_empty());
    }

    #[test]
    fn test_cancel_between_clips_discards_partial_merge() {
        let flag = AtomicBool::new(false);
        let mut messages = Vec::new();
        let err = run(&clips(), DEFAULT_FILE_NAME, &ProgressBudget::default(), Some(&flag), |m| {
            if matches!(m, ExportProgress::ClipMerged { .. }) {
                flag.store(true, Ordering::Relaxed);
            }
            messages.push(m);
        })
        .unwrap_err();

        assert!(matches!(err, ExportError::Cancelled));
        assert_eq!(messages.len(), 1);
        assert!(matches!(&messages[0], ExportProgress::ClipMerged { clip_index: 0, .. }));
        assert!(!messages.iter().any(|m| matches!(m, ExportProgress::Encoding { .. })));
    }
}
