//! Background export service
//!
//! Runs the merge → encode → deliver pipeline on a named worker thread and
//! streams [`ExportProgress`] back over a crossbeam channel. The channel
//! closes after the terminal message.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam::channel::{unbounded, Receiver, Sender};

use super::pipeline::{self, DEFAULT_FILE_NAME};
use super::{ExportError, ExportProgress, ExportSink, ProgressBudget};
use crate::clip::AudioClip;
use crate::config::ExportConfig;

/// Coordinates background exports
pub struct ExportService {
    /// Cancellation flag shared with the worker
    cancel_flag: Arc<AtomicBool>,
    budget: ProgressBudget,
    file_name: String,
}

impl ExportService {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            cancel_flag: Arc::new(AtomicBool::new(false)),
            budget: config.budget(),
            file_name: config.output_file_name.clone(),
        }
    }

    /// File name handed to the sink
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Start exporting a snapshot of `clips` into `sink`
    ///
    /// Returns a receiver for progress messages. The export runs in the
    /// background; poll the receiver until a terminal message arrives.
    pub fn start_export<S>(
        &self,
        clips: Vec<AudioClip>,
        mut sink: S,
    ) -> std::io::Result<Receiver<ExportProgress>>
    where
        S: ExportSink + Send + 'static,
    {
        // Reset cancellation flag
        self.cancel_flag.store(false, Ordering::SeqCst);

        let (progress_tx, progress_rx) = unbounded();
        let cancel_flag = self.cancel_flag.clone();
        let budget = self.budget;
        let file_name = self.file_name.clone();

        thread::Builder::new()
            .name("splice-export".to_string())
            .spawn(move || {
                let start_time = Instant::now();
                let total_frames: u64 = clips.iter().map(|c| c.frame_count() as u64).sum();

                let _ = progress_tx.send(ExportProgress::Started {
                    total_clips: clips.len(),
                    total_frames,
                });

                let terminal = run_export(
                    &clips,
                    &file_name,
                    &budget,
                    &cancel_flag,
                    &mut sink,
                    &progress_tx,
                    start_time,
                );
                let _ = progress_tx.send(terminal);
            })?;

        Ok(progress_rx)
    }

    /// Request cancellation; takes effect before the next clip
    pub fn cancel(&self) {
        log::info!("ExportService: cancellation requested");
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self {
            cancel_flag: Arc::new(AtomicBool::new(false)),
            budget: ProgressBudget::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

fn run_export<S: ExportSink>(
    clips: &[AudioClip],
    file_name: &str,
    budget: &ProgressBudget,
    cancel_flag: &AtomicBool,
    sink: &mut S,
    progress_tx: &Sender<ExportProgress>,
    start_time: Instant,
) -> ExportProgress {
    let result = pipeline::run(clips, file_name, budget, Some(cancel_flag), |message| {
        let _ = progress_tx.send(message);
    })
    .and_then(|artifact| {
        sink.deliver(&artifact.file_name, &artifact.bytes)
            .map_err(|source| ExportError::Delivery {
                file_name: artifact.file_name.clone(),
                source,
            })?;
        Ok(artifact)
    });

    match result {
        Ok(artifact) => ExportProgress::Complete {
            file_name: artifact.file_name,
            bytes: artifact.bytes.len() as u64,
            cue_count: artifact.cues.len(),
            duration: start_time.elapsed(),
        },
        Err(ExportError::Cancelled) => {
            log::info!("ExportService: export cancelled");
            ExportProgress::Cancelled
        }
        Err(e) => {
            log::error!("ExportService: export failed: {}", e);
            ExportProgress::Failed {
                error: e.to_string(),
            }
        }
    }
}
