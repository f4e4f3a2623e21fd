//! Splice - merge audio clips into one cue-marked WAV
//!
//! This is the command line front end. It:
//! 1. Decodes the given files (any format Symphonia reads)
//! 2. Applies `--move` / `--remove` edits to the clip list
//! 3. Runs the export on a background worker, printing progress
//! 4. Writes `merged_audio.wav` (or `--output`)
//!
//! `--inspect FILE` prints the format and cue list of an existing WAV.

mod args;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use args::{ClipEdit, Command, MergeArgs, USAGE};
use splice_core::config::{default_config_path, load_config, SpliceConfig};
use splice_core::decode::{load_clips, SourceFile, SymphoniaDecoder};
use splice_core::export::{DirectorySink, ExportProgress, ExportService};
use splice_core::{format_duration, wav, ClipSet};

fn main() {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let result = args::parse_args(std::env::args().skip(1)).and_then(|command| match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Inspect(path) => inspect(&path),
        Command::Merge(merge_args) => run_merge(merge_args),
    });

    if let Err(e) = result {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_merge(args: MergeArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config: SpliceConfig = load_config(&config_path);
    if let Some(output) = &args.output {
        apply_output(&mut config, output)?;
    }

    let sources = args
        .files
        .iter()
        .map(|path| SourceFile::from_path(path).with_context(|| format!("Failed to read {:?}", path)))
        .collect::<Result<Vec<_>>>()?;

    let decoder = SymphoniaDecoder::new();
    let mut clips: ClipSet = load_clips(&decoder, sources)?.into_iter().collect();
    apply_edits(&mut clips, &args.edits)?;

    if clips.is_empty() {
        bail!("No audio clips to merge");
    }

    for (index, clip) in clips.clips().iter().enumerate() {
        println!(
            "{:>3}  {:<40} {:>6}  {} Hz, {} ch",
            index,
            clip.name(),
            format_duration(clip.duration_seconds()),
            clip.sample_rate(),
            clip.channel_count()
        );
    }
    println!("     total {}", format_duration(clips.total_duration_seconds()));
    println!();

    let service = ExportService::new(&config.export);
    let sink = DirectorySink::new(config.export.output_dir.clone());
    let output_path = sink.path_for(service.file_name());
    let progress_rx = service
        .start_export(clips.clips().to_vec(), sink)
        .context("Failed to start export worker")?;

    for message in progress_rx {
        match message.progress_fraction() {
            Some(fraction) => println!("[{:>3.0}%] {}", fraction * 100.0, message.description()),
            None => println!("       {}", message.description()),
        }

        match message {
            ExportProgress::Complete { .. } => {
                println!("Wrote {}", output_path.display());
                return Ok(());
            }
            ExportProgress::Failed { error } => bail!(error),
            ExportProgress::Cancelled => bail!("Export cancelled"),
            _ => {}
        }
    }

    bail!("Export worker exited without a result")
}

/// Split `--output` into the config's directory and file name
fn apply_output(config: &mut SpliceConfig, output: &Path) -> Result<()> {
    let file_name = output
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid output path {:?}", output))?;

    config.export.output_file_name = file_name.to_string();
    config.export.output_dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(())
}

fn apply_edits(clips: &mut ClipSet, edits: &[ClipEdit]) -> Result<()> {
    for edit in edits {
        match *edit {
            ClipEdit::Move { from, to } => clips
                .reorder(from, to)
                .with_context(|| format!("Cannot move clip {} to {}", from, to))?,
            ClipEdit::Remove(index) => {
                let clip = clips
                    .remove(index)
                    .with_context(|| format!("Cannot remove clip {}", index))?;
                log::info!("Removed {}", clip.name());
            }
        }
    }
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let parsed = wav::parse_file(path)?;
    let format = &parsed.format;

    println!("{}", path.display());
    println!(
        "  format {} / {} ch / {} Hz / {} bit",
        match format.format_tag {
            wav::FORMAT_IEEE_FLOAT => "float",
            wav::FORMAT_PCM => "pcm",
            _ => "other",
        },
        format.channels,
        format.sample_rate,
        format.bits_per_sample
    );
    println!(
        "  {} frames ({}), chunks: {}",
        parsed.frame_count(),
        format_duration(parsed.duration_seconds()),
        parsed.chunk_ids.join(" ")
    );

    if !parsed.has_chunk("cue ") || parsed.cues.is_empty() {
        println!("  no cue points");
        return Ok(());
    }

    for cue in &parsed.cues {
        let seconds = if format.sample_rate == 0 {
            0.0
        } else {
            cue.frame_position as f64 / format.sample_rate as f64
        };
        println!(
            "  cue {:>3}  {:>6}  frame {:<10} {}",
            cue.id,
            format_duration(seconds),
            cue.frame_position,
            cue.label.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
