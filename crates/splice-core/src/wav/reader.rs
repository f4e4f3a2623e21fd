//! Container reader
//!
//! Walks the RIFF chunk list of an in-memory WAV file and collects the fmt
//! fields, cue points with their adtl labels, and the decoded samples.

use std::collections::HashMap;
use std::path::Path;

use super::error::ParseError;
use super::{FORMAT_IEEE_FLOAT, FORMAT_PCM};

/// Audio format information from the fmt chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Audio format tag (1 = PCM, 3 = IEEE float)
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    /// Bytes per sample frame (channels * bits_per_sample / 8)
    pub block_align: u16,
    pub bits_per_sample: u16,
}

/// A cue point joined with its label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCue {
    /// 1-based identifier from the cue chunk
    pub id: u32,
    /// Frame position (dwSampleOffset)
    pub frame_position: u32,
    /// Label from the matching labl record, if any
    pub label: Option<String>,
}

/// A parsed WAV container
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedWav {
    /// Value of the RIFF size field
    pub riff_size: u32,
    /// Chunk ids in file order
    pub chunk_ids: Vec<String>,
    pub format: AudioFormat,
    /// Cue points in cue-chunk order
    pub cues: Vec<ParsedCue>,
    /// Interleaved samples converted to f32
    pub samples: Vec<f32>,
}

impl ParsedWav {
    /// Number of sample frames in the data chunk
    pub fn frame_count(&self) -> usize {
        if self.format.channels == 0 {
            0
        } else {
            self.samples.len() / self.format.channels as usize
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / self.format.sample_rate as f64
    }

    pub fn has_chunk(&self, id: &str) -> bool {
        self.chunk_ids.iter().any(|c| c == id)
    }
}

/// Read and parse a WAV file from disk
pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ParsedWav> {
    use anyhow::Context;

    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let parsed = parse(&bytes).with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(parsed)
}

/// Parse an in-memory WAV container
pub fn parse(bytes: &[u8]) -> Result<ParsedWav, ParseError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" {
        return Err(ParseError::NotRiff);
    }
    if &bytes[8..12] != b"WAVE" {
        return Err(ParseError::NotWave);
    }
    let riff_size = read_u32(bytes, 4);

    let mut chunk_ids = Vec::new();
    let mut format: Option<AudioFormat> = None;
    let mut data: Option<&[u8]> = None;
    let mut cue_points: Vec<(u32, u32)> = Vec::new(); // id, position
    let mut labels: HashMap<u32, String> = HashMap::new();

    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = read_u32(bytes, pos + 4) as usize;
        let name = String::from_utf8_lossy(id).into_owned();

        let body_start = pos + 8;
        let body_end = body_start
            .checked_add(size)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| ParseError::Truncated { chunk: name.clone() })?;
        let body = &bytes[body_start..body_end];

        match id {
            b"fmt " => format = Some(parse_fmt(body)?),
            b"cue " => cue_points = parse_cue(body)?,
            b"LIST" => parse_list(body, &mut labels),
            b"data" => data = Some(body),
            _ => log::debug!("parse: skipping '{}' chunk ({} bytes)", name, size),
        }
        chunk_ids.push(name);

        // Pad to word boundary
        pos = body_end + size % 2;
    }

    let format = format.ok_or(ParseError::MissingChunk("fmt"))?;
    let data = data.ok_or(ParseError::MissingChunk("data"))?;
    let samples = decode_samples(&format, data)?;

    let cues = cue_points
        .into_iter()
        .map(|(id, frame_position)| ParsedCue {
            id,
            frame_position,
            label: labels.remove(&id),
        })
        .collect();

    Ok(ParsedWav {
        riff_size,
        chunk_ids,
        format,
        cues,
        samples,
    })
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn parse_fmt(body: &[u8]) -> Result<AudioFormat, ParseError> {
    if body.len() < 16 {
        return Err(ParseError::Corrupted("fmt chunk too small".into()));
    }

    Ok(AudioFormat {
        format_tag: read_u16(body, 0),
        channels: read_u16(body, 2),
        sample_rate: read_u32(body, 4),
        byte_rate: read_u32(body, 8),
        block_align: read_u16(body, 12),
        bits_per_sample: read_u16(body, 14),
    })
}

fn parse_cue(body: &[u8]) -> Result<Vec<(u32, u32)>, ParseError> {
    if body.len() < 4 {
        return Err(ParseError::Corrupted("cue chunk too small".into()));
    }

    let count = read_u32(body, 0) as usize;
    let records = &body[4..];
    if records.len() / 24 < count {
        return Err(ParseError::Corrupted(format!(
            "cue chunk declares {} points but holds {}",
            count,
            records.len() / 24
        )));
    }

    // Sample offset (last field) is the position readers honour
    Ok(records
        .chunks_exact(24)
        .take(count)
        .map(|record| (read_u32(record, 0), read_u32(record, 20)))
        .collect())
}

fn parse_list(body: &[u8], labels: &mut HashMap<u32, String>) {
    if body.len() < 4 || &body[0..4] != b"adtl" {
        return;
    }

    let mut pos = 4;
    while pos + 8 <= body.len() {
        let sub_id = &body[pos..pos + 4];
        let sub_size = read_u32(body, pos + 4) as usize;
        let start = pos + 8;
        let Some(end) = start.checked_add(sub_size).filter(|&end| end <= body.len()) else {
            log::warn!("parse: truncated adtl sub-chunk at offset {}", pos);
            break;
        };

        if sub_id == b"labl" && sub_size >= 4 {
            let cue_id = read_u32(body, start);
            let text = &body[start + 4..end];
            let text_end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
            labels.insert(cue_id, String::from_utf8_lossy(&text[..text_end]).into_owned());
        }

        pos = end + sub_size % 2;
    }
}

fn decode_samples(format: &AudioFormat, data: &[u8]) -> Result<Vec<f32>, ParseError> {
    let unsupported = || ParseError::UnsupportedFormat {
        format_tag: format.format_tag,
        bits_per_sample: format.bits_per_sample,
    };

    match (format.format_tag, format.bits_per_sample) {
        (FORMAT_IEEE_FLOAT, 32) => Ok(data
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect()),
        (FORMAT_PCM, 16) => {
            const SCALE: f32 = 1.0 / 32768.0;
            Ok(data
                .chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 * SCALE)
                .collect())
        }
        (FORMAT_PCM, 24) => {
            const SCALE: f32 = 1.0 / 8388608.0; // 2^23
            Ok(data
                .chunks_exact(3)
                .map(|b| {
                    // Sign-extend by placing the 24 bits at the top of an i32
                    let val = i32::from_le_bytes([0, b[0], b[1], b[2]]) >> 8;
                    val as f32 * SCALE
                })
                .collect())
        }
        _ => Err(unsupported()),
    }
}
