//! Container encoder
//!
//! Sizes are computed once up front in [`ContainerLayout`] and every size
//! field is written from it, so declared and actual lengths cannot drift.

use std::borrow::Cow;
use std::io::Write;

use super::error::EncodeError;
use super::{CUE_RECORD_SIZE, FORMAT_IEEE_FLOAT, MIN_HEADER_SIZE};
use crate::merge::{CuePoint, MergedAudio};
use crate::types::BITS_PER_SAMPLE;

/// Samples converted per write call when streaming the data chunk
const WRITE_BLOCK_SAMPLES: usize = 4096;

/// Byte sizes of every chunk in an encoded container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerLayout {
    /// Body size of the data chunk
    pub data_size: u64,
    /// Body size of the cue chunk (0 when omitted)
    pub cue_chunk_size: u64,
    /// Body size of the LIST/adtl chunk (0 when omitted)
    pub list_chunk_size: u64,
    /// Total bytes written, headers included
    pub total_size: u64,
}

impl ContainerLayout {
    /// Compute the layout for `audio` with `cues`
    pub fn new(audio: &MergedAudio, cues: &[CuePoint]) -> Result<Self, EncodeError> {
        let bytes_per_frame = block_align(audio) as u64;
        let data_size = audio.frame_count() as u64 * bytes_per_frame;

        let (cue_chunk_size, list_chunk_size) = if cues.is_empty() {
            (0, 0)
        } else {
            let cue = 4 + cues.len() as u64 * CUE_RECORD_SIZE;
            let list = 4 + cues
                .iter()
                .enumerate()
                .map(|(i, cue)| 8 + label_record_size(&cue_label(cue, i)))
                .sum::<u64>();
            (cue, list)
        };

        let mut total_size = MIN_HEADER_SIZE + data_size;
        if !cues.is_empty() {
            total_size += 8 + cue_chunk_size + 8 + list_chunk_size;
        }

        if total_size - 8 > u32::MAX as u64 {
            return Err(EncodeError::ContainerTooLarge { bytes: total_size });
        }

        Ok(Self {
            data_size,
            cue_chunk_size,
            list_chunk_size,
            total_size,
        })
    }

    /// Value of the RIFF size field
    pub fn riff_size(&self) -> u32 {
        (self.total_size - 8) as u32
    }

    pub fn has_cues(&self) -> bool {
        self.cue_chunk_size > 0
    }
}

/// Label written for cue `index` (0-based)
///
/// NUL bytes are dropped since labl text is NUL-terminated. A label that is
/// empty afterwards becomes `Cue N`.
pub fn cue_label(cue: &CuePoint, index: usize) -> Cow<'_, str> {
    let label: Cow<'_, str> = if cue.label.contains('\0') {
        Cow::Owned(cue.label.replace('\0', ""))
    } else {
        Cow::Borrowed(&cue.label)
    };

    if label.is_empty() {
        Cow::Owned(format!("Cue {}", index + 1))
    } else {
        label
    }
}

/// Body size of a labl record: cue id + text + NUL, padded to even
fn label_record_size(label: &str) -> u64 {
    let text = label.len() as u64 + 1;
    4 + text + text % 2
}

fn block_align(audio: &MergedAudio) -> u16 {
    audio.channel_count() * (BITS_PER_SAMPLE / 8)
}

fn validate_cues(audio: &MergedAudio, cues: &[CuePoint]) -> Result<(), EncodeError> {
    let frame_count = audio.frame_count() as u64;
    match cues
        .iter()
        .enumerate()
        .find(|(_, cue)| cue.frame_position > frame_count)
    {
        Some((index, cue)) => {
            log::error!(
                "encode: cue {} at frame {} is past the end of {} frames",
                index,
                cue.frame_position,
                frame_count
            );
            Err(EncodeError::CuePositionOutOfRange {
                index,
                position: cue.frame_position,
                frame_count,
            })
        }
        None => Ok(()),
    }
}

/// Encode merged audio and cues into a complete container
///
/// Identical inputs always produce identical bytes.
pub fn encode(audio: &MergedAudio, cues: &[CuePoint]) -> Result<Vec<u8>, EncodeError> {
    validate_cues(audio, cues)?;
    let layout = ContainerLayout::new(audio, cues)?;

    let mut out = Vec::new();
    out.try_reserve_exact(layout.total_size as usize)
        .map_err(|_| EncodeError::Allocation {
            bytes: layout.total_size,
        })?;

    write_container(&mut out, audio, cues, &layout)?;
    debug_assert_eq!(out.len() as u64, layout.total_size);

    Ok(out)
}

/// Stream the container to `writer`
///
/// Returns the layout that was written. Cues are validated before the first
/// byte goes out.
pub fn write_wav<W: Write>(
    writer: &mut W,
    audio: &MergedAudio,
    cues: &[CuePoint],
) -> Result<ContainerLayout, EncodeError> {
    validate_cues(audio, cues)?;
    let layout = ContainerLayout::new(audio, cues)?;
    write_container(writer, audio, cues, &layout)?;
    Ok(layout)
}

fn write_container<W: Write>(
    writer: &mut W,
    audio: &MergedAudio,
    cues: &[CuePoint],
    layout: &ContainerLayout,
) -> Result<(), EncodeError> {
    log::debug!(
        "encode: {} frames, {} cues, {} bytes",
        audio.frame_count(),
        cues.len(),
        layout.total_size
    );

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&layout.riff_size().to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    write_fmt_chunk(writer, audio)?;

    if layout.has_cues() {
        write_cue_chunk(writer, cues, layout.cue_chunk_size as u32)?;
        write_adtl_chunk(writer, cues, layout.list_chunk_size as u32)?;
    }

    // Data chunk
    writer.write_all(b"data")?;
    writer.write_all(&(layout.data_size as u32).to_le_bytes())?;

    let mut block = Vec::with_capacity(WRITE_BLOCK_SAMPLES * 4);
    for samples in audio.interleaved().chunks(WRITE_BLOCK_SAMPLES) {
        block.clear();
        for sample in samples {
            block.extend_from_slice(&sample.to_le_bytes());
        }
        writer.write_all(&block)?;
    }

    Ok(())
}

fn write_fmt_chunk<W: Write>(writer: &mut W, audio: &MergedAudio) -> Result<(), EncodeError> {
    let channels = audio.channel_count();
    let sample_rate = audio.sample_rate();
    let block_align = block_align(audio);
    let byte_rate = sample_rate * block_align as u32;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&FORMAT_IEEE_FLOAT.to_le_bytes())?;
    writer.write_all(&channels.to_le_bytes())?;
    writer.write_all(&sample_rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&BITS_PER_SAMPLE.to_le_bytes())?;
    Ok(())
}

fn write_cue_chunk<W: Write>(
    writer: &mut W,
    cues: &[CuePoint],
    chunk_size: u32,
) -> Result<(), EncodeError> {
    writer.write_all(b"cue ")?;
    writer.write_all(&chunk_size.to_le_bytes())?;
    writer.write_all(&(cues.len() as u32).to_le_bytes())?;

    for (i, cue) in cues.iter().enumerate() {
        // Fits: positions are bounded by the frame count, which the layout
        // already held under the 32-bit limit
        let position = cue.frame_position as u32;

        writer.write_all(&(i as u32 + 1).to_le_bytes())?; // dwIdentifier
        writer.write_all(&position.to_le_bytes())?; // dwPosition
        writer.write_all(b"data")?; // fccChunk
        writer.write_all(&0u32.to_le_bytes())?; // dwChunkStart
        writer.write_all(&0u32.to_le_bytes())?; // dwBlockStart
        writer.write_all(&position.to_le_bytes())?; // dwSampleOffset
    }

    Ok(())
}

fn write_adtl_chunk<W: Write>(
    writer: &mut W,
    cues: &[CuePoint],
    chunk_size: u32,
) -> Result<(), EncodeError> {
    writer.write_all(b"LIST")?;
    writer.write_all(&chunk_size.to_le_bytes())?;
    writer.write_all(b"adtl")?;

    for (i, cue) in cues.iter().enumerate() {
        let label = cue_label(cue, i);
        let text = label.as_bytes();

        writer.write_all(b"labl")?;
        writer.write_all(&(label_record_size(&label) as u32).to_le_bytes())?;
        writer.write_all(&(i as u32 + 1).to_le_bytes())?;
        writer.write_all(text)?;
        writer.write_all(&[0])?;

        if (text.len() + 1) % 2 == 1 {
            writer.write_all(&[0])?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StereoBuffer;

    fn audio(frames: usize) -> MergedAudio {
        let interleaved: Vec<f32> = (0..frames * 2).map(|i| (i as f32 * 0.01).sin()).collect();
        MergedAudio::new(StereoBuffer::from_interleaved(&interleaved))
    }

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn contains(bytes: &[u8], tag: &[u8]) -> bool {
        bytes.windows(tag.len()).any(|w| w == tag)
    }

    #[test]
    fn test_no_cues_gives_minimal_container() {
        let audio = audio(100);
        let bytes = encode(&audio, &[]).unwrap();

        assert_eq!(bytes.len(), 44 + 100 * 2 * 4);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(u32_at(&bytes, 40), 800);
        assert!(!contains(&bytes[..44], b"cue "));
        assert!(!contains(&bytes[..44], b"LIST"));
    }

    #[test]
    fn test_exact_bytes_for_one_frame_one_cue() {
        let audio = MergedAudio::new(StereoBuffer::from_interleaved(&[0.5, -0.25]));
        let bytes = encode(&audio, &[CuePoint::new(0, "a")]).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"RIFF");
        expected.extend_from_slice(&106u32.to_le_bytes());
        expected.extend_from_slice(b"WAVE");

        expected.extend_from_slice(b"fmt ");
        expected.extend_from_slice(&16u32.to_le_bytes());
        expected.extend_from_slice(&3u16.to_le_bytes());
        expected.extend_from_slice(&2u16.to_le_bytes());
        expected.extend_from_slice(&48000u32.to_le_bytes());
        expected.extend_from_slice(&384000u32.to_le_bytes());
        expected.extend_from_slice(&8u16.to_le_bytes());
        expected.extend_from_slice(&32u16.to_le_bytes());

        expected.extend_from_slice(b"cue ");
        expected.extend_from_slice(&28u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(b"data");
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes());

        expected.extend_from_slice(b"LIST");
        expected.extend_from_slice(&18u32.to_le_bytes());
        expected.extend_from_slice(b"adtl");
        expected.extend_from_slice(b"labl");
        expected.extend_from_slice(&6u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(b"a\0");

        expected.extend_from_slice(b"data");
        expected.extend_from_slice(&8u32.to_le_bytes());
        expected.extend_from_slice(&0.5f32.to_le_bytes());
        expected.extend_from_slice(&(-0.25f32).to_le_bytes());

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_riff_size_is_length_minus_eight() {
        let audio = audio(37);
        for cues in [
            vec![],
            vec![CuePoint::new(0, "x")],
            vec![CuePoint::new(0, "intro"), CuePoint::new(10, "b"), CuePoint::new(36, "")],
        ] {
            let bytes = encode(&audio, &cues).unwrap();
            assert_eq!(u32_at(&bytes, 4) as usize, bytes.len() - 8);
            assert_eq!(
                ContainerLayout::new(&audio, &cues).unwrap().total_size,
                bytes.len() as u64
            );
        }
    }

    #[test]
    fn test_label_records_are_padded_even() {
        assert_eq!(label_record_size("a"), 6);
        assert_eq!(label_record_size("ab"), 8);
        assert_eq!(label_record_size("é"), 8);
        assert_eq!(label_record_size("Café"), 10);
    }

    #[test]
    fn test_empty_label_defaults_to_cue_number() {
        let cues = [CuePoint::new(0, "first"), CuePoint::new(1, "")];
        assert_eq!(cue_label(&cues[0], 0), "first");
        assert_eq!(cue_label(&cues[1], 1), "Cue 2");

        let bytes = encode(&audio(2), &cues).unwrap();
        assert!(contains(&bytes, b"Cue 2\0"));
    }

    #[test]
    fn test_nul_bytes_are_dropped_from_labels() {
        let cues = [CuePoint::new(0, "a\0b"), CuePoint::new(1, "\0")];
        assert_eq!(cue_label(&cues[0], 0), "ab");
        assert_eq!(cue_label(&cues[1], 1), "Cue 2");

        let bytes = encode(&audio(2), &cues).unwrap();
        assert!(contains(&bytes, b"ab\0"));
        assert_eq!(u32_at(&bytes, 4) as usize, bytes.len() - 8);

        let parsed = crate::wav::parse(&bytes).unwrap();
        assert_eq!(parsed.cues[0].label.as_deref(), Some("ab"));
        assert_eq!(parsed.cues[1].label.as_deref(), Some("Cue 2"));
    }

    #[test]
    fn test_deterministic() {
        let audio = audio(64);
        let cues = [CuePoint::new(0, "a"), CuePoint::new(32, "b")];
        assert_eq!(encode(&audio, &cues).unwrap(), encode(&audio, &cues).unwrap());
    }

    #[test]
    fn test_cue_past_end_is_rejected() {
        let err = encode(&audio(10), &[CuePoint::new(0, "a"), CuePoint::new(11, "b")]).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::CuePositionOutOfRange {
                index: 1,
                position: 11,
                frame_count: 10
            }
        ));
    }

    #[test]
    fn test_cue_at_frame_count_is_accepted() {
        let audio = audio(10);
        let bytes = encode(&audio, &[CuePoint::new(0, "a"), CuePoint::new(10, "end")]).unwrap();

        let parsed = crate::wav::parse(&bytes).unwrap();
        assert_eq!(parsed.frame_count(), 10);
        assert_eq!(parsed.cues[1].frame_position, 10);
        assert_eq!(parsed.cues[1].label.as_deref(), Some("end"));
    }

    #[test]
    fn test_write_wav_matches_encode() {
        let audio = audio(5000);
        let cues = [CuePoint::new(0, "a"), CuePoint::new(2500, "b")];

        let mut streamed = Vec::new();
        let layout = write_wav(&mut streamed, &audio, &cues).unwrap();

        assert_eq!(streamed.len() as u64, layout.total_size);
        assert_eq!(streamed, encode(&audio, &cues).unwrap());
    }

    #[test]
    fn test_hound_reads_encoded_output() {
        let audio = audio(300);
        let cues = [CuePoint::new(0, "one"), CuePoint::new(150, "two")];
        let bytes = encode(&audio, &cues).unwrap();

        let mut reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.sample_format, hound::SampleFormat::Float);

        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, audio.interleaved());
    }
}
