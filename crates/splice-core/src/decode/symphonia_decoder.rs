//! Symphonia-backed clip decoder

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::{ClipDecoder, DecodeError, DecodeFailure, Result, SourceFile};
use crate::clip::AudioClip;

/// Decodes any format Symphonia supports (WAV, FLAC, MP3, Ogg Vorbis, AAC, ...)
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ClipDecoder for SymphoniaDecoder {
    fn decode(&self, source: SourceFile) -> Result<AudioClip> {
        let name = source.name.clone();
        decode_source(source).map_err(|reason| {
            log::warn!("SymphoniaDecoder: {} failed: {}", name, reason);
            DecodeError::new(name, reason)
        })
    }

    fn name(&self) -> &'static str {
        "Symphonia"
    }
}

fn decode_source(source: SourceFile) -> std::result::Result<AudioClip, DecodeFailure> {
    let mut hint = Hint::new();
    hint.mime_type(&source.media_type);
    if let Some(ext) = source.extension() {
        hint.with_extension(ext);
    }

    let SourceFile { name, bytes, .. } = source;
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| DecodeFailure::UnsupportedFormat(e.to_string()))?;

    let mut format = probed.format;

    // First decodable audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeFailure::NoAudioTrack)?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| DecodeFailure::UnsupportedFormat(e.to_string()))?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<(SampleBuffer<f32>, u64)> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                log::warn!("SymphoniaDecoder: {}: error reading packet: {}", name, e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("SymphoniaDecoder: {}: skipping bad packet: {}", name, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        channels.get_or_insert(spec.channels.count());
        sample_rate.get_or_insert(spec.rate);

        // (Re)size the conversion buffer when a packet outgrows it
        let frames = decoded.capacity() as u64;
        let needs_buffer = match &sample_buf {
            Some((_, capacity)) => *capacity < frames,
            None => true,
        };
        if needs_buffer {
            sample_buf = Some((SampleBuffer::new(frames, spec), frames));
        }

        if let Some((buf, _)) = sample_buf.as_mut() {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    let sample_rate = sample_rate.ok_or(DecodeFailure::UnknownSampleRate)?;
    let channels = channels.unwrap_or(2);

    Ok(AudioClip::from_interleaved(name, sample_rate, channels, &samples)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decodes_stereo_wav() {
        let interleaved: Vec<i16> = (0..2000).map(|i| if i % 2 == 0 { 16384 } else { -16384 }).collect();
        let source = SourceFile::new("stereo.wav", "audio/wav", wav_bytes(2, 44100, &interleaved));

        let clip = SymphoniaDecoder::new().decode(source).unwrap();
        assert_eq!(clip.name(), "stereo.wav");
        assert_eq!(clip.sample_rate(), 44100);
        assert_eq!(clip.channel_count(), 2);
        assert_eq!(clip.frame_count(), 1000);
        assert!((clip.channel(0).unwrap()[10] - 0.5).abs() < 1e-3);
        assert!((clip.channel(1).unwrap()[10] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_decodes_mono_wav() {
        let samples = vec![0i16; 4800];
        let source = SourceFile::new("mono.wav", "audio/wav", wav_bytes(1, 48000, &samples));

        let clip = SymphoniaDecoder.decode(source).unwrap();
        assert_eq!(clip.channel_count(), 1);
        assert_eq!(clip.frame_count(), 4800);
        assert_eq!(clip.label(), "mono");
    }

    #[test]
    fn test_garbage_fails_with_name() {
        let source = SourceFile::new("noise.mp3", "audio/mpeg", vec![0x42; 512]);
        let err = SymphoniaDecoder.decode(source).unwrap_err();
        assert_eq!(err.name, "noise.mp3");
    }
}
