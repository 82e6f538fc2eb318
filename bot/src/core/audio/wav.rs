//! WAV container handling.
//!
//! Providers return audio wrapped in a RIFF/WAVE container. The pipeline wants
//! raw interleaved PCM16, so the container header is removed and, when the
//! provider's native layout differs from the target, the audio is decoded,
//! remixed and resampled first.

use std::io::Cursor;

use bytes::Bytes;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::debug;

use super::resample::{convert_channels, resample};
use super::{AudioError, AudioFrame, PcmFormat};

/// Size of the leading header of a canonical uncompressed WAV file
pub const WAV_HEADER_LEN: usize = 44;

/// Remove the canonical 44-byte WAV header.
///
/// Buffers shorter than the header are returned unchanged.
pub fn strip_wav_header(data: &[u8]) -> &[u8] {
    if data.len() < WAV_HEADER_LEN {
        data
    } else {
        &data[WAV_HEADER_LEN..]
    }
}

/// Whether `data` starts with a plain 44-byte PCM header
/// (RIFF/WAVE, 16-byte `fmt ` chunk, `data` chunk immediately after).
pub fn is_canonical_wav_header(data: &[u8]) -> bool {
    data.len() >= WAV_HEADER_LEN
        && &data[0..4] == b"RIFF"
        && &data[8..12] == b"WAVE"
        && &data[12..16] == b"fmt "
        && u32::from_le_bytes([data[16], data[17], data[18], data[19]]) == 16
        && &data[36..40] == b"data"
}

/// Decode a WAV buffer into interleaved samples normalised to [-1.0, 1.0].
pub fn decode_wav(data: &[u8]) -> Result<(WavSpec, Vec<f32>), AudioError> {
    let reader = WavReader::new(Cursor::new(data))?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        SampleFormat::Float => {
            if spec.bits_per_sample != 32 {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{}-bit float",
                    spec.bits_per_sample
                )));
            }
            reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()?
        }
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(AudioError::UnsupportedFormat(format!(
                    "{}-bit integer",
                    spec.bits_per_sample
                )));
            }
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok((spec, samples))
}

/// Encode normalised samples as little-endian PCM16 bytes.
pub fn encode_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample * 32768.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Convert a provider WAV payload into headerless PCM16 at `target`.
///
/// Payloads shorter than a WAV header are passed through untouched. A
/// canonical PCM16 payload that already matches `target` has its header
/// stripped without decoding; anything else is decoded, remixed to the target
/// channel count and resampled to the target rate.
pub fn wav_to_pcm16(data: &Bytes, target: PcmFormat) -> Result<AudioFrame, AudioError> {
    if data.len() < WAV_HEADER_LEN {
        return Ok(AudioFrame::new(
            data.clone(),
            target.sample_rate,
            target.channels,
        ));
    }

    let spec = WavReader::new(Cursor::new(&data[..]))?.spec();
    let matches_target = spec.sample_format == SampleFormat::Int
        && spec.bits_per_sample == 16
        && spec.sample_rate == target.sample_rate
        && spec.channels == target.channels;

    if matches_target && is_canonical_wav_header(data) {
        return Ok(AudioFrame::new(
            data.slice(WAV_HEADER_LEN..),
            target.sample_rate,
            target.channels,
        ));
    }

    let (spec, samples) = decode_wav(data)?;
    if spec.channels == 0 {
        return Err(AudioError::UnsupportedFormat("zero channels".to_string()));
    }

    debug!(
        native_rate = spec.sample_rate,
        native_channels = spec.channels,
        target_rate = target.sample_rate,
        target_channels = target.channels,
        "Converting WAV payload to target PCM format"
    );

    let remixed = convert_channels(&samples, spec.channels, target.channels);
    let resampled = resample(
        &remixed,
        target.channels,
        spec.sample_rate,
        target.sample_rate,
    )?;

    Ok(AudioFrame::new(
        Bytes::from(encode_pcm16(&resampled)),
        target.sample_rate,
        target.channels,
    ))
}

/// Wrap headerless PCM16 in a WAV container.
pub fn pcm16_to_wav(pcm: &[u8], sample_rate: u32, channels: u16) -> Result<Vec<u8>, AudioError> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(pcm.len() + WAV_HEADER_LEN));
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for pair in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}
