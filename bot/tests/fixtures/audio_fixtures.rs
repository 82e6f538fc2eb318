//! Audio Test Fixtures
//!
//! Generated audio keeps tests reproducible and free of external files.
//! WAV containers are assembled by hand so the header is always the plain
//! 44-byte layout (RIFF, 16-byte `fmt ` chunk, `data` chunk).

use std::f32::consts::PI;

/// Size of a canonical WAV header
pub const WAV_HEADER_LEN: usize = 44;

/// Generate silence (zeros)
pub fn generate_silence(frames: usize, channels: u16) -> Vec<i16> {
    vec![0i16; frames * channels as usize]
}

/// Generate a mono sine wave tone at `sample_rate`
pub fn generate_sine_wave(frames: usize, sample_rate: u32, frequency: f32, amplitude: f32) -> Vec<i16> {
    let max_amplitude = amplitude * i16::MAX as f32;
    let angular_freq = 2.0 * PI * frequency / sample_rate as f32;

    (0..frames)
        .map(|i| ((angular_freq * i as f32).sin() * max_amplitude) as i16)
        .collect()
}

/// Number of sample frames in `ms` milliseconds at `sample_rate`
pub fn frames_for_ms(sample_rate: u32, ms: u32) -> usize {
    (sample_rate as usize * ms as usize) / 1000
}

/// Convert i16 samples to little-endian bytes
pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Wrap interleaved PCM16 samples in a canonical WAV container
pub fn wav_bytes(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let data = samples_to_bytes(samples);
    let data_len = data.len() as u32;
    let block_align = channels * 2;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&data);
    out
}

/// `ms` milliseconds of a 440 Hz mono tone as a WAV file
pub fn tone_wav(sample_rate: u32, ms: u32) -> Vec<u8> {
    let samples = generate_sine_wave(frames_for_ms(sample_rate, ms), sample_rate, 440.0, 0.5);
    wav_bytes(&samples, sample_rate, 1)
}
