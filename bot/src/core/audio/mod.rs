//! Audio helpers for turning provider WAV payloads into headerless PCM16.
//!
//! - [`wav`]: header stripping, decoding and re-wrapping of WAV containers
//! - [`resample`]: channel conversion and band-limited resampling

pub mod resample;
pub mod wav;

use bytes::Bytes;
use thiserror::Error;

pub use resample::{convert_channels, resample, resample_linear};
pub use wav::{
    WAV_HEADER_LEN, decode_wav, is_canonical_wav_header, pcm16_to_wav, strip_wav_header,
    wav_to_pcm16,
};

/// Errors raised while decoding or converting audio
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Malformed WAV container: {0}")]
    InvalidWav(#[from] hound::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Resampling failed: {0}")]
    Resample(String),
}

/// Target layout of emitted PCM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl PcmFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Bytes per interleaved PCM16 frame
    pub fn block_align(&self) -> usize {
        self.channels as usize * 2
    }

    /// Whole sample frames covering `ms` milliseconds (rounded down)
    pub fn frames_for_ms(&self, ms: u32) -> usize {
        (self.sample_rate as u64 * ms as u64 / 1000) as usize
    }

    /// Bytes of PCM16 audio in `ms` milliseconds, aligned to whole frames
    pub fn bytes_for_ms(&self, ms: u32) -> usize {
        self.frames_for_ms(ms) * self.block_align()
    }
}

/// Raw interleaved little-endian PCM16 audio with its declared format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    /// Headerless PCM bytes
    pub data: Bytes,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Interleaved channel count
    pub channels: u16,
}

impl AudioFrame {
    pub fn new(data: Bytes, sample_rate: u32, channels: u16) -> Self {
        Self {
            data,
            sample_rate,
            channels,
        }
    }

    pub fn format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channels)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Playback duration of the frame in milliseconds
    pub fn duration_ms(&self) -> u64 {
        let bytes_per_second = self.sample_rate as u64 * self.format().block_align() as u64;
        if bytes_per_second == 0 {
            return 0;
        }
        self.data.len() as u64 * 1000 / bytes_per_second
    }

    /// Split the frame into consecutive frames of `frame_ms` milliseconds.
    ///
    /// Chunk boundaries are aligned to whole sample frames; the last chunk
    /// carries the remainder. A frame smaller than one chunk is returned as is.
    pub fn split(&self, frame_ms: u32) -> Vec<AudioFrame> {
        let chunk_len = self.format().bytes_for_ms(frame_ms);

        if chunk_len == 0 || self.data.len() <= chunk_len {
            return vec![self.clone()];
        }

        let mut rest = self.data.clone();
        let mut frames = Vec::with_capacity(rest.len() / chunk_len + 1);
        while !rest.is_empty() {
            let take = chunk_len.min(rest.len());
            frames.push(AudioFrame::new(
                rest.split_to(take),
                self.sample_rate,
                self.channels,
            ));
        }
        frames
    }
}
