//! Shared TTS types: errors, events and the provider trait.
//!
//! Every provider turns a text string into a [`TTSEventStream`]. The stream is
//! lazy (no network traffic happens until it is first polled), finite, and
//! cannot be restarted. On success it yields `Started`, one or more
//! `AudioChunk`s and `Stopped`; on failure it yields a single `Error` and ends.

use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use futures::{Stream, StreamExt};
use thiserror::Error;

pub use crate::core::audio::AudioFrame;
use crate::core::audio::AudioError;

/// Result type used throughout the TTS module
pub type TTSResult<T> = Result<T, TTSError>;

/// Outcome of a collected synthesis: the whole utterance or the error that ended it
pub type SynthesisResult = TTSResult<AudioFrame>;

/// Boxed event stream returned by [`BaseTTS::synthesize`]
pub type TTSEventStream = Pin<Box<dyn Stream<Item = TTSEvent> + Send + 'static>>;

/// Coarse error classification surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TTSErrorKind {
    /// The provider answered with a non-success HTTP status
    RemoteRejected,
    /// The network phase exceeded the configured ceiling
    Timeout,
    /// Transport, decoding or any other fault
    Unexpected,
}

impl TTSErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RemoteRejected => "remote_rejected",
            Self::Timeout => "timeout",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for TTSErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by TTS providers
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TTSError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{status}: {body}")]
    RemoteRejected { status: u16, body: String },

    #[error("Request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Audio generation failed: {0}")]
    AudioGenerationFailed(String),
}

impl TTSError {
    /// Classify this error into the taxonomy reported to callers.
    pub fn kind(&self) -> TTSErrorKind {
        match self {
            Self::RemoteRejected { .. } => TTSErrorKind::RemoteRejected,
            Self::Timeout(_) => TTSErrorKind::Timeout,
            Self::InvalidConfiguration(_)
            | Self::InvalidInput(_)
            | Self::NetworkError(_)
            | Self::ProviderError(_)
            | Self::AudioGenerationFailed(_) => TTSErrorKind::Unexpected,
        }
    }
}

impl From<AudioError> for TTSError {
    fn from(err: AudioError) -> Self {
        TTSError::AudioGenerationFailed(err.to_string())
    }
}

/// A single event of a synthesis stream.
#[derive(Debug, Clone, PartialEq)]
pub enum TTSEvent {
    /// Audio is about to follow
    Started,
    /// Headerless PCM16 audio at the adapter's target format
    AudioChunk(AudioFrame),
    /// The utterance completed successfully
    Stopped,
    /// The utterance failed; no further events follow
    Error(TTSError),
}

impl TTSEvent {
    /// Whether no further events can follow this one
    pub fn is_terminal(&self) -> bool {
        matches!(self, TTSEvent::Stopped | TTSEvent::Error(_))
    }

    /// Error kind if this is an `Error` event
    pub fn error_kind(&self) -> Option<TTSErrorKind> {
        match self {
            TTSEvent::Error(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Base trait implemented by every in-process TTS provider.
#[async_trait]
pub trait BaseTTS: Send + Sync {
    /// Convert `text` into a lazy stream of synthesis events.
    ///
    /// Calls are independent: concurrent streams from the same provider never
    /// share audio.
    fn synthesize(&self, text: &str) -> TTSEventStream;

    /// Static description of the provider (name, endpoint, formats)
    fn get_provider_info(&self) -> serde_json::Value;

    /// Drive a synthesis stream to completion and join its chunks into one frame.
    async fn synthesize_to_frame(&self, text: &str) -> SynthesisResult {
        collect_frame(self.synthesize(text)).await
    }
}

/// Boxed provider handle
pub type BoxedTTS = Box<dyn BaseTTS>;

/// Join the chunks of an event stream into a single frame.
///
/// Returns the stream's error if it ended with one, or an error if it ended
/// without a `Stopped` event.
pub async fn collect_frame(mut stream: TTSEventStream) -> SynthesisResult {
    let mut data = BytesMut::new();
    let mut format: Option<(u32, u16)> = None;

    while let Some(event) = stream.next().await {
        match event {
            TTSEvent::Started => {}
            TTSEvent::AudioChunk(frame) => {
                format.get_or_insert((frame.sample_rate, frame.channels));
                data.extend_from_slice(&frame.data);
            }
            TTSEvent::Stopped => {
                let (sample_rate, channels) = format.ok_or_else(|| {
                    TTSError::ProviderError("stream stopped without audio".to_string())
                })?;
                return Ok(AudioFrame::new(data.freeze(), sample_rate, channels));
            }
            TTSEvent::Error(e) => return Err(e),
        }
    }

    Err(TTSError::ProviderError(
        "stream ended before completion".to_string(),
    ))
}
