//! Murf TTS provider module.
//!
//! Adapts Murf's request/response speech API to the streaming event model of
//! [`BaseTTS`](crate::core::tts::BaseTTS): one utterance in, `Started`, a run of
//! headerless PCM16 `AudioChunk`s and `Stopped` out.
//!
//! # Audio handling
//!
//! Murf is asked for WAV at the target sample rate. If the returned audio does
//! not match the target rate or channel layout it is decoded, remixed and
//! resampled; the 44-byte WAV header is then dropped.
//!
//! # Example
//!
//! ```rust,ignore
//! use voice_bot::core::tts::{BaseTTS, MurfTTS, MurfTTSConfig};
//!
//! let tts = MurfTTS::new(MurfTTSConfig {
//!     api_key: std::env::var("MURF_API_KEY")?.into(),
//!     style: Some("Conversational".to_string()),
//!     ..Default::default()
//! })?;
//! let frame = tts.synthesize_to_frame("Hello!").await?;
//! ```

mod config;
mod messages;
mod provider;

pub use config::{
    ChannelType, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SAMPLE_RATE, DEFAULT_VOICE_ID,
    MURF_TTS_URL, MurfAudioFormat, MurfAuthScheme, MurfTTSConfig, SUPPORTED_SAMPLE_RATES,
};
pub use messages::{AudioPayload, MurfSpeechRequest, MurfSpeechResponse};
pub use provider::MurfTTS;
