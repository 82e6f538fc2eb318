//! Configuration types for the Murf TTS API.
//!
//! This module contains:
//! - Authentication scheme selection (`api-key` header or bearer token)
//! - Channel layout and container format enums sent on the wire
//! - [`MurfTTSConfig`], the immutable construction-time settings of the adapter

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::core::audio::PcmFormat;
use crate::core::tts::base::{TTSError, TTSResult};
use crate::utils::url_validation::AudioUrlPolicy;

/// Murf speech generation endpoint
pub const MURF_TTS_URL: &str = "https://api.murf.ai/v1/speech/generate";

/// Default Murf voice
pub const DEFAULT_VOICE_ID: &str = "en-US-ken";

/// Default target sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Default ceiling on the whole network phase of one call
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Sample rates Murf can render natively
pub const SUPPORTED_SAMPLE_RATES: &[u32] = &[8000, 16000, 22050, 24000, 44100, 48000];

// =============================================================================
// Authentication
// =============================================================================

/// How the API key is presented to Murf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MurfAuthScheme {
    /// `api-key: <key>` header
    #[default]
    ApiKey,
    /// `Authorization: Bearer <key>` header
    Bearer,
}

impl MurfAuthScheme {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiKey => "api-key",
            Self::Bearer => "bearer",
        }
    }

    /// Parse from string, with fallback to default.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bearer" | "authorization" => Self::Bearer,
            _ => Self::default(),
        }
    }

    /// Header name and value carrying `api_key`
    pub fn header(&self, api_key: &str) -> (&'static str, String) {
        match self {
            Self::ApiKey => ("api-key", api_key.to_string()),
            Self::Bearer => ("Authorization", format!("Bearer {api_key}")),
        }
    }
}

impl fmt::Display for MurfAuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Wire enums
// =============================================================================

/// Channel layout requested from Murf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelType {
    #[default]
    Mono,
    Stereo,
}

impl ChannelType {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mono => "MONO",
            Self::Stereo => "STEREO",
        }
    }

    #[inline]
    pub fn channels(&self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }

    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "stereo" | "2" => Self::Stereo,
            _ => Self::default(),
        }
    }
}

/// Container format requested from Murf.
///
/// Only WAV is requested: it is the one container the adapter can turn into
/// headerless PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MurfAudioFormat {
    #[default]
    Wav,
}

impl MurfAudioFormat {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        "WAV"
    }
}

// =============================================================================
// Adapter configuration
// =============================================================================

/// Construction-time settings of [`super::MurfTTS`].
///
/// Immutable once the adapter is built.
#[derive(Clone, PartialEq)]
pub struct MurfTTSConfig {
    /// Murf API key, wiped from memory on drop
    pub api_key: Zeroizing<String>,
    /// Voice identifier, e.g. `en-US-ken`
    pub voice_id: String,
    /// Target sample rate of emitted PCM
    pub sample_rate: u32,
    /// Target channel layout of emitted PCM
    pub channel_type: ChannelType,
    pub format: MurfAudioFormat,
    /// Voice style, e.g. `Conversational`
    pub style: Option<String>,
    /// Model version, e.g. `GEN2`
    pub model_version: Option<String>,
    /// Speaking rate adjustment (-50..=50)
    pub rate: Option<i32>,
    /// Pitch adjustment (-50..=50)
    pub pitch: Option<i32>,
    /// Ask Murf for inline base64 audio instead of a download link
    pub encode_as_base64: bool,
    pub auth_scheme: MurfAuthScheme,
    /// Speech generation endpoint
    pub endpoint: String,
    /// Ceiling on the whole network phase of one call
    pub request_timeout_secs: u64,
    /// Split audio into chunks of this many milliseconds; `None` emits one chunk
    pub frame_duration_ms: Option<u32>,
    /// Checks applied to audio download links returned by Murf
    pub audio_url_policy: AudioUrlPolicy,
}

impl Default for MurfTTSConfig {
    fn default() -> Self {
        Self {
            api_key: Zeroizing::default(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            channel_type: ChannelType::Mono,
            format: MurfAudioFormat::Wav,
            style: None,
            model_version: None,
            rate: None,
            pitch: None,
            encode_as_base64: false,
            auth_scheme: MurfAuthScheme::ApiKey,
            endpoint: MURF_TTS_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            frame_duration_ms: None,
            audio_url_policy: AudioUrlPolicy::Strict,
        }
    }
}

impl MurfTTSConfig {
    /// Config with the given key and defaults everywhere else
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Zeroizing::new(api_key.into()),
            ..Default::default()
        }
    }

    /// Check the settings before an adapter is built from them.
    pub fn validate(&self) -> TTSResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "Murf API key is required".to_string(),
            ));
        }
        if self.voice_id.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "voice_id must not be empty".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(TTSError::InvalidConfiguration(
                "sample_rate must be positive".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(TTSError::InvalidConfiguration(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.frame_duration_ms == Some(0) {
            return Err(TTSError::InvalidConfiguration(
                "frame_duration_ms must be positive".to_string(),
            ));
        }
        for (name, value) in [("rate", self.rate), ("pitch", self.pitch)] {
            if let Some(v) = value
                && !(-50..=50).contains(&v)
            {
                return Err(TTSError::InvalidConfiguration(format!(
                    "{name} must be within -50..=50, got {v}"
                )));
            }
        }
        url::Url::parse(&self.endpoint).map_err(|e| {
            TTSError::InvalidConfiguration(format!("invalid endpoint '{}': {e}", self.endpoint))
        })?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Layout of the PCM the adapter emits
    pub fn target_format(&self) -> PcmFormat {
        PcmFormat::new(self.sample_rate, self.channel_type.channels())
    }
}

impl fmt::Debug for MurfTTSConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MurfTTSConfig")
            .field("api_key", &"[REDACTED]")
            .field("voice_id", &self.voice_id)
            .field("sample_rate", &self.sample_rate)
            .field("channel_type", &self.channel_type)
            .field("format", &self.format)
            .field("style", &self.style)
            .field("model_version", &self.model_version)
            .field("rate", &self.rate)
            .field("pitch", &self.pitch)
            .field("encode_as_base64", &self.encode_as_base64)
            .field("auth_scheme", &self.auth_scheme)
            .field("endpoint", &self.endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("frame_duration_ms", &self.frame_duration_ms)
            .field("audio_url_policy", &self.audio_url_policy)
            .finish()
    }
}
