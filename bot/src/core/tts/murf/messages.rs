//! Murf API message types.
//!
//! Request body for `POST /v1/speech/generate` and the JSON response Murf
//! returns when it does not stream the WAV back directly.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use super::config::{ChannelType, MurfAudioFormat, MurfTTSConfig};

/// Speech generation request.
///
/// Built per call from the adapter config and the text; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MurfSpeechRequest<'a> {
    pub voice_id: &'a str,
    pub text: &'a str,
    pub format: MurfAudioFormat,
    pub sample_rate: u32,
    pub channel_type: ChannelType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<i32>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub encode_as_base64: bool,
}

impl<'a> MurfSpeechRequest<'a> {
    pub fn new(config: &'a MurfTTSConfig, text: &'a str) -> Self {
        Self {
            voice_id: &config.voice_id,
            text,
            format: config.format,
            sample_rate: config.sample_rate,
            channel_type: config.channel_type,
            style: config.style.as_deref(),
            model_version: config.model_version.as_deref(),
            rate: config.rate,
            pitch: config.pitch,
            encode_as_base64: config.encode_as_base64,
        }
    }
}

/// JSON response of the speech generation endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MurfSpeechResponse {
    /// Download link of the rendered audio
    #[serde(default)]
    pub audio_file: Option<String>,

    /// Base64 audio when `encodeAsBase64` was requested
    #[serde(default)]
    pub encoded_audio: Option<String>,

    #[serde(default)]
    pub audio_length_in_seconds: Option<f64>,

    #[serde(default)]
    pub consumed_character_count: Option<u64>,

    #[serde(default)]
    pub remaining_character_count: Option<u64>,

    #[serde(default)]
    pub warning: Option<String>,
}

/// Where the audio of a JSON response lives
#[derive(Debug, Clone, PartialEq)]
pub enum AudioPayload {
    /// Must be downloaded with a second request
    Url(String),
    /// Already present, base64-decoded
    Inline(Vec<u8>),
}

impl MurfSpeechResponse {
    /// Pick the audio out of the response, preferring inline data.
    pub fn into_payload(self) -> Result<AudioPayload, String> {
        if let Some(encoded) = self.encoded_audio.filter(|s| !s.is_empty()) {
            return BASE64
                .decode(encoded.trim())
                .map(AudioPayload::Inline)
                .map_err(|e| format!("invalid base64 audio: {e}"));
        }
        match self.audio_file.filter(|s| !s.is_empty()) {
            Some(url) => Ok(AudioPayload::Url(url)),
            None => Err("response contains neither audioFile nor encodedAudio".to_string()),
        }
    }
}
