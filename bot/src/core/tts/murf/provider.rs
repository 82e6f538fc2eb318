//! Murf TTS provider implementation.
//!
//! # API Reference
//!
//! - Endpoint: `POST https://api.murf.ai/v1/speech/generate`
//! - Auth: `api-key` header (or `Authorization: Bearer`)
//! - Output: WAV, either in the response body, behind an `audioFile` link, or
//!   inline as base64 `encodedAudio`
//!
//! One call is one POST, plus one GET when Murf answers with a link. All
//! network work finishes before the first event is produced, so a failed call
//! always yields exactly one `Error` event.

use std::sync::Arc;
use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info, warn};

use super::config::{MURF_TTS_URL, MurfTTSConfig, SUPPORTED_SAMPLE_RATES};
use super::messages::{AudioPayload, MurfSpeechRequest, MurfSpeechResponse};
use crate::core::audio::{AudioFrame, wav_to_pcm16};
use crate::core::tts::base::{BaseTTS, TTSError, TTSEvent, TTSEventStream, TTSResult};
use crate::utils::url_validation::validate_audio_url;

const USER_AGENT: &str = concat!("voice-bot/", env!("CARGO_PKG_VERSION"));
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Murf TTS adapter.
///
/// Cheap to clone; clones share the connection pool. Concurrent calls are
/// independent and share nothing but the pool and the configuration.
///
/// # Example
///
/// ```rust,ignore
/// use futures::StreamExt;
/// use voice_bot::core::tts::{BaseTTS, MurfTTS, MurfTTSConfig, TTSEvent};
///
/// let tts = MurfTTS::new(MurfTTSConfig::with_api_key("..."))?;
/// let mut events = tts.synthesize("Hello there");
/// while let Some(event) = events.next().await {
///     if let TTSEvent::AudioChunk(frame) = event {
///         println!("{} bytes at {} Hz", frame.data.len(), frame.sample_rate);
///     }
/// }
/// ```
#[derive(Clone)]
pub struct MurfTTS {
    inner: Arc<MurfInner>,
}

struct MurfInner {
    config: MurfTTSConfig,
    client: reqwest::Client,
}

impl MurfTTS {
    /// Create an adapter with its own connection pool
    pub fn new(config: MurfTTSConfig) -> TTSResult<Self> {
        config.validate()?;
        let client = Self::build_client(&config)?;
        Self::with_client(config, client)
    }

    /// Create an adapter on top of an existing `reqwest::Client`
    pub fn with_client(config: MurfTTSConfig, client: reqwest::Client) -> TTSResult<Self> {
        config.validate()?;

        if !SUPPORTED_SAMPLE_RATES.contains(&config.sample_rate) {
            warn!(
                sample_rate = config.sample_rate,
                "Sample rate not rendered natively by Murf, audio will be resampled"
            );
        }

        Ok(Self {
            inner: Arc::new(MurfInner { config, client }),
        })
    }

    fn build_client(config: &MurfTTSConfig) -> TTSResult<reqwest::Client> {
        let timeout = config.request_timeout();
        reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                TTSError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })
    }

    pub fn config(&self) -> &MurfTTSConfig {
        &self.inner.config
    }
}

impl MurfInner {
    /// Run the network phase and the decode for one utterance.
    async fn render(&self, text: &str) -> TTSResult<AudioFrame> {
        let timeout = self.config.request_timeout();
        let wav = tokio::time::timeout(timeout, self.fetch_wav(text))
            .await
            .map_err(|_| TTSError::Timeout(timeout))??;

        debug!(audio_bytes = wav.len(), "Murf returned WAV payload");

        let target = self.config.target_format();
        let frame = tokio::task::spawn_blocking(move || wav_to_pcm16(&wav, target))
            .await
            .map_err(|e| TTSError::ProviderError(format!("Audio decode task failed: {e}")))??;

        Ok(frame)
    }

    /// POST the synthesis request and return the WAV bytes, following a
    /// download link when Murf answers with one.
    async fn fetch_wav(&self, text: &str) -> TTSResult<Bytes> {
        let (header_name, header_value) = self.config.auth_scheme.header(&self.config.api_key);

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(header_name, header_value)
            .json(&MurfSpeechRequest::new(&self.config, text))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %body, "Murf API rejected request");
            return Err(TTSError::RemoteRejected {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !is_json_body(&content_type, &body) {
            return Ok(body);
        }

        let parsed: MurfSpeechResponse = serde_json::from_slice(&body)
            .map_err(|e| TTSError::ProviderError(format!("Malformed Murf response: {e}")))?;

        if let Some(warning) = parsed.warning.as_deref() {
            warn!(warning, "Murf API warning");
        }
        if let Some(remaining) = parsed.remaining_character_count {
            debug!(
                consumed = parsed.consumed_character_count.unwrap_or_default(),
                remaining, "Murf character quota"
            );
        }

        match parsed.into_payload().map_err(TTSError::ProviderError)? {
            AudioPayload::Inline(wav) => Ok(Bytes::from(wav)),
            AudioPayload::Url(url) => self.download(&url).await,
        }
    }

    async fn download(&self, url: &str) -> TTSResult<Bytes> {
        let url = validate_audio_url(url, self.config.audio_url_policy)
            .await
            .map_err(|e| TTSError::ProviderError(format!("Rejected audio URL: {e}")))?;

        debug!(host = url.host_str().unwrap_or_default(), "Downloading Murf audio");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Murf audio download failed");
            return Err(TTSError::RemoteRejected {
                status: status.as_u16(),
                body,
            });
        }

        response.bytes().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, err: reqwest::Error) -> TTSError {
        if err.is_timeout() {
            TTSError::Timeout(self.config.request_timeout())
        } else {
            TTSError::NetworkError(err.to_string())
        }
    }
}

/// Whether a successful response carries the JSON envelope rather than audio
fn is_json_body(content_type: &str, body: &[u8]) -> bool {
    if content_type.contains("json") {
        return true;
    }
    if content_type.starts_with("audio/") || body.starts_with(b"RIFF") {
        return false;
    }
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'{')
}

#[async_trait]
impl BaseTTS for MurfTTS {
    fn synthesize(&self, text: &str) -> TTSEventStream {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();

        Box::pin(stream! {
            if text.trim().is_empty() {
                yield TTSEvent::Error(TTSError::InvalidInput("text is empty".to_string()));
                return;
            }

            debug!(text_len = text.len(), voice_id = %inner.config.voice_id, "Murf synthesis started");

            match inner.render(&text).await {
                Ok(frame) => {
                    info!(
                        audio_bytes = frame.data.len(),
                        sample_rate = frame.sample_rate,
                        channels = frame.channels,
                        "Murf synthesis complete"
                    );
                    let chunks = match inner.config.frame_duration_ms {
                        Some(ms) => frame.split(ms),
                        None => vec![frame],
                    };

                    yield TTSEvent::Started;
                    for chunk in chunks {
                        yield TTSEvent::AudioChunk(chunk);
                    }
                    yield TTSEvent::Stopped;
                }
                Err(e) => {
                    error!(kind = %e.kind(), error = %e, "Murf synthesis failed");
                    yield TTSEvent::Error(e);
                }
            }
        })
    }

    fn get_provider_info(&self) -> serde_json::Value {
        let config = &self.inner.config;
        serde_json::json!({
            "provider": "murf",
            "version": "1.0.0",
            "api_type": "HTTP REST",
            "connection_pooling": true,
            "endpoint": config.endpoint,
            "default_endpoint": MURF_TTS_URL,
            "voice_id": config.voice_id,
            "auth_scheme": config.auth_scheme.as_str(),
            "request_format": config.format.as_str(),
            "output_format": "pcm16",
            "sample_rate": config.sample_rate,
            "channels": config.channel_type.channels(),
            "native_sample_rates": SUPPORTED_SAMPLE_RATES,
            "request_timeout_secs": config.request_timeout_secs,
            "audio_url_policy": config.audio_url_policy.as_str(),
            "documentation": "https://murf.ai/api/docs/api-reference/text-to-speech/generate",
        })
    }
}
