//! Configuration module for the voice bot
//!
//! Configuration comes from environment variables (with `.env` loaded in
//! `main`) and an optional YAML file. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `env`: Environment variable loading
//! - `yaml`: YAML configuration file loading and overlay
//!
//! # Example
//! ```rust,no_run
//! use voice_bot::config::BotConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = BotConfig::from_env()?;
//!
//! // Load from YAML file with environment variables as the base
//! let config = BotConfig::from_file(&PathBuf::from("config.yaml"))?;
//! println!("TTS provider: {}", config.tts_provider);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use zeroize::Zeroizing;

mod env;
mod yaml;

pub use yaml::YamlConfig;

use crate::core::prompt::DEFAULT_LANGUAGE;
use crate::core::stt::{DEFAULT_SONIOX_MODEL, STTProvider};
use crate::core::tts::murf::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SAMPLE_RATE, DEFAULT_VOICE_ID, MURF_TTS_URL,
    MurfAuthScheme, MurfTTSConfig,
};
use crate::core::tts::TTSProvider;
use crate::utils::url_validation::AudioUrlPolicy;

/// Default knowledge document path
pub const DEFAULT_KNOWLEDGE_FILE: &str = "resource_document.txt";

/// Errors raised while loading or resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported {kind} provider: {name}. Supported providers: {supported}")]
    UnsupportedProvider {
        kind: &'static str,
        name: String,
        supported: String,
    },

    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

/// Murf adapter settings that can be overridden from the environment or YAML
#[derive(Debug, Clone, PartialEq)]
pub struct MurfSettings {
    pub api_url: String,
    pub voice_id: String,
    pub style: Option<String>,
    pub model_version: Option<String>,
    pub auth_scheme: MurfAuthScheme,
    pub sample_rate: u32,
    pub request_timeout_secs: u64,
    pub frame_duration_ms: Option<u32>,
    pub audio_url_policy: AudioUrlPolicy,
}

impl Default for MurfSettings {
    fn default() -> Self {
        Self {
            api_url: MURF_TTS_URL.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            style: None,
            model_version: None,
            auth_scheme: MurfAuthScheme::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            frame_duration_ms: None,
            audio_url_policy: AudioUrlPolicy::Strict,
        }
    }
}

/// Bot configuration
///
/// Contains everything needed to resolve a bot session:
/// - Provider selection (STT, TTS) and the knowledge document
/// - Provider API keys
/// - Murf adapter settings
#[derive(Clone)]
pub struct BotConfig {
    // Bot settings
    pub stt_provider: STTProvider,
    pub tts_provider: TTSProvider,
    pub knowledge_file: PathBuf,
    /// Language every answer must be given in
    pub bot_language: String,

    // Provider API keys
    pub soniox_api_key: Option<String>,
    pub soniox_model: String,
    pub deepgram_api_key: Option<String>,
    /// Sarvam AI key, shared by Sarvam STT and TTS
    pub sarvam_api_key: Option<String>,
    pub murf_api_key: Option<String>,
    pub eleven_labs_api_key: Option<String>,
    pub cartesia_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,

    // Murf adapter
    pub murf: MurfSettings,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            stt_provider: STTProvider::default(),
            tts_provider: TTSProvider::default(),
            knowledge_file: PathBuf::from(DEFAULT_KNOWLEDGE_FILE),
            bot_language: DEFAULT_LANGUAGE.to_string(),
            soniox_api_key: None,
            soniox_model: DEFAULT_SONIOX_MODEL.to_string(),
            deepgram_api_key: None,
            sarvam_api_key: None,
            murf_api_key: None,
            eleven_labs_api_key: None,
            cartesia_api_key: None,
            openai_api_key: None,
            openai_model: None,
            murf: MurfSettings::default(),
        }
    }
}

/// Implement Drop to zeroize all secret fields when BotConfig is dropped.
impl Drop for BotConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        for key in [
            &mut self.soniox_api_key,
            &mut self.deepgram_api_key,
            &mut self.sarvam_api_key,
            &mut self.murf_api_key,
            &mut self.eleven_labs_api_key,
            &mut self.cartesia_api_key,
            &mut self.openai_api_key,
        ]
        .into_iter()
        .flatten()
        {
            key.zeroize();
        }
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &Option<String>) -> &'static str {
            if key.is_some() { "[REDACTED]" } else { "None" }
        }

        f.debug_struct("BotConfig")
            .field("stt_provider", &self.stt_provider)
            .field("tts_provider", &self.tts_provider)
            .field("knowledge_file", &self.knowledge_file)
            .field("bot_language", &self.bot_language)
            .field("soniox_api_key", &redact(&self.soniox_api_key))
            .field("soniox_model", &self.soniox_model)
            .field("deepgram_api_key", &redact(&self.deepgram_api_key))
            .field("sarvam_api_key", &redact(&self.sarvam_api_key))
            .field("murf_api_key", &redact(&self.murf_api_key))
            .field("eleven_labs_api_key", &redact(&self.eleven_labs_api_key))
            .field("cartesia_api_key", &redact(&self.cartesia_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_model", &self.openai_model)
            .field("murf", &self.murf)
            .finish()
    }
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// `.env` is expected to have been loaded already (see `main.rs`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = env::load_from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variables as the base.
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is malformed, if an
    /// environment variable has an invalid format, or if validation fails.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let yaml_config = YamlConfig::from_file(path)?;

        let mut config = env::load_from_env()?;
        yaml_config.apply_to(&mut config)?;

        config.validate()?;
        Ok(config)
    }

    /// Check numeric settings that have no meaningful zero value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.murf.sample_rate == 0 {
            return Err(ConfigError::invalid("MURF_SAMPLE_RATE", "must be positive"));
        }
        if self.murf.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "TTS_REQUEST_TIMEOUT_SECS",
                "must be positive",
            ));
        }
        if self.murf.frame_duration_ms == Some(0) {
            return Err(ConfigError::invalid("MURF_FRAME_MS", "must be positive"));
        }
        if self.bot_language.trim().is_empty() {
            return Err(ConfigError::invalid("BOT_LANGUAGE", "must not be empty"));
        }
        url::Url::parse(&self.murf.api_url).map_err(|e| ConfigError::invalid("MURF_API_URL", e))?;
        Ok(())
    }

    /// API key stored under the environment variable name `env_key`
    pub fn api_key_for(&self, env_key: &str) -> Option<String> {
        let key = match env_key {
            "SONIOX_API_KEY" => &self.soniox_api_key,
            "DEEPGRAM_API_KEY" => &self.deepgram_api_key,
            "SARVAM_API_KEY" => &self.sarvam_api_key,
            "MURF_API_KEY" => &self.murf_api_key,
            "ELEVEN_LABS_API_KEY" => &self.eleven_labs_api_key,
            "CARTESIA_API_KEY" => &self.cartesia_api_key,
            "OPENAI_API_KEY" => &self.openai_api_key,
            _ => return None,
        };
        key.as_ref().filter(|k| !k.trim().is_empty()).cloned()
    }

    /// Build the Murf adapter configuration.
    pub fn murf_tts_config(&self) -> Result<MurfTTSConfig, ConfigError> {
        let api_key = self
            .api_key_for("MURF_API_KEY")
            .ok_or(ConfigError::MissingApiKey("MURF_API_KEY"))?;

        let config = MurfTTSConfig {
            api_key: Zeroizing::new(api_key),
            voice_id: self.murf.voice_id.clone(),
            sample_rate: self.murf.sample_rate,
            style: self.murf.style.clone(),
            model_version: self.murf.model_version.clone(),
            auth_scheme: self.murf.auth_scheme,
            endpoint: self.murf.api_url.clone(),
            request_timeout_secs: self.murf.request_timeout_secs,
            frame_duration_ms: self.murf.frame_duration_ms,
            audio_url_policy: self.murf.audio_url_policy,
            ..Default::default()
        };
        config
            .validate()
            .map_err(|e| ConfigError::invalid("murf", e))?;
        Ok(config)
    }
}
