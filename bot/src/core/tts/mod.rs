mod base;
pub mod murf;

pub use base::{
    AudioFrame, BaseTTS, BoxedTTS, SynthesisResult, TTSError, TTSErrorKind, TTSEvent,
    TTSEventStream, TTSResult, collect_frame,
};
pub use murf::{MURF_TTS_URL, MurfAuthScheme, MurfTTS, MurfTTSConfig};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{BotConfig, ConfigError};

/// ElevenLabs "Adam" voice
pub const ELEVENLABS_DEFAULT_VOICE_ID: &str = "pNInz6obpgDQGcFmaJgB";
/// ElevenLabs low-latency model
pub const ELEVENLABS_DEFAULT_MODEL: &str = "eleven_turbo_v2_5";
/// Cartesia "British Reading Lady" voice
pub const CARTESIA_DEFAULT_VOICE_ID: &str = "71a7ad14-091c-4e8e-a314-022ece01c121";
/// Sarvam TTS model
pub const SARVAM_DEFAULT_MODEL: &str = "bulbul:v1";

/// Supported TTS providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TTSProvider {
    /// Murf HTTP API, served by the in-crate adapter
    Murf,
    /// ElevenLabs streaming TTS
    #[default]
    ElevenLabs,
    /// Cartesia Sonic TTS
    Cartesia,
    /// Sarvam AI TTS
    Sarvam,
}

impl TTSProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Murf => "murf",
            Self::ElevenLabs => "elevenlabs",
            Self::Cartesia => "cartesia",
            Self::Sarvam => "sarvam",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Murf => "MURF_API_KEY",
            Self::ElevenLabs => "ELEVEN_LABS_API_KEY",
            Self::Cartesia => "CARTESIA_API_KEY",
            Self::Sarvam => "SARVAM_API_KEY",
        }
    }

    /// Whether this crate ships an in-process client for the provider
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Murf)
    }

    pub fn all() -> &'static [TTSProvider] {
        &[Self::Murf, Self::ElevenLabs, Self::Cartesia, Self::Sarvam]
    }
}

impl fmt::Display for TTSProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TTSProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "murf" | "murf-ai" | "murf.ai" => Ok(Self::Murf),
            "elevenlabs" | "eleven-labs" | "eleven_labs" => Ok(Self::ElevenLabs),
            "cartesia" => Ok(Self::Cartesia),
            "sarvam" => Ok(Self::Sarvam),
            _ => Err(ConfigError::UnsupportedProvider {
                kind: "TTS",
                name: s.to_string(),
                supported: get_supported_tts_providers().join(", "),
            }),
        }
    }
}

/// Get a list of all supported TTS providers
pub fn get_supported_tts_providers() -> Vec<&'static str> {
    TTSProvider::all().iter().map(|p| p.as_str()).collect()
}

/// Returns a map of provider names to their default API endpoint URLs.
///
/// Only providers with an in-crate client are listed.
pub fn get_tts_provider_urls() -> HashMap<String, String> {
    let mut urls = HashMap::new();
    urls.insert("murf".to_string(), MURF_TTS_URL.to_string());
    urls
}

/// Resolved settings for the selected TTS vendor
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct TTSSettings {
    #[zeroize(skip)]
    pub provider: TTSProvider,
    pub api_key: String,
    pub voice_id: Option<String>,
    pub model: Option<String>,
    pub sample_rate: Option<u32>,
    /// Full adapter config when the provider is Murf
    #[zeroize(skip)]
    pub murf: Option<MurfTTSConfig>,
}

impl TTSSettings {
    /// Resolve the settings of `config.tts_provider`.
    pub fn from_config(config: &BotConfig) -> Result<Self, ConfigError> {
        let provider = config.tts_provider;
        let api_key = config
            .api_key_for(provider.api_key_env())
            .ok_or(ConfigError::MissingApiKey(provider.api_key_env()))?;

        let settings = match provider {
            TTSProvider::Murf => {
                let murf = config.murf_tts_config()?;
                Self {
                    provider,
                    api_key,
                    voice_id: Some(murf.voice_id.clone()),
                    model: murf.model_version.clone(),
                    sample_rate: Some(murf.sample_rate),
                    murf: Some(murf),
                }
            }
            TTSProvider::ElevenLabs => Self {
                provider,
                api_key,
                voice_id: Some(ELEVENLABS_DEFAULT_VOICE_ID.to_string()),
                model: Some(ELEVENLABS_DEFAULT_MODEL.to_string()),
                sample_rate: None,
                murf: None,
            },
            TTSProvider::Cartesia => Self {
                provider,
                api_key,
                voice_id: Some(CARTESIA_DEFAULT_VOICE_ID.to_string()),
                model: None,
                sample_rate: None,
                murf: None,
            },
            TTSProvider::Sarvam => Self {
                provider,
                api_key,
                voice_id: None,
                model: Some(SARVAM_DEFAULT_MODEL.to_string()),
                sample_rate: None,
                murf: None,
            },
        };

        Ok(settings)
    }
}

impl fmt::Debug for TTSSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TTSSettings")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("voice_id", &self.voice_id)
            .field("model", &self.model)
            .field("sample_rate", &self.sample_rate)
            .field("murf", &self.murf)
            .finish()
    }
}

/// Factory function to create an in-process TTS provider.
///
/// Only Murf is served in-crate; the other vendors are driven by external SDK
/// clients and yield [`TTSError::InvalidConfiguration`].
///
/// # Example
///
/// ```rust,ignore
/// use voice_bot::config::BotConfig;
/// use voice_bot::core::tts::{TTSSettings, create_tts_provider};
///
/// let settings = TTSSettings::from_config(&BotConfig::from_env()?)?;
/// let tts = create_tts_provider(&settings)?;
/// ```
pub fn create_tts_provider(settings: &TTSSettings) -> TTSResult<BoxedTTS> {
    match settings.provider {
        TTSProvider::Murf => {
            let config = settings.murf.clone().ok_or_else(|| {
                TTSError::InvalidConfiguration("Murf settings were not resolved".to_string())
            })?;
            Ok(Box::new(MurfTTS::new(config)?))
        }
        other => Err(TTSError::InvalidConfiguration(format!(
            "TTS provider '{other}' has no in-process client. Built-in providers: murf"
        ))),
    }
}
