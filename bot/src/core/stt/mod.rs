//! Speech-to-text provider selection.
//!
//! STT runs in an external SDK client; this module only decides which vendor
//! is used and resolves the settings it is constructed with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{BotConfig, ConfigError};

/// Default Soniox real-time model
pub const DEFAULT_SONIOX_MODEL: &str = "stt-rt-v3";

/// Language the Sarvam recogniser is pinned to (Telugu)
pub const SARVAM_STT_LANGUAGE: &str = "te-IN";

/// Supported STT providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum STTProvider {
    /// Soniox real-time STT
    #[default]
    Soniox,
    /// Deepgram streaming STT
    Deepgram,
    /// Sarvam AI STT (Indic languages)
    Sarvam,
}

impl STTProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soniox => "soniox",
            Self::Deepgram => "deepgram",
            Self::Sarvam => "sarvam",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Soniox => "SONIOX_API_KEY",
            Self::Deepgram => "DEEPGRAM_API_KEY",
            Self::Sarvam => "SARVAM_API_KEY",
        }
    }

    pub fn all() -> &'static [STTProvider] {
        &[Self::Soniox, Self::Deepgram, Self::Sarvam]
    }
}

impl fmt::Display for STTProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for STTProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soniox" => Ok(Self::Soniox),
            "deepgram" => Ok(Self::Deepgram),
            "sarvam" => Ok(Self::Sarvam),
            _ => Err(ConfigError::UnsupportedProvider {
                kind: "STT",
                name: s.to_string(),
                supported: get_supported_stt_providers().join(", "),
            }),
        }
    }
}

/// Get a list of all supported STT providers
pub fn get_supported_stt_providers() -> Vec<&'static str> {
    STTProvider::all().iter().map(|p| p.as_str()).collect()
}

/// Resolved settings for the selected STT vendor
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct STTSettings {
    #[zeroize(skip)]
    pub provider: STTProvider,
    pub api_key: String,
    /// Recognition model, when the vendor takes one
    pub model: Option<String>,
    /// Recognition language, when pinned
    pub language: Option<String>,
}

impl STTSettings {
    /// Resolve the settings of `config.stt_provider`.
    ///
    /// Fails with [`ConfigError::MissingApiKey`] when the vendor's key is unset.
    pub fn from_config(config: &BotConfig) -> Result<Self, ConfigError> {
        let provider = config.stt_provider;
        let api_key = config
            .api_key_for(provider.api_key_env())
            .ok_or(ConfigError::MissingApiKey(provider.api_key_env()))?;

        let (model, language) = match provider {
            STTProvider::Soniox => (Some(config.soniox_model.clone()), None),
            STTProvider::Deepgram => (None, None),
            STTProvider::Sarvam => (None, Some(SARVAM_STT_LANGUAGE.to_string())),
        };

        Ok(Self {
            provider,
            api_key,
            model,
            language,
        })
    }
}

impl fmt::Debug for STTSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("STTSettings")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("language", &self.language)
            .finish()
    }
}
