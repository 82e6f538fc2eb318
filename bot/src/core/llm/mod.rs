//! LLM provider selection.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{BotConfig, ConfigError};

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    #[default]
    OpenAI,
}

impl LLMProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved settings for the chat-completion service
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct LLMSettings {
    #[zeroize(skip)]
    pub provider: LLMProvider,
    pub api_key: String,
    /// Model override; `None` leaves the client's default in place
    pub model: Option<String>,
}

impl LLMSettings {
    pub fn from_config(config: &BotConfig) -> Result<Self, ConfigError> {
        let provider = LLMProvider::OpenAI;
        let api_key = config
            .api_key_for(provider.api_key_env())
            .ok_or(ConfigError::MissingApiKey(provider.api_key_env()))?;

        Ok(Self {
            provider,
            api_key,
            model: config.openai_model.clone(),
        })
    }
}

impl fmt::Debug for LLMSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LLMSettings")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_settings() {
        let mut config = BotConfig::default();
        config.openai_api_key = Some("sk-test".to_string());
        config.openai_model = Some("gpt-4o-mini".to_string());

        let settings = LLMSettings::from_config(&config).unwrap();
        assert_eq!(settings.provider, LLMProvider::OpenAI);
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.model.as_deref(), Some("gpt-4o-mini"));
        assert!(!format!("{settings:?}").contains("sk-test"));
    }

    #[test]
    fn test_missing_openai_key() {
        let err = LLMSettings::from_config(&BotConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Missing API key: set OPENAI_API_KEY");
    }
}
