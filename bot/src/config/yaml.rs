use serde::Deserialize;
use std::path::PathBuf;

use super::{BotConfig, ConfigError};
use crate::core::tts::murf::MurfAuthScheme;
use crate::utils::url_validation::AudioUrlPolicy;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here
/// override the environment.
///
/// # Example YAML structure
/// ```yaml
/// bot:
///   stt_provider: "soniox"
///   tts_provider: "murf"
///   knowledge_file: "resource_document.txt"
///   language: "Telugu"
///
/// providers:
///   soniox_api_key: "your-soniox-key"
///   soniox_model: "stt-rt-v3"
///   murf_api_key: "your-murf-key"
///   openai_api_key: "your-openai-key"
///
/// murf:
///   api_url: "https://api.murf.ai/v1/speech/generate"
///   voice_id: "en-US-ken"
///   style: "Conversational"
///   auth_scheme: "api-key"
///   sample_rate: 16000
///   request_timeout_secs: 30
///   frame_duration_ms: 20
///   audio_url_policy: "strict"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub bot: Option<BotYaml>,
    pub providers: Option<ProvidersYaml>,
    pub murf: Option<MurfYaml>,
}

/// Bot settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct BotYaml {
    pub stt_provider: Option<String>,
    pub tts_provider: Option<String>,
    pub knowledge_file: Option<String>,
    pub language: Option<String>,
}

/// Provider API keys from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersYaml {
    pub soniox_api_key: Option<String>,
    pub soniox_model: Option<String>,
    pub deepgram_api_key: Option<String>,
    pub sarvam_api_key: Option<String>,
    pub murf_api_key: Option<String>,
    pub eleven_labs_api_key: Option<String>,
    pub cartesia_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
}

/// Murf adapter settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MurfYaml {
    pub api_url: Option<String>,
    pub voice_id: Option<String>,
    pub style: Option<String>,
    pub model_version: Option<String>,
    pub auth_scheme: Option<MurfAuthScheme>,
    pub sample_rate: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub frame_duration_ms: Option<u32>,
    pub audio_url_policy: Option<AudioUrlPolicy>,
}

/// Overwrite `target` when `value` is set
fn overlay<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

/// Overwrite an optional `target` when `value` is set
fn overlay_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

impl YamlConfig {
    /// Load YAML configuration from a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is malformed, or
    /// a field has an invalid type.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config: YamlConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply every value present in this file on top of `config`.
    pub fn apply_to(self, config: &mut BotConfig) -> Result<(), ConfigError> {
        if let Some(bot) = self.bot {
            if let Some(name) = bot.stt_provider {
                config.stt_provider = name.parse()?;
            }
            if let Some(name) = bot.tts_provider {
                config.tts_provider = name.parse()?;
            }
            overlay(&mut config.knowledge_file, bot.knowledge_file.map(PathBuf::from));
            overlay(&mut config.bot_language, bot.language);
        }

        if let Some(providers) = self.providers {
            overlay_opt(&mut config.soniox_api_key, providers.soniox_api_key);
            overlay(&mut config.soniox_model, providers.soniox_model);
            overlay_opt(&mut config.deepgram_api_key, providers.deepgram_api_key);
            overlay_opt(&mut config.sarvam_api_key, providers.sarvam_api_key);
            overlay_opt(&mut config.murf_api_key, providers.murf_api_key);
            overlay_opt(&mut config.eleven_labs_api_key, providers.eleven_labs_api_key);
            overlay_opt(&mut config.cartesia_api_key, providers.cartesia_api_key);
            overlay_opt(&mut config.openai_api_key, providers.openai_api_key);
            overlay_opt(&mut config.openai_model, providers.openai_model);
        }

        if let Some(murf) = self.murf {
            let target = &mut config.murf;
            overlay(&mut target.api_url, murf.api_url);
            overlay(&mut target.voice_id, murf.voice_id);
            overlay_opt(&mut target.style, murf.style);
            overlay_opt(&mut target.model_version, murf.model_version);
            overlay(&mut target.auth_scheme, murf.auth_scheme);
            overlay(&mut target.sample_rate, murf.sample_rate);
            overlay(&mut target.request_timeout_secs, murf.request_timeout_secs);
            overlay_opt(&mut target.frame_duration_ms, murf.frame_duration_ms);
            overlay(&mut target.audio_url_policy, murf.audio_url_policy);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stt::STTProvider;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
bot:
  stt_provider: "sarvam"
  tts_provider: "murf"
  knowledge_file: "/srv/kb.txt"
  language: "Tamil"

providers:
  sarvam_api_key: "sarvam-key"
  murf_api_key: "murf-key"
  openai_api_key: "sk-key"
  openai_model: "gpt-4o"

murf:
  api_url: "https://murf.internal/v1/speech/generate"
  voice_id: "ta-IN-iniya"
  style: "Conversational"
  model_version: "GEN2"
  auth_scheme: "bearer"
  sample_rate: 24000
  request_timeout_secs: 10
  frame_duration_ms: 40
  audio_url_policy: "permissive"
"#;

        let yaml_config: YamlConfig = serde_yaml::from_str(yaml).unwrap();
        let mut config = BotConfig::default();
        yaml_config.apply_to(&mut config).unwrap();

        assert_eq!(config.stt_provider, STTProvider::Sarvam);
        assert_eq!(config.knowledge_file, PathBuf::from("/srv/kb.txt"));
        assert_eq!(config.bot_language, "Tamil");
        assert_eq!(config.sarvam_api_key.as_deref(), Some("sarvam-key"));
        assert_eq!(config.openai_model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.murf.voice_id, "ta-IN-iniya");
        assert_eq!(config.murf.auth_scheme, MurfAuthScheme::Bearer);
        assert_eq!(config.murf.sample_rate, 24000);
        assert_eq!(config.murf.request_timeout_secs, 10);
        assert_eq!(config.murf.frame_duration_ms, Some(40));
        assert_eq!(config.murf.audio_url_policy, AudioUrlPolicy::Permissive);
    }

    #[test]
    fn test_yaml_config_partial_keeps_base() {
        let yaml_config: YamlConfig = serde_yaml::from_str("murf:\n  style: \"Calm\"\n").unwrap();
        let mut config = BotConfig::default();
        config.murf_api_key = Some("env-key".to_string());
        yaml_config.apply_to(&mut config).unwrap();

        assert_eq!(config.murf.style.as_deref(), Some("Calm"));
        assert_eq!(config.murf.voice_id, "en-US-ken");
        assert_eq!(config.murf_api_key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_yaml_config_empty() {
        let yaml_config: YamlConfig = serde_yaml::from_str("{}").unwrap();
        assert!(yaml_config.bot.is_none());
        assert!(yaml_config.providers.is_none());
        assert!(yaml_config.murf.is_none());
    }

    #[test]
    fn test_yaml_unknown_provider_is_error() {
        let yaml_config: YamlConfig =
            serde_yaml::from_str("bot:\n  stt_provider: \"whisper\"\n").unwrap();
        let mut config = BotConfig::default();
        assert!(matches!(
            yaml_config.apply_to(&mut config),
            Err(ConfigError::UnsupportedProvider { kind: "STT", .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "bot:\n  language: \"Kannada\"\n").unwrap();

        let config = YamlConfig::from_file(&config_path).unwrap();
        assert_eq!(
            config.bot.as_ref().unwrap().language,
            Some("Kannada".to_string())
        );
    }

    #[test]
    fn test_from_file_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.yaml");
        fs::write(&config_path, "invalid: yaml: content:").unwrap();

        let result = YamlConfig::from_file(&config_path);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse YAML")
        );
    }
}
