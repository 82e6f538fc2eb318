//! Environment variable loading.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use super::{BotConfig, ConfigError, MurfSettings};
use crate::core::stt::STTProvider;
use crate::core::tts::TTSProvider;
use crate::core::tts::murf::MurfAuthScheme;
use crate::utils::url_validation::AudioUrlPolicy;

/// Trimmed value of `key`, or `None` when unset or blank
fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `key` with `FromStr`, reporting the variable name on failure
fn env_parse<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    env_string(key)
        .map(|v| v.parse::<T>().map_err(|e| ConfigError::invalid(key, e)))
        .transpose()
}

/// Provider names keep their own `UnsupportedProvider` error
fn env_provider<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = ConfigError>,
{
    env_string(key).map(|v| v.parse::<T>()).transpose()
}

/// Build a [`BotConfig`] from environment variables, falling back to defaults.
pub(super) fn load_from_env() -> Result<BotConfig, ConfigError> {
    let defaults = BotConfig::default();
    let murf_defaults = MurfSettings::default();

    let murf = MurfSettings {
        api_url: env_string("MURF_API_URL").unwrap_or(murf_defaults.api_url),
        voice_id: env_string("MURF_VOICE_ID").unwrap_or(murf_defaults.voice_id),
        style: env_string("MURF_STYLE"),
        model_version: env_string("MURF_MODEL_VERSION"),
        auth_scheme: env_string("MURF_AUTH_SCHEME")
            .map(|s| MurfAuthScheme::from_str_or_default(&s))
            .unwrap_or(murf_defaults.auth_scheme),
        sample_rate: env_parse("MURF_SAMPLE_RATE")?.unwrap_or(murf_defaults.sample_rate),
        request_timeout_secs: env_parse("TTS_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(murf_defaults.request_timeout_secs),
        frame_duration_ms: env_parse("MURF_FRAME_MS")?,
        audio_url_policy: env_string("MURF_AUDIO_URL_POLICY")
            .map(|s| AudioUrlPolicy::from_str_or_default(&s))
            .unwrap_or(murf_defaults.audio_url_policy),
    };

    Ok(BotConfig {
        stt_provider: env_provider::<STTProvider>("STT_PROVIDER")?.unwrap_or(defaults.stt_provider),
        tts_provider: env_provider::<TTSProvider>("TTS_PROVIDER")?.unwrap_or(defaults.tts_provider),
        knowledge_file: env_string("KNOWLEDGE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| defaults.knowledge_file.clone()),
        bot_language: env_string("BOT_LANGUAGE").unwrap_or_else(|| defaults.bot_language.clone()),
        soniox_api_key: env_string("SONIOX_API_KEY"),
        soniox_model: env_string("SONIOX_MODEL").unwrap_or_else(|| defaults.soniox_model.clone()),
        deepgram_api_key: env_string("DEEPGRAM_API_KEY"),
        sarvam_api_key: env_string("SARVAM_API_KEY"),
        murf_api_key: env_string("MURF_API_KEY"),
        eleven_labs_api_key: env_string("ELEVEN_LABS_API_KEY"),
        cartesia_api_key: env_string("CARTESIA_API_KEY"),
        openai_api_key: env_string("OPENAI_API_KEY"),
        openai_model: env_string("OPENAI_MODEL"),
        murf,
    })
}
