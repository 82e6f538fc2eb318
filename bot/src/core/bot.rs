//! Resolved plan of one bot session.
//!
//! A [`BotPlan`] is everything an external pipeline runner needs to assemble
//! the STT → LLM → TTS pipeline: vendor settings, the seeded LLM context, and
//! the pipeline parameters. It is data only; nothing here runs the pipeline.

use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{BotConfig, ConfigError};
use crate::core::llm::LLMSettings;
use crate::core::prompt::{ConversationContext, KnowledgeBase, PromptError, SystemPrompt};
use crate::core::stt::STTSettings;
use crate::core::tts::{BoxedTTS, TTSResult, TTSSettings, create_tts_provider};

/// Seconds of silence before VAD ends the user's turn
pub const DEFAULT_VAD_STOP_SECS: f32 = 0.2;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Parameters handed to the pipeline task
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineParams {
    pub enable_metrics: bool,
    pub enable_usage_metrics: bool,
    pub vad_stop_secs: f32,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            enable_metrics: true,
            enable_usage_metrics: true,
            vad_stop_secs: DEFAULT_VAD_STOP_SECS,
        }
    }
}

/// Processors of the linear pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    TransportInput,
    Rtvi,
    Stt,
    UserAggregator,
    Llm,
    Tts,
    TransportOutput,
    AssistantAggregator,
}

/// Order in which frames traverse the pipeline
pub const PIPELINE_STAGES: [PipelineStage; 8] = [
    PipelineStage::TransportInput,
    PipelineStage::Rtvi,
    PipelineStage::Stt,
    PipelineStage::UserAggregator,
    PipelineStage::Llm,
    PipelineStage::Tts,
    PipelineStage::TransportOutput,
    PipelineStage::AssistantAggregator,
];

pub struct BotPlan {
    pub stt: STTSettings,
    pub llm: LLMSettings,
    pub tts: TTSSettings,
    pub knowledge: KnowledgeBase,
    pub system_prompt: String,
    pub context: ConversationContext,
    pub params: PipelineParams,
    /// Cancelled when the client goes away; the pipeline runner stops on it
    cancel: CancellationToken,
}

impl BotPlan {
    /// Resolve every collaborator of a session from `config`.
    pub fn from_config(config: &BotConfig) -> Result<Self, PlanError> {
        let stt = STTSettings::from_config(config)?;
        let llm = LLMSettings::from_config(config)?;
        let tts = TTSSettings::from_config(config)?;

        let knowledge = KnowledgeBase::load(&config.knowledge_file)?;
        let system_prompt = SystemPrompt::render(&knowledge, &config.bot_language);
        let context = ConversationContext::initial(system_prompt.clone());

        info!(
            stt = %stt.provider,
            llm = %llm.provider,
            tts = %tts.provider,
            knowledge_chars = knowledge.char_count(),
            "Bot plan resolved"
        );

        Ok(Self {
            stt,
            llm,
            tts,
            knowledge,
            system_prompt,
            context,
            params: PipelineParams::default(),
            cancel: CancellationToken::new(),
        })
    }

    /// Build the in-process TTS adapter for the selected vendor.
    pub fn tts_adapter(&self) -> TTSResult<BoxedTTS> {
        create_tts_provider(&self.tts)
    }

    /// Pipeline stages in frame order
    pub fn stages(&self) -> &'static [PipelineStage] {
        &PIPELINE_STAGES
    }

    /// Queue the greeting instruction for a newly connected client
    pub fn on_client_connected(&mut self) {
        if self.cancel.is_cancelled() {
            debug!("Session already cancelled, skipping greeting");
            return;
        }
        info!("Client connected, queueing greeting");
        self.context.push_greeting();
    }

    /// Cancel the session once the client disconnects
    pub fn on_client_disconnected(&self) {
        info!("Client disconnected, cancelling session");
        self.cancel.cancel();
    }

    /// Token the pipeline runner watches for session cancellation
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Provider summary for display
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "stt": {
                "provider": self.stt.provider.as_str(),
                "model": self.stt.model,
                "language": self.stt.language,
            },
            "llm": {
                "provider": self.llm.provider.as_str(),
                "model": self.llm.model,
            },
            "tts": {
                "provider": self.tts.provider.as_str(),
                "voice_id": self.tts.voice_id,
                "model": self.tts.model,
                "sample_rate": self.tts.sample_rate,
                "in_process": self.tts.provider.is_builtin(),
            },
            "knowledge": {
                "source": self.knowledge.source().map(|p| p.display().to_string()),
                "chars": self.knowledge.char_count(),
            },
            "pipeline": {
                "params": self.params,
                "stages": self.stages(),
            },
        })
    }
}
