pub mod audio;
pub mod bot;
pub mod llm;
pub mod prompt;
pub mod stt;
pub mod tts;

// Re-export commonly used types for convenience
pub use audio::{AudioError, AudioFrame, PcmFormat, strip_wav_header};

pub use bot::{BotPlan, PipelineParams, PipelineStage, PlanError};

pub use llm::{LLMProvider, LLMSettings};

pub use prompt::{ChatMessage, ConversationContext, KnowledgeBase, PromptError, SystemPrompt};

pub use stt::{STTProvider, STTSettings, get_supported_stt_providers};

pub use tts::{
    BaseTTS, BoxedTTS, MurfTTS, MurfTTSConfig, TTSError, TTSErrorKind, TTSEvent, TTSEventStream,
    TTSProvider, TTSResult, TTSSettings, create_tts_provider, get_supported_tts_providers,
};
