//! System prompt assembly.
//!
//! The bot answers only from a static knowledge document. The document is
//! loaded once, spliced into the system prompt, and the prompt seeds the LLM
//! conversation context.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Instruction appended when a client connects, to make the bot speak first
pub const GREETING_INSTRUCTION: &str = "Say hello and briefly introduce yourself.";

/// Language the bot answers in unless configured otherwise
pub const DEFAULT_LANGUAGE: &str = "Telugu";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read knowledge file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Static reference document the bot answers from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    text: String,
    source: Option<PathBuf>,
}

impl KnowledgeBase {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    /// Load the document at `path`.
    ///
    /// A missing file is not an error: the bot starts with an empty knowledge
    /// base and a warning is logged. Any other read failure, including invalid
    /// UTF-8, is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                info!(
                    path = %path.display(),
                    chars = text.chars().count(),
                    "Loaded knowledge base"
                );
                Ok(Self {
                    text,
                    source: Some(path.to_path_buf()),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Knowledge file not found, using empty knowledge base");
                Ok(Self::default())
            }
            Err(source) => Err(PromptError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File the document was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Rendered system prompt
pub struct SystemPrompt;

impl SystemPrompt {
    /// Render the knowledge-grounded system prompt for `language`.
    pub fn render(knowledge: &KnowledgeBase, language: &str) -> String {
        format!(
            "You are a friendly AI assistant. You must ALWAYS respond in {language} language only. \
Never use English or any other language in your responses.

IMPORTANT: Answer questions ONLY based on the following knowledge base document. \
If the answer is not in the document, politely say you don't have that information in {language}.

Knowledge Base:
{knowledge}

Instructions:
- Answer only from the above document
- Always respond in {language}
- Be conversational and helpful
- If information is not in the document, say so honestly in {language}
",
            knowledge = knowledge.text()
        )
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Messages handed to the LLM service, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationContext {
    messages: Vec<ChatMessage>,
}

impl ConversationContext {
    /// Context holding only the system prompt
    pub fn initial(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system_prompt)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Append the instruction that makes the bot greet a newly connected client
    pub fn push_greeting(&mut self) {
        self.push(ChatMessage::system(GREETING_INSTRUCTION));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
