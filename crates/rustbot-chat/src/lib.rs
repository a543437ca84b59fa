//! Rustbot chat crate
//!
//! Talks to an Ollama-compatible chat model, gates questions on relevance,
//! grounds answers in retrieved knowledge and saves conversation transcripts.

pub mod chat;
pub mod error;

// Re-export main types
pub use chat::{
    Assistant, ChatClient, ChatMessage, ERROR_RESPONSE, OllamaChatClient, ReplyStream, Role, Turn,
    dump_chat, is_exit_command, transcript_file_name,
};
pub use error::{ChatError, ChatResult};
pub use rustbot_config::ChatConfig;

#[cfg(any(test, feature = "test-utils"))]
pub use chat::MockChatClient;
