//! Chat model access and the retrieval-augmented conversation loop

pub mod assistant;
pub mod message;
pub mod ollama;
pub mod prompts;
pub mod traits;
pub mod transcript;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use assistant::{Assistant, ERROR_RESPONSE, Turn, is_exit_command};
pub use message::{ChatMessage, Role};
pub use ollama::OllamaChatClient;
pub use traits::{ChatClient, ReplyStream};
pub use transcript::{dump_chat, transcript_file_name};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockChatClient;
