//! Chat client abstraction

use super::ChatMessage;
use crate::ChatResult;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Incremental reply fragments, in arrival order
pub type ReplyStream = Pin<Box<dyn Stream<Item = ChatResult<String>> + Send>>;

/// Trait for chat model backends
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send the conversation and wait for the complete reply
    async fn chat(&self, messages: &[ChatMessage]) -> ChatResult<String>;

    /// Send the conversation and receive the reply as it is generated
    async fn chat_stream(&self, messages: &[ChatMessage]) -> ChatResult<ReplyStream>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}
