//! Scripted chat client for tests

use super::traits::{ChatClient, ReplyStream};
use super::ChatMessage;
use crate::{ChatError, ChatResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock client answering with queued replies, in order
///
/// Every request is recorded so tests can inspect what the model was sent.
/// Streamed replies are cut into word-sized fragments.
#[derive(Default)]
pub struct MockChatClient {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatClient {
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Conversations sent so far, one entry per request
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .ok_or_else(|| ChatError::Network("No scripted reply left".into()))
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn chat(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        self.next_reply(messages)
    }

    async fn chat_stream(&self, messages: &[ChatMessage]) -> ChatResult<ReplyStream> {
        let reply = self.next_reply(messages)?;
        let fragments: Vec<ChatResult<String>> = reply
            .split_inclusive(' ')
            .map(|fragment| Ok(fragment.to_string()))
            .collect();
        Ok(Box::pin(futures::stream::iter(fragments)))
    }

    fn model_name(&self) -> &str {
        "mock-chat-model"
    }
}
