//! Retrieval-augmented conversation
//!
//! One turn runs the question through the relevance gate, retrieves knowledge
//! for it, then streams an answer grounded in that knowledge. The history
//! keeps the user's own words and the model's replies; prompts built for a
//! turn are only sent, never recorded.

use super::prompts::{is_relevant, rag_prompt, relevance_prompt};
use super::traits::ChatClient;
use super::ChatMessage;
use crate::{ChatError, ChatResult};
use futures::StreamExt;
use rustbot_common::CorrelationId;
use rustbot_search::SearchService;
use std::sync::Arc;

/// Printed when a turn fails for any reason other than missing knowledge
pub const ERROR_RESPONSE: &str =
    "Something went wrong while answering your question. Maybe try again?";

const EXIT_COMMANDS: [&str; 5] = ["exit", "quit", "q", "bye", "goodbye"];

/// Whether `input` asks to leave the conversation
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_COMMANDS.contains(&input.as_str())
}

/// How a turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// The question was off topic; the gate's reply is returned as is
    Declined(String),
    /// The full grounded answer
    Answered(String),
}

/// Conversation state plus the services a turn needs
pub struct Assistant {
    client: Arc<dyn ChatClient>,
    search: Arc<dyn SearchService>,
    history: Vec<ChatMessage>,
}

impl Assistant {
    pub fn new(client: Arc<dyn ChatClient>, search: Arc<dyn SearchService>) -> Self {
        Self {
            client,
            search,
            history: Vec::new(),
        }
    }

    /// Messages exchanged so far
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn client(&self) -> Arc<dyn ChatClient> {
        Arc::clone(&self.client)
    }

    /// Answer one question, handing each reply fragment to `on_fragment` as
    /// it arrives
    ///
    /// The question is recorded before anything is sent. A declined question
    /// records the gate's reply; an answered one records the streamed answer.
    ///
    /// # Errors
    /// - `ChatError::Search` wrapping `SearchError::NoMatchingKnowledge` when
    ///   retrieval finds nothing similar enough
    /// - `ChatError::EmptyReply` when the gate or the answer comes back empty
    /// - client errors from the chat model
    #[tracing::instrument(skip(self, question, on_fragment), fields(correlation_id))]
    pub async fn respond<F>(&mut self, question: &str, mut on_fragment: F) -> ChatResult<Turn>
    where
        F: FnMut(&str) + Send,
    {
        let correlation_id = CorrelationId::new();
        tracing::Span::current().record("correlation_id", tracing::field::display(&correlation_id));

        self.history.push(ChatMessage::user(question));

        let verdict = self
            .client
            .chat(&[ChatMessage::user(relevance_prompt(question))])
            .await?;
        if verdict.trim().is_empty() {
            return Err(ChatError::EmptyReply);
        }
        if !is_relevant(&verdict) {
            tracing::info!(correlation_id = %correlation_id, "Question declined by relevance gate");
            self.history.push(ChatMessage::assistant(verdict.clone()));
            return Ok(Turn::Declined(verdict));
        }

        let knowledge = self.search.knowledge_for(question, &correlation_id).await?;

        let mut request = self.history.clone();
        if let Some(last) = request.last_mut() {
            last.content = rag_prompt(&knowledge, question);
        }

        let mut stream = self.client.chat_stream(&request).await?;
        let mut reply = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            on_fragment(&fragment);
            reply.push_str(&fragment);
        }

        if reply.trim().is_empty() {
            return Err(ChatError::EmptyReply);
        }

        tracing::info!(
            correlation_id = %correlation_id,
            reply_len = reply.len(),
            "Answered question"
        );
        self.history.push(ChatMessage::assistant(reply.clone()));
        Ok(Turn::Answered(reply))
    }
}
