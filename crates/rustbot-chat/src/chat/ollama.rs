//! Ollama chat client
//!
//! Uses `POST {base_url}/api/chat`. With `stream: false` the server answers
//! with a single JSON object; with `stream: true` it sends newline-delimited
//! JSON objects, each carrying the next fragment of the reply, the last one
//! flagged `done`.

use super::traits::{ChatClient, ReplyStream};
use super::ChatMessage;
use crate::{ChatError, ChatResult};
use async_trait::async_trait;
use futures::{Stream, StreamExt, stream};
use reqwest::Client;
use rustbot_config::ChatConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ReplyMessage>,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

/// Chat client backed by an Ollama server
pub struct OllamaChatClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaChatClient {
    /// Create a client from the chat configuration
    ///
    /// # Errors
    /// Returns `ChatError::Config` if the HTTP client cannot be built
    pub fn new(config: &ChatConfig) -> ChatResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }

    async fn send(&self, messages: &[ChatMessage], stream: bool) -> ChatResult<reqwest::Response> {
        tracing::debug!(
            model = %self.model,
            message_count = messages.len(),
            stream,
            "Sending chat request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest {
                model: &self.model,
                messages,
                stream,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api { status, body });
        }

        Ok(response)
    }
}

/// Decode one NDJSON line into its reply fragment
///
/// Returns the fragment (possibly empty) and whether the reply is complete.
fn parse_line(line: &[u8]) -> ChatResult<(String, bool)> {
    let parsed: ChatResponse = serde_json::from_slice(line)
        .map_err(|e| ChatError::InvalidResponse(format!("Malformed stream line: {e}")))?;

    if let Some(error) = parsed.error {
        return Err(ChatError::Api {
            status: 200,
            body: error,
        });
    }

    let content = parsed.message.map(|m| m.content).unwrap_or_default();
    Ok((content, parsed.done))
}

struct LineState<S> {
    bytes: S,
    buffer: Vec<u8>,
    finished: bool,
}

/// Turn a byte stream of NDJSON chat responses into reply fragments
///
/// Lines may be split across byte chunks. Empty fragments are skipped and the
/// stream ends at the `done` line or when the bytes run out.
pub(crate) fn reply_fragments<S, E>(bytes: S) -> ReplyStream
where
    S: Stream<Item = Result<Vec<u8>, E>> + Send + 'static,
    E: Into<ChatError> + Send + 'static,
{
    let state = LineState {
        bytes: Box::pin(bytes),
        buffer: Vec::new(),
        finished: false,
    };

    let fragments = stream::unfold(state, |mut state| async move {
        loop {
            if let Some(newline) = state.buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = state.buffer.drain(..=newline).collect();
                if line.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                match parse_line(&line) {
                    Ok((fragment, done)) => {
                        if done {
                            state.finished = true;
                            state.buffer.clear();
                        }
                        if !fragment.is_empty() {
                            return Some((Ok(fragment), state));
                        }
                    }
                    Err(e) => {
                        state.finished = true;
                        state.buffer.clear();
                        return Some((Err(e), state));
                    }
                }
                continue;
            }

            if state.finished {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => state.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    state.finished = true;
                    state.buffer.clear();
                    return Some((Err(e.into()), state));
                }
                None => {
                    // flush a final line sent without a trailing newline
                    state.finished = true;
                    if !state.buffer.is_empty() {
                        state.buffer.push(b'\n');
                    }
                }
            }
        }
    });

    Box::pin(fragments)
}

#[async_trait]
impl ChatClient for OllamaChatClient {
    #[tracing::instrument(skip(self, messages), fields(model = %self.model))]
    async fn chat(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        let response = self.send(messages, false).await?;
        let parsed: ChatResponse = response.json().await?;

        if let Some(error) = parsed.error {
            return Err(ChatError::Api {
                status: 200,
                body: error,
            });
        }

        parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| ChatError::InvalidResponse("missing message.content".into()))
    }

    async fn chat_stream(&self, messages: &[ChatMessage]) -> ChatResult<ReplyStream> {
        let response = self.send(messages, true).await?;
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()));
        Ok(reply_fragments(bytes))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OllamaChatClient {
        let config = ChatConfig {
            base_url: server.uri(),
            ..ChatConfig::default()
        };
        OllamaChatClient::new(&config).expect("Should build client")
    }

    async fn collect(stream: ReplyStream) -> Vec<ChatResult<String>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_chat_sends_conversation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "model": "gemma3",
                "messages": [{"role": "user", "content": "Is Rust fast?"}],
                "stream": false,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "gemma3",
                "message": {"role": "assistant", "content": "Yes"},
                "done": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .chat(&[ChatMessage::user("Is Rust fast?")])
            .await
            .expect("Should chat");
        assert_eq!(reply, "Yes");
    }

    #[tokio::test]
    async fn test_chat_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let result = client_for(&server).chat(&[ChatMessage::user("hi")]).await;
        match result {
            Err(ChatError::Api { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "model not found");
            }
            other => panic!("Expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_stream_yields_fragments() {
        let server = MockServer::start().await;
        let body = concat!(
            "{\"message\":{\"role\":\"assistant\",\"content\":\"Own\"},\"done\":false}\n",
            "{\"message\":{\"role\":\"assistant\",\"content\":\"ership\"},\"done\":false}\n",
            "{\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true}\n",
        );
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "model": "gemma3",
                "messages": [{"role": "user", "content": "Explain"}],
                "stream": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let stream = client_for(&server)
            .chat_stream(&[ChatMessage::user("Explain")])
            .await
            .expect("Should open stream");
        let fragments: Vec<String> = collect(stream)
            .await
            .into_iter()
            .map(|f| f.expect("Should decode fragment"))
            .collect();

        assert_eq!(fragments, vec!["Own", "ership"]);
    }

    #[tokio::test]
    async fn test_fragments_split_across_chunks() {
        let line = b"{\"message\":{\"content\":\"caf\xc3\xa9\"},\"done\":true}".to_vec();
        let (head, tail) = line.split_at(25);
        let chunks: Vec<Result<Vec<u8>, ChatError>> = vec![Ok(head.to_vec()), Ok(tail.to_vec())];

        let fragments = collect(reply_fragments(stream::iter(chunks))).await;

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].as_deref().expect("Should decode"), "café");
    }

    #[tokio::test]
    async fn test_malformed_line_ends_stream_with_error() {
        let chunks: Vec<Result<Vec<u8>, ChatError>> = vec![Ok(
            b"{\"message\":{\"content\":\"a\"}}\nnot json\n{\"message\":{\"content\":\"b\"}}\n"
                .to_vec(),
        )];

        let fragments = collect(reply_fragments(stream::iter(chunks))).await;

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].as_deref().expect("Should decode"), "a");
        assert!(matches!(fragments[1], Err(ChatError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_stream_error_line() {
        let chunks: Vec<Result<Vec<u8>, ChatError>> =
            vec![Ok(b"{\"error\":\"model crashed\"}\n".to_vec())];

        let fragments = collect(reply_fragments(stream::iter(chunks))).await;

        assert!(matches!(
            &fragments[..],
            [Err(ChatError::Api { body, .. })] if body == "model crashed"
        ));
    }
}
