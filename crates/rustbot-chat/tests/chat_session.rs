//! A full question/answer turn against a mocked Ollama server

use rustbot_chat::{Assistant, ChatConfig, ChatError, OllamaChatClient, Turn, dump_chat};
use rustbot_search::SearchError;
use rustbot_search::test_mocks::MockSearch;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_gate(server: &MockServer, verdict: &str) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": verdict},
            "done": true,
        })))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

fn ollama(server: &MockServer) -> Arc<OllamaChatClient> {
    let config = ChatConfig {
        base_url: server.uri(),
        ..ChatConfig::default()
    };
    Arc::new(OllamaChatClient::new(&config).expect("Should build client"))
}

fn search_with_knowledge() -> Arc<MockSearch> {
    Arc::new(MockSearch::with_results(vec![(
        "kb/closures.md".to_string(),
        "Closures capture their environment.".to_string(),
        0.8,
    )]))
}

#[tokio::test]
async fn test_streamed_answer_and_transcript() {
    let server = MockServer::start().await;
    mount_gate(&server, "Yes").await;

    let stream_body = concat!(
        "{\"message\":{\"role\":\"assistant\",\"content\":\"Closures \"},\"done\":false}\n",
        "{\"message\":{\"role\":\"assistant\",\"content\":\"capture variables.\"},\"done\":false}\n",
        "{\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true,\"done_reason\":\"stop\"}\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_string(stream_body))
        .expect(1)
        .mount(&server)
        .await;

    let client = ollama(&server);
    let mut assistant = Assistant::new(Arc::clone(&client) as _, search_with_knowledge());

    let mut printed = Vec::new();
    let turn = assistant
        .respond("How do closures work?", |fragment| printed.push(fragment.to_string()))
        .await
        .expect("Should answer");

    assert_eq!(turn, Turn::Answered("Closures capture variables.".to_string()));
    assert_eq!(printed, vec!["Closures ", "capture variables."]);

    // the summary request is another non-streaming chat call
    mount_gate(&server, "closures in rust").await;
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dump_chat(client.as_ref(), assistant.history(), dir.path())
        .await
        .expect("Should save transcript");

    let contents = std::fs::read_to_string(&path).expect("Should read transcript");
    assert_eq!(
        contents,
        "User: How do closures work?\nAssistant: Closures capture variables.\n"
    );
    assert!(
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("ClosuresInRust_"))
    );
}

#[tokio::test]
async fn test_no_matching_knowledge_skips_answer() {
    let server = MockServer::start().await;
    mount_gate(&server, "yes").await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut assistant = Assistant::new(ollama(&server), Arc::new(MockSearch::empty()));
    let result = assistant.respond("What is a closure?", |_| {}).await;

    assert!(matches!(
        result,
        Err(ChatError::Search(SearchError::NoMatchingKnowledge { .. }))
    ));
}
