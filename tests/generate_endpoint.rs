//! Integration tests for `POST /api/generate`
//!
//! Drives the full router against a wiremock provider speaking the
//! chat-completions protocol, and checks status, body, and what the provider
//! actually received.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use flashai::config::Config;
use flashai::generation::{OpenAiProvider, SYSTEM_PROMPT};
use flashai::handlers::{self, AppState};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PHOTOSYNTHESIS: &str = "Photosynthesis is the process by which green plants use sunlight, \
water and carbon dioxide to produce glucose and oxygen. It takes place in the chloroplasts, \
which contain the pigment chlorophyll that absorbs light energy.";

fn config_for(server: &MockServer) -> Config {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = 3000

[provider]
base_url = "{}"
model = "gpt-4o-mini"
timeout_ms = 5000
"#,
        server.uri()
    )
    .parse()
    .expect("should parse test config")
}

fn app_for(server: &MockServer) -> axum::Router {
    let config = config_for(server);
    let provider =
        OpenAiProvider::new(&config.provider, "test-key").expect("should build provider");
    let state = AppState::with_provider(config, Arc::new(provider)).expect("should build state");
    handlers::router(state)
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

fn cards_json(n: usize) -> String {
    let cards: Vec<Value> = (1..=n)
        .map(|i| json!({ "front": format!("Question {}?", i), "back": format!("Answer {}.", i) }))
        .collect();
    Value::Array(cards).to_string()
}

async fn post_generate(app: axum::Router, body: Body) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_text(app: axum::Router, text: &str) -> (StatusCode, Value) {
    post_generate(app, Body::from(json!({ "text": text }).to_string())).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Success path
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_generates_cards_in_provider_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(completion(&cards_json(6)))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_text(app_for(&server), PHOTOSYNTHESIS).await;

    assert_eq!(status, StatusCode::OK);
    let cards = body["cards"].as_array().expect("cards array");
    assert_eq!(cards.len(), 6);
    assert_eq!(cards[0]["front"], "Question 1?");
    assert_eq!(cards[5]["back"], "Answer 6.");
}

#[tokio::test]
async fn test_provider_receives_prompt_and_settings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(&cards_json(5)))
        .expect(1)
        .mount(&server)
        .await;

    let (status, _) = post_text(app_for(&server), &format!("  {}  \n", PHOTOSYNTHESIS)).await;
    assert_eq!(status, StatusCode::OK);

    let requests = server.received_requests().await.expect("recording enabled");
    let sent: Value = requests[0].body_json().unwrap();
    assert_eq!(sent["model"], "gpt-4o-mini");
    assert_eq!(sent["max_tokens"], 800);
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][0]["content"], SYSTEM_PROMPT);
    assert_eq!(sent["messages"][1]["role"], "user");
    assert_eq!(sent["messages"][1]["content"], PHOTOSYNTHESIS);
}

#[tokio::test]
async fn test_long_input_is_truncated_before_provider_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(&cards_json(5)))
        .expect(1)
        .mount(&server)
        .await;

    let text = "é".repeat(9000);
    let (status, _) = post_text(app_for(&server), &text).await;
    assert_eq!(status, StatusCode::OK);

    let requests = server.received_requests().await.expect("recording enabled");
    let sent: Value = requests[0].body_json().unwrap();
    let user = sent["messages"][1]["content"].as_str().unwrap();
    assert_eq!(user.chars().count(), 8000);
}

#[tokio::test]
async fn test_more_than_ten_cards_are_capped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(&cards_json(15)))
        .mount(&server)
        .await;

    let (status, body) = post_text(app_for(&server), PHOTOSYNTHESIS).await;

    assert_eq!(status, StatusCode::OK);
    let cards = body["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 10);
    assert_eq!(cards[9]["front"], "Question 10?");
}

#[tokio::test]
async fn test_invalid_entries_are_dropped() {
    let server = MockServer::start().await;
    let raw = json!([
        { "front": "What is chlorophyll?", "back": "A green pigment." },
        { "front": "   ", "back": "Blank front" },
        { "front": "Where does it happen?", "back": "In chloroplasts." },
        "not an object",
        { "front": "What is produced?", "back": "Glucose and oxygen." }
    ])
    .to_string();
    Mock::given(method("POST"))
        .respond_with(completion(&raw))
        .mount(&server)
        .await;

    let (status, body) = post_text(app_for(&server), PHOTOSYNTHESIS).await;

    assert_eq!(status, StatusCode::OK);
    let cards = body["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[1]["front"], "Where does it happen?");
}

#[tokio::test]
async fn test_body_is_read_without_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(&cards_json(6)))
        .expect(1)
        .mount(&server)
        .await;

    let response = app_for(&server)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate")
                .body(Body::from(json!({ "text": PHOTOSYNTHESIS }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["cards"].as_array().unwrap().len(), 6);
}

// ─────────────────────────────────────────────────────────────────────────────
// Input rejection (no provider call)
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_short_input_is_rejected_without_provider_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(&cards_json(5)))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = post_text(app_for(&server), &"a".repeat(30)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("50"));
}

#[tokio::test]
async fn test_whitespace_only_input_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(&cards_json(5)))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = post_text(app_for(&server), " \n\t ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Please provide study material to generate flashcards from."
    );
}

#[tokio::test]
async fn test_unreadable_body_is_empty_input() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(&cards_json(5)))
        .expect(0)
        .mount(&server)
        .await;

    let (status, _) = post_generate(app_for(&server), Body::from("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_generate(app_for(&server), Body::from(r#"{"other": 1}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_generate(app_for(&server), Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider output and provider failures
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_array_output_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(r#"{"front":"Q","back":"A"}"#))
        .mount(&server)
        .await;

    let (status, body) = post_text(app_for(&server), PHOTOSYNTHESIS).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "AI response was not in the expected format. Please try again."
    );
}

#[tokio::test]
async fn test_all_invalid_entries_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(r#"[{"front":"","back":""},{"question":"Q"}]"#))
        .mount(&server)
        .await;

    let (status, body) = post_text(app_for(&server), PHOTOSYNTHESIS).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "AI did not return any flashcards. Try again.");
}

#[tokio::test]
async fn test_provider_error_does_not_leak_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("invalid api key sk-live-secret-value"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_text(app_for(&server), PHOTOSYNTHESIS).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert_eq!(message, "Failed to generate flashcards. Please try again.");
    assert!(!message.contains("sk-live"));
}

#[tokio::test]
async fn test_identical_requests_each_call_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(&cards_json(5)))
        .expect(2)
        .mount(&server)
        .await;

    let app = app_for(&server);
    let (first, _) = post_text(app.clone(), PHOTOSYNTHESIS).await;
    let (second, _) = post_text(app, PHOTOSYNTHESIS).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(&cards_json(7)))
        .expect(4)
        .mount(&server)
        .await;

    let app = app_for(&server);
    let short = "too short".to_string();
    let inputs = vec![
        PHOTOSYNTHESIS.to_string(),
        short.clone(),
        PHOTOSYNTHESIS.to_string(),
        PHOTOSYNTHESIS.to_string(),
        short,
        PHOTOSYNTHESIS.to_string(),
    ];

    let results = futures::future::join_all(
        inputs
            .iter()
            .map(|text| post_text(app.clone(), text.as_str())),
    )
    .await;

    let ok = results.iter().filter(|(s, _)| *s == StatusCode::OK).count();
    let rejected = results
        .iter()
        .filter(|(s, _)| *s == StatusCode::BAD_REQUEST)
        .count();
    assert_eq!(ok, 4);
    assert_eq!(rejected, 2);
    for (status, body) in &results {
        if *status == StatusCode::OK {
            assert_eq!(body["cards"].as_array().unwrap().len(), 7);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ambient routes
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = MockServer::start().await;
    let response = app_for(&server)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "7b6f7a8e-3c1d-4f2a-9a57-1f0d2c3b4a59")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "7b6f7a8e-3c1d-4f2a-9a57-1f0d2c3b4a59"
    );
}

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion(&cards_json(5)))
        .mount(&server)
        .await;

    let app = app_for(&server);
    post_text(app.clone(), PHOTOSYNTHESIS).await;
    post_text(app.clone(), "short").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#"flashai_generation_requests_total{outcome="success"} 1"#));
    assert!(text.contains(r#"flashai_generation_requests_total{outcome="too_short"} 1"#));
}
