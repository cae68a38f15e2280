#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use awc_core::assistant::{FALLBACK_REPLY, PERSONA};
use awc_core::{Assistant, AssistantConfig};

const GENERATE_PATH: &str = "/v1beta/models/church-model:generateContent";

fn config(server: &MockServer) -> AssistantConfig {
    let mut config = AssistantConfig::new(Url::parse(&server.uri()).unwrap(), "church-model");
    config.api_key = Some(SecretString::from("gem-key".to_owned()));
    config
}

#[tokio::test]
async fn answers_under_the_church_persona() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "gem-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": PERSONA }] },
            "contents": [{ "role": "user", "parts": [{ "text": "When is youth group?" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Fridays at 7pm." }] }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let assistant = Assistant::from_config(&config(&server)).unwrap();
    assert!(assistant.is_enabled());
    // surrounding whitespace is trimmed before sending
    assert_eq!(assistant.ask("  When is youth group?\n").await, "Fridays at 7pm.");
}

#[tokio::test]
async fn backend_errors_become_the_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": 500, "message": "internal", "status": "INTERNAL" }
        })))
        .mount(&server)
        .await;

    let assistant = Assistant::from_config(&config(&server)).unwrap();
    assert_eq!(assistant.ask("Tell me about baptism").await, FALLBACK_REPLY);
}

#[tokio::test]
async fn empty_candidates_become_the_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let assistant = Assistant::from_config(&config(&server)).unwrap();
    assert_eq!(assistant.ask("Hello").await, FALLBACK_REPLY);
}

#[tokio::test]
async fn missing_key_disables_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config(&server);
    config.api_key = None;
    let assistant = Assistant::from_config(&config).unwrap();
    assert!(!assistant.is_enabled());
    assert_eq!(assistant.ask("Hello").await, FALLBACK_REPLY);
}
