#![allow(clippy::unwrap_used)]
// Integration tests for `AssistantClient` using wiremock.

use secrecy::SecretString;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use awc_api::{AssistantClient, Error, TransportConfig};

const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";

async fn setup() -> (MockServer, AssistantClient) {
    let server = MockServer::start().await;
    let key = SecretString::from("gem-key".to_string());
    let client = AssistantClient::new(
        &server.uri(),
        &key,
        "test-model",
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

#[tokio::test]
async fn test_generate_sends_persona_and_prompt() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "gem-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "Be kind." }] },
            "contents": [{ "role": "user", "parts": [{ "text": "When is service?" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Sundays at 10am." }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client.generate("Be kind.", "When is service?").await.unwrap();
    assert_eq!(reply, "Sundays at 10am.");
}

#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let result = client.generate("persona", "hi").await;
    assert!(matches!(result, Err(Error::EmptyResponse(_))));
}

#[tokio::test]
async fn test_bad_key_is_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    match client.generate("persona", "hi").await {
        Err(Error::Api { status, code, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(code.as_deref(), Some("INVALID_ARGUMENT"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
