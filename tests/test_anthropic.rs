//! Contract tests for the Anthropic provider against a wiremock server
//!
//! Exercises the pieces that differ from the OpenAI wire format: the
//! top-level `system` field, mandatory `max_tokens`, text-block joining and
//! the input/output token accounting. Also asserts the single-attempt
//! guarantee.

use std::time::Duration;

use dhonk_chat::llm::provider::{
    CompletionRequest, FinishReason, LlmError, LlmProvider, Message, MessageRole,
};
use dhonk_chat::llm::providers::anthropic::{AnthropicConfig, AnthropicProvider};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> AnthropicProvider {
    AnthropicProvider::new(AnthropicConfig {
        api_key: "test-api-key".to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        version: "2023-06-01".to_string(),
    })
    .expect("provider construction")
}

fn question(text: &str) -> CompletionRequest {
    CompletionRequest {
        messages: vec![Message {
            role: MessageRole::User,
            content: text.to_string(),
        }],
        model: "claude-3-haiku-20240307".to_string(),
        max_tokens: Some(100),
        temperature: Some(0.6),
        top_p: None,
        stop_sequences: None,
    }
}

fn message_body(blocks: serde_json::Value, stop_reason: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-haiku-20240307",
        "content": blocks,
        "stop_reason": stop_reason,
        "usage": {"input_tokens": 14, "output_tokens": 6}
    })
}

#[tokio::test]
async fn test_successful_completion_maps_text_and_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "test-api-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body(
            serde_json::json!([{"type": "text", "text": "We ship across India."}]),
            "end_turn",
        )))
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .complete(question("do you ship"))
        .await
        .unwrap();

    assert_eq!(response.content.as_deref(), Some("We ship across India."));
    assert_eq!(response.model, "claude-3-haiku-20240307");
    assert_eq!(response.usage.prompt_tokens, 14);
    assert_eq!(response.usage.completion_tokens, 6);
    assert_eq!(response.usage.total_tokens, 20);
    assert!(matches!(response.finish_reason, FinishReason::Stop));
}

#[tokio::test]
async fn test_system_turn_travels_as_top_level_field() {
    let server = MockServer::start().await;

    // The messages array must only carry user/assistant turns
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_partial_json(serde_json::json!({
            "system": "You answer for Dhonk Craft",
            "messages": [{"role": "user", "content": "do you ship"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body(
            serde_json::json!([{"type": "text", "text": "Yes."}]),
            "end_turn",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = question("do you ship");
    request.messages.insert(
        0,
        Message {
            role: MessageRole::System,
            content: "You answer for Dhonk Craft".to_string(),
        },
    );

    assert!(provider_for(&server).complete(request).await.is_ok());
}

#[tokio::test]
async fn test_missing_max_tokens_gets_a_default() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_partial_json(serde_json::json!({"max_tokens": 4096})))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body(
            serde_json::json!([{"type": "text", "text": "ok"}]),
            "end_turn",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut request = question("hello");
    request.max_tokens = None;

    assert!(provider_for(&server).complete(request).await.is_ok());
}

#[tokio::test]
async fn test_text_blocks_are_joined_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body(
            serde_json::json!([
                {"type": "text", "text": "We ship across India. "},
                {"type": "text", "text": "Delivery takes five days."}
            ]),
            "end_turn",
        )))
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .complete(question("do you ship"))
        .await
        .unwrap();

    assert_eq!(
        response.content.as_deref(),
        Some("We ship across India. Delivery takes five days.")
    );
}

#[tokio::test]
async fn test_max_tokens_stop_reason_maps_to_length() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body(
            serde_json::json!([{"type": "text", "text": "A reply that ran out"}]),
            "max_tokens",
        )))
        .mount(&server)
        .await;

    let response = provider_for(&server)
        .complete(question("tell me everything"))
        .await
        .unwrap();
    assert!(matches!(response.finish_reason, FinishReason::Length));
}

#[tokio::test]
async fn test_client_error_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}}"#,
        ))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(question("hello"))
        .await
        .unwrap_err();

    match err {
        LlmError::ApiError(msg) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("invalid x-api-key"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_overload_gets_exactly_one_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("Overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider_for(&server).complete(question("hello")).await;
    assert!(result.is_err());
    server.verify().await;
}

#[tokio::test]
async fn test_empty_content_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(message_body(serde_json::json!([]), "end_turn")),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(question("hello"))
        .await
        .unwrap_err();

    match err {
        LlmError::ApiError(msg) => assert!(msg.contains("No content")),
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_body_is_a_request_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .complete(question("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::RequestFailed(_)));
}

#[tokio::test]
async fn test_health_check_uses_a_minimal_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_partial_json(serde_json::json!({"max_tokens": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body(
            serde_json::json!([{"type": "text", "text": "Hi"}]),
            "end_turn",
        )))
        .mount(&server)
        .await;

    assert!(provider_for(&server).health_check().await.is_ok());
}

#[tokio::test]
async fn test_health_check_flags_bad_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = provider_for(&server).health_check().await.unwrap_err();
    assert!(matches!(err, LlmError::AuthenticationFailed(_)));
}
