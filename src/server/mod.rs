//! HTTP surface of the chat backend
//!
//! Three routes:
//!
//! - `GET /` fixed status payload
//! - `POST /chat` resolve a visitor message to an answer
//! - `GET /metrics` counters and latency percentiles
//!
//! Every response from `/chat` uses the `{"answer": ...}` envelope, including
//! the 400 for an empty message and the 500 for a failed model completion.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, Instrument};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::Filter;

use crate::chat::ChatPipeline;
use crate::error::ChatError;
use crate::observability::metrics::metrics;
use crate::request_span;

/// Payload served by `GET /`
pub const STATUS_MESSAGE: &str = "✅ Dhonk Craft backend is running!";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Missing field deserializes as empty and is rejected like a blank message
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: String,
}

/// HTTP chat server
pub struct ChatServer {
    pipeline: Arc<ChatPipeline>,
    port: u16,
}

impl ChatServer {
    pub fn new(pipeline: Arc<ChatPipeline>, port: u16) -> Self {
        Self { pipeline, port }
    }

    /// Serve until the shutdown future resolves
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) {
        let filter = routes(self.pipeline);

        let (addr, server) =
            warp::serve(filter).bind_with_graceful_shutdown(([0, 0, 0, 0], self.port), shutdown);
        info!("Chat server listening on {}", addr);

        server.await;
        info!("Chat server stopped");
    }
}

/// Build the route tree
pub fn routes(
    pipeline: Arc<ChatPipeline>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    // GET / - fixed status payload
    let status_route = warp::path::end().and(warp::get()).and_then(|| async {
        Ok::<_, Infallible>(warp::reply::json(&StatusResponse {
            status: STATUS_MESSAGE.to_string(),
        }))
    });

    // POST /chat - resolve a message
    let chat_route = warp::path("chat")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(move |request: ChatRequest| {
            let pipeline = pipeline.clone();
            async move { Ok::<_, Infallible>(handle_chat(pipeline, request).await) }
        });

    // GET /metrics - counters and latency percentiles
    let metrics_route = warp::path("metrics").and(warp::get()).and_then(|| async {
        let snapshot = metrics().get_metrics();
        Ok::<_, Infallible>(warp::reply::json(&snapshot))
    });

    status_route.or(chat_route).or(metrics_route).with(
        warp::cors()
            .allow_any_origin()
            .allow_methods(vec!["GET", "POST"])
            .allow_headers(vec!["content-type"]),
    )
}

async fn handle_chat(pipeline: Arc<ChatPipeline>, request: ChatRequest) -> impl warp::Reply {
    let request_id = Uuid::new_v4();
    let span = request_span!(request_id = %request_id, message_len = request.message.len());

    async move {
        metrics().request_received();
        let started = Instant::now();

        match pipeline.answer(&request.message).await {
            Ok(answer) => {
                metrics().request_answered(started.elapsed());
                info!(
                    source = answer.source.as_str(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Request answered"
                );
                answer_reply(StatusCode::OK, answer.text)
            }
            Err(ChatError::EmptyMessage) => {
                metrics().request_rejected();
                answer_reply(
                    StatusCode::BAD_REQUEST,
                    ChatError::EmptyMessage.user_message(),
                )
            }
            Err(e) => {
                metrics().request_failed(started.elapsed());
                error!("Request failed: {}", e);
                answer_reply(StatusCode::INTERNAL_SERVER_ERROR, e.user_message())
            }
        }
    }
    .instrument(span)
    .await
}

fn answer_reply(status: StatusCode, answer: String) -> impl warp::Reply {
    warp::reply::with_status(warp::reply::json(&ChatResponse { answer }), status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::contacts::ContactDirectory;
    use crate::config::LlmSection;
    use crate::store::ContentRecord;
    use crate::testing::{MockContentStore, MockIntentClassifier, MockLlmProvider};
    use serde_json::{json, Value};

    fn test_llm_section() -> LlmSection {
        LlmSection {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.6,
            max_tokens: None,
        }
    }

    fn pipeline_with(store: MockContentStore, provider: MockLlmProvider) -> Arc<ChatPipeline> {
        Arc::new(ChatPipeline::new(
            Arc::new(MockIntentClassifier::none()),
            ContactDirectory::default(),
            Arc::new(store),
            Arc::new(provider),
            test_llm_section(),
        ))
    }

    #[tokio::test]
    async fn test_status_route() {
        let filter = routes(pipeline_with(
            MockContentStore::empty(),
            MockLlmProvider::single_response("unused"),
        ));

        let response = warp::test::request()
            .method("GET")
            .path("/")
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], "✅ Dhonk Craft backend is running!");
    }

    #[tokio::test]
    async fn test_chat_route_answers() {
        let filter = routes(pipeline_with(
            MockContentStore::empty(),
            MockLlmProvider::single_response("The model answers."),
        ));

        let response = warp::test::request()
            .method("POST")
            .path("/chat")
            .json(&json!({"message": "price of a tote bag"}))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["answer"], "The model answers.");
    }

    #[tokio::test]
    async fn test_chat_route_serves_content_with_link() {
        let record = ContentRecord {
            title: "Shipping".to_string(),
            url: Some("https://dhonkcraft.com/shipping".to_string()),
            content: "We ship across India in five days.".to_string(),
        };
        let filter = routes(pipeline_with(
            MockContentStore::with_record(record),
            MockLlmProvider::single_response("unused"),
        ));

        let response = warp::test::request()
            .method("POST")
            .path("/chat")
            .json(&json!({"message": "ship across india"}))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        let answer = body["answer"].as_str().unwrap();
        assert!(answer.contains("🔗 [More Info](https://dhonkcraft.com/shipping)"));
    }

    #[tokio::test]
    async fn test_empty_message_is_bad_request() {
        let filter = routes(pipeline_with(
            MockContentStore::empty(),
            MockLlmProvider::single_response("unused"),
        ));

        let response = warp::test::request()
            .method("POST")
            .path("/chat")
            .json(&json!({"message": "   "}))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["answer"], "❌ Please type something.");
    }

    #[tokio::test]
    async fn test_missing_message_field_is_bad_request() {
        let filter = routes(pipeline_with(
            MockContentStore::empty(),
            MockLlmProvider::single_response("unused"),
        ));

        let response = warp::test::request()
            .method("POST")
            .path("/chat")
            .json(&json!({}))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["answer"], "❌ Please type something.");
    }

    #[tokio::test]
    async fn test_model_failure_is_internal_error() {
        let filter = routes(pipeline_with(
            MockContentStore::empty(),
            MockLlmProvider::with_failure(),
        ));

        let response = warp::test::request()
            .method("POST")
            .path("/chat")
            .json(&json!({"message": "unanswerable"}))
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        let answer = body["answer"].as_str().unwrap();
        assert!(answer.starts_with("❌ Assistant error:"));
    }

    #[tokio::test]
    async fn test_metrics_route_shape() {
        let filter = routes(pipeline_with(
            MockContentStore::empty(),
            MockLlmProvider::single_response("unused"),
        ));

        let response = warp::test::request()
            .method("GET")
            .path("/metrics")
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert!(body["requests"].is_object());
        assert!(body["resolution"].is_object());
        assert!(body["lifecycle"].is_object());
    }

    #[tokio::test]
    async fn test_get_on_chat_is_rejected() {
        let filter = routes(pipeline_with(
            MockContentStore::empty(),
            MockLlmProvider::single_response("unused"),
        ));

        let response = warp::test::request()
            .method("GET")
            .path("/chat")
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
