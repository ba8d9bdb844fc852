//! HTTP surface for the chat service.
//!
//! One endpoint: `POST /chat` takes `{"message": ...}` and returns
//! `{"response": ..., "source": ...}`. A missing or empty message is the
//! only client error; everything else degrades inside `ChatService` to a
//! success-shaped response so the chat experience is never interrupted.

use crate::service::{ChatService, ANSWER_SOURCE};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cdp_core::AppResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Incoming chat request body.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Outgoing chat response body.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub source: String,
}

/// Error body for rejected requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handle a chat request.
async fn chat(
    State(service): State<Arc<ChatService>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let message = request.message.trim();

    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No message provided".to_string(),
            }),
        )
            .into_response();
    }

    let answer = service.answer(message).await;

    Json(ChatResponse {
        response: answer,
        source: ANSWER_SOURCE.to_string(),
    })
    .into_response()
}

/// Liveness probe.
async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the router with all routes and middleware.
pub fn build_router(service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(service)
}

/// Bind and serve the chat endpoint until the process exits.
///
/// The service passed in is fully built: the corpus is loaded and the index
/// is ready before the listener accepts its first request.
pub async fn serve(service: Arc<ChatService>, bind: &str) -> AppResult<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!("CDP support chat listening on {}", bind);

    axum::serve(listener, build_router(service)).await?;

    Ok(())
}
