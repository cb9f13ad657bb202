//! HTTP API gateway for chatrelay.
//!
//! Exposes the relay's three endpoints:
//!
//! - `POST /chat`   — Send a message, get the model's reply
//! - `GET  /health` — Liveness probe, no dependencies checked
//! - `GET  /info`   — Current configuration snapshot
//!
//! Built on Axum. The chat handler is synchronous per request: the
//! outbound provider call blocks that request until it completes or hits
//! the per-call deadline.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use chatrelay_core::error::Error;
use chatrelay_core::message::SessionKey;
use chatrelay_engine::ChatEngine;

/// Maximum accepted request body.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub engine: ChatEngine,
    /// Configuration snapshot reported by `GET /info`.
    pub model: String,
    pub api_key_set: bool,
    pub test_mode: bool,
    pub history_backend: String,
    pub max_tokens: u32,
}

impl GatewayState {
    /// Assemble the state from configuration plus the injected provider
    /// and history backend.
    pub fn new(
        config: &chatrelay_config::AppConfig,
        provider: Arc<dyn chatrelay_core::Provider>,
        history: Arc<dyn chatrelay_core::HistoryStore>,
    ) -> Self {
        let history_backend = history.backend().to_string();
        Self {
            engine: ChatEngine::from_config(config, provider, history),
            model: config.model.clone(),
            api_key_set: config.has_api_key(),
            test_mode: config.test_mode,
            history_backend,
            max_tokens: config.max_tokens,
        }
    }
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers: permissive CORS (the relay is meant to be embedded on
/// third-party pages), request body size limit, HTTP trace logging, and a
/// panic catcher so internal faults surface as a generic 500.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // Unexpected faults become a bare 500, never a stack trace.
        .layer(tower_http::catch_panic::CatchPanicLayer::new())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(config: chatrelay_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = chatrelay_providers::build_from_config(&config);
    let history = chatrelay_history::build_from_config(&config).await;
    let state = Arc::new(GatewayState::new(&config, provider, history));

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Request / Response types ---

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ChatRequest {
    /// The user's message. Required, non-empty after trimming.
    message: String,
    /// Session to continue (omit to start a new one).
    #[serde(default)]
    session_id: Option<String>,
    /// Opaque client identifier (defaults to "public").
    #[serde(default)]
    client_id: Option<String>,
    /// System prompt override for this session's first message.
    #[serde(default)]
    system_prompt: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
    session_id: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct InfoResponse {
    model: String,
    api_key_set: bool,
    test_mode: bool,
    history_backend: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// --- Handlers ---

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let key = SessionKey::new(payload.client_id.as_deref(), payload.session_id.as_deref());

    let response = state
        .engine
        .handle_message(&key, &payload.message, payload.system_prompt.as_deref())
        .await
        .map_err(error_to_response)?;

    Ok(Json(ChatResponse {
        response,
        session_id: key.session_id,
    }))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn info_handler(State(state): State<SharedState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        model: state.model.clone(),
        api_key_set: state.api_key_set,
        test_mode: state.test_mode,
        history_backend: state.history_backend.clone(),
        max_tokens: state.max_tokens,
    })
}

/// Map an engine error to the HTTP surface.
///
/// Validation failures are the caller's fault (400); everything else is a
/// 500 carrying the underlying cause for diagnosability. Nothing here
/// exposes a stack trace.
fn error_to_response(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!(error = %err, "Chat exchange failed");
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chatrelay_core::error::ProviderError;
    use chatrelay_history::InMemoryHistory;
    use chatrelay_providers::{EchoProvider, OpenAiCompatProvider};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_mode_state() -> SharedState {
        let config = chatrelay_config::AppConfig {
            test_mode: true,
            ..Default::default()
        };
        Arc::new(GatewayState::new(
            &config,
            Arc::new(EchoProvider::new()),
            Arc::new(InMemoryHistory::new()),
        ))
    }

    /// State with the HTTP provider and no credential: any chat request
    /// fails before the network with a configuration error.
    fn unconfigured_state() -> SharedState {
        let config = chatrelay_config::AppConfig::default();
        Arc::new(GatewayState::new(
            &config,
            Arc::new(OpenAiCompatProvider::new("groq", config.api_url.clone(), "")),
            Arc::new(InMemoryHistory::new()),
        ))
    }

    fn chat_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_mode_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn info_reports_configuration_snapshot() {
        let app = build_router(test_mode_state());
        let response = app
            .oneshot(Request::builder().uri("/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["test_mode"], true);
        assert_eq!(json["api_key_set"], false);
        assert_eq!(json["history_backend"], "memory");
        assert_eq!(json["model"], "openai/gpt-oss-20b");
    }

    #[tokio::test]
    async fn chat_round_trip_in_test_mode() {
        let app = build_router(test_mode_state());
        let response = app
            .oneshot(chat_request(
                serde_json::json!({"message": "hi", "session_id": "s1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["session_id"], "s1");
        assert!(json["response"].as_str().unwrap().contains("hi"));
    }

    #[tokio::test]
    async fn chat_generates_session_id_when_absent() {
        let app = build_router(test_mode_state());
        let response = app
            .oneshot(chat_request(serde_json::json!({"message": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert!(json["session_id"].as_str().unwrap().starts_with("sess_"));
    }

    #[tokio::test]
    async fn empty_message_is_a_400() {
        let app = build_router(test_mode_state());
        let response = app
            .oneshot(chat_request(serde_json::json!({"message": "   "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn missing_credential_is_a_500() {
        let app = build_router(unconfigured_state());
        let response = app
            .oneshot(chat_request(serde_json::json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        let error = json["error"].as_str().unwrap();
        assert!(error.contains("Configuration error"));
        assert!(error.contains("API key"));
    }

    #[tokio::test]
    async fn unknown_request_fields_are_rejected() {
        let app = build_router(test_mode_state());
        let response = app
            .oneshot(chat_request(serde_json::json!({
                "message": "hi",
                "prompt_map": {"acme": "be terse"}
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn provider_status_appears_in_error_body() {
        let (status, Json(body)) = error_to_response(Error::Provider(ProviderError::ApiError {
            status_code: 503,
            message: "upstream overloaded".into(),
        }));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.error.contains("503"));
        assert!(body.error.contains("upstream overloaded"));
    }
}
