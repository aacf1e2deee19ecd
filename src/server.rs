//! HTTP front end.
//!
//! A thin request/response shell around the coordinator:
//! `POST /process` runs the pipeline, `GET /health` reports liveness.
//! Recognized errors map to 400 with a human-readable message; anything
//! unexpected maps to 500 with a generic message and a server-side log line.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::coordinator::{RunStatus, WorkflowCoordinator};
use crate::error::WorkflowError;
use crate::venice::VeniceClient;

/// Shared per-process state. One coordinator and one HTTP client serve all
/// requests; the per-request workflow state lives inside each call.
#[derive(Clone)]
pub struct AppState {
    coordinator: Arc<WorkflowCoordinator>,
    client: Arc<VeniceClient>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            coordinator: Arc::new(WorkflowCoordinator::new(config)),
            client: Arc::new(VeniceClient::with_base_url(
                config.api_key.clone(),
                config.base_url.clone(),
                config.request_timeout_secs,
            )),
        }
    }
}

/// Body of `POST /process`.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    pub url: Option<String>,
    pub article_text: Option<String>,
    #[serde(default)]
    pub use_web_scraping: bool,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/process", post(process))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(config: AppConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(&config);
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn process(State(state): State<AppState>, Json(req): Json<ProcessRequest>) -> Response {
    let request_id = Uuid::new_v4();
    tracing::info!(
        %request_id,
        has_url = req.url.is_some(),
        has_text = req.article_text.is_some(),
        scraping = req.use_web_scraping,
        "processing request"
    );

    let result = state
        .coordinator
        .process(
            state.client.as_ref(),
            req.url.as_deref(),
            req.article_text.as_deref(),
            req.use_web_scraping,
        )
        .await;

    match result {
        Ok(output) => {
            let code = match output.status {
                RunStatus::Success => StatusCode::OK,
                // Stage errors are client-visible failures, as is bad input.
                RunStatus::Error => StatusCode::BAD_REQUEST,
            };
            if code != StatusCode::OK {
                tracing::error!(%request_id, error = ?output.error, "workflow failed");
            }
            (code, Json(output)).into_response()
        }
        Err(err) => error_response(request_id, err),
    }
}

fn error_response(request_id: Uuid, err: WorkflowError) -> Response {
    if err.is_unexpected() {
        tracing::error!(%request_id, error = %err, "unexpected failure");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "error": "internal server error" })),
        )
            .into_response()
    } else {
        tracing::warn!(%request_id, error = %err, "request rejected");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "error", "error": err.to_string() })),
        )
            .into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "link2social" }))
}
