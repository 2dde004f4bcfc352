use crate::completion::Completion;
use crate::context;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use debate_types::{DebateRequest, DebateResponse, SuggestedTopics};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

/// Shared state for the handlers. `completion` is `None` when no API key was configured.
#[derive(Clone)]
pub struct AppState {
    pub completion: Option<Arc<dyn Completion>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Groq client not initialized. Check server logs.")]
    NotConfigured,
    #[error(transparent)]
    Completion(#[from] anyhow::Error),
}

// Errors are reported as `{"detail": ...}` with status 500.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    // Permissive so a separately hosted frontend can call the API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/suggested-topics", get(suggested_topics))
        .route("/debate", post(debate))
        .layer(cors)
        .with_state(state)
}

async fn suggested_topics() -> Json<SuggestedTopics> {
    Json(SuggestedTopics::defaults())
}

async fn debate(
    State(state): State<AppState>,
    Json(request): Json<DebateRequest>,
) -> Result<Json<DebateResponse>, ApiError> {
    let completion = state.completion.as_ref().ok_or(ApiError::NotConfigured)?;

    debug!(
        "Debate request on '{}' with {} prior turns",
        request.topic(),
        request.history().len()
    );
    let messages = context::build_messages(&request);
    let reply = completion.complete(messages).await.map_err(|e| {
        error!("Completion failed: {:#}", e);
        ApiError::Completion(e)
    })?;

    Ok(Json(DebateResponse::new(reply)))
}
