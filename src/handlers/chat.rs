use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::chat::{self, ChatReply};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let session_id = payload
        .session_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let reply = chat::handle_message(&state, &session_id, &payload.message).await?;

    let expired = state.sessions.sweep_expired();
    if expired > 0 {
        tracing::debug!(expired, "evicted idle sessions");
    }

    Ok(Json(reply))
}

// DELETE /chat/:session_id
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.expire_session(&session_id) {
        tracing::info!(session_id = %session_id, "session ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("session {session_id}")))
    }
}
