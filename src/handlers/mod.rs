pub mod appointments;
pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/chat", post(chat::chat))
        .route("/chat/:session_id", delete(chat::end_session))
        .route("/appointments", get(appointments::list_appointments))
        .route("/appointments/:id", get(appointments::get_appointment))
        .route("/appointments/:id/status", post(appointments::update_status))
        .with_state(state)
}
