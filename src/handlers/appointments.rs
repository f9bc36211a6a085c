use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 500;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

fn parse_status(raw: &str) -> Result<AppointmentStatus, AppError> {
    AppointmentStatus::parse(raw).ok_or_else(|| AppError::BadRequest(format!("unknown status: {raw}")))
}

// GET /appointments
#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let appointments = state
        .appointments
        .list(status, limit)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(appointments))
}

// GET /appointments/:id
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    state
        .appointments
        .get(&id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("appointment {id}")))
}

// POST /appointments/:id/status
#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let status = parse_status(&payload.status)?;

    let updated = state
        .appointments
        .update_status(&id, status)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if !updated {
        return Err(AppError::NotFound(format!("appointment {id}")));
    }

    tracing::info!(appointment_id = %id, status = status.as_str(), "appointment status updated");
    Ok(Json(serde_json::json!({"ok": true, "status": status.as_str()})))
}
