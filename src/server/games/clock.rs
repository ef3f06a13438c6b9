use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::ResetClockRequest;
use crate::server::response::{
    ApiError, ApiResponse, StoreOptionExt, StoreResultExt, TransitionExt,
};
use crate::server::validation::{parse_body, reset_quarter_ms};

pub async fn get_clock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let timer = state
        .store
        .get_timer(id)
        .api_err("Failed to get clock")?
        .or_not_found("Clock not found")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(timer.state_at(Utc::now()))))
}

pub async fn start_clock(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .start_clock(id, state.rules.default_quarter_ms, Utc::now())
        .api_err("Failed to start clock")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, "Clock started");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn pause_clock(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .pause_clock(id, Utc::now())
        .api_err("Failed to pause clock")?
        .or_api_err("Clock not found")?;

    tracing::info!(game_id = id, "Clock paused");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn reset_clock(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> impl IntoResponse {
    let req: ResetClockRequest = parse_body(&body)?;
    let quarter_ms = reset_quarter_ms(&state.rules, req.quarter_ms)?;

    state
        .store
        .reset_clock(id, quarter_ms, state.rules.default_quarter_ms, Utc::now())
        .api_err("Failed to reset clock")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, quarter_ms = ?quarter_ms, "Clock reset");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
