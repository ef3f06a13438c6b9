use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::TeamEventRequest;
use crate::server::response::{ApiError, StoreResultExt, TransitionExt};
use crate::server::validation::{parse_body, parse_points, parse_team, player_ref};

pub async fn record_score(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> impl IntoResponse {
    let req: TeamEventRequest = parse_body(&body)?;
    let team = parse_team(req.team.as_deref())?;
    let points = parse_points(req.points)?;
    let player = player_ref(req.player_id, req.player_number)?;

    state
        .store
        .record_score(id, team, points, player, Utc::now())
        .api_err("Failed to record score")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, %team, points = points.value(), "Score recorded");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn record_foul(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> impl IntoResponse {
    let req: TeamEventRequest = parse_body(&body)?;
    let team = parse_team(req.team.as_deref())?;
    let player = player_ref(req.player_id, req.player_number)?;

    state
        .store
        .record_foul(id, team, player, Utc::now())
        .api_err("Failed to record foul")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, %team, player_id = ?player.id, "Foul recorded");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn remove_foul(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> impl IntoResponse {
    let req: TeamEventRequest = parse_body(&body)?;
    let team = parse_team(req.team.as_deref())?;
    let player = player_ref(req.player_id, None)?;

    state
        .store
        .remove_foul(id, team, player.id, Utc::now())
        .api_err("Failed to remove foul")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, %team, player_id = ?player.id, "Foul removed");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn remove_score(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> impl IntoResponse {
    let req: TeamEventRequest = parse_body(&body)?;
    let team = parse_team(req.team.as_deref())?;

    state
        .store
        .remove_score(id, team, Utc::now())
        .api_err("Failed to remove score")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, %team, "Score removed");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn undo(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .undo_last_event(id, Utc::now())
        .api_err("Failed to undo event")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, "Last event undone");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
