use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::{CreateGameRequest, GameDetailResponse, PaginationParams};
use crate::server::response::{
    ApiError, ApiResponse, DEFAULT_PAGE_SIZE, PaginatedResponse, StoreOptionExt, StoreResultExt,
    TransitionExt, paginate,
};
use crate::server::validation::{parse_body, team_label};
use crate::types::NewGame;

const DETAIL_EVENT_LIMIT: i32 = 100;

pub async fn create_game(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> impl IntoResponse {
    let req: CreateGameRequest = parse_body(&body)?;

    let new_game = NewGame {
        home_team: team_label(req.home.as_deref(), "Home")?,
        away_team: team_label(req.away.as_deref(), "Away")?,
        quarter_ms: state.rules.quarter_ms_or_default(req.quarter_ms),
    };

    let game = state
        .store
        .create_game(&new_game, Utc::now())
        .api_err("Failed to create game")?;

    tracing::info!(
        game_id = game.id,
        home = %game.home_team,
        away = %game.away_team,
        quarter_ms = new_game.quarter_ms,
        "Game created"
    );

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(game))))
}

pub async fn list_games(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let before = params
        .cursor
        .as_deref()
        .map(str::parse::<i64>)
        .transpose()
        .map_err(|_| ApiError::bad_request("Invalid cursor"))?;

    let games = state
        .store
        .list_games(before, DEFAULT_PAGE_SIZE + 1)
        .api_err("Failed to list games")?;

    let (games, next_cursor, has_more) =
        paginate(games, DEFAULT_PAGE_SIZE as usize, |g| g.id.to_string());

    Ok::<_, ApiError>(Json(PaginatedResponse::new(games, next_cursor, has_more)))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let game = state
        .store
        .get_game(id)
        .api_err("Failed to get game")?
        .or_not_found("Game not found")?;

    let events = state
        .store
        .list_events(id, DETAIL_EVENT_LIMIT)
        .api_err("Failed to list events")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(GameDetailResponse {
        game,
        events,
    })))
}

pub async fn start_game(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .start_game(id, &state.rules, Utc::now())
        .api_err("Failed to start game")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, "Game started");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn advance_quarter(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .advance_quarter(id, &state.rules, Utc::now())
        .api_err("Failed to advance quarter")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, "Quarter advanced");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn finish_game(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .finish_game(id, Utc::now())
        .api_err("Failed to finish game")?
        .or_api_err("Game not found")?;

    tracing::info!(game_id = id, "Game finished");
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
