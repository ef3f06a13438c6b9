use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::game::summarize;
use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};

pub async fn foul_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    state
        .store
        .get_game(id)
        .api_err("Failed to get game")?
        .or_not_found("Game not found")?;

    let team_counts = state
        .store
        .count_team_fouls(id)
        .api_err("Failed to count fouls")?;
    let player_counts = state
        .store
        .count_player_fouls(id)
        .api_err("Failed to count fouls")?;

    let summary = summarize(team_counts, player_counts, &state.rules);

    Ok::<_, ApiError>(Json(ApiResponse::success(summary)))
}
