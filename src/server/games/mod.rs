mod clock;
mod events;
mod lifecycle;
mod summary;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn games_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/games",
            get(lifecycle::list_games).post(lifecycle::create_game),
        )
        .route("/games/{id}", get(lifecycle::get_game))
        .route("/games/{id}/start", post(lifecycle::start_game))
        .route("/games/{id}/finish", post(lifecycle::finish_game))
        .route(
            "/games/{id}/advance-quarter",
            post(lifecycle::advance_quarter),
        )
        .route("/games/{id}/score", post(events::record_score))
        .route("/games/{id}/foul", post(events::record_foul))
        .route("/games/{id}/remove-foul", post(events::remove_foul))
        .route("/games/{id}/remove-score", post(events::remove_score))
        .route("/games/{id}/undo", post(events::undo))
        .route("/games/{id}/fouls/summary", get(summary::foul_summary))
        .route("/games/{id}/clock", get(clock::get_clock))
        .route("/games/{id}/clock/start", post(clock::start_clock))
        .route("/games/{id}/clock/pause", post(clock::pause_clock))
        .route("/games/{id}/clock/reset", post(clock::reset_clock))
}
