use serde::{Deserialize, Serialize};

use crate::types::{Event, Game};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub away: Option<String>,
    #[serde(default)]
    pub quarter_ms: Option<i64>,
}

/// Body of score, foul, remove-foul and remove-score. Which fields are
/// required depends on the endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEventRequest {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub player_id: Option<i64>,
    #[serde(default)]
    pub player_number: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetClockRequest {
    #[serde(default)]
    pub quarter_ms: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GameDetailResponse {
    pub game: Game,
    pub events: Vec<Event>,
}
