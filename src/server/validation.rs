use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::config::GameRules;
use crate::server::response::ApiError;
use crate::types::{PlayerRef, Points, Team};

const MAX_TEAM_LABEL_LEN: usize = 64;

/// Decodes an optional JSON body. An empty body yields the default value.
pub fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))
}

/// Trims a team label, falling back to `default` when it is blank.
pub fn team_label(label: Option<&str>, default: &str) -> Result<String, ApiError> {
    let label = label.map(str::trim).unwrap_or_default();
    if label.is_empty() {
        return Ok(default.to_string());
    }
    if label.chars().count() > MAX_TEAM_LABEL_LEN {
        return Err(ApiError::bad_request(format!(
            "Team name cannot exceed {MAX_TEAM_LABEL_LEN} characters"
        )));
    }
    if label.chars().any(char::is_control) {
        return Err(ApiError::bad_request(
            "Team name cannot contain control characters",
        ));
    }
    Ok(label.to_string())
}

pub fn parse_team(team: Option<&str>) -> Result<Team, ApiError> {
    let team = team.ok_or_else(|| ApiError::bad_request("team is required"))?;
    Team::parse(team).ok_or_else(|| ApiError::bad_request("team must be HOME or AWAY"))
}

pub fn parse_points(points: Option<i64>) -> Result<Points, ApiError> {
    let points = points.ok_or_else(|| ApiError::bad_request("points is required"))?;
    Points::from_value(points).ok_or_else(|| ApiError::bad_request("points must be 1, 2 or 3"))
}

pub fn player_ref(player_id: Option<i64>, player_number: Option<i64>) -> Result<PlayerRef, ApiError> {
    if player_id.is_some_and(|id| id <= 0) {
        return Err(ApiError::bad_request("playerId must be positive"));
    }
    if player_number.is_some_and(|number| number < 0) {
        return Err(ApiError::bad_request("playerNumber cannot be negative"));
    }
    Ok(PlayerRef {
        id: player_id,
        number: player_number,
    })
}

/// A quarter length supplied to a clock reset must be one the rules allow.
pub fn reset_quarter_ms(rules: &GameRules, quarter_ms: Option<i64>) -> Result<Option<i64>, ApiError> {
    match quarter_ms {
        Some(ms) if !rules.is_allowed_quarter_ms(ms) => Err(ApiError::bad_request(format!(
            "quarterMs must be one of {:?}",
            rules.allowed_quarter_ms
        ))),
        other => Ok(other),
    }
}
