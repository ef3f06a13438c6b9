use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EventKind, Team};

/// Lifecycle of a game. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Finished,
}

impl GameStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            GameStatus::Scheduled => "SCHEDULED",
            GameStatus::InProgress => "IN_PROGRESS",
            GameStatus::Finished => "FINISHED",
        }
    }

    pub fn parse(s: &str) -> Option<GameStatus> {
        match s {
            "SCHEDULED" => Some(GameStatus::Scheduled),
            "IN_PROGRESS" => Some(GameStatus::InProgress),
            "FINISHED" => Some(GameStatus::Finished),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(rename = "gameId")]
    pub id: i64,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i64,
    pub away_score: i64,
    pub quarter: i64,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
}

impl Game {
    #[must_use]
    pub fn is_tied(&self) -> bool {
        self.home_score == self.away_score
    }
}

/// Fields needed to insert a game. The quarter length has already been
/// checked against the game rules.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub home_team: String,
    pub away_team: String,
    pub quarter_ms: i64,
}

/// Stored clock snapshot for one game.
///
/// `remaining_ms` is the value to count down from at `started_at`; the live
/// value is derived by `Timer::state_at` in [`crate::game`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub game_id: i64,
    pub quarter: i64,
    pub quarter_ms: i64,
    pub remaining_ms: i64,
    pub running: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Optional player attribution carried by scoring and foul events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerRef {
    pub id: Option<i64>,
    pub number: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "eventId")]
    pub id: i64,
    pub game_id: i64,
    pub quarter: i64,
    pub team: Team,
    #[serde(rename = "eventType")]
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_number: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// FOUL count for one team in one quarter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamFoulCount {
    pub quarter: i64,
    pub team: Team,
    pub fouls: i64,
}

/// FOUL count for one player over the whole game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerFoulCount {
    pub team: Team,
    pub player_id: i64,
    pub fouls: i64,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub id: String,
    pub token_hash: String,
    pub token_lookup: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
}
