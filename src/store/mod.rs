mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::config::GameRules;
use crate::error::Result;
use crate::types::*;

/// Outcome of a guarded write.
///
/// Storage failures travel in the surrounding `Result`; this type only
/// separates "done" from the two ways a precondition can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    NotFound,
    Rejected(Rejection),
}

impl Transition {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Transition::Applied)
    }
}

/// Why a transition was refused. The message is shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Game is not scheduled")]
    NotScheduled,

    #[error("Game is not in progress")]
    NotInProgress,

    #[error("Game must be finished: there is a winner")]
    WinnerDecided,

    #[error("No foul to remove")]
    NoFoulToRemove,

    #[error("No score to remove")]
    NoScoreToRemove,

    #[error("No event to undo")]
    NoEventToUndo,
}

/// Store defines the database interface.
///
/// Every game mutation runs in a single transaction and is guarded by the
/// state it expects; nothing is cached between calls. Operations that depend
/// on wall-clock time take `now` from the caller.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Game operations
    fn create_game(&self, game: &NewGame, now: DateTime<Utc>) -> Result<Game>;
    fn get_game(&self, id: i64) -> Result<Option<Game>>;
    /// Newest first. `before` is an exclusive id cursor.
    fn list_games(&self, before: Option<i64>, limit: i32) -> Result<Vec<Game>>;
    fn start_game(&self, id: i64, rules: &GameRules, now: DateTime<Utc>) -> Result<Transition>;
    fn advance_quarter(&self, id: i64, rules: &GameRules, now: DateTime<Utc>)
    -> Result<Transition>;
    fn finish_game(&self, id: i64, now: DateTime<Utc>) -> Result<Transition>;

    // Event operations
    fn record_score(
        &self,
        id: i64,
        team: Team,
        points: Points,
        player: PlayerRef,
        now: DateTime<Utc>,
    ) -> Result<Transition>;
    fn record_foul(
        &self,
        id: i64,
        team: Team,
        player: PlayerRef,
        now: DateTime<Utc>,
    ) -> Result<Transition>;
    fn remove_foul(
        &self,
        id: i64,
        team: Team,
        player_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Transition>;
    fn remove_score(&self, id: i64, team: Team, now: DateTime<Utc>) -> Result<Transition>;
    fn undo_last_event(&self, id: i64, now: DateTime<Utc>) -> Result<Transition>;
    /// Newest first.
    fn list_events(&self, game_id: i64, limit: i32) -> Result<Vec<Event>>;
    fn count_team_fouls(&self, game_id: i64) -> Result<Vec<TeamFoulCount>>;
    fn count_player_fouls(&self, game_id: i64) -> Result<Vec<PlayerFoulCount>>;

    // Clock operations
    fn get_timer(&self, game_id: i64) -> Result<Option<Timer>>;
    fn start_clock(
        &self,
        game_id: i64,
        default_quarter_ms: i64,
        now: DateTime<Utc>,
    ) -> Result<Transition>;
    fn pause_clock(&self, game_id: i64, now: DateTime<Utc>) -> Result<Transition>;
    fn reset_clock(
        &self,
        game_id: i64,
        quarter_ms: Option<i64>,
        default_quarter_ms: i64,
        now: DateTime<Utc>,
    ) -> Result<Transition>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn list_tokens(&self) -> Result<Vec<Token>>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;
    fn has_admin_token(&self) -> Result<bool>;
}
