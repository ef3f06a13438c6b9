use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{
    Connection, OptionalExtension, Row, ToSql, Transaction, TransactionBehavior, params,
};

use super::schema::SCHEMA;
use super::{Rejection, Store, Transition};
use crate::config::GameRules;
use crate::error::{Error, Result};
use crate::types::*;

const SELECT_GAME: &str = "SELECT id, home_team, away_team, home_score, away_score, quarter, status, created_at
     FROM games WHERE id = ?1";

const SELECT_TIMER: &str = "SELECT game_id, quarter, quarter_ms, remaining_ms, running, started_at, updated_at
     FROM game_timers WHERE game_id = ?1";

const UPSERT_TIMER: &str = "INSERT INTO game_timers (game_id, quarter, quarter_ms, remaining_ms, running, started_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
     ON CONFLICT(game_id) DO UPDATE SET
         quarter = excluded.quarter,
         quarter_ms = excluded.quarter_ms,
         remaining_ms = excluded.remaining_ms,
         running = excluded.running,
         started_at = excluded.started_at,
         updated_at = excluded.updated_at";

const SET_STATUS: &str = "UPDATE games SET status = ?1 WHERE id = ?2 AND status = ?3";

const ADD_HOME_POINTS: &str =
    "UPDATE games SET home_score = home_score + ?2 WHERE id = ?1 AND status = ?3";
const ADD_AWAY_POINTS: &str =
    "UPDATE games SET away_score = away_score + ?2 WHERE id = ?1 AND status = ?3";

/// Leaves the score untouched when it is below the points being taken back.
const SUB_HOME_POINTS: &str = "UPDATE games SET home_score = CASE WHEN home_score >= ?2 THEN home_score - ?2 ELSE home_score END WHERE id = ?1";
const SUB_AWAY_POINTS: &str = "UPDATE games SET away_score = CASE WHEN away_score >= ?2 THEN away_score - ?2 ELSE away_score END WHERE id = ?1";

/// Appends an event stamped with the game's current quarter.
const INSERT_EVENT: &str = "INSERT INTO game_events (game_id, quarter, team, event_type, player_id, player_number, created_at)
     SELECT id, quarter, ?2, ?3, ?4, ?5, ?6 FROM games WHERE id = ?1";

/// Same as `INSERT_EVENT`, but only while the game has the given status.
const INSERT_EVENT_WITH_STATUS: &str = "INSERT INTO game_events (game_id, quarter, team, event_type, player_id, player_number, created_at)
     SELECT id, quarter, ?2, ?3, ?4, ?5, ?6 FROM games WHERE id = ?1 AND status = ?7";

/// Appends an event with an explicit quarter.
const INSERT_EVENT_AT_QUARTER: &str = "INSERT INTO game_events (game_id, quarter, team, event_type, player_id, player_number, created_at)
     VALUES (?1, ?2, ?3, ?4, NULL, NULL, ?5)";

const DELETE_EVENT: &str = "DELETE FROM game_events WHERE id = ?1";

const LAST_POINT_FOR_TEAM: &str = "SELECT id, quarter, team, event_type FROM game_events
     WHERE game_id = ?1 AND team = ?2 AND event_type IN ('POINT_1', 'POINT_2', 'POINT_3')
     ORDER BY id DESC LIMIT 1";

const LAST_FOUL_FOR_TEAM: &str = "SELECT id, quarter, team, event_type FROM game_events
     WHERE game_id = ?1 AND team = ?2 AND event_type = 'FOUL'
       AND (?3 IS NULL OR player_id = ?3)
     ORDER BY id DESC LIMIT 1";

const LAST_UNDOABLE: &str = "SELECT id, quarter, team, event_type FROM game_events
     WHERE game_id = ?1 AND event_type IN ('POINT_1', 'POINT_2', 'POINT_3', 'FOUL')
     ORDER BY id DESC LIMIT 1";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// Enum columns are stored as their text tags. Conversion happens here and
// nowhere else.

impl ToSql for Team {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Team {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Team::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

impl ToSql for GameStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for GameStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        GameStatus::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

impl ToSql for EventKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EventKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        EventKind::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

fn game_from_row(row: &Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        home_team: row.get(1)?,
        away_team: row.get(2)?,
        home_score: row.get(3)?,
        away_score: row.get(4)?,
        quarter: row.get(5)?,
        status: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn timer_from_row(row: &Row<'_>) -> rusqlite::Result<Timer> {
    Ok(Timer {
        game_id: row.get(0)?,
        quarter: row.get(1)?,
        quarter_ms: row.get(2)?,
        remaining_ms: row.get(3)?,
        running: row.get(4)?,
        started_at: row.get::<_, Option<String>>(5)?.map(|s| parse_datetime(&s)),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        game_id: row.get(1)?,
        quarter: row.get(2)?,
        team: row.get(3)?,
        kind: row.get(4)?,
        player_id: row.get(5)?,
        player_number: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
    })
}

fn token_from_row(row: &Row<'_>) -> rusqlite::Result<Token> {
    Ok(Token {
        id: row.get(0)?,
        token_hash: row.get(1)?,
        token_lookup: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
        expires_at: row.get::<_, Option<String>>(4)?.map(|s| parse_datetime(&s)),
        last_used_at: row.get::<_, Option<String>>(5)?.map(|s| parse_datetime(&s)),
    })
}

/// Identity, quarter and team of an event about to be reversed.
struct LoggedEvent {
    id: i64,
    quarter: i64,
    team: Team,
    kind: EventKind,
}

fn logged_event_from_row(row: &Row<'_>) -> rusqlite::Result<LoggedEvent> {
    Ok(LoggedEvent {
        id: row.get(0)?,
        quarter: row.get(1)?,
        team: row.get(2)?,
        kind: row.get(3)?,
    })
}

/// Opens a write transaction that takes the database lock up front, so the
/// reads inside it see the state the writes are based on.
fn write_tx(conn: &mut Connection) -> rusqlite::Result<Transaction<'_>> {
    conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

fn load_game(conn: &Connection, id: i64) -> rusqlite::Result<Option<Game>> {
    conn.query_row(SELECT_GAME, params![id], game_from_row)
        .optional()
}

fn game_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM games WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Maps a guarded statement that touched no rows to its outcome.
fn missed(conn: &Connection, id: i64, rejection: Rejection) -> Result<Transition> {
    if game_exists(conn, id)? {
        tracing::debug!(game_id = id, %rejection, "Transition rejected");
        Ok(Transition::Rejected(rejection))
    } else {
        Ok(Transition::NotFound)
    }
}

fn load_timer(conn: &Connection, game_id: i64) -> rusqlite::Result<Option<Timer>> {
    conn.query_row(SELECT_TIMER, params![game_id], timer_from_row)
        .optional()
}

fn write_timer(conn: &Connection, timer: &Timer) -> rusqlite::Result<()> {
    conn.execute(
        UPSERT_TIMER,
        params![
            timer.game_id,
            timer.quarter,
            timer.quarter_ms,
            timer.remaining_ms,
            timer.running,
            timer.started_at.as_ref().map(format_datetime),
            format_datetime(&timer.updated_at),
        ],
    )?;
    Ok(())
}

/// Returns the game's timer, or a new stopped one for the game's current
/// quarter if the row is missing. `None` when the game itself does not exist.
fn timer_or_new(
    conn: &Connection,
    game_id: i64,
    quarter_ms: i64,
    now: DateTime<Utc>,
) -> rusqlite::Result<Option<Timer>> {
    if let Some(timer) = load_timer(conn, game_id)? {
        return Ok(Some(timer));
    }

    let quarter: Option<i64> = conn
        .query_row(
            "SELECT quarter FROM games WHERE id = ?1",
            params![game_id],
            |row| row.get(0),
        )
        .optional()?;

    Ok(quarter.map(|quarter| Timer {
        quarter,
        ..Timer::stopped(game_id, quarter_ms, now)
    }))
}

fn insert_event(
    conn: &Connection,
    game_id: i64,
    team: Team,
    kind: EventKind,
    player: PlayerRef,
    now: DateTime<Utc>,
) -> rusqlite::Result<usize> {
    conn.execute(
        INSERT_EVENT,
        params![
            game_id,
            team,
            kind,
            player.id,
            player.number,
            format_datetime(&now),
        ],
    )
}

fn subtract_points(conn: &Connection, game_id: i64, team: Team, points: i64) -> rusqlite::Result<()> {
    let sql = match team {
        Team::Home => SUB_HOME_POINTS,
        Team::Away => SUB_AWAY_POINTS,
    };
    conn.execute(sql, params![game_id, points])?;
    Ok(())
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Game operations

    fn create_game(&self, game: &NewGame, now: DateTime<Utc>) -> Result<Game> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        tx.execute(
            "INSERT INTO games (home_team, away_team, home_score, away_score, quarter, status, created_at)
             VALUES (?1, ?2, 0, 0, 1, ?3, ?4)",
            params![
                game.home_team,
                game.away_team,
                GameStatus::Scheduled,
                format_datetime(&now),
            ],
        )?;
        let id = tx.last_insert_rowid();

        write_timer(&tx, &Timer::stopped(id, game.quarter_ms, now))?;

        let created = load_game(&tx, id)?.ok_or(Error::NotFound)?;
        tx.commit()?;
        Ok(created)
    }

    fn get_game(&self, id: i64) -> Result<Option<Game>> {
        load_game(&self.conn(), id).map_err(Error::from)
    }

    fn list_games(&self, before: Option<i64>, limit: i32) -> Result<Vec<Game>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, home_team, away_team, home_score, away_score, quarter, status, created_at
             FROM games WHERE (?1 IS NULL OR id < ?1) ORDER BY id DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![before, limit], game_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn start_game(&self, id: i64, rules: &GameRules, now: DateTime<Utc>) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let updated = tx.execute(
            SET_STATUS,
            params![GameStatus::InProgress, id, GameStatus::Scheduled],
        )?;
        if updated == 0 {
            return missed(&tx, id, Rejection::NotScheduled);
        }

        let Some(timer) = timer_or_new(&tx, id, rules.default_quarter_ms, now)? else {
            return Ok(Transition::NotFound);
        };
        write_timer(&tx, &timer.started(now))?;

        tx.commit()?;
        Ok(Transition::Applied)
    }

    fn advance_quarter(
        &self,
        id: i64,
        rules: &GameRules,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let Some(game) = load_game(&tx, id)? else {
            return Ok(Transition::NotFound);
        };
        if game.status != GameStatus::InProgress {
            return Ok(Transition::Rejected(Rejection::NotInProgress));
        }
        if game.quarter >= rules.regulation_quarters && !game.is_tied() {
            return Ok(Transition::Rejected(Rejection::WinnerDecided));
        }

        let next = game.quarter + 1;
        let updated = tx.execute(
            "UPDATE games SET quarter = ?1 WHERE id = ?2 AND status = ?3 AND quarter = ?4",
            params![next, id, GameStatus::InProgress, game.quarter],
        )?;
        if updated == 0 {
            return missed(&tx, id, Rejection::NotInProgress);
        }

        let Some(timer) = timer_or_new(&tx, id, rules.default_quarter_ms, now)? else {
            return Ok(Transition::NotFound);
        };
        let quarter_ms = rules.is_overtime(next).then_some(rules.overtime_ms);
        let timer = Timer {
            quarter: next,
            ..timer.reset(quarter_ms, now)
        };
        write_timer(&tx, &timer)?;

        tx.commit()?;
        Ok(Transition::Applied)
    }

    fn finish_game(&self, id: i64, now: DateTime<Utc>) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let updated = tx.execute(
            SET_STATUS,
            params![GameStatus::Finished, id, GameStatus::InProgress],
        )?;
        if updated == 0 {
            return missed(&tx, id, Rejection::NotInProgress);
        }

        if let Some(timer) = load_timer(&tx, id)? {
            write_timer(&tx, &timer.paused(now))?;
        }

        tx.commit()?;
        Ok(Transition::Applied)
    }

    // Event operations

    fn record_score(
        &self,
        id: i64,
        team: Team,
        points: Points,
        player: PlayerRef,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let sql = match team {
            Team::Home => ADD_HOME_POINTS,
            Team::Away => ADD_AWAY_POINTS,
        };
        let updated = tx.execute(sql, params![id, points.value(), GameStatus::InProgress])?;
        if updated == 0 {
            return missed(&tx, id, Rejection::NotInProgress);
        }

        insert_event(&tx, id, team, EventKind::Point(points), player, now)?;

        tx.commit()?;
        Ok(Transition::Applied)
    }

    fn record_foul(
        &self,
        id: i64,
        team: Team,
        player: PlayerRef,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let inserted = tx.execute(
            INSERT_EVENT_WITH_STATUS,
            params![
                id,
                team,
                EventKind::Foul,
                player.id,
                player.number,
                format_datetime(&now),
                GameStatus::InProgress,
            ],
        )?;
        if inserted == 0 {
            return missed(&tx, id, Rejection::NotInProgress);
        }

        tx.commit()?;
        Ok(Transition::Applied)
    }

    fn remove_foul(
        &self,
        id: i64,
        team: Team,
        player_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let Some(foul) = tx
            .query_row(
                LAST_FOUL_FOR_TEAM,
                params![id, team, player_id],
                logged_event_from_row,
            )
            .optional()?
        else {
            return missed(&tx, id, Rejection::NoFoulToRemove);
        };

        tx.execute(DELETE_EVENT, params![foul.id])?;
        insert_event(
            &tx,
            id,
            team,
            EventKind::RemoveFoul,
            PlayerRef {
                id: player_id,
                number: None,
            },
            now,
        )?;

        tx.commit()?;
        Ok(Transition::Applied)
    }

    fn remove_score(&self, id: i64, team: Team, now: DateTime<Utc>) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let Some(point) = tx
            .query_row(LAST_POINT_FOR_TEAM, params![id, team], logged_event_from_row)
            .optional()?
        else {
            return missed(&tx, id, Rejection::NoScoreToRemove);
        };

        subtract_points(&tx, id, team, point.kind.points())?;
        tx.execute(DELETE_EVENT, params![point.id])?;
        insert_event(
            &tx,
            id,
            team,
            EventKind::RemoveScore,
            PlayerRef::default(),
            now,
        )?;

        tx.commit()?;
        Ok(Transition::Applied)
    }

    fn undo_last_event(&self, id: i64, now: DateTime<Utc>) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let Some(last) = tx
            .query_row(LAST_UNDOABLE, params![id], logged_event_from_row)
            .optional()?
        else {
            return missed(&tx, id, Rejection::NoEventToUndo);
        };

        if last.kind.points() > 0 {
            subtract_points(&tx, id, last.team, last.kind.points())?;
        }
        tx.execute(DELETE_EVENT, params![last.id])?;
        tx.execute(
            INSERT_EVENT_AT_QUARTER,
            params![
                id,
                last.quarter,
                last.team,
                EventKind::Undo,
                format_datetime(&now)
            ],
        )?;

        tx.commit()?;
        Ok(Transition::Applied)
    }

    fn list_events(&self, game_id: i64, limit: i32) -> Result<Vec<Event>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, game_id, quarter, team, event_type, player_id, player_number, created_at
             FROM game_events WHERE game_id = ?1 ORDER BY id DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![game_id, limit], event_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn count_team_fouls(&self, game_id: i64) -> Result<Vec<TeamFoulCount>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT quarter, team, COUNT(*) FROM game_events
             WHERE game_id = ?1 AND event_type = ?2
             GROUP BY quarter, team ORDER BY quarter, team",
        )?;

        let rows = stmt.query_map(params![game_id, EventKind::Foul], |row| {
            Ok(TeamFoulCount {
                quarter: row.get(0)?,
                team: row.get(1)?,
                fouls: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn count_player_fouls(&self, game_id: i64) -> Result<Vec<PlayerFoulCount>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT team, player_id, COUNT(*) FROM game_events
             WHERE game_id = ?1 AND event_type = ?2 AND player_id IS NOT NULL
             GROUP BY team, player_id ORDER BY team, player_id",
        )?;

        let rows = stmt.query_map(params![game_id, EventKind::Foul], |row| {
            Ok(PlayerFoulCount {
                team: row.get(0)?,
                player_id: row.get(1)?,
                fouls: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Clock operations

    fn get_timer(&self, game_id: i64) -> Result<Option<Timer>> {
        load_timer(&self.conn(), game_id).map_err(Error::from)
    }

    fn start_clock(
        &self,
        game_id: i64,
        default_quarter_ms: i64,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let Some(timer) = timer_or_new(&tx, game_id, default_quarter_ms, now)? else {
            return Ok(Transition::NotFound);
        };
        write_timer(&tx, &timer.started(now))?;

        tx.commit()?;
        Ok(Transition::Applied)
    }

    fn pause_clock(&self, game_id: i64, now: DateTime<Utc>) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let Some(timer) = load_timer(&tx, game_id)? else {
            return Ok(Transition::NotFound);
        };
        write_timer(&tx, &timer.paused(now))?;

        tx.commit()?;
        Ok(Transition::Applied)
    }

    fn reset_clock(
        &self,
        game_id: i64,
        quarter_ms: Option<i64>,
        default_quarter_ms: i64,
        now: DateTime<Utc>,
    ) -> Result<Transition> {
        let mut conn = self.conn();
        let tx = write_tx(&mut conn)?;

        let initial_ms = quarter_ms.unwrap_or(default_quarter_ms);
        let Some(timer) = timer_or_new(&tx, game_id, initial_ms, now)? else {
            return Ok(Transition::NotFound);
        };
        write_timer(&tx, &timer.reset(quarter_ms, now))?;

        tx.commit()?;
        Ok(Transition::Applied)
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tokens (id, token_hash, token_lookup, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                token.id,
                token.token_hash,
                token.token_lookup,
                format_datetime(&token.created_at),
                token.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::TokenLookupCollision)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, token_hash, token_lookup, created_at, expires_at, last_used_at
             FROM tokens WHERE token_lookup = ?1",
            params![lookup],
            token_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_tokens(&self) -> Result<Vec<Token>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, token_hash, token_lookup, created_at, expires_at, last_used_at
             FROM tokens ORDER BY created_at",
        )?;

        let rows = stmt.query_map([], token_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    fn has_admin_token(&self) -> Result<bool> {
        let conn = self.conn();
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM tokens", [], |row| row.get(0))?;
        Ok(count > 0)
    }
}
