use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Timer;

/// Clock as shown to clients: the stored snapshot advanced to `now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockState {
    pub game_id: i64,
    pub quarter: i64,
    pub quarter_ms: i64,
    pub running: bool,
    pub remaining_ms: i64,
    pub updated_at: DateTime<Utc>,
}

/// Milliseconds between `started_at` and `now`. Negative spans (clock skew
/// between writers) count as zero.
fn elapsed_ms(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - started_at).num_milliseconds().max(0)
}

impl Timer {
    /// Remaining time at `now`, never below zero.
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> i64 {
        let stored = self.remaining_ms.max(0);
        match (self.running, self.started_at) {
            (true, Some(started_at)) => (stored - elapsed_ms(started_at, now)).max(0),
            _ => stored,
        }
    }

    /// Live clock state. Reads never correct the stored row: a timer that ran
    /// out is reported as stopped while still flagged running in storage.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> ClockState {
        let remaining_ms = self.remaining_at(now);
        let running = self.running && self.remaining_ms > 0 && remaining_ms > 0;

        ClockState {
            game_id: self.game_id,
            quarter: self.quarter,
            quarter_ms: self.quarter_ms,
            running,
            remaining_ms,
            updated_at: self.updated_at,
        }
    }

    /// Snapshot after a start at `now`.
    ///
    /// An expired clock restarts from a full quarter. Starting a clock that is
    /// already running keeps its baseline, so repeated starts do not lose
    /// elapsed time.
    #[must_use]
    pub fn started(&self, now: DateTime<Utc>) -> Timer {
        let remaining_ms = if self.remaining_ms <= 0 {
            self.quarter_ms
        } else {
            self.remaining_ms
        };
        let started_at = match (self.running, self.started_at) {
            (true, Some(started_at)) => started_at,
            _ => now,
        };

        Timer {
            remaining_ms,
            running: true,
            started_at: Some(started_at),
            updated_at: now,
            ..self.clone()
        }
    }

    /// Snapshot after a pause at `now`: elapsed time is folded into
    /// `remaining_ms` and the baseline is cleared.
    #[must_use]
    pub fn paused(&self, now: DateTime<Utc>) -> Timer {
        Timer {
            remaining_ms: self.remaining_at(now),
            running: false,
            started_at: None,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Snapshot after a reset to a full, stopped quarter.
    #[must_use]
    pub fn reset(&self, quarter_ms: Option<i64>, now: DateTime<Utc>) -> Timer {
        let quarter_ms = quarter_ms.unwrap_or(self.quarter_ms);
        Timer {
            quarter_ms,
            remaining_ms: quarter_ms,
            running: false,
            started_at: None,
            updated_at: now,
            ..self.clone()
        }
    }

    /// A fresh stopped timer for the first quarter.
    #[must_use]
    pub fn stopped(game_id: i64, quarter_ms: i64, now: DateTime<Utc>) -> Timer {
        Timer {
            game_id,
            quarter: 1,
            quarter_ms,
            remaining_ms: quarter_ms,
            running: false,
            started_at: None,
            updated_at: now,
        }
    }
}
