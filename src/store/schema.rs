pub const SCHEMA: &str = r#"
-- One row per game; never deleted
CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    home_team TEXT NOT NULL,
    away_team TEXT NOT NULL,
    home_score INTEGER NOT NULL DEFAULT 0 CHECK (home_score >= 0),
    away_score INTEGER NOT NULL DEFAULT 0 CHECK (away_score >= 0),
    quarter INTEGER NOT NULL DEFAULT 1 CHECK (quarter >= 1),
    status TEXT NOT NULL DEFAULT 'SCHEDULED'
        CHECK (status IN ('SCHEDULED', 'IN_PROGRESS', 'FINISHED')),
    created_at TEXT DEFAULT (datetime('now'))
);

-- Clock snapshot, one-to-one with games
CREATE TABLE IF NOT EXISTS game_timers (
    game_id INTEGER PRIMARY KEY REFERENCES games(id),
    quarter INTEGER NOT NULL DEFAULT 1,
    quarter_ms INTEGER NOT NULL CHECK (quarter_ms > 0),
    remaining_ms INTEGER NOT NULL CHECK (remaining_ms >= 0),
    running INTEGER NOT NULL DEFAULT 0,
    started_at TEXT,               -- NULL whenever running = 0
    updated_at TEXT DEFAULT (datetime('now')),

    CHECK ((running = 0 AND started_at IS NULL) OR (running = 1 AND started_at IS NOT NULL))
);

-- Event log; id order is the recency order
CREATE TABLE IF NOT EXISTS game_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER NOT NULL REFERENCES games(id),
    quarter INTEGER NOT NULL,
    team TEXT NOT NULL CHECK (team IN ('HOME', 'AWAY')),
    event_type TEXT NOT NULL,
    player_id INTEGER,
    player_number INTEGER,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Admin API credentials
CREATE TABLE IF NOT EXISTS tokens (
    id TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL,          -- argon2id hash with embedded salt
    token_lookup TEXT NOT NULL,        -- first 8 chars of ID for fast lookup
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT,                   -- NULL = never
    last_used_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_game_events_game ON game_events(game_id, id);
CREATE INDEX IF NOT EXISTS idx_game_events_team_type ON game_events(game_id, team, event_type);
CREATE UNIQUE INDEX IF NOT EXISTS idx_tokens_lookup ON tokens(token_lookup);
"#;
