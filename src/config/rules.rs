use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_QUARTER_MS: i64 = 720_000;
pub const DEFAULT_OVERTIME_MS: i64 = 300_000;

/// Game rules shared by the clock and the quarter state machine.
///
/// Loaded from `rules.toml` in the data directory. Every field has a default,
/// so a partial file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameRules {
    /// Quarter length used when a game is created without one, or when a
    /// timer row has to be created lazily.
    pub default_quarter_ms: i64,
    /// Length of every overtime period.
    pub overtime_ms: i64,
    /// Quarter lengths a client may pick.
    pub allowed_quarter_ms: Vec<i64>,
    /// Number of regulation quarters. Periods after this are overtime.
    pub regulation_quarters: i64,
    /// Team fouls in one quarter above which the opponent shoots free throws.
    pub bonus_threshold: i64,
    /// Personal fouls at which a player is out of the game.
    pub foul_out_limit: i64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            default_quarter_ms: DEFAULT_QUARTER_MS,
            overtime_ms: DEFAULT_OVERTIME_MS,
            allowed_quarter_ms: vec![10_000, 30_000, 300_000, 600_000, 720_000],
            regulation_quarters: 4,
            bonus_threshold: 4,
            foul_out_limit: 5,
        }
    }
}

impl GameRules {
    /// Reads the rules file, falling back to defaults when it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let rules: GameRules = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Writes the rules as TOML. Used by `admin init` to seed a default file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize rules: {e}")))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.allowed_quarter_ms.is_empty() {
            return Err(Error::Config(
                "allowed_quarter_ms cannot be empty".to_string(),
            ));
        }
        if self.allowed_quarter_ms.iter().any(|&ms| ms <= 0) {
            return Err(Error::Config(
                "allowed_quarter_ms values must be positive".to_string(),
            ));
        }
        if !self.allowed_quarter_ms.contains(&self.default_quarter_ms) {
            return Err(Error::Config(format!(
                "default_quarter_ms {} is not in allowed_quarter_ms",
                self.default_quarter_ms
            )));
        }
        if self.overtime_ms <= 0 {
            return Err(Error::Config("overtime_ms must be positive".to_string()));
        }
        if self.regulation_quarters < 1 {
            return Err(Error::Config(
                "regulation_quarters must be at least 1".to_string(),
            ));
        }
        if self.bonus_threshold < 0 || self.foul_out_limit < 1 {
            return Err(Error::Config("foul thresholds out of range".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn is_allowed_quarter_ms(&self, ms: i64) -> bool {
        self.allowed_quarter_ms.contains(&ms)
    }

    /// Returns the requested quarter length if allowed, otherwise the default.
    #[must_use]
    pub fn quarter_ms_or_default(&self, requested: Option<i64>) -> i64 {
        match requested {
            Some(ms) if self.is_allowed_quarter_ms(ms) => ms,
            Some(ms) => {
                tracing::warn!(
                    requested = ms,
                    fallback = self.default_quarter_ms,
                    "Unsupported quarter length, using default"
                );
                self.default_quarter_ms
            }
            None => self.default_quarter_ms,
        }
    }

    #[must_use]
    pub fn is_overtime(&self, quarter: i64) -> bool {
        quarter > self.regulation_quarters
    }
}
