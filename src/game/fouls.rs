use serde::Serialize;

use crate::config::GameRules;
use crate::types::{PlayerFoulCount, Team, TeamFoulCount};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFoulLine {
    pub quarter: i64,
    pub team: Team,
    pub fouls: i64,
    /// The opponent is shooting bonus free throws.
    pub bonus: bool,
    /// Free throws awarded for the most recent foul in this quarter.
    pub free_throws: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerFoulLine {
    pub team: Team,
    pub player_id: i64,
    pub fouls: i64,
    pub fouled_out: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FoulSummary {
    pub team: Vec<TeamFoulLine>,
    pub players: Vec<PlayerFoulLine>,
}

/// Free throws for a team's latest foul: the first foul past the threshold
/// gives one shot, every later one gives two.
#[must_use]
pub fn bonus_free_throws(team_fouls: i64, threshold: i64) -> i64 {
    match team_fouls - threshold {
        over if over <= 0 => 0,
        1 => 1,
        _ => 2,
    }
}

/// Derives bonus and foul-out flags from raw FOUL counts. Nothing here is
/// enforced on writes.
#[must_use]
pub fn summarize(
    team_counts: Vec<TeamFoulCount>,
    player_counts: Vec<PlayerFoulCount>,
    rules: &GameRules,
) -> FoulSummary {
    let team = team_counts
        .into_iter()
        .map(|row| TeamFoulLine {
            quarter: row.quarter,
            team: row.team,
            fouls: row.fouls,
            bonus: row.fouls > rules.bonus_threshold,
            free_throws: bonus_free_throws(row.fouls, rules.bonus_threshold),
        })
        .collect();

    let players = player_counts
        .into_iter()
        .map(|row| PlayerFoulLine {
            team: row.team,
            player_id: row.player_id,
            fouls: row.fouls,
            fouled_out: row.fouls >= rules.foul_out_limit,
        })
        .collect();

    FoulSummary { team, players }
}
