// Per-game stat records and the canonical summable-stat view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Stat keys
// ---------------------------------------------------------------------------

/// Every summable box-score category, in display order.
///
/// This is the closed universe the aggregator iterates over. Scores, the win
/// flag, and percentage-style values are intentionally not keys: percentages
/// are always derived downstream from the summed made/attempted pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKey {
    Minutes,
    Points,
    Rebounds,
    OffensiveRebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    Fouls,
    PlusMinus,
    FgMade,
    FgAttempted,
    ThreeMade,
    ThreeAttempted,
    FtMade,
    FtAttempted,
}

impl StatKey {
    /// All summable keys, in the order they appear in reports.
    pub const ALL: [StatKey; 16] = [
        StatKey::Minutes,
        StatKey::Points,
        StatKey::Rebounds,
        StatKey::OffensiveRebounds,
        StatKey::Assists,
        StatKey::Steals,
        StatKey::Blocks,
        StatKey::Turnovers,
        StatKey::Fouls,
        StatKey::PlusMinus,
        StatKey::FgMade,
        StatKey::FgAttempted,
        StatKey::ThreeMade,
        StatKey::ThreeAttempted,
        StatKey::FtMade,
        StatKey::FtAttempted,
    ];

    /// Short column label used in reports and CSV headers.
    pub fn label(&self) -> &'static str {
        match self {
            StatKey::Minutes => "MIN",
            StatKey::Points => "PTS",
            StatKey::Rebounds => "REB",
            StatKey::OffensiveRebounds => "OREB",
            StatKey::Assists => "AST",
            StatKey::Steals => "STL",
            StatKey::Blocks => "BLK",
            StatKey::Turnovers => "TOV",
            StatKey::Fouls => "PF",
            StatKey::PlusMinus => "+/-",
            StatKey::FgMade => "FGM",
            StatKey::FgAttempted => "FGA",
            StatKey::ThreeMade => "3PM",
            StatKey::ThreeAttempted => "3PA",
            StatKey::FtMade => "FTM",
            StatKey::FtAttempted => "FTA",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Box score
// ---------------------------------------------------------------------------

/// The recorded box-score line for a single game.
///
/// Every field is optional: seasons legitimately have partial data (offensive
/// rebounds tracked in some games and not others), and an absent value must
/// flow through aggregation as "absent", never as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxScore {
    pub minutes: Option<f64>,
    pub points: Option<u32>,
    pub rebounds: Option<u32>,
    pub offensive_rebounds: Option<u32>,
    pub assists: Option<u32>,
    pub steals: Option<u32>,
    pub blocks: Option<u32>,
    pub turnovers: Option<u32>,
    pub fouls: Option<u32>,
    pub plus_minus: Option<i32>,
    pub fg_made: Option<u32>,
    pub fg_attempted: Option<u32>,
    pub three_made: Option<u32>,
    pub three_attempted: Option<u32>,
    pub ft_made: Option<u32>,
    pub ft_attempted: Option<u32>,
}

impl BoxScore {
    /// Look up one summable stat as an `f64`, or `None` if it was not
    /// recorded for this game.
    pub fn get(&self, key: StatKey) -> Option<f64> {
        match key {
            StatKey::Minutes => self.minutes,
            StatKey::Points => self.points.map(f64::from),
            StatKey::Rebounds => self.rebounds.map(f64::from),
            StatKey::OffensiveRebounds => self.offensive_rebounds.map(f64::from),
            StatKey::Assists => self.assists.map(f64::from),
            StatKey::Steals => self.steals.map(f64::from),
            StatKey::Blocks => self.blocks.map(f64::from),
            StatKey::Turnovers => self.turnovers.map(f64::from),
            StatKey::Fouls => self.fouls.map(f64::from),
            StatKey::PlusMinus => self.plus_minus.map(f64::from),
            StatKey::FgMade => self.fg_made.map(f64::from),
            StatKey::FgAttempted => self.fg_attempted.map(f64::from),
            StatKey::ThreeMade => self.three_made.map(f64::from),
            StatKey::ThreeAttempted => self.three_attempted.map(f64::from),
            StatKey::FtMade => self.ft_made.map(f64::from),
            StatKey::FtAttempted => self.ft_attempted.map(f64::from),
        }
    }

    /// Iterate the recorded `(key, value)` pairs — the normalized view the
    /// aggregator and the derived-stat calculator share. Unrecorded keys are
    /// skipped entirely.
    pub fn normalized(&self) -> impl Iterator<Item = (StatKey, f64)> + '_ {
        StatKey::ALL
            .iter()
            .filter_map(|&key| self.get(key).map(|v| (key, v)))
    }
}

// ---------------------------------------------------------------------------
// Boundary validation
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StatError {
    #[error("{stat} made ({made}) exceeds attempted ({attempted})")]
    MadeExceedsAttempted {
        stat: &'static str,
        made: u32,
        attempted: u32,
    },

    #[error("three-point attempts ({three}) exceed field-goal attempts ({fg})")]
    ThreeAttemptsExceedFieldGoals { three: u32, fg: u32 },
}

/// Validate the made/attempted relationships of a box score.
///
/// This runs at the write boundary (store inserts/updates, CSV import) so a
/// violating record never reaches the aggregator. A pair is only checked when
/// both sides are present; partial data is legal.
pub fn validate_box_score(box_score: &BoxScore) -> Result<(), StatError> {
    let pairs: [(&'static str, Option<u32>, Option<u32>); 3] = [
        ("field goals", box_score.fg_made, box_score.fg_attempted),
        ("three-pointers", box_score.three_made, box_score.three_attempted),
        ("free throws", box_score.ft_made, box_score.ft_attempted),
    ];
    for (stat, made, attempted) in pairs {
        if let (Some(m), Some(a)) = (made, attempted) {
            if m > a {
                return Err(StatError::MadeExceedsAttempted {
                    stat,
                    made: m,
                    attempted: a,
                });
            }
        }
    }
    if let (Some(three), Some(fg)) = (box_score.three_attempted, box_score.fg_attempted) {
        if three > fg {
            return Err(StatError::ThreeAttemptsExceedFieldGoals { three, fg });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Game record
// ---------------------------------------------------------------------------

/// One played game for the tracked player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatRecord {
    /// Store row id; 0 for records not yet persisted.
    pub id: i64,
    pub player_id: String,
    pub season_id: String,
    pub date: NaiveDate,
    pub opponent_team_id: String,
    /// Denormalized opponent name. Legacy rows may carry only this, with an
    /// empty `opponent_team_id`.
    pub opponent_name: String,
    pub home: bool,
    pub player_score: u32,
    pub opponent_score: u32,
    pub playoff: bool,
    /// Series this playoff game belongs to, when linked directly.
    pub series_id: Option<String>,
    pub key_game: bool,
    pub cup_game: bool,
    pub overtime: bool,
    pub simulated: bool,
    pub box_score: BoxScore,
}

impl GameStatRecord {
    /// Whether the player's team won. Derived from the scores on every read,
    /// never stored, so it cannot drift when a score is edited.
    pub fn is_win(&self) -> bool {
        self.player_score > self.opponent_score
    }
}

// ---------------------------------------------------------------------------
// Stat lines (totals / averages)
// ---------------------------------------------------------------------------

/// A per-key stat line with the same shape as [`BoxScore`] but `f64`-valued,
/// used for season/career totals and averages. `None` means the key was never
/// recorded in the underlying games (rendered "–").
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub minutes: Option<f64>,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub offensive_rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    pub turnovers: Option<f64>,
    pub fouls: Option<f64>,
    pub plus_minus: Option<f64>,
    pub fg_made: Option<f64>,
    pub fg_attempted: Option<f64>,
    pub three_made: Option<f64>,
    pub three_attempted: Option<f64>,
    pub ft_made: Option<f64>,
    pub ft_attempted: Option<f64>,
}

impl StatLine {
    pub fn get(&self, key: StatKey) -> Option<f64> {
        match key {
            StatKey::Minutes => self.minutes,
            StatKey::Points => self.points,
            StatKey::Rebounds => self.rebounds,
            StatKey::OffensiveRebounds => self.offensive_rebounds,
            StatKey::Assists => self.assists,
            StatKey::Steals => self.steals,
            StatKey::Blocks => self.blocks,
            StatKey::Turnovers => self.turnovers,
            StatKey::Fouls => self.fouls,
            StatKey::PlusMinus => self.plus_minus,
            StatKey::FgMade => self.fg_made,
            StatKey::FgAttempted => self.fg_attempted,
            StatKey::ThreeMade => self.three_made,
            StatKey::ThreeAttempted => self.three_attempted,
            StatKey::FtMade => self.ft_made,
            StatKey::FtAttempted => self.ft_attempted,
        }
    }

    pub fn set(&mut self, key: StatKey, value: Option<f64>) {
        let slot = match key {
            StatKey::Minutes => &mut self.minutes,
            StatKey::Points => &mut self.points,
            StatKey::Rebounds => &mut self.rebounds,
            StatKey::OffensiveRebounds => &mut self.offensive_rebounds,
            StatKey::Assists => &mut self.assists,
            StatKey::Steals => &mut self.steals,
            StatKey::Blocks => &mut self.blocks,
            StatKey::Turnovers => &mut self.turnovers,
            StatKey::Fouls => &mut self.fouls,
            StatKey::PlusMinus => &mut self.plus_minus,
            StatKey::FgMade => &mut self.fg_made,
            StatKey::FgAttempted => &mut self.fg_attempted,
            StatKey::ThreeMade => &mut self.three_made,
            StatKey::ThreeAttempted => &mut self.three_attempted,
            StatKey::FtMade => &mut self.ft_made,
            StatKey::FtAttempted => &mut self.ft_attempted,
        };
        *slot = value;
    }

    /// Add `value` to the key's running sum, treating an absent slot as a
    /// fresh zero. Once a key has been seen it stays present.
    pub fn accumulate(&mut self, key: StatKey, value: f64) {
        let current = self.get(key).unwrap_or(0.0);
        self.set(key, Some(current + value));
    }
}
