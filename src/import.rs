// CSV game-log import.
//
// Reads a per-game box-score CSV (one row per game) and produces validated
// GameStatRecords for the tracked player. Extra columns are silently ignored.

use crate::config::Config;
use crate::stats::game::{validate_box_score, BoxScore, GameStatRecord, StatError};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("row {row}: invalid date {date:?} (expected YYYY-MM-DD)")]
    BadDate { row: usize, date: String },

    #[error("row {row}: {source}")]
    InvalidBoxScore { row: usize, source: StatError },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// One game-log row. Empty cells deserialize to `None`; unrecognized columns
/// are absorbed by `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawGameRow {
    Date: String,
    Season: String,
    Opponent: String,
    #[serde(default)]
    OpponentId: String,
    #[serde(default)]
    Home: Option<u8>,
    PlayerScore: u32,
    OpponentScore: u32,
    #[serde(default)]
    Playoff: Option<u8>,
    #[serde(default)]
    SeriesId: Option<String>,
    #[serde(default)]
    KeyGame: Option<u8>,
    #[serde(default)]
    CupGame: Option<u8>,
    #[serde(default)]
    OT: Option<u8>,
    #[serde(default)]
    Simulated: Option<u8>,
    #[serde(default)]
    MIN: Option<f64>,
    #[serde(default)]
    PTS: Option<u32>,
    #[serde(default)]
    REB: Option<u32>,
    #[serde(default)]
    OREB: Option<u32>,
    #[serde(default)]
    AST: Option<u32>,
    #[serde(default)]
    STL: Option<u32>,
    #[serde(default)]
    BLK: Option<u32>,
    #[serde(default)]
    TOV: Option<u32>,
    #[serde(default)]
    PF: Option<u32>,
    #[serde(default, rename = "PLUSMINUS")]
    plus_minus: Option<i32>,
    #[serde(default)]
    FGM: Option<u32>,
    #[serde(default)]
    FGA: Option<u32>,
    #[serde(default, rename = "3PM")]
    three_made: Option<u32>,
    #[serde(default, rename = "3PA")]
    three_attempted: Option<u32>,
    #[serde(default)]
    FTM: Option<u32>,
    #[serde(default)]
    FTA: Option<u32>,
    /// Absorb any extra columns the export includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

fn flag(value: Option<u8>) -> bool {
    value.is_some_and(|v| v != 0)
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load game records for `player_id` from any reader. Rows that violate the
/// box-score boundary rules fail the whole import with their row number; a
/// partial import would leave the aggregate silently short.
pub fn load_games_from_reader<R: Read>(
    reader: R,
    player_id: &str,
) -> Result<Vec<GameStatRecord>, ImportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut games = Vec::new();

    for (index, result) in csv_reader.deserialize::<RawGameRow>().enumerate() {
        // Header is line 1; first data row is line 2.
        let row_number = index + 2;
        let raw = result.map_err(|e| ImportError::Csv {
            path: "<reader>".to_string(),
            source: e,
        })?;

        let date = NaiveDate::parse_from_str(raw.Date.trim(), "%Y-%m-%d").map_err(|_| {
            ImportError::BadDate {
                row: row_number,
                date: raw.Date.clone(),
            }
        })?;

        let box_score = BoxScore {
            minutes: raw.MIN,
            points: raw.PTS,
            rebounds: raw.REB,
            offensive_rebounds: raw.OREB,
            assists: raw.AST,
            steals: raw.STL,
            blocks: raw.BLK,
            turnovers: raw.TOV,
            fouls: raw.PF,
            plus_minus: raw.plus_minus,
            fg_made: raw.FGM,
            fg_attempted: raw.FGA,
            three_made: raw.three_made,
            three_attempted: raw.three_attempted,
            ft_made: raw.FTM,
            ft_attempted: raw.FTA,
        };
        validate_box_score(&box_score).map_err(|source| ImportError::InvalidBoxScore {
            row: row_number,
            source,
        })?;

        let series_id = raw
            .SeriesId
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        let playoff = flag(raw.Playoff);
        if series_id.is_some() && !playoff {
            warn!(row = row_number, "series reference on a non-playoff row, keeping as-is");
        }

        games.push(GameStatRecord {
            id: 0,
            player_id: player_id.to_string(),
            season_id: raw.Season.trim().to_string(),
            date,
            opponent_team_id: raw.OpponentId.trim().to_string(),
            opponent_name: raw.Opponent.trim().to_string(),
            home: flag(raw.Home),
            player_score: raw.PlayerScore,
            opponent_score: raw.OpponentScore,
            playoff,
            series_id,
            key_game: flag(raw.KeyGame),
            cup_game: flag(raw.CupGame),
            overtime: flag(raw.OT),
            simulated: flag(raw.Simulated),
            box_score,
        });
    }

    Ok(games)
}

/// Load game records from the CSV path configured under `[data]`.
pub fn load_games(config: &Config) -> Result<Vec<GameStatRecord>, ImportError> {
    let path = Path::new(&config.data_paths.games_csv);
    let file = std::fs::File::open(path).map_err(|source| ImportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_games_from_reader(file, &config.player.id).map_err(|e| match e {
        ImportError::Csv { source, .. } => ImportError::Csv {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}
