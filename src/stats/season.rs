// Season aggregation: raw game records into season totals and averages.

use crate::stats::derived::{count_doubles, ShootingPercentages};
use crate::stats::game::{GameStatRecord, StatKey, StatLine};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Totals and derived stats for one (player, season).
///
/// Either computed from games or, when a season has no games at all, taken
/// verbatim from a manually-entered record (`is_manual_entry`). A season with
/// games never uses the manual record: games are authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub player_id: String,
    pub season_id: String,
    pub games_played: u32,
    /// Games started; only known for manual entries (game records carry no
    /// starter flag).
    pub games_started: Option<u32>,
    pub totals: StatLine,
    pub averages: StatLine,
    pub percentages: ShootingPercentages,
    pub double_doubles: u32,
    pub triple_doubles: u32,
    pub is_manual_entry: bool,
}

/// Aggregate one season from the full game collection.
///
/// Pure and idempotent: the same inputs always produce the same output, and
/// no input is mutated. Returns `None` when the season has neither games nor
/// a manual record, in which case it is omitted from season-by-season output.
pub fn compute_season_totals(
    player_id: &str,
    season_id: &str,
    games: &[GameStatRecord],
    manual_override: Option<&SeasonTotals>,
) -> Option<SeasonTotals> {
    let season_games: Vec<&GameStatRecord> = games
        .iter()
        .filter(|g| g.player_id == player_id && g.season_id == season_id)
        .collect();

    if season_games.is_empty() {
        // No games: the manual record, if any, is used verbatim.
        return manual_override.map(|manual| {
            debug!(
                player = player_id,
                season = season_id,
                "no games recorded, using manual season entry"
            );
            SeasonTotals {
                is_manual_entry: true,
                ..manual.clone()
            }
        });
    }

    let games_played = season_games.len() as u32;

    let mut totals = StatLine::default();
    for game in &season_games {
        for (key, value) in game.box_score.normalized() {
            totals.accumulate(key, value);
        }
    }

    let mut averages = StatLine::default();
    for key in StatKey::ALL {
        averages.set(key, totals.get(key).map(|sum| sum / games_played as f64));
    }

    // Always recomputed from games, even when a manual record exists, so the
    // counts stay correct across edits.
    let (double_doubles, triple_doubles) = count_doubles(&season_games);

    Some(SeasonTotals {
        player_id: player_id.to_string(),
        season_id: season_id.to_string(),
        games_played,
        games_started: None,
        totals,
        averages,
        percentages: ShootingPercentages::from_totals(&totals),
        double_doubles,
        triple_doubles,
        is_manual_entry: false,
    })
}
