// Derived statistics: shooting percentages and double/triple-doubles.

use crate::stats::game::{BoxScore, GameStatRecord, StatKey, StatLine};
use serde::{Deserialize, Serialize};

/// Threshold a category must reach to count toward a double/triple-double.
const DOUBLE_DIGIT: u32 = 10;

/// The five categories eligible for double/triple-double classification.
const DOUBLE_DOUBLE_KEYS: [StatKey; 5] = [
    StatKey::Points,
    StatKey::Rebounds,
    StatKey::Assists,
    StatKey::Steals,
    StatKey::Blocks,
];

// ---------------------------------------------------------------------------
// Shooting percentages
// ---------------------------------------------------------------------------

/// Compute `made / attempted` rounded to 3 decimals.
///
/// Returns `None` when either side is absent or attempted is 0. Percentages
/// are only ever computed from summed counts; averaging per-game percentages
/// weights low-volume games equally with high-volume ones and is wrong.
pub fn shooting_pct(made: Option<f64>, attempted: Option<f64>) -> Option<f64> {
    let made = made?;
    let attempted = attempted?;
    if attempted == 0.0 {
        return None;
    }
    Some((made / attempted * 1000.0).round() / 1000.0)
}

/// The three shooting splits carried on season and career totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShootingPercentages {
    pub fg: Option<f64>,
    pub three: Option<f64>,
    pub ft: Option<f64>,
}

impl ShootingPercentages {
    /// Derive all three splits from a summed stat line.
    pub fn from_totals(totals: &StatLine) -> Self {
        ShootingPercentages {
            fg: shooting_pct(totals.fg_made, totals.fg_attempted),
            three: shooting_pct(totals.three_made, totals.three_attempted),
            ft: shooting_pct(totals.ft_made, totals.ft_attempted),
        }
    }
}

// ---------------------------------------------------------------------------
// Double/triple-doubles
// ---------------------------------------------------------------------------

/// Count how many of the five eligible categories reached double digits.
fn double_digit_categories(box_score: &BoxScore) -> usize {
    DOUBLE_DOUBLE_KEYS
        .iter()
        .filter(|&&key| box_score.get(key).is_some_and(|v| v >= DOUBLE_DIGIT as f64))
        .count()
}

/// At least two of {points, rebounds, assists, steals, blocks} ≥ 10.
pub fn is_double_double(game: &GameStatRecord) -> bool {
    double_digit_categories(&game.box_score) >= 2
}

/// At least three of {points, rebounds, assists, steals, blocks} ≥ 10.
pub fn is_triple_double(game: &GameStatRecord) -> bool {
    double_digit_categories(&game.box_score) >= 3
}

/// Count double- and triple-doubles across a set of games.
///
/// Counts are always produced by counting qualifying games and summing,
/// never by averaging, and never read from a manual totals record when real
/// games exist.
pub fn count_doubles(games: &[&GameStatRecord]) -> (u32, u32) {
    let mut double_doubles = 0;
    let mut triple_doubles = 0;
    for game in games {
        let categories = double_digit_categories(&game.box_score);
        if categories >= 2 {
            double_doubles += 1;
        }
        if categories >= 3 {
            triple_doubles += 1;
        }
    }
    (double_doubles, triple_doubles)
}
