// Career aggregation: season totals into a single career line.

use crate::stats::derived::ShootingPercentages;
use crate::stats::game::{StatKey, StatLine};
use crate::stats::season::SeasonTotals;
use serde::{Deserialize, Serialize};

/// Career totals, derived on every read from the season totals list and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerTotals {
    pub seasons: u32,
    pub games_played: u32,
    pub games_started: Option<u32>,
    pub totals: StatLine,
    pub averages: StatLine,
    pub percentages: ShootingPercentages,
    pub double_doubles: u32,
    pub triple_doubles: u32,
}

/// Sum season totals into career totals.
///
/// Totals and double/triple-double counts are purely additive; they are never
/// re-derived at the career level. Averages are weighted by games played
/// (summed stat over summed games), and shooting percentages come from the
/// career-summed made/attempted pairs, never from averaging per-season
/// percentages.
pub fn compute_career_totals(season_totals: &[SeasonTotals]) -> CareerTotals {
    let mut totals = StatLine::default();
    let mut games_played: u32 = 0;
    let mut games_started: Option<u32> = None;
    let mut double_doubles: u32 = 0;
    let mut triple_doubles: u32 = 0;

    for season in season_totals {
        for key in StatKey::ALL {
            if let Some(value) = season.totals.get(key) {
                totals.accumulate(key, value);
            }
        }
        games_played += season.games_played;
        if let Some(started) = season.games_started {
            games_started = Some(games_started.unwrap_or(0) + started);
        }
        double_doubles += season.double_doubles;
        triple_doubles += season.triple_doubles;
    }

    let mut averages = StatLine::default();
    for key in StatKey::ALL {
        let avg = match (totals.get(key), games_played) {
            (Some(_), 0) | (None, _) => None,
            (Some(sum), n) => Some(sum / n as f64),
        };
        averages.set(key, avg);
    }

    CareerTotals {
        seasons: season_totals.len() as u32,
        games_played,
        games_started,
        totals,
        averages,
        percentages: ShootingPercentages::from_totals(&totals),
        double_doubles,
        triple_doubles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn season(id: &str, games: u32, points: f64, fg_made: f64, fg_attempted: f64) -> SeasonTotals {
        let mut totals = StatLine::default();
        totals.points = Some(points);
        totals.fg_made = Some(fg_made);
        totals.fg_attempted = Some(fg_attempted);
        let mut averages = StatLine::default();
        averages.points = Some(points / games as f64);
        SeasonTotals {
            player_id: "p1".into(),
            season_id: id.into(),
            games_played: games,
            games_started: None,
            totals,
            averages,
            percentages: ShootingPercentages::from_totals(&totals),
            double_doubles: 3,
            triple_doubles: 1,
            is_manual_entry: false,
        }
    }

    #[test]
    fn career_totals_are_sums_of_season_totals() {
        let seasons = vec![
            season("2022-2023", 70, 1400.0, 500.0, 1100.0),
            season("2023-2024", 80, 2000.0, 700.0, 1500.0),
        ];
        let career = compute_career_totals(&seasons);
        assert_eq!(career.seasons, 2);
        assert_eq!(career.games_played, 150);
        assert_eq!(career.totals.points, Some(3400.0));
        assert_eq!(career.double_doubles, 6);
        assert_eq!(career.triple_doubles, 2);
    }

    #[test]
    fn career_averages_weighted_by_games_played() {
        let seasons = vec![
            season("2022-2023", 50, 1000.0, 350.0, 800.0),
            season("2023-2024", 100, 1000.0, 350.0, 800.0),
        ];
        let career = compute_career_totals(&seasons);
        // 2000 points over 150 games, not the mean of 20.0 and 10.0.
        assert!((career.averages.points.unwrap() - 2000.0 / 150.0).abs() < 1e-9);
    }

    #[test]
    fn career_percentage_from_summed_counts() {
        let seasons = vec![
            season("2022-2023", 70, 1400.0, 500.0, 1000.0),
            season("2023-2024", 80, 2000.0, 700.0, 1500.0),
        ];
        let career = compute_career_totals(&seasons);
        assert_eq!(career.percentages.fg, Some(0.48)); // 1200 / 2500
    }

    #[test]
    fn empty_input_yields_absent_averages() {
        let career = compute_career_totals(&[]);
        assert_eq!(career.seasons, 0);
        assert_eq!(career.games_played, 0);
        assert_eq!(career.averages.points, None);
        assert_eq!(career.percentages.fg, None);
        assert_eq!(career.games_started, None);
    }

    #[test]
    fn games_started_sums_only_known_seasons() {
        let mut with_started = season("2022-2023", 70, 1400.0, 500.0, 1100.0);
        with_started.games_started = Some(65);
        let without = season("2023-2024", 80, 2000.0, 700.0, 1500.0);
        let career = compute_career_totals(&[with_started, without]);
        assert_eq!(career.games_started, Some(65));
    }

    #[test]
    fn manual_seasons_contribute_like_derived_ones() {
        let mut manual = season("2019-2020", 82, 1640.0, 600.0, 1300.0);
        manual.is_manual_entry = true;
        let derived = season("2023-2024", 80, 2000.0, 700.0, 1500.0);
        let career = compute_career_totals(&[manual, derived]);
        assert_eq!(career.totals.points, Some(3640.0));
        assert_eq!(career.games_played, 162);
    }
}
