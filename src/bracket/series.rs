// Playoff series: model, live winner resolution, and identifier generation.

use crate::bracket::conference::{resolve_conference, Conference};
use crate::league::shorten_season;
use serde::{Deserialize, Serialize};

/// Wins needed to take a series.
pub const SERIES_WIN_TARGET: u32 = 4;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// One side of a playoff series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesTeam {
    pub id: String,
    /// Denormalized display name, kept on the series so the bracket still
    /// renders when the team reference table is missing an entry.
    pub name: String,
    pub seed: Option<u8>,
    pub wins: u32,
}

/// A playoff series belonging to one (player, season).
///
/// Conference and winner are derived on read, never stored, so they cannot
/// drift out of sync with edited team ids or win counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffSeries {
    pub id: String,
    pub player_id: String,
    pub season_id: String,
    pub round_name: String,
    /// 0 marks a play-in pairing; elimination rounds count from 1.
    pub round_number: u32,
    pub team1: SeriesTeam,
    pub team2: SeriesTeam,
}

// ---------------------------------------------------------------------------
// Winner resolution
// ---------------------------------------------------------------------------

/// Winner and completion state of a series, derived from live win counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesWinner {
    pub winner_id: Option<String>,
    pub winner_name: Option<String>,
    pub is_complete: bool,
}

/// Resolve the series winner from the two win counts.
///
/// A team with a non-empty id wins, and the series completes, the instant its
/// win count reaches [`SERIES_WIN_TARGET`]. Re-evaluated on every read so an
/// edit that drops a count back below the target also revokes the winner.
pub fn resolve_series_winner(
    team1: &SeriesTeam,
    team1_wins: u32,
    team2: &SeriesTeam,
    team2_wins: u32,
) -> SeriesWinner {
    if team1_wins >= SERIES_WIN_TARGET && !team1.id.is_empty() {
        return SeriesWinner {
            winner_id: Some(team1.id.clone()),
            winner_name: Some(team1.name.clone()),
            is_complete: true,
        };
    }
    if team2_wins >= SERIES_WIN_TARGET && !team2.id.is_empty() {
        return SeriesWinner {
            winner_id: Some(team2.id.clone()),
            winner_name: Some(team2.name.clone()),
            is_complete: true,
        };
    }
    SeriesWinner::default()
}

impl PlayoffSeries {
    /// Convenience wrapper over [`resolve_series_winner`] for a stored series.
    pub fn winner(&self) -> SeriesWinner {
        resolve_series_winner(&self.team1, self.team1.wins, &self.team2, self.team2.wins)
    }

    /// Conference of the series: first team that resolves wins.
    pub fn conference(&self) -> Option<Conference> {
        resolve_conference(&self.team1.id).or_else(|| resolve_conference(&self.team2.id))
    }
}

// ---------------------------------------------------------------------------
// Identifier generation
// ---------------------------------------------------------------------------

/// Abbreviate a round name for use in series identifiers.
///
/// Known round names get their conventional short form; anything else falls
/// back to the uppercased initials of its words.
pub fn round_abbreviation(round_name: &str) -> String {
    match round_name.trim().to_lowercase().as_str() {
        "first round" | "round 1" => "R1".to_string(),
        "conference semifinals" | "semifinals" => "CSF".to_string(),
        "conference finals" => "CF".to_string(),
        "finals" | "nba finals" => "F".to_string(),
        "play-in" | "play in" | "play-in tournament" => "PI".to_string(),
        _ => round_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect::<String>()
            .to_uppercase(),
    }
}

/// Generate a stable, human-decodable identifier for a new series.
///
/// Shape: `{playerNumber}-{seasonYearsShortened}-{roundAbbrev}[-{confLetter}]`,
/// e.g. `23-24-25-CF-E`. The conference letter is omitted for the Finals
/// (which has none). When identifiers for the same player and season already
/// start with the base, a numeric suffix one past the match count keeps the
/// new id unique, deterministically by creation order.
pub fn generate_series_id(
    season_id: &str,
    round_name: &str,
    team1_id: &str,
    team2_id: &str,
    player_id: &str,
    player_number: u32,
    existing: &[PlayoffSeries],
) -> String {
    let round_abbrev = round_abbreviation(round_name);
    let is_finals = round_abbrev == "F";
    let mut base = format!(
        "{}-{}-{}",
        player_number,
        shorten_season(season_id),
        round_abbrev
    );
    let conference = resolve_conference(team1_id).or_else(|| resolve_conference(team2_id));
    if !is_finals {
        if let Some(conf) = conference {
            base.push('-');
            base.push(conf.letter());
        }
    }

    let matches = existing
        .iter()
        .filter(|s| {
            s.player_id == player_id && s.season_id == season_id && s.id.starts_with(&base)
        })
        .count();
    if matches == 0 {
        base
    } else {
        format!("{}-{}", base, matches + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, name: &str, wins: u32) -> SeriesTeam {
        SeriesTeam {
            id: id.into(),
            name: name.into(),
            seed: None,
            wins,
        }
    }

    fn series(id: &str, season: &str, round: &str, t1: &str, t2: &str) -> PlayoffSeries {
        PlayoffSeries {
            id: id.into(),
            player_id: "p1".into(),
            season_id: season.into(),
            round_name: round.into(),
            round_number: 1,
            team1: team(t1, t1, 0),
            team2: team(t2, t2, 0),
        }
    }

    #[test]
    fn no_winner_below_four_wins() {
        let result = resolve_series_winner(&team("BOS", "Celtics", 3), 3, &team("MIA", "Heat", 3), 3);
        assert_eq!(result.winner_id, None);
        assert!(!result.is_complete);
    }

    #[test]
    fn four_wins_completes_the_series() {
        let result = resolve_series_winner(&team("BOS", "Celtics", 4), 4, &team("MIA", "Heat", 2), 2);
        assert_eq!(result.winner_id.as_deref(), Some("BOS"));
        assert_eq!(result.winner_name.as_deref(), Some("Celtics"));
        assert!(result.is_complete);
    }

    // 4-2 series, then the four is edited back down to 3.
    #[test]
    fn editing_wins_below_target_revokes_winner() {
        let t1 = team("BOS", "Celtics", 0);
        let t2 = team("MIA", "Heat", 0);
        let complete = resolve_series_winner(&t1, 4, &t2, 2);
        assert!(complete.is_complete);
        let reopened = resolve_series_winner(&t1, 3, &t2, 2);
        assert_eq!(reopened.winner_id, None);
        assert!(!reopened.is_complete);
    }

    #[test]
    fn empty_team_id_cannot_win() {
        let result = resolve_series_winner(&team("", "TBD", 4), 4, &team("MIA", "Heat", 1), 1);
        assert_eq!(result.winner_id, None);
        assert!(!result.is_complete);
    }

    #[test]
    fn round_abbreviations() {
        assert_eq!(round_abbreviation("First Round"), "R1");
        assert_eq!(round_abbreviation("Conference Semifinals"), "CSF");
        assert_eq!(round_abbreviation("conference finals"), "CF");
        assert_eq!(round_abbreviation("Finals"), "F");
        assert_eq!(round_abbreviation("Play-In"), "PI");
        assert_eq!(round_abbreviation("Western Showcase"), "WS");
    }

    #[test]
    fn series_id_includes_conference_letter() {
        let id = generate_series_id("2024-2025", "Conference Finals", "BOS", "MIA", "p1", 23, &[]);
        assert_eq!(id, "23-24-25-CF-E");
    }

    #[test]
    fn finals_id_omits_conference_letter() {
        let id = generate_series_id("2024-2025", "Finals", "BOS", "DEN", "p1", 23, &[]);
        assert_eq!(id, "23-24-25-F");
    }

    // Identical pairing in the same round gets a -2 suffix.
    #[test]
    fn duplicate_series_get_numeric_suffix() {
        let first = generate_series_id("2024-2025", "First Round", "BOS", "MIA", "p1", 23, &[]);
        assert_eq!(first, "23-24-25-R1-E");
        let existing = vec![series(&first, "2024-2025", "First Round", "BOS", "MIA")];
        let second =
            generate_series_id("2024-2025", "First Round", "BOS", "MIA", "p1", 23, &existing);
        assert_eq!(second, "23-24-25-R1-E-2");
    }

    #[test]
    fn suffix_counts_only_same_player_and_season() {
        let mut other_season = series("23-23-24-R1-E", "2023-2024", "First Round", "BOS", "MIA");
        other_season.id = "23-24-25-R1-E".into(); // same id text, different season
        let id = generate_series_id(
            "2024-2025",
            "First Round",
            "BOS",
            "MIA",
            "p1",
            23,
            &[other_season],
        );
        assert_eq!(id, "23-24-25-R1-E");
    }

    #[test]
    fn unresolvable_conference_omits_letter() {
        let id = generate_series_id("2024-2025", "First Round", "XXX", "YYY", "p1", 23, &[]);
        assert_eq!(id, "23-24-25-R1");
    }

    #[test]
    fn stored_series_winner_and_conference_are_derived() {
        let mut s = series("id", "2024-2025", "First Round", "BOS", "MIA");
        s.team1.wins = 4;
        assert!(s.winner().is_complete);
        assert_eq!(s.conference(), Some(Conference::East));
    }
}
