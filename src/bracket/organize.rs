// Bracket organization: flat series records into a conference/round tree.

use crate::bracket::conference::{Conference, UnknownConferencePolicy};
use crate::bracket::series::{PlayoffSeries, SeriesWinner};
use crate::league::TeamRecord;
use crate::stats::game::GameStatRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum BracketError {
    #[error("series {series_id}: conference unresolvable from teams {team1} / {team2}")]
    UnresolvedConference {
        series_id: String,
        team1: String,
        team2: String,
    },
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Tunable behavior for bracket organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketOptions {
    /// Round name identifying the Finals (compared case-insensitively).
    pub finals_round_name: String,
    /// Whether games lacking a series reference may attach to a series by
    /// matching team names. Legacy records predate series references, so this
    /// stays on by default; turn it off once old rows are migrated.
    pub name_fallback: bool,
    pub unknown_conference: UnknownConferencePolicy,
}

impl Default for BracketOptions {
    fn default() -> Self {
        BracketOptions {
            finals_round_name: "Finals".to_string(),
            name_fallback: true,
            unknown_conference: UnknownConferencePolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output tree
// ---------------------------------------------------------------------------

/// Display label for one side of an organized series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLabel {
    pub name: String,
    pub abbreviation: String,
}

/// A series enriched for rendering: resolved labels, conference, live winner,
/// and the player's own games in the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizedSeries {
    pub series: PlayoffSeries,
    pub team1_label: TeamLabel,
    pub team2_label: TeamLabel,
    pub conference: Option<Conference>,
    pub winner: SeriesWinner,
    pub games: Vec<GameStatRecord>,
}

/// The conference/round/play-in/finals grouping produced by
/// [`organize_bracket`]. Every input series lands in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketTree {
    pub finals: Vec<OrganizedSeries>,
    pub east: BTreeMap<u32, Vec<OrganizedSeries>>,
    pub west: BTreeMap<u32, Vec<OrganizedSeries>>,
    pub east_play_in: Vec<OrganizedSeries>,
    pub west_play_in: Vec<OrganizedSeries>,
    /// Series whose conference could not be resolved, under the `unknown`
    /// policy. Empty under the other policies.
    pub unknown: Vec<OrganizedSeries>,
}

impl BracketTree {
    /// Total number of series across all buckets.
    pub fn len(&self) -> usize {
        self.finals.len()
            + self.east.values().map(Vec::len).sum::<usize>()
            + self.west.values().map(Vec::len).sum::<usize>()
            + self.east_play_in.len()
            + self.west_play_in.len()
            + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

fn is_play_in(series: &PlayoffSeries) -> bool {
    if series.round_number == 0 {
        return true;
    }
    let name = series.round_name.to_lowercase();
    name.contains("play-in") || name.contains("play in") || name.contains("playin")
}

fn team_label(team_id: &str, fallback_name: &str, teams: &[TeamRecord]) -> TeamLabel {
    match teams.iter().find(|t| t.id == team_id) {
        Some(team) => TeamLabel {
            name: team.name.clone(),
            abbreviation: team.abbreviation.clone(),
        },
        None => TeamLabel {
            name: fallback_name.to_string(),
            abbreviation: team_id.to_string(),
        },
    }
}

fn names_match(a: &str, b: &str) -> bool {
    !a.trim().is_empty() && a.trim().eq_ignore_ascii_case(b.trim())
}

/// Collect the player's games belonging to a series: playoff-flagged games
/// linked by series id, or (when the game carries no series reference and the
/// fallback is enabled) matched by opposing team names.
fn attach_games(
    series: &PlayoffSeries,
    label1: &TeamLabel,
    label2: &TeamLabel,
    player_games: &[GameStatRecord],
    player_team_name: &str,
    name_fallback: bool,
) -> Vec<GameStatRecord> {
    player_games
        .iter()
        .filter(|game| {
            if !game.playoff {
                return false;
            }
            match &game.series_id {
                Some(id) => id == &series.id,
                None => {
                    name_fallback
                        && ((names_match(&game.opponent_name, &label1.name)
                            && names_match(player_team_name, &label2.name))
                            || (names_match(&game.opponent_name, &label2.name)
                                && names_match(player_team_name, &label1.name)))
                }
            }
        })
        .cloned()
        .collect()
}

/// Organize a season's playoff series into the bracket tree.
///
/// Inputs are not mutated; the tree is a fresh value on every call.
pub fn organize_bracket(
    series_list: &[PlayoffSeries],
    teams: &[TeamRecord],
    player_games: &[GameStatRecord],
    player_team_name: &str,
    options: &BracketOptions,
) -> Result<BracketTree, BracketError> {
    let mut tree = BracketTree::default();

    for series in series_list {
        let team1_label = team_label(&series.team1.id, &series.team1.name, teams);
        let team2_label = team_label(&series.team2.id, &series.team2.name, teams);
        let games = attach_games(
            series,
            &team1_label,
            &team2_label,
            player_games,
            player_team_name,
            options.name_fallback,
        );
        let conference = series.conference();
        let organized = OrganizedSeries {
            series: series.clone(),
            team1_label,
            team2_label,
            conference,
            winner: series.winner(),
            games,
        };

        // Finals carries no conference; everything else needs one resolved
        // or assigned by policy.
        if series
            .round_name
            .eq_ignore_ascii_case(&options.finals_round_name)
        {
            tree.finals.push(OrganizedSeries {
                conference: None,
                ..organized
            });
            continue;
        }

        let conference = match conference {
            Some(conf) => conf,
            None => match options.unknown_conference {
                UnknownConferencePolicy::Unknown => {
                    warn!(
                        series = %series.id,
                        "conference unresolvable, placing series in unknown bucket"
                    );
                    tree.unknown.push(organized);
                    continue;
                }
                UnknownConferencePolicy::East => {
                    warn!(
                        series = %series.id,
                        "conference unresolvable, defaulting to East per policy"
                    );
                    Conference::East
                }
                UnknownConferencePolicy::Error => {
                    return Err(BracketError::UnresolvedConference {
                        series_id: series.id.clone(),
                        team1: series.team1.id.clone(),
                        team2: series.team2.id.clone(),
                    });
                }
            },
        };

        let organized = OrganizedSeries {
            conference: Some(conference),
            ..organized
        };
        match (conference, is_play_in(series)) {
            (Conference::East, true) => tree.east_play_in.push(organized),
            (Conference::West, true) => tree.west_play_in.push(organized),
            (Conference::East, false) => tree
                .east
                .entry(series.round_number)
                .or_default()
                .push(organized),
            (Conference::West, false) => tree
                .west
                .entry(series.round_number)
                .or_default()
                .push(organized),
        }
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bracket::series::SeriesTeam;
    use crate::stats::game::BoxScore;
    use chrono::NaiveDate;

    fn team_record(id: &str, name: &str) -> TeamRecord {
        TeamRecord {
            id: id.into(),
            name: name.into(),
            abbreviation: id.into(),
            primary_color: None,
            secondary_color: None,
        }
    }

    fn teams() -> Vec<TeamRecord> {
        vec![
            team_record("BOS", "Boston Celtics"),
            team_record("MIA", "Miami Heat"),
            team_record("MIL", "Milwaukee Bucks"),
            team_record("DEN", "Denver Nuggets"),
            team_record("LAL", "Los Angeles Lakers"),
        ]
    }

    fn series(
        id: &str,
        round_name: &str,
        round_number: u32,
        t1: (&str, &str),
        t2: (&str, &str),
    ) -> PlayoffSeries {
        PlayoffSeries {
            id: id.into(),
            player_id: "p1".into(),
            season_id: "2024-2025".into(),
            round_name: round_name.into(),
            round_number,
            team1: SeriesTeam {
                id: t1.0.into(),
                name: t1.1.into(),
                seed: None,
                wins: 0,
            },
            team2: SeriesTeam {
                id: t2.0.into(),
                name: t2.1.into(),
                seed: None,
                wins: 0,
            },
        }
    }

    fn playoff_game(series_id: Option<&str>, opponent: &str) -> GameStatRecord {
        GameStatRecord {
            id: 0,
            player_id: "p1".into(),
            season_id: "2024-2025".into(),
            date: NaiveDate::from_ymd_opt(2025, 4, 20).unwrap(),
            opponent_team_id: String::new(),
            opponent_name: opponent.into(),
            home: true,
            player_score: 101,
            opponent_score: 95,
            playoff: true,
            series_id: series_id.map(String::from),
            key_game: false,
            cup_game: false,
            overtime: false,
            simulated: false,
            box_score: BoxScore::default(),
        }
    }

    #[test]
    fn series_group_by_conference_and_round() {
        let list = vec![
            series("e1", "First Round", 1, ("BOS", ""), ("MIA", "")),
            series("e2", "Conference Semifinals", 2, ("MIL", ""), ("BOS", "")),
            series("w1", "First Round", 1, ("DEN", ""), ("LAL", "")),
            series("f", "Finals", 4, ("BOS", ""), ("DEN", "")),
        ];
        let tree =
            organize_bracket(&list, &teams(), &[], "Boston Celtics", &BracketOptions::default())
                .unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.east[&1].len(), 1);
        assert_eq!(tree.east[&2].len(), 1);
        assert_eq!(tree.west[&1].len(), 1);
        assert_eq!(tree.finals.len(), 1);
        assert_eq!(tree.finals[0].conference, None);
    }

    #[test]
    fn finals_carries_no_conference_even_when_teams_resolve() {
        let list = vec![series("f", "Finals", 4, ("BOS", ""), ("DEN", ""))];
        let tree =
            organize_bracket(&list, &teams(), &[], "Boston Celtics", &BracketOptions::default())
                .unwrap();
        assert_eq!(tree.finals.len(), 1);
        assert_eq!(tree.finals[0].conference, None);
    }

    #[test]
    fn play_in_detected_by_round_number_or_name() {
        let list = vec![
            series("pi-e", "Play-In", 0, ("MIA", ""), ("CHI", "Chicago Bulls")),
            series("pi-w", "Western Play-In Game", 3, ("LAL", ""), ("GSW", "")),
        ];
        let tree =
            organize_bracket(&list, &teams(), &[], "Boston Celtics", &BracketOptions::default())
                .unwrap();
        assert_eq!(tree.east_play_in.len(), 1);
        assert_eq!(tree.west_play_in.len(), 1);
    }

    #[test]
    fn games_attach_by_series_id() {
        let list = vec![series("e1", "First Round", 1, ("BOS", ""), ("MIA", ""))];
        let games = vec![
            playoff_game(Some("e1"), "Miami Heat"),
            playoff_game(Some("other"), "Miami Heat"),
        ];
        let tree =
            organize_bracket(&list, &teams(), &games, "Boston Celtics", &BracketOptions::default())
                .unwrap();
        assert_eq!(tree.east[&1][0].games.len(), 1);
    }

    #[test]
    fn games_without_series_ref_attach_by_team_names() {
        let list = vec![series("e1", "First Round", 1, ("BOS", ""), ("MIA", ""))];
        let games = vec![playoff_game(None, "Miami Heat")];
        let tree =
            organize_bracket(&list, &teams(), &games, "Boston Celtics", &BracketOptions::default())
                .unwrap();
        assert_eq!(tree.east[&1][0].games.len(), 1);
    }

    #[test]
    fn name_fallback_can_be_disabled() {
        let list = vec![series("e1", "First Round", 1, ("BOS", ""), ("MIA", ""))];
        let games = vec![playoff_game(None, "Miami Heat")];
        let options = BracketOptions {
            name_fallback: false,
            ..BracketOptions::default()
        };
        let tree = organize_bracket(&list, &teams(), &games, "Boston Celtics", &options).unwrap();
        assert!(tree.east[&1][0].games.is_empty());
    }

    #[test]
    fn non_playoff_games_never_attach() {
        let list = vec![series("e1", "First Round", 1, ("BOS", ""), ("MIA", ""))];
        let mut game = playoff_game(Some("e1"), "Miami Heat");
        game.playoff = false;
        let tree = organize_bracket(
            &list,
            &teams(),
            &[game],
            "Boston Celtics",
            &BracketOptions::default(),
        )
        .unwrap();
        assert!(tree.east[&1][0].games.is_empty());
    }

    #[test]
    fn missing_team_reference_falls_back_to_denormalized_name() {
        let list = vec![series(
            "e1",
            "First Round",
            1,
            ("BOS", ""),
            ("SEA", "Seattle SuperSonics"),
        )];
        let options = BracketOptions {
            unknown_conference: UnknownConferencePolicy::East,
            ..BracketOptions::default()
        };
        let tree = organize_bracket(&list, &teams(), &[], "Boston Celtics", &options).unwrap();
        // Conference resolves East from BOS; label falls back for SEA.
        let organized = &tree.east[&1][0];
        assert_eq!(organized.team2_label.name, "Seattle SuperSonics");
        assert_eq!(organized.team2_label.abbreviation, "SEA");
    }

    #[test]
    fn unresolvable_conference_goes_to_unknown_bucket_by_default() {
        let list = vec![series("x", "First Round", 1, ("AAA", "A"), ("BBB", "B"))];
        let tree =
            organize_bracket(&list, &teams(), &[], "Boston Celtics", &BracketOptions::default())
                .unwrap();
        assert_eq!(tree.unknown.len(), 1);
        assert!(tree.east.is_empty() && tree.west.is_empty());
    }

    #[test]
    fn unresolvable_conference_east_policy_matches_legacy() {
        let list = vec![series("x", "First Round", 1, ("AAA", "A"), ("BBB", "B"))];
        let options = BracketOptions {
            unknown_conference: UnknownConferencePolicy::East,
            ..BracketOptions::default()
        };
        let tree = organize_bracket(&list, &teams(), &[], "Boston Celtics", &options).unwrap();
        assert_eq!(tree.east[&1].len(), 1);
        assert_eq!(tree.east[&1][0].conference, Some(Conference::East));
        assert!(tree.unknown.is_empty());
    }

    #[test]
    fn unresolvable_conference_error_policy_fails() {
        let list = vec![series("x", "First Round", 1, ("AAA", "A"), ("BBB", "B"))];
        let options = BracketOptions {
            unknown_conference: UnknownConferencePolicy::Error,
            ..BracketOptions::default()
        };
        let err =
            organize_bracket(&list, &teams(), &[], "Boston Celtics", &options).unwrap_err();
        assert!(matches!(err, BracketError::UnresolvedConference { .. }));
    }

    #[test]
    fn every_series_lands_in_exactly_one_bucket() {
        let list = vec![
            series("e1", "First Round", 1, ("BOS", ""), ("MIA", "")),
            series("pi", "Play-In", 0, ("MIL", ""), ("MIA", "")),
            series("w1", "First Round", 1, ("DEN", ""), ("LAL", "")),
            series("f", "Finals", 4, ("BOS", ""), ("DEN", "")),
            series("u", "First Round", 1, ("AAA", "A"), ("BBB", "B")),
        ];
        let tree =
            organize_bracket(&list, &teams(), &[], "Boston Celtics", &BracketOptions::default())
                .unwrap();
        assert_eq!(tree.len(), list.len());
    }
}
