// Conference resolution from team identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Eastern conference team identifiers (standard abbreviations).
const EASTERN_TEAMS: [&str; 15] = [
    "ATL", "BOS", "BKN", "CHA", "CHI", "CLE", "DET", "IND", "MIA", "MIL", "NYK", "ORL", "PHI",
    "TOR", "WAS",
];

/// Western conference team identifiers.
const WESTERN_TEAMS: [&str; 15] = [
    "DAL", "DEN", "GSW", "HOU", "LAC", "LAL", "MEM", "MIN", "NOP", "OKC", "PHX", "POR", "SAC",
    "SAS", "UTA",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    /// Single-letter tag used in series identifiers.
    pub fn letter(&self) -> char {
        match self {
            Conference::East => 'E',
            Conference::West => 'W',
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::East => f.write_str("East"),
            Conference::West => f.write_str("West"),
        }
    }
}

/// Resolve a team identifier to its conference.
///
/// Total over the known team universe; identifiers outside it (including the
/// empty string) resolve to `None` rather than being silently assigned — what
/// happens to a fully unresolvable series is the caller's policy, see
/// [`UnknownConferencePolicy`].
pub fn resolve_conference(team_id: &str) -> Option<Conference> {
    let id = team_id.trim().to_uppercase();
    if id.is_empty() {
        return None;
    }
    if EASTERN_TEAMS.contains(&id.as_str()) {
        Some(Conference::East)
    } else if WESTERN_TEAMS.contains(&id.as_str()) {
        Some(Conference::West)
    } else {
        None
    }
}

/// What to do with a series whose conference cannot be resolved from either
/// team.
///
/// The data this tool descends from defaulted such series to East, which
/// mislabels typoed or relocated team ids. That behavior is kept available
/// for parity but is no longer the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownConferencePolicy {
    /// Place the series in a dedicated `unknown` bucket.
    #[default]
    Unknown,
    /// Treat the series as Eastern (legacy parity).
    East,
    /// Fail bracket organization outright.
    Error,
}

impl UnknownConferencePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unknown" => Some(UnknownConferencePolicy::Unknown),
            "east" => Some(UnknownConferencePolicy::East),
            "error" => Some(UnknownConferencePolicy::Error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eastern_teams_resolve_east() {
        assert_eq!(resolve_conference("BOS"), Some(Conference::East));
        assert_eq!(resolve_conference("MIA"), Some(Conference::East));
    }

    #[test]
    fn western_teams_resolve_west() {
        assert_eq!(resolve_conference("LAL"), Some(Conference::West));
        assert_eq!(resolve_conference("OKC"), Some(Conference::West));
    }

    #[test]
    fn resolution_is_case_and_whitespace_insensitive() {
        assert_eq!(resolve_conference("bos"), Some(Conference::East));
        assert_eq!(resolve_conference(" den "), Some(Conference::West));
    }

    #[test]
    fn unknown_and_empty_ids_resolve_none() {
        assert_eq!(resolve_conference(""), None);
        assert_eq!(resolve_conference("SEA"), None);
        assert_eq!(resolve_conference("not-a-team"), None);
    }

    #[test]
    fn every_known_team_resolves() {
        for id in EASTERN_TEAMS.iter().chain(WESTERN_TEAMS.iter()) {
            assert!(resolve_conference(id).is_some(), "unresolved: {id}");
        }
    }

    #[test]
    fn policy_parses_config_strings() {
        assert_eq!(
            UnknownConferencePolicy::parse("unknown"),
            Some(UnknownConferencePolicy::Unknown)
        );
        assert_eq!(
            UnknownConferencePolicy::parse("EAST"),
            Some(UnknownConferencePolicy::East)
        );
        assert_eq!(UnknownConferencePolicy::parse("west"), None);
    }
}
