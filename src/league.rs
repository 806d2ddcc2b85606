// League reference data: teams, awards, roster snapshots, season labels.

use crate::bracket::conference::{resolve_conference, Conference};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// A team from the reference table. Colors are presentation-only and carried
/// untouched through the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

// ---------------------------------------------------------------------------
// Awards
// ---------------------------------------------------------------------------

/// League honors. The team-based kinds derive a conference from the winner's
/// team; individual kinds have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwardKind {
    Mvp,
    FinalsMvp,
    DefensivePlayerOfTheYear,
    RookieOfTheYear,
    SixthMan,
    MostImproved,
    Champion,
    AllConference,
    AllDefense,
    AllRookie,
    AllStar,
}

impl AwardKind {
    /// Team-based awards (All-Conference, All-Defense, All-Rookie, All-Star)
    /// are tied to a conference; individual awards are league-wide.
    pub fn is_team_based(&self) -> bool {
        matches!(
            self,
            AwardKind::AllConference | AwardKind::AllDefense | AwardKind::AllRookie | AwardKind::AllStar
        )
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mvp" => Some(AwardKind::Mvp),
            "finals_mvp" => Some(AwardKind::FinalsMvp),
            "dpoy" => Some(AwardKind::DefensivePlayerOfTheYear),
            "roty" => Some(AwardKind::RookieOfTheYear),
            "sixth_man" => Some(AwardKind::SixthMan),
            "most_improved" => Some(AwardKind::MostImproved),
            "champion" => Some(AwardKind::Champion),
            "all_conference" => Some(AwardKind::AllConference),
            "all_defense" => Some(AwardKind::AllDefense),
            "all_rookie" => Some(AwardKind::AllRookie),
            "all_star" => Some(AwardKind::AllStar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AwardKind::Mvp => "mvp",
            AwardKind::FinalsMvp => "finals_mvp",
            AwardKind::DefensivePlayerOfTheYear => "dpoy",
            AwardKind::RookieOfTheYear => "roty",
            AwardKind::SixthMan => "sixth_man",
            AwardKind::MostImproved => "most_improved",
            AwardKind::Champion => "champion",
            AwardKind::AllConference => "all_conference",
            AwardKind::AllDefense => "all_defense",
            AwardKind::AllRookie => "all_rookie",
            AwardKind::AllStar => "all_star",
        }
    }
}

impl fmt::Display for AwardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named honor tied to a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub player_id: String,
    pub season_id: String,
    pub kind: AwardKind,
    /// Display label, e.g. "All-NBA First Team".
    pub name: String,
    /// Winner's team at the time of the award; drives the conference for
    /// team-based kinds.
    pub team_id: String,
}

impl Award {
    /// Conference the award belongs to. `None` for individual awards and for
    /// team-based awards whose team cannot be resolved.
    pub fn conference(&self) -> Option<Conference> {
        if !self.kind.is_team_based() {
            return None;
        }
        resolve_conference(&self.team_id)
    }
}

// ---------------------------------------------------------------------------
// Roster entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterSnapshot {
    StartOfSeason,
    EndOfSeason,
}

impl RosterSnapshot {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start" => Some(RosterSnapshot::StartOfSeason),
            "end" => Some(RosterSnapshot::EndOfSeason),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RosterSnapshot::StartOfSeason => "start",
            RosterSnapshot::EndOfSeason => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterSlot {
    Starter,
    Bench,
}

impl RosterSlot {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "starter" => Some(RosterSlot::Starter),
            "bench" => Some(RosterSlot::Bench),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RosterSlot::Starter => "starter",
            RosterSlot::Bench => "bench",
        }
    }
}

/// One roster slot in a season snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub season_id: String,
    pub snapshot: RosterSnapshot,
    pub slot: RosterSlot,
    pub position: String,
    pub player_name: String,
    pub overall_rating: u8,
}

// ---------------------------------------------------------------------------
// Season labels
// ---------------------------------------------------------------------------

/// Parse a season id of the form `"2024-2025"` into its year pair.
pub fn parse_season_years(season_id: &str) -> Option<(u32, u32)> {
    let (start, end) = season_id.split_once('-')?;
    let start: u32 = start.trim().parse().ok()?;
    let end: u32 = end.trim().parse().ok()?;
    Some((start, end))
}

/// Shorten `"2024-2025"` to `"24-25"` for series identifiers. Ids that do not
/// parse as a year pair pass through unchanged so the identifier stays
/// decodable instead of failing.
pub fn shorten_season(season_id: &str) -> String {
    match parse_season_years(season_id) {
        Some((start, end)) => format!("{:02}-{:02}", start % 100, end % 100),
        None => season_id.to_string(),
    }
}
