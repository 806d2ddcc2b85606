// Playoff bracket engine: conference resolution, series records, and the
// organized bracket tree.

pub mod conference;
pub mod organize;
pub mod series;

pub use conference::{resolve_conference, Conference, UnknownConferencePolicy};
pub use organize::{organize_bracket, BracketError, BracketOptions, BracketTree, OrganizedSeries};
pub use series::{
    generate_series_id, resolve_series_winner, PlayoffSeries, SeriesTeam, SeriesWinner,
};
