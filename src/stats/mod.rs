// Stat aggregation engine: per-game records, derived stats, season and
// career rollups.

pub mod career;
pub mod derived;
pub mod game;
pub mod season;

pub use career::{compute_career_totals, CareerTotals};
pub use derived::{is_double_double, is_triple_double, shooting_pct, ShootingPercentages};
pub use game::{validate_box_score, BoxScore, GameStatRecord, StatError, StatKey, StatLine};
pub use season::{compute_season_totals, SeasonTotals};
