// Plain-text rendering of season, career, and bracket summaries.
//
// The core resolves every uncomputable value to an absent sentinel; this is
// where those sentinels become "–" placeholders.

use crate::bracket::organize::{BracketTree, OrganizedSeries};
use crate::stats::career::CareerTotals;
use crate::stats::game::StatKey;
use crate::stats::season::SeasonTotals;

/// Placeholder for values that could not be computed.
const ABSENT: &str = "–";

/// Columns shown in the season-by-season and career tables.
const REPORT_KEYS: [StatKey; 9] = [
    StatKey::Minutes,
    StatKey::Points,
    StatKey::Rebounds,
    StatKey::Assists,
    StatKey::Steals,
    StatKey::Blocks,
    StatKey::Turnovers,
    StatKey::FgMade,
    StatKey::FgAttempted,
];

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => ABSENT.to_string(),
    }
}

fn fmt_pct(value: Option<f64>) -> String {
    fmt_opt(value, 3)
}

// ---------------------------------------------------------------------------
// Season / career tables
// ---------------------------------------------------------------------------

fn header_row() -> String {
    let mut row = format!("{:<10} {:>3} ", "SEASON", "GP");
    for key in REPORT_KEYS {
        row.push_str(&format!("{:>7} ", key.label()));
    }
    row.push_str(&format!("{:>6} {:>6} {:>6} {:>4} {:>4}", "FG%", "3P%", "FT%", "DD", "TD"));
    row
}

fn totals_row(label: &str, games_played: u32, season: &SeasonTotals, averages: bool) -> String {
    let line = if averages { &season.averages } else { &season.totals };
    let decimals = if averages { 1 } else { 0 };
    let mut row = format!("{label:<10} {games_played:>3} ");
    for key in REPORT_KEYS {
        row.push_str(&format!("{:>7} ", fmt_opt(line.get(key), decimals)));
    }
    row.push_str(&format!(
        "{:>6} {:>6} {:>6} {:>4} {:>4}",
        fmt_pct(season.percentages.fg),
        fmt_pct(season.percentages.three),
        fmt_pct(season.percentages.ft),
        season.double_doubles,
        season.triple_doubles,
    ));
    if season.is_manual_entry {
        row.push_str("  (manual)");
    }
    row
}

/// Render the season-by-season table (per-game averages), one row per season.
pub fn render_season_table(seasons: &[SeasonTotals]) -> String {
    let mut out = String::new();
    out.push_str(&header_row());
    out.push('\n');
    for season in seasons {
        out.push_str(&totals_row(
            &season.season_id,
            season.games_played,
            season,
            true,
        ));
        out.push('\n');
    }
    out
}

/// Render the career line: totals row plus averages row.
pub fn render_career(career: &CareerTotals) -> String {
    // Reuse the season row formatter through a shim with the career fields.
    let as_season = SeasonTotals {
        player_id: String::new(),
        season_id: String::new(),
        games_played: career.games_played,
        games_started: career.games_started,
        totals: career.totals,
        averages: career.averages,
        percentages: career.percentages,
        double_doubles: career.double_doubles,
        triple_doubles: career.triple_doubles,
        is_manual_entry: false,
    };
    let mut out = String::new();
    out.push_str(&header_row());
    out.push('\n');
    out.push_str(&totals_row("Totals", career.games_played, &as_season, false));
    out.push('\n');
    out.push_str(&totals_row("Per game", career.games_played, &as_season, true));
    out.push('\n');
    out
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

fn series_line(organized: &OrganizedSeries) -> String {
    let series = &organized.series;
    let winner = match &organized.winner.winner_name {
        Some(name) => format!("winner: {name}"),
        None => "in progress".to_string(),
    };
    format!(
        "  {} {} {}-{} {} [{}] ({} games tracked, {})",
        series.id,
        organized.team1_label.abbreviation,
        series.team1.wins,
        series.team2.wins,
        organized.team2_label.abbreviation,
        series.round_name,
        organized.games.len(),
        winner,
    )
}

fn push_section(out: &mut String, title: &str, series: &[OrganizedSeries]) {
    if series.is_empty() {
        return;
    }
    out.push_str(title);
    out.push('\n');
    for organized in series {
        out.push_str(&series_line(organized));
        out.push('\n');
    }
}

/// Render the organized bracket, conference by conference, round by round.
pub fn render_bracket(tree: &BracketTree) -> String {
    let mut out = String::new();
    if tree.is_empty() {
        out.push_str("No playoff series recorded.\n");
        return out;
    }
    push_section(&mut out, "East play-in:", &tree.east_play_in);
    for (round, series) in &tree.east {
        push_section(&mut out, &format!("East round {round}:"), series);
    }
    push_section(&mut out, "West play-in:", &tree.west_play_in);
    for (round, series) in &tree.west {
        push_section(&mut out, &format!("West round {round}:"), series);
    }
    push_section(&mut out, "Finals:", &tree.finals);
    push_section(&mut out, "Unresolved conference:", &tree.unknown);
    out
}
