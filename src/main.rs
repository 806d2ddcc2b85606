// Statbook entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the store
// 4. Optionally import the configured game-log CSV (`statbook import`)
// 5. Aggregate seasons and career, organize the current season's bracket
// 6. Print the report

use statbook::bracket::organize_bracket;
use statbook::config;
use statbook::import;
use statbook::report;
use statbook::stats::{compute_career_totals, compute_season_totals, SeasonTotals};
use statbook::store::Store;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("statbook starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: player={} #{} ({})",
        config.player.id, config.player.number, config.player.team_name
    );

    // 3. Open the store
    let store = Store::open(&config.db_path).context("failed to open store")?;
    info!("Store opened at {}", config.db_path);

    // 4. Optional import subcommand
    if std::env::args().nth(1).as_deref() == Some("import") {
        let games = import::load_games(&config).context("failed to load game-log CSV")?;
        info!("Parsed {} games from {}", games.len(), config.data_paths.games_csv);
        let mut inserted = 0usize;
        for game in &games {
            store
                .insert_game(game)
                .with_context(|| format!("failed to insert game on {}", game.date))?;
            inserted += 1;
        }
        println!("Imported {inserted} games.");
    }

    // 5. Aggregate: one pass over the full record set per season, then career.
    let player_id = &config.player.id;
    let games = store.fetch_games(player_id, None).context("failed to fetch games")?;
    let seasons = store.list_seasons(player_id).context("failed to list seasons")?;
    let mut season_totals: Vec<SeasonTotals> = Vec::new();
    for season_id in &seasons {
        let manual = store
            .fetch_manual_season_totals(player_id, season_id)
            .context("failed to fetch manual season totals")?;
        if let Some(totals) = compute_season_totals(player_id, season_id, &games, manual.as_ref()) {
            season_totals.push(totals);
        }
    }
    let career = compute_career_totals(&season_totals);
    info!(
        "Aggregated {} seasons, {} career games",
        season_totals.len(),
        career.games_played
    );

    // 6. Print the report
    println!("Season by season:");
    println!("{}", report::render_season_table(&season_totals));
    println!("Career:");
    println!("{}", report::render_career(&career));

    if let Some(current_season) = seasons.last() {
        let series = store
            .fetch_playoff_series(player_id, current_season)
            .context("failed to fetch playoff series")?;
        let teams = store.fetch_teams().context("failed to fetch teams")?;
        let season_games = store
            .fetch_games(player_id, Some(current_season))
            .context("failed to fetch season games")?;
        let tree = organize_bracket(
            &series,
            &teams,
            &season_games,
            &config.player.team_name,
            &config.bracket,
        )
        .context("failed to organize bracket")?;
        println!("Playoff bracket ({current_season}):");
        println!("{}", report::render_bracket(&tree));
    }

    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which carries the
/// report itself).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("statbook.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("statbook=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
