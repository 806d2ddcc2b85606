// SQLite persistence for games, manual totals, series, teams, awards, and
// roster snapshots.

use std::sync::{Mutex, MutexGuard};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::bracket::series::{PlayoffSeries, SeriesTeam, SERIES_WIN_TARGET};
use crate::league::{Award, AwardKind, RosterEntry, RosterSlot, RosterSnapshot, TeamRecord};
use crate::stats::game::{validate_box_score, BoxScore, GameStatRecord};
use crate::stats::season::SeasonTotals;

/// SQLite-backed store. All aggregation is recomputed from fetched records
/// on every read; nothing derived is cached here, so callers only need to
/// refetch after a mutation to stay consistent.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the store at `path` and ensure all tables exist.
    /// Pass `":memory:"` for an ephemeral in-memory store (useful for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS games (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                player_id         TEXT NOT NULL,
                season_id         TEXT NOT NULL,
                date              TEXT NOT NULL,
                opponent_team_id  TEXT NOT NULL DEFAULT '',
                opponent_name     TEXT NOT NULL,
                home              INTEGER NOT NULL,
                player_score      INTEGER NOT NULL,
                opponent_score    INTEGER NOT NULL,
                playoff           INTEGER NOT NULL DEFAULT 0,
                series_id         TEXT,
                key_game          INTEGER NOT NULL DEFAULT 0,
                cup_game          INTEGER NOT NULL DEFAULT 0,
                overtime          INTEGER NOT NULL DEFAULT 0,
                simulated         INTEGER NOT NULL DEFAULT 0,
                minutes           REAL,
                points            INTEGER,
                rebounds          INTEGER,
                offensive_rebounds INTEGER,
                assists           INTEGER,
                steals            INTEGER,
                blocks            INTEGER,
                turnovers         INTEGER,
                fouls             INTEGER,
                plus_minus        INTEGER,
                fg_made           INTEGER,
                fg_attempted      INTEGER,
                three_made        INTEGER,
                three_attempted   INTEGER,
                ft_made           INTEGER,
                ft_attempted      INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_games_player_season
                ON games(player_id, season_id);

            CREATE TABLE IF NOT EXISTS manual_season_totals (
                player_id      TEXT NOT NULL,
                season_id      TEXT NOT NULL,
                games_played   INTEGER NOT NULL,
                games_started  INTEGER,
                totals         TEXT NOT NULL,
                averages       TEXT NOT NULL,
                fg_pct         REAL,
                three_pct      REAL,
                ft_pct         REAL,
                double_doubles INTEGER NOT NULL DEFAULT 0,
                triple_doubles INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (player_id, season_id)
            );

            CREATE TABLE IF NOT EXISTS playoff_series (
                id           TEXT PRIMARY KEY,
                player_id    TEXT NOT NULL,
                season_id    TEXT NOT NULL,
                round_name   TEXT NOT NULL,
                round_number INTEGER NOT NULL,
                team1_id     TEXT NOT NULL,
                team1_name   TEXT NOT NULL,
                team1_seed   INTEGER,
                team1_wins   INTEGER NOT NULL DEFAULT 0,
                team2_id     TEXT NOT NULL,
                team2_name   TEXT NOT NULL,
                team2_seed   INTEGER,
                team2_wins   INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS teams (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                abbreviation    TEXT NOT NULL,
                primary_color   TEXT,
                secondary_color TEXT
            );

            CREATE TABLE IF NOT EXISTS awards (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                player_id TEXT NOT NULL,
                season_id TEXT NOT NULL,
                kind      TEXT NOT NULL,
                name      TEXT NOT NULL,
                team_id   TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS roster_entries (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                season_id      TEXT NOT NULL,
                snapshot       TEXT NOT NULL,
                slot           TEXT NOT NULL,
                position       TEXT NOT NULL,
                player_name    TEXT NOT NULL,
                overall_rating INTEGER NOT NULL
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    // -----------------------------------------------------------------------
    // Games
    // -----------------------------------------------------------------------

    /// Insert a game record, returning its new row id. Boundary validation
    /// runs first: a box score violating the made/attempted rules never
    /// reaches the table.
    pub fn insert_game(&self, game: &GameStatRecord) -> Result<i64> {
        validate_box_score(&game.box_score).context("game record rejected")?;
        let conn = self.conn();
        conn.execute(
            "INSERT INTO games
                (player_id, season_id, date, opponent_team_id, opponent_name, home,
                 player_score, opponent_score, playoff, series_id,
                 key_game, cup_game, overtime, simulated,
                 minutes, points, rebounds, offensive_rebounds, assists, steals,
                 blocks, turnovers, fouls, plus_minus,
                 fg_made, fg_attempted, three_made, three_attempted, ft_made, ft_attempted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                     ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26,
                     ?27, ?28, ?29, ?30)",
            params![
                game.player_id,
                game.season_id,
                game.date.format("%Y-%m-%d").to_string(),
                game.opponent_team_id,
                game.opponent_name,
                game.home,
                game.player_score,
                game.opponent_score,
                game.playoff,
                game.series_id,
                game.key_game,
                game.cup_game,
                game.overtime,
                game.simulated,
                game.box_score.minutes,
                game.box_score.points,
                game.box_score.rebounds,
                game.box_score.offensive_rebounds,
                game.box_score.assists,
                game.box_score.steals,
                game.box_score.blocks,
                game.box_score.turnovers,
                game.box_score.fouls,
                game.box_score.plus_minus,
                game.box_score.fg_made,
                game.box_score.fg_attempted,
                game.box_score.three_made,
                game.box_score.three_attempted,
                game.box_score.ft_made,
                game.box_score.ft_attempted,
            ],
        )
        .context("failed to insert game")?;
        Ok(conn.last_insert_rowid())
    }

    /// Replace an existing game record. Validates like [`Store::insert_game`].
    pub fn update_game(&self, game: &GameStatRecord) -> Result<()> {
        validate_box_score(&game.box_score).context("game record rejected")?;
        let changed = self.conn().execute(
            "UPDATE games SET
                player_id = ?2, season_id = ?3, date = ?4, opponent_team_id = ?5,
                opponent_name = ?6, home = ?7, player_score = ?8, opponent_score = ?9,
                playoff = ?10, series_id = ?11, key_game = ?12, cup_game = ?13,
                overtime = ?14, simulated = ?15,
                minutes = ?16, points = ?17, rebounds = ?18, offensive_rebounds = ?19,
                assists = ?20, steals = ?21, blocks = ?22, turnovers = ?23,
                fouls = ?24, plus_minus = ?25, fg_made = ?26, fg_attempted = ?27,
                three_made = ?28, three_attempted = ?29, ft_made = ?30, ft_attempted = ?31
             WHERE id = ?1",
            params![
                game.id,
                game.player_id,
                game.season_id,
                game.date.format("%Y-%m-%d").to_string(),
                game.opponent_team_id,
                game.opponent_name,
                game.home,
                game.player_score,
                game.opponent_score,
                game.playoff,
                game.series_id,
                game.key_game,
                game.cup_game,
                game.overtime,
                game.simulated,
                game.box_score.minutes,
                game.box_score.points,
                game.box_score.rebounds,
                game.box_score.offensive_rebounds,
                game.box_score.assists,
                game.box_score.steals,
                game.box_score.blocks,
                game.box_score.turnovers,
                game.box_score.fouls,
                game.box_score.plus_minus,
                game.box_score.fg_made,
                game.box_score.fg_attempted,
                game.box_score.three_made,
                game.box_score.three_attempted,
                game.box_score.ft_made,
                game.box_score.ft_attempted,
            ],
        )
        .context("failed to update game")?;
        if changed == 0 {
            bail!("no game with id {}", game.id);
        }
        Ok(())
    }

    pub fn delete_game(&self, id: i64) -> Result<()> {
        self.conn()
            .execute("DELETE FROM games WHERE id = ?1", params![id])
            .context("failed to delete game")?;
        Ok(())
    }

    /// Fetch all games for a player, optionally restricted to one season,
    /// ordered by date.
    pub fn fetch_games(&self, player_id: &str, season_id: Option<&str>) -> Result<Vec<GameStatRecord>> {
        let conn = self.conn();
        let (sql, filter): (&str, Vec<&str>) = match season_id {
            Some(season) => (
                "SELECT * FROM games WHERE player_id = ?1 AND season_id = ?2 ORDER BY date, id",
                vec![player_id, season],
            ),
            None => (
                "SELECT * FROM games WHERE player_id = ?1 ORDER BY date, id",
                vec![player_id],
            ),
        };
        let mut stmt = conn.prepare(sql).context("failed to prepare game query")?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(filter), row_to_game)
            .context("failed to query games")?;
        let mut games = Vec::new();
        for row in rows {
            games.push(row.context("failed to read game row")?);
        }
        Ok(games)
    }

    /// Distinct season ids the player has data for (games or manual totals),
    /// ascending.
    pub fn list_seasons(&self, player_id: &str) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT season_id FROM games WHERE player_id = ?1
                 UNION
                 SELECT season_id FROM manual_season_totals WHERE player_id = ?1
                 ORDER BY season_id",
            )
            .context("failed to prepare season query")?;
        let rows = stmt
            .query_map(params![player_id], |row| row.get::<_, String>(0))
            .context("failed to query seasons")?;
        let mut seasons = Vec::new();
        for row in rows {
            seasons.push(row.context("failed to read season row")?);
        }
        Ok(seasons)
    }

    // -----------------------------------------------------------------------
    // Manual season totals
    // -----------------------------------------------------------------------

    /// Insert or replace a manually-entered totals record.
    ///
    /// Blocked when the season already has game records: games are always
    /// authoritative, and a manual record alongside them could only drift.
    pub fn upsert_manual_season_totals(&self, totals: &SeasonTotals) -> Result<()> {
        let games_exist: bool = self
            .conn()
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM games WHERE player_id = ?1 AND season_id = ?2)",
                params![totals.player_id, totals.season_id],
                |row| row.get(0),
            )
            .context("failed to check for existing games")?;
        if games_exist {
            bail!(
                "season {} already has game records; totals are derived from games, \
                 manual entry rejected",
                totals.season_id
            );
        }

        let totals_json =
            serde_json::to_string(&totals.totals).context("failed to serialize totals")?;
        let averages_json =
            serde_json::to_string(&totals.averages).context("failed to serialize averages")?;
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO manual_season_totals
                    (player_id, season_id, games_played, games_started, totals, averages,
                     fg_pct, three_pct, ft_pct, double_doubles, triple_doubles)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    totals.player_id,
                    totals.season_id,
                    totals.games_played,
                    totals.games_started,
                    totals_json,
                    averages_json,
                    totals.percentages.fg,
                    totals.percentages.three,
                    totals.percentages.ft,
                    totals.double_doubles,
                    totals.triple_doubles,
                ],
            )
            .context("failed to upsert manual season totals")?;
        Ok(())
    }

    pub fn fetch_manual_season_totals(
        &self,
        player_id: &str,
        season_id: &str,
    ) -> Result<Option<SeasonTotals>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT player_id, season_id, games_played, games_started, totals, averages,
                        fg_pct, three_pct, ft_pct, double_doubles, triple_doubles
                 FROM manual_season_totals WHERE player_id = ?1 AND season_id = ?2",
            )
            .context("failed to prepare manual totals query")?;
        stmt.query_row(params![player_id, season_id], row_to_manual_totals)
            .optional()
            .context("failed to query manual season totals")
    }

    pub fn delete_manual_season_totals(&self, player_id: &str, season_id: &str) -> Result<()> {
        self.conn()
            .execute(
                "DELETE FROM manual_season_totals WHERE player_id = ?1 AND season_id = ?2",
                params![player_id, season_id],
            )
            .context("failed to delete manual season totals")?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Playoff series
    // -----------------------------------------------------------------------

    pub fn insert_series(&self, series: &PlayoffSeries) -> Result<()> {
        validate_series(series)?;
        self.conn()
            .execute(
                "INSERT INTO playoff_series
                    (id, player_id, season_id, round_name, round_number,
                     team1_id, team1_name, team1_seed, team1_wins,
                     team2_id, team2_name, team2_seed, team2_wins)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    series.id,
                    series.player_id,
                    series.season_id,
                    series.round_name,
                    series.round_number,
                    series.team1.id,
                    series.team1.name,
                    series.team1.seed,
                    series.team1.wins,
                    series.team2.id,
                    series.team2.name,
                    series.team2.seed,
                    series.team2.wins,
                ],
            )
            .context("failed to insert playoff series")?;
        Ok(())
    }

    pub fn update_series(&self, series: &PlayoffSeries) -> Result<()> {
        validate_series(series)?;
        let changed = self
            .conn()
            .execute(
                "UPDATE playoff_series SET
                    player_id = ?2, season_id = ?3, round_name = ?4, round_number = ?5,
                    team1_id = ?6, team1_name = ?7, team1_seed = ?8, team1_wins = ?9,
                    team2_id = ?10, team2_name = ?11, team2_seed = ?12, team2_wins = ?13
                 WHERE id = ?1",
                params![
                    series.id,
                    series.player_id,
                    series.season_id,
                    series.round_name,
                    series.round_number,
                    series.team1.id,
                    series.team1.name,
                    series.team1.seed,
                    series.team1.wins,
                    series.team2.id,
                    series.team2.name,
                    series.team2.seed,
                    series.team2.wins,
                ],
            )
            .context("failed to update playoff series")?;
        if changed == 0 {
            bail!("no playoff series with id {}", series.id);
        }
        Ok(())
    }

    pub fn delete_series(&self, id: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM playoff_series WHERE id = ?1", params![id])
            .context("failed to delete playoff series")?;
        Ok(())
    }

    pub fn fetch_playoff_series(
        &self,
        player_id: &str,
        season_id: &str,
    ) -> Result<Vec<PlayoffSeries>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, player_id, season_id, round_name, round_number,
                        team1_id, team1_name, team1_seed, team1_wins,
                        team2_id, team2_name, team2_seed, team2_wins
                 FROM playoff_series
                 WHERE player_id = ?1 AND season_id = ?2
                 ORDER BY round_number, id",
            )
            .context("failed to prepare series query")?;
        let rows = stmt
            .query_map(params![player_id, season_id], row_to_series)
            .context("failed to query playoff series")?;
        let mut series = Vec::new();
        for row in rows {
            series.push(row.context("failed to read series row")?);
        }
        Ok(series)
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    pub fn upsert_team(&self, team: &TeamRecord) -> Result<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO teams (id, name, abbreviation, primary_color, secondary_color)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    team.id,
                    team.name,
                    team.abbreviation,
                    team.primary_color,
                    team.secondary_color,
                ],
            )
            .context("failed to upsert team")?;
        Ok(())
    }

    pub fn fetch_teams(&self) -> Result<Vec<TeamRecord>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, abbreviation, primary_color, secondary_color
                 FROM teams ORDER BY id",
            )
            .context("failed to prepare team query")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(TeamRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    abbreviation: row.get(2)?,
                    primary_color: row.get(3)?,
                    secondary_color: row.get(4)?,
                })
            })
            .context("failed to query teams")?;
        let mut teams = Vec::new();
        for row in rows {
            teams.push(row.context("failed to read team row")?);
        }
        Ok(teams)
    }

    // -----------------------------------------------------------------------
    // Awards
    // -----------------------------------------------------------------------

    pub fn insert_award(&self, award: &Award) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO awards (player_id, season_id, kind, name, team_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    award.player_id,
                    award.season_id,
                    award.kind.as_str(),
                    award.name,
                    award.team_id,
                ],
            )
            .context("failed to insert award")?;
        Ok(())
    }

    pub fn fetch_awards(&self, season_id: &str, player_id: &str) -> Result<Vec<Award>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT player_id, season_id, kind, name, team_id FROM awards
                 WHERE season_id = ?1 AND player_id = ?2 ORDER BY id",
            )
            .context("failed to prepare award query")?;
        let rows = stmt
            .query_map(params![season_id, player_id], |row| {
                let kind: String = row.get(2)?;
                Ok(Award {
                    player_id: row.get(0)?,
                    season_id: row.get(1)?,
                    kind: AwardKind::parse(&kind).ok_or_else(|| {
                        bad_column(2, format!("unknown award kind {kind:?}"))
                    })?,
                    name: row.get(3)?,
                    team_id: row.get(4)?,
                })
            })
            .context("failed to query awards")?;
        let mut awards = Vec::new();
        for row in rows {
            awards.push(row.context("failed to read award row")?);
        }
        Ok(awards)
    }

    // -----------------------------------------------------------------------
    // Roster entries
    // -----------------------------------------------------------------------

    pub fn insert_roster_entry(&self, entry: &RosterEntry) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO roster_entries
                    (season_id, snapshot, slot, position, player_name, overall_rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.season_id,
                    entry.snapshot.as_str(),
                    entry.slot.as_str(),
                    entry.position,
                    entry.player_name,
                    entry.overall_rating,
                ],
            )
            .context("failed to insert roster entry")?;
        Ok(())
    }

    pub fn fetch_roster(
        &self,
        season_id: &str,
        snapshot: RosterSnapshot,
    ) -> Result<Vec<RosterEntry>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT season_id, snapshot, slot, position, player_name, overall_rating
                 FROM roster_entries WHERE season_id = ?1 AND snapshot = ?2 ORDER BY id",
            )
            .context("failed to prepare roster query")?;
        let rows = stmt
            .query_map(params![season_id, snapshot.as_str()], |row| {
                let snapshot: String = row.get(1)?;
                let slot: String = row.get(2)?;
                Ok(RosterEntry {
                    season_id: row.get(0)?,
                    snapshot: RosterSnapshot::parse(&snapshot).ok_or_else(|| {
                        bad_column(1, format!("unknown roster snapshot {snapshot:?}"))
                    })?,
                    slot: RosterSlot::parse(&slot)
                        .ok_or_else(|| bad_column(2, format!("unknown roster slot {slot:?}")))?,
                    position: row.get(3)?,
                    player_name: row.get(4)?,
                    overall_rating: row.get(5)?,
                })
            })
            .context("failed to query roster entries")?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.context("failed to read roster row")?);
        }
        Ok(entries)
    }
}

// ---------------------------------------------------------------------------
// Row mapping and validation helpers
// ---------------------------------------------------------------------------

/// Build a conversion error for a column holding an unexpected value.
fn bad_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        message.into(),
    )
}

fn validate_series(series: &PlayoffSeries) -> Result<()> {
    for (label, wins) in [("team1", series.team1.wins), ("team2", series.team2.wins)] {
        if wins > SERIES_WIN_TARGET {
            bail!("{label} wins {wins} exceeds the series maximum of {SERIES_WIN_TARGET}");
        }
    }
    Ok(())
}

fn row_to_game(row: &Row<'_>) -> rusqlite::Result<GameStatRecord> {
    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(GameStatRecord {
        id: row.get("id")?,
        player_id: row.get("player_id")?,
        season_id: row.get("season_id")?,
        date,
        opponent_team_id: row.get("opponent_team_id")?,
        opponent_name: row.get("opponent_name")?,
        home: row.get("home")?,
        player_score: row.get("player_score")?,
        opponent_score: row.get("opponent_score")?,
        playoff: row.get("playoff")?,
        series_id: row.get("series_id")?,
        key_game: row.get("key_game")?,
        cup_game: row.get("cup_game")?,
        overtime: row.get("overtime")?,
        simulated: row.get("simulated")?,
        box_score: BoxScore {
            minutes: row.get("minutes")?,
            points: row.get("points")?,
            rebounds: row.get("rebounds")?,
            offensive_rebounds: row.get("offensive_rebounds")?,
            assists: row.get("assists")?,
            steals: row.get("steals")?,
            blocks: row.get("blocks")?,
            turnovers: row.get("turnovers")?,
            fouls: row.get("fouls")?,
            plus_minus: row.get("plus_minus")?,
            fg_made: row.get("fg_made")?,
            fg_attempted: row.get("fg_attempted")?,
            three_made: row.get("three_made")?,
            three_attempted: row.get("three_attempted")?,
            ft_made: row.get("ft_made")?,
            ft_attempted: row.get("ft_attempted")?,
        },
    })
}

fn row_to_series(row: &Row<'_>) -> rusqlite::Result<PlayoffSeries> {
    Ok(PlayoffSeries {
        id: row.get(0)?,
        player_id: row.get(1)?,
        season_id: row.get(2)?,
        round_name: row.get(3)?,
        round_number: row.get(4)?,
        team1: SeriesTeam {
            id: row.get(5)?,
            name: row.get(6)?,
            seed: row.get(7)?,
            wins: row.get(8)?,
        },
        team2: SeriesTeam {
            id: row.get(9)?,
            name: row.get(10)?,
            seed: row.get(11)?,
            wins: row.get(12)?,
        },
    })
}

fn row_to_manual_totals(row: &Row<'_>) -> rusqlite::Result<SeasonTotals> {
    let totals_json: String = row.get(4)?;
    let averages_json: String = row.get(5)?;
    let totals = serde_json::from_str(&totals_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let averages = serde_json::from_str(&averages_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(SeasonTotals {
        player_id: row.get(0)?,
        season_id: row.get(1)?,
        games_played: row.get(2)?,
        games_started: row.get(3)?,
        totals,
        averages,
        percentages: crate::stats::derived::ShootingPercentages {
            fg: row.get(6)?,
            three: row.get(7)?,
            ft: row.get(8)?,
        },
        double_doubles: row.get(9)?,
        triple_doubles: row.get(10)?,
        is_manual_entry: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::derived::ShootingPercentages;
    use crate::stats::game::StatLine;

    fn open_test_store() -> Store {
        Store::open(":memory:").unwrap()
    }

    fn sample_game(season: &str, day: u32) -> GameStatRecord {
        GameStatRecord {
            id: 0,
            player_id: "p1".into(),
            season_id: season.into(),
            date: NaiveDate::from_ymd_opt(2024, 11, day).unwrap(),
            opponent_team_id: "MIA".into(),
            opponent_name: "Miami Heat".into(),
            home: day % 2 == 0,
            player_score: 110,
            opponent_score: 102,
            playoff: false,
            series_id: None,
            key_game: false,
            cup_game: true,
            overtime: false,
            simulated: false,
            box_score: BoxScore {
                minutes: Some(34.0),
                points: Some(27),
                rebounds: Some(8),
                assists: Some(6),
                fg_made: Some(10),
                fg_attempted: Some(19),
                three_made: Some(2),
                three_attempted: Some(6),
                ft_made: Some(5),
                ft_attempted: Some(5),
                ..BoxScore::default()
            },
        }
    }

    fn sample_series(id: &str) -> PlayoffSeries {
        PlayoffSeries {
            id: id.into(),
            player_id: "p1".into(),
            season_id: "2024-2025".into(),
            round_name: "First Round".into(),
            round_number: 1,
            team1: SeriesTeam {
                id: "BOS".into(),
                name: "Boston Celtics".into(),
                seed: Some(1),
                wins: 2,
            },
            team2: SeriesTeam {
                id: "MIA".into(),
                name: "Miami Heat".into(),
                seed: Some(8),
                wins: 1,
            },
        }
    }

    #[test]
    fn game_round_trips_through_the_store() {
        let store = open_test_store();
        let mut game = sample_game("2024-2025", 4);
        game.id = store.insert_game(&game).unwrap();
        let fetched = store.fetch_games("p1", Some("2024-2025")).unwrap();
        assert_eq!(fetched, vec![game]);
    }

    #[test]
    fn fetch_games_filters_by_season_and_orders_by_date() {
        let store = open_test_store();
        store.insert_game(&sample_game("2024-2025", 9)).unwrap();
        store.insert_game(&sample_game("2024-2025", 2)).unwrap();
        store.insert_game(&sample_game("2023-2024", 5)).unwrap();
        let season = store.fetch_games("p1", Some("2024-2025")).unwrap();
        assert_eq!(season.len(), 2);
        assert!(season[0].date < season[1].date);
        let all = store.fetch_games("p1", None).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn invalid_box_score_blocks_the_write() {
        let store = open_test_store();
        let mut game = sample_game("2024-2025", 4);
        game.box_score.fg_made = Some(25);
        assert!(store.insert_game(&game).is_err());
        assert!(store.fetch_games("p1", None).unwrap().is_empty());
    }

    #[test]
    fn update_and_delete_game() {
        let store = open_test_store();
        let mut game = sample_game("2024-2025", 4);
        game.id = store.insert_game(&game).unwrap();
        game.box_score.points = Some(41);
        store.update_game(&game).unwrap();
        let fetched = store.fetch_games("p1", None).unwrap();
        assert_eq!(fetched[0].box_score.points, Some(41));
        store.delete_game(game.id).unwrap();
        assert!(store.fetch_games("p1", None).unwrap().is_empty());
    }

    fn manual_totals(season: &str) -> SeasonTotals {
        let mut totals = StatLine::default();
        totals.points = Some(1100.0);
        SeasonTotals {
            player_id: "p1".into(),
            season_id: season.into(),
            games_played: 66,
            games_started: Some(60),
            totals,
            averages: StatLine::default(),
            percentages: ShootingPercentages {
                fg: Some(0.455),
                three: None,
                ft: Some(0.81),
            },
            double_doubles: 9,
            triple_doubles: 0,
            is_manual_entry: true,
        }
    }

    #[test]
    fn manual_totals_round_trip() {
        let store = open_test_store();
        let manual = manual_totals("2018-2019");
        store.upsert_manual_season_totals(&manual).unwrap();
        let fetched = store
            .fetch_manual_season_totals("p1", "2018-2019")
            .unwrap()
            .unwrap();
        assert_eq!(fetched, manual);
        assert!(store
            .fetch_manual_season_totals("p1", "2017-2018")
            .unwrap()
            .is_none());
    }

    #[test]
    fn manual_totals_rejected_when_games_exist() {
        let store = open_test_store();
        store.insert_game(&sample_game("2018-2019", 4)).unwrap();
        let err = store
            .upsert_manual_season_totals(&manual_totals("2018-2019"))
            .unwrap_err();
        assert!(err.to_string().contains("derived from games"));
    }

    #[test]
    fn series_round_trip_and_win_cap() {
        let store = open_test_store();
        let mut series = sample_series("23-24-25-R1-E");
        store.insert_series(&series).unwrap();
        let fetched = store.fetch_playoff_series("p1", "2024-2025").unwrap();
        assert_eq!(fetched, vec![series.clone()]);

        series.team1.wins = 4;
        store.update_series(&series).unwrap();
        series.team1.wins = 5;
        assert!(store.update_series(&series).is_err());
    }

    #[test]
    fn list_seasons_unions_games_and_manual_entries() {
        let store = open_test_store();
        store.insert_game(&sample_game("2024-2025", 4)).unwrap();
        store
            .upsert_manual_season_totals(&manual_totals("2018-2019"))
            .unwrap();
        assert_eq!(
            store.list_seasons("p1").unwrap(),
            vec!["2018-2019".to_string(), "2024-2025".to_string()]
        );
    }

    #[test]
    fn teams_awards_and_roster_round_trip() {
        let store = open_test_store();
        let team = TeamRecord {
            id: "BOS".into(),
            name: "Boston Celtics".into(),
            abbreviation: "BOS".into(),
            primary_color: Some("#007A33".into()),
            secondary_color: None,
        };
        store.upsert_team(&team).unwrap();
        assert_eq!(store.fetch_teams().unwrap(), vec![team]);

        let award = Award {
            player_id: "p1".into(),
            season_id: "2024-2025".into(),
            kind: AwardKind::AllStar,
            name: "All-Star".into(),
            team_id: "BOS".into(),
        };
        store.insert_award(&award).unwrap();
        assert_eq!(store.fetch_awards("2024-2025", "p1").unwrap(), vec![award]);

        let entry = RosterEntry {
            season_id: "2024-2025".into(),
            snapshot: RosterSnapshot::StartOfSeason,
            slot: RosterSlot::Starter,
            position: "PG".into(),
            player_name: "Sample Guard".into(),
            overall_rating: 88,
        };
        store.insert_roster_entry(&entry).unwrap();
        assert_eq!(
            store
                .fetch_roster("2024-2025", RosterSnapshot::StartOfSeason)
                .unwrap(),
            vec![entry]
        );
        assert!(store
            .fetch_roster("2024-2025", RosterSnapshot::EndOfSeason)
            .unwrap()
            .is_empty());
    }
}
