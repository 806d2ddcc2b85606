// Configuration loading and parsing (config/statbook.toml).

use crate::bracket::conference::UnknownConferencePolicy;
use crate::bracket::organize::BracketOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub player: PlayerConfig,
    pub db_path: String,
    pub data_paths: DataPaths,
    pub bracket: BracketOptions,
}

// ---------------------------------------------------------------------------
// statbook.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire statbook.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    player: PlayerConfig,
    database: DatabaseSection,
    data: DataPaths,
    #[serde(default)]
    bracket: BracketSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    /// Store identifier of the tracked player.
    pub id: String,
    /// Jersey number; leads every generated series identifier.
    pub number: u32,
    /// The player's own team name, used by the bracket's name-based game
    /// matching fallback.
    pub team_name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// CSV game log consumed by the `import` subcommand.
    pub games_csv: String,
}

#[derive(Debug, Clone, Deserialize)]
struct BracketSection {
    #[serde(default = "default_finals_round_name")]
    finals_round_name: String,
    #[serde(default = "default_name_fallback")]
    name_fallback: bool,
    /// "unknown", "east", or "error".
    #[serde(default = "default_unknown_conference")]
    unknown_conference: String,
}

fn default_finals_round_name() -> String {
    "Finals".to_string()
}

fn default_name_fallback() -> bool {
    true
}

fn default_unknown_conference() -> String {
    "unknown".to_string()
}

impl Default for BracketSection {
    fn default() -> Self {
        BracketSection {
            finals_round_name: default_finals_round_name(),
            name_fallback: default_name_fallback(),
            unknown_conference: default_unknown_conference(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/statbook.toml` relative to
/// the given `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = base_dir.join("config").join("statbook.toml");
    let text = read_file(&config_path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    let unknown_conference = UnknownConferencePolicy::parse(&file.bracket.unknown_conference)
        .ok_or_else(|| ConfigError::ValidationError {
            field: "bracket.unknown_conference".into(),
            message: format!(
                "must be one of \"unknown\", \"east\", \"error\"; got {:?}",
                file.bracket.unknown_conference
            ),
        })?;

    let config = Config {
        player: file.player,
        db_path: file.database.path,
        data_paths: file.data,
        bracket: BracketOptions {
            finals_round_name: file.bracket.finals_round_name,
            name_fallback: file.bracket.name_fallback,
            unknown_conference,
        },
    };

    validate(&config)?;

    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working
/// directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.player.id.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "player.id".into(),
            message: "must not be empty".into(),
        });
    }

    if config.player.team_name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "player.team_name".into(),
            message: "must not be empty".into(),
        });
    }

    if config.bracket.finals_round_name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "bracket.finals_round_name".into(),
            message: "must not be empty".into(),
        });
    }

    if config.db_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "database.path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}
