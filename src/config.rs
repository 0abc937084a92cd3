// Configuration loading and parsing (pipeline.toml, teams.toml).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::Deserialize;
use thiserror::Error;

/// Earliest season the pipeline supports. npb.jp carries stats back to
/// 2008, but the extract format is only verified from 2020 on.
pub const MIN_YEAR: u16 = 2020;

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
    pub season: SeasonConfig,
    pub paths: PathsConfig,
    /// Static team→league membership, versioned per season.
    pub teams: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// pipeline.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire pipeline.toml file.
#[derive(Debug, Clone, Deserialize)]
struct PipelineFile {
    season: SeasonConfig,
    paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonConfig {
    /// Postseason year to process.
    pub year: u16,
    /// League label used to key the reference tables (the postseason pool
    /// spans both circuits, so this is the table label, not CL/PL).
    pub league: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Base directory holding one subdirectory per year of extracts; the
    /// publication files are written next to the extracts they came from.
    pub stats_dir: String,
    pub park_factors: String,
    pub fip_constants: String,
}

// ---------------------------------------------------------------------------
// teams.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct TeamsFile {
    teams: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// File naming conventions
// ---------------------------------------------------------------------------

impl Config {
    fn year_dir(&self) -> PathBuf {
        Path::new(&self.paths.stats_dir).join(self.season.year.to_string())
    }

    pub fn raw_batting_path(&self) -> PathBuf {
        self.year_dir()
            .join(format!("{}StatsRawBP.csv", self.season.year))
    }

    pub fn raw_pitching_path(&self) -> PathBuf {
        self.year_dir()
            .join(format!("{}StatsRawPP.csv", self.season.year))
    }

    pub fn final_batting_path(&self) -> PathBuf {
        self.year_dir()
            .join(format!("{}FinalBP.csv", self.season.year))
    }

    pub fn final_pitching_path(&self) -> PathBuf {
        self.year_dir()
            .join(format!("{}FinalPP.csv", self.season.year))
    }

    pub fn team_batting_path(&self) -> PathBuf {
        self.year_dir()
            .join(format!("{}TeamBP.csv", self.season.year))
    }

    pub fn team_pitching_path(&self) -> PathBuf {
        self.year_dir()
            .join(format!("{}TeamPP.csv", self.season.year))
    }

    pub fn park_factor_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.park_factors)
    }

    pub fn fip_constant_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.fip_constants)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/pipeline.toml` and
/// `config/teams.toml`, both relative to the given `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- pipeline.toml (required) ---
    let pipeline_path = config_dir.join("pipeline.toml");
    let pipeline_text = read_file(&pipeline_path)?;
    let pipeline_file: PipelineFile =
        toml::from_str(&pipeline_text).map_err(|e| ConfigError::ParseError {
            path: pipeline_path.clone(),
            source: e,
        })?;

    // --- teams.toml (required) ---
    let teams_path = config_dir.join("teams.toml");
    let teams_text = read_file(&teams_path)?;
    let teams_file: TeamsFile =
        toml::from_str(&teams_text).map_err(|e| ConfigError::ParseError {
            path: teams_path.clone(),
            source: e,
        })?;

    let config = Config {
        season: pipeline_file.season,
        paths: pipeline_file.paths,
        teams: teams_file.teams,
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

/// Current calendar year, the upper bound for processable seasons.
pub fn current_year() -> u16 {
    chrono::Utc::now().year() as u16
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check that a season year is within the supported range.
pub fn validate_year(year: u16) -> Result<(), ConfigError> {
    let max = current_year();
    if !(MIN_YEAR..=max).contains(&year) {
        return Err(ConfigError::ValidationError {
            field: "season.year".into(),
            message: format!("must be between {MIN_YEAR} and {max}, got {year}"),
        });
    }
    Ok(())
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_year(config.season.year)?;

    if config.season.league.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "season.league".into(),
            message: "must not be empty".into(),
        });
    }

    if config.paths.stats_dir.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "paths.stats_dir".into(),
            message: "must not be empty".into(),
        });
    }

    for (team, league) in &config.teams {
        if league.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("teams.\"{team}\""),
                message: "league assignment must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
