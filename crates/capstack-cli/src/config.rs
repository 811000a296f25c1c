// Settings loading and parsing (config/contest.toml).

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use capstack_core::contest::{ClassicRules, ContestConfig, ContestMode, ShowdownRules};
use capstack_core::SolverSettings;

pub const CONTEST_FILE: &str = "contest.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled settings
// ---------------------------------------------------------------------------

/// Everything the binary needs for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub contest: ContestConfig,
    pub solver: SolverSettings,
    /// Merged salary/projection CSV.
    pub pool_path: PathBuf,
}

// ---------------------------------------------------------------------------
// Raw TOML file layout
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ContestFile {
    contest: ContestSection,
    #[serde(default)]
    classic: ClassicRules,
    #[serde(default)]
    showdown: ShowdownRules,
    #[serde(default)]
    solver: SolverSection,
    data: DataSection,
}

#[derive(Debug, Deserialize)]
struct ContestSection {
    mode: String,
    budget: i64,
    #[serde(default)]
    teams: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SolverSection {
    /// Zero means no time limit.
    #[serde(default)]
    time_limit_ms: u64,
}

#[derive(Debug, Deserialize)]
struct DataSection {
    pool: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load settings from `config/contest.toml` under `base_dir`. Relative pool
/// paths are resolved against `base_dir`.
///
/// Does not copy defaults; `load_settings()` does that first.
pub fn load_settings_from(base_dir: &Path) -> Result<Settings, SettingsError> {
    let path = base_dir.join("config").join(CONTEST_FILE);
    let text = read_file(&path)?;
    parse_settings(&text, &path, base_dir)
}

fn parse_settings(text: &str, path: &Path, base_dir: &Path) -> Result<Settings, SettingsError> {
    let file: ContestFile = toml::from_str(text).map_err(|e| SettingsError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mode = ContestMode::parse(&file.contest.mode).map_err(|e| validation("contest.mode", e.to_string()))?;

    let team_filter: BTreeSet<String> = file
        .contest
        .teams
        .iter()
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .collect();

    let contest = ContestConfig {
        mode,
        budget: file.contest.budget,
        team_filter,
        excluded_players: file.contest.exclude,
        classic: file.classic,
        showdown: file.showdown,
    };

    let solver = SolverSettings {
        time_limit: (file.solver.time_limit_ms > 0)
            .then(|| Duration::from_millis(file.solver.time_limit_ms)),
        ..SolverSettings::default()
    };

    let settings = Settings {
        contest,
        solver,
        pool_path: base_dir.join(file.data.pool),
    };

    validate(&settings)?;

    Ok(settings)
}

/// Seed `config/contest.toml` from `defaults/contest.toml` on first run.
/// Returns the path written, or `None` when the config file already exists.
pub fn ensure_contest_file(base_dir: &Path) -> Result<Option<PathBuf>, SettingsError> {
    let target = base_dir.join("config").join(CONTEST_FILE);
    if target.is_file() {
        return Ok(None);
    }
    let source = base_dir.join("defaults").join(CONTEST_FILE);
    if !source.is_file() {
        return Err(SettingsError::DefaultsCopyError {
            message: format!(
                "no {CONTEST_FILE} in config/ or defaults/ under {}",
                base_dir.display()
            ),
        });
    }

    let copy_error = |e: std::io::Error| SettingsError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    };
    std::fs::create_dir_all(base_dir.join("config")).map_err(copy_error)?;
    std::fs::copy(&source, &target).map_err(copy_error)?;
    Ok(Some(target))
}

/// Seed `config/contest.toml` from defaults if needed, then load.
pub fn load_settings(base_dir: &Path) -> Result<Settings, SettingsError> {
    if let Some(path) = ensure_contest_file(base_dir)? {
        tracing::info!("created {} from defaults", path.display());
    }
    load_settings_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, SettingsError> {
    std::fs::read_to_string(path).map_err(|_| SettingsError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validation(field: &str, message: String) -> SettingsError {
    SettingsError::ValidationError {
        field: field.to_string(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the assembled settings. Contest rule checks are delegated to
/// `ContestConfig::validate`; command-line overrides should re-run this.
pub fn validate(settings: &Settings) -> Result<(), SettingsError> {
    if settings.pool_path.as_os_str().is_empty() {
        return Err(validation("data.pool", "must not be empty".to_string()));
    }
    settings.contest.validate().map_err(|e| match e {
        capstack_core::ConfigError::Validation { field, message } => {
            SettingsError::ValidationError { field, message }
        }
        other => validation("contest", other.to_string()),
    })
}
