// Contest configuration: mode, budget, filters and per-mode roster rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::player::Position;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unsupported contest mode `{0}` (expected classic or showdown)")]
    UnsupportedMode(String),

    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestMode {
    /// Multi-game contest with per-position roster slots.
    Classic,
    /// Single-game contest with one multiplied captain.
    Showdown,
}

impl ContestMode {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(ContestMode::Classic),
            "showdown" | "captain" => Ok(ContestMode::Showdown),
            other => Err(ConfigError::UnsupportedMode(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContestMode::Classic => "classic",
            ContestMode::Showdown => "showdown",
        }
    }
}

impl fmt::Display for ContestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Per-mode rules
// ---------------------------------------------------------------------------

/// A floor (and optional ceiling) on how many players of one position a
/// classic lineup may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionQuota {
    pub position: Position,
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
}

impl PositionQuota {
    pub fn at_least(position: Position, min: u32) -> Self {
        PositionQuota { position, min, max: None }
    }

    pub fn exactly(position: Position, count: u32) -> Self {
        PositionQuota {
            position,
            min: count,
            max: Some(count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicRules {
    pub quotas: Vec<PositionQuota>,
    pub max_roster: u32,
    /// Positions allowed to fill slots beyond the quota floors. `None` lets
    /// any position fill them.
    #[serde(default)]
    pub flex_positions: Option<Vec<Position>>,
}

impl Default for ClassicRules {
    fn default() -> Self {
        ClassicRules {
            quotas: vec![
                PositionQuota::exactly(Position::Quarterback, 1),
                PositionQuota::at_least(Position::RunningBack, 2),
                PositionQuota::at_least(Position::WideReceiver, 3),
                PositionQuota::at_least(Position::TightEnd, 1),
            ],
            max_roster: 8,
            flex_positions: None,
        }
    }
}

impl ClassicRules {
    pub fn quota_for(&self, position: Position) -> Option<&PositionQuota> {
        self.quotas.iter().find(|q| q.position == position)
    }

    /// Upper bound on how many players of `position` a lineup may hold, or
    /// `None` when only the roster size limits it.
    pub fn cap_for(&self, position: Position) -> Option<u32> {
        let quota = self.quota_for(position);
        if let Some(max) = quota.and_then(|q| q.max) {
            return Some(max);
        }
        match &self.flex_positions {
            Some(flex) if !flex.contains(&position) => Some(quota.map_or(0, |q| q.min)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowdownRules {
    pub regular_slots: u32,
    pub captain_points_multiplier: f64,
    pub captain_salary_multiplier: f64,
}

impl Default for ShowdownRules {
    fn default() -> Self {
        ShowdownRules {
            regular_slots: 5,
            captain_points_multiplier: 1.5,
            captain_salary_multiplier: 1.5,
        }
    }
}

impl ShowdownRules {
    /// Captain salary as charged against the cap: raw salary times the
    /// multiplier, with no rounding.
    pub fn captain_salary_cost(&self, salary: u32) -> f64 {
        salary as f64 * self.captain_salary_multiplier
    }

    /// Captain salary as reported in a lineup, truncated to whole dollars.
    pub fn captain_salary(&self, salary: u32) -> u32 {
        (salary as f64 * self.captain_salary_multiplier).floor() as u32
    }

    pub fn captain_points(&self, points: f64) -> f64 {
        points * self.captain_points_multiplier
    }
}

// ---------------------------------------------------------------------------
// ContestConfig
// ---------------------------------------------------------------------------

/// Everything that shapes the constraint model for one optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestConfig {
    pub mode: ContestMode,
    pub budget: i64,
    /// Allowed team codes; empty means every team.
    #[serde(default)]
    pub team_filter: BTreeSet<String>,
    /// Player names to drop, matched case-insensitively.
    #[serde(default)]
    pub excluded_players: Vec<String>,
    #[serde(default)]
    pub classic: ClassicRules,
    #[serde(default)]
    pub showdown: ShowdownRules,
}

impl ContestConfig {
    pub fn classic(budget: i64) -> Self {
        ContestConfig {
            mode: ContestMode::Classic,
            budget,
            team_filter: BTreeSet::new(),
            excluded_players: Vec::new(),
            classic: ClassicRules::default(),
            showdown: ShowdownRules::default(),
        }
    }

    pub fn showdown(budget: i64) -> Self {
        ContestConfig {
            mode: ContestMode::Showdown,
            ..ContestConfig::classic(budget)
        }
    }

    pub fn with_teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.team_filter = teams
            .into_iter()
            .map(|t| t.as_ref().trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    pub fn with_excluded<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_players = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    /// Reject configurations that can never describe a valid contest.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.budget <= 0 {
            return Err(validation("budget", format!("must be > 0, got {}", self.budget)));
        }

        match self.mode {
            ContestMode::Classic => validate_classic(&self.classic),
            ContestMode::Showdown => validate_showdown(&self.showdown),
        }
    }
}

fn validation(field: &str, message: String) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        message,
    }
}

fn validate_classic(rules: &ClassicRules) -> Result<(), ConfigError> {
    if rules.max_roster == 0 {
        return Err(validation("classic.max_roster", "must be > 0".into()));
    }

    let mut seen = BTreeSet::new();
    for quota in &rules.quotas {
        if !seen.insert(quota.position) {
            return Err(validation(
                "classic.quotas",
                format!("duplicate quota for {}", quota.position),
            ));
        }
        if let Some(max) = quota.max {
            if max < quota.min {
                return Err(validation(
                    "classic.quotas",
                    format!("{} max {} is below min {}", quota.position, max, quota.min),
                ));
            }
        }
    }

    let floor_total: u32 = rules.quotas.iter().map(|q| q.min).sum();
    if floor_total > rules.max_roster {
        return Err(validation(
            "classic.max_roster",
            format!(
                "quota minimums add up to {floor_total}, more than the roster size {}",
                rules.max_roster
            ),
        ));
    }

    Ok(())
}

fn validate_showdown(rules: &ShowdownRules) -> Result<(), ConfigError> {
    if rules.regular_slots == 0 {
        return Err(validation("showdown.regular_slots", "must be > 0".into()));
    }
    let multipliers = [
        ("showdown.captain_points_multiplier", rules.captain_points_multiplier),
        ("showdown.captain_salary_multiplier", rules.captain_salary_multiplier),
    ];
    for (field, value) in multipliers {
        if !value.is_finite() || value < 1.0 {
            return Err(validation(field, format!("must be finite and >= 1.0, got {value}")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
