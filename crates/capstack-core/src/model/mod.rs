// Constraint model construction: candidate filtering plus one builder per
// contest mode.

pub mod classic;
pub mod showdown;

use std::collections::HashSet;

use tracing::info;

use crate::contest::{ContestConfig, ContestMode};
use crate::player::PlayerRecord;
use crate::pool::PlayerPool;
use crate::solver::{IntegerProgram, VarId};

pub use classic::ClassicModel;
pub use showdown::ShowdownModel;

/// What a decision variable means for the lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRole {
    Regular,
    Captain,
}

/// Links a decision variable back to the candidate it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub candidate: usize,
    pub role: SlotRole,
}

/// The integer program for one request together with the candidates it was
/// built from. `decisions[v.0]` describes variable `v`.
#[derive(Debug, Clone)]
pub struct ConstraintModel {
    pub candidates: Vec<PlayerRecord>,
    pub program: IntegerProgram,
    pub decisions: Vec<Decision>,
}

impl ConstraintModel {
    pub fn new(candidates: Vec<PlayerRecord>) -> Self {
        ConstraintModel {
            candidates,
            program: IntegerProgram::new(),
            decisions: Vec::new(),
        }
    }

    /// Add a binary variable that places `candidate` in the lineup as `role`.
    pub fn add_decision(&mut self, candidate: usize, role: SlotRole) -> VarId {
        let prefix = match role {
            SlotRole::Regular => "player",
            SlotRole::Captain => "captain",
        };
        let var = self.program.add_variable(format!("{prefix}_{candidate}"));
        self.decisions.push(Decision { candidate, role });
        var
    }
}

/// Result of building a model: either a program ready to solve or a reason
/// the request can be rejected without solving.
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Ready(ConstraintModel),
    Infeasible(String),
}

/// One strategy per contest mode.
pub trait ModelBuilder {
    fn build(&self, candidates: Vec<PlayerRecord>) -> BuildOutcome;
}

/// Pick the builder for the configured mode.
pub fn builder_for(config: &ContestConfig) -> Box<dyn ModelBuilder + '_> {
    match config.mode {
        ContestMode::Classic => Box::new(ClassicModel::new(&config.classic, config.budget)),
        ContestMode::Showdown => Box::new(ShowdownModel::new(&config.showdown, config.budget)),
    }
}

/// Reduce the pool to the players a lineup may use.
///
/// Steps, in order:
/// 1. Keep records matched across both upstream sources.
/// 2. Keep only teams in the team filter, when one is given.
/// 3. Drop excluded names (case-insensitive).
/// 4. Drop repeated (name, team, position) identities, keeping the first.
///
/// Pool order is preserved.
pub fn filter_candidates(pool: &PlayerPool, config: &ContestConfig) -> Vec<PlayerRecord> {
    let teams: HashSet<String> = config
        .team_filter
        .iter()
        .map(|t| t.trim().to_uppercase())
        .collect();
    let excluded: HashSet<String> = config
        .excluded_players
        .iter()
        .map(|n| n.trim().to_uppercase())
        .collect();

    let matched: Vec<&PlayerRecord> = pool
        .players()
        .iter()
        .filter(|p| p.match_status.is_matched())
        .collect();

    let on_team: Vec<&PlayerRecord> = matched
        .iter()
        .copied()
        .filter(|p| teams.is_empty() || teams.contains(&p.team.trim().to_uppercase()))
        .collect();

    let allowed: Vec<&PlayerRecord> = on_team
        .iter()
        .copied()
        .filter(|p| !excluded.contains(&p.name.trim().to_uppercase()))
        .collect();

    let allowed_count = allowed.len();
    let mut seen = HashSet::new();
    let candidates: Vec<PlayerRecord> = allowed
        .into_iter()
        .filter(|p| seen.insert(p.identity()))
        .cloned()
        .collect();

    info!(
        "candidate filter: {} in pool, {} matched, {} after team filter, {} after exclusions, {} unique",
        pool.len(),
        matched.len(),
        on_team.len(),
        allowed_count,
        candidates.len()
    );

    candidates
}
