// Lineup optimization pipeline: validate, filter, model, solve, assemble.

use tracing::{info, warn};

use crate::contest::{ConfigError, ContestConfig};
use crate::lineup::{assemble, LineupResult};
use crate::model::{builder_for, filter_candidates, BuildOutcome};
use crate::pool::PlayerPool;
use crate::solver::{GoodLpSolver, SolveStatus, Solver};

/// Find the highest-scoring legal lineup with the default exact solver.
pub fn optimize(pool: &PlayerPool, config: &ContestConfig) -> Result<LineupResult, ConfigError> {
    optimize_with(pool, config, &GoodLpSolver::default())
}

/// Find the highest-scoring legal lineup using `solver`.
///
/// Algorithm:
/// 1. Validate the configuration; invalid settings are the only `Err`.
/// 2. Filter the pool down to eligible candidates.
/// 3. Build the mode's constraint model. Position shortfalls found while
///    building are reported as `Infeasible` without calling the solver.
/// 4. Solve and turn the assignment into a lineup.
///
/// Every solver outcome (infeasible, unbounded, errors) comes back as an
/// `Ok(LineupResult)` with the matching status and message.
pub fn optimize_with(
    pool: &PlayerPool,
    config: &ContestConfig,
    solver: &dyn Solver,
) -> Result<LineupResult, ConfigError> {
    config.validate()?;
    info!(
        "optimizing {} lineup: budget {}, {} players in pool",
        config.mode,
        config.budget,
        pool.len()
    );

    let candidates = filter_candidates(pool, config);
    let model = match builder_for(config).build(candidates) {
        BuildOutcome::Ready(model) => model,
        BuildOutcome::Infeasible(reason) => {
            warn!("lineup rejected before solving: {}", reason);
            return Ok(LineupResult::failure(config, SolveStatus::Infeasible, reason));
        }
    };

    let solution = solver.solve(&model.program);
    let result = assemble(&model, &solution, config);

    if result.is_optimal() {
        info!(
            "optimal lineup: {} players, {:.2} points, salary {} of {}",
            result.selected_players.len(),
            result.total_points,
            result.total_salary,
            config.budget
        );
    } else {
        warn!(
            "no lineup ({}): {}",
            result.status,
            result.error_message.as_deref().unwrap_or("")
        );
    }
    Ok(result)
}
