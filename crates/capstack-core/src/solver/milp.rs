// Exact 0/1 solving through good_lp's mixed-integer backend.

use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use good_lp::{
    default_solver, variable, variables, Expression, ResolutionError, Solution as _, SolverModel,
    Variable,
};
use tracing::{debug, warn};

use super::{IntegerProgram, LinearExpr, Sense, Solution, SolveStatus, Solver, SolverSettings};

/// Solves an `IntegerProgram` with one binary good_lp variable per `VarId`
/// and one good_lp constraint per `Constraint`.
///
/// The backend's answer is re-checked against the original constraints, so a
/// numerically wrong assignment comes back as `SolverError` rather than as
/// an optimal lineup.
#[derive(Debug, Clone, Default)]
pub struct GoodLpSolver {
    settings: SolverSettings,
}

impl GoodLpSolver {
    pub fn new(settings: SolverSettings) -> Self {
        GoodLpSolver { settings }
    }
}

impl Solver for GoodLpSolver {
    fn solve(&self, program: &IntegerProgram) -> Solution {
        let started = Instant::now();
        let tolerance = self.settings.tolerance;

        let solution = match self.settings.time_limit {
            None => solve_program(program, tolerance),
            Some(limit) => {
                // The backend has no cancellation hook; past the limit the
                // worker is left to finish on its own and its answer dropped.
                let (tx, rx) = mpsc::channel();
                let owned = program.clone();
                thread::spawn(move || {
                    let _ = tx.send(solve_program(&owned, tolerance));
                });
                match rx.recv_timeout(limit) {
                    Ok(solution) => solution,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        warn!("solve abandoned after {} ms", limit.as_millis());
                        Solution::failed(
                            SolveStatus::SolverError,
                            format!(
                                "time limit of {} ms reached before optimality was proven",
                                limit.as_millis()
                            ),
                        )
                    }
                    Err(mpsc::RecvTimeoutError::Disconnected) => Solution::failed(
                        SolveStatus::SolverError,
                        "solver worker exited without a result",
                    ),
                }
            }
        };

        debug!(
            "solved {} variables / {} constraints in {:?}: {}",
            program.num_variables(),
            program.constraints.len(),
            started.elapsed(),
            solution.status
        );
        solution
    }
}

fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
    let mut out = Expression::with_capacity(expr.terms.len());
    for &(v, coeff) in &expr.terms {
        out.add_mul(coeff, vars[v.0]);
    }
    out
}

fn solve_program(program: &IntegerProgram, tolerance: f64) -> Solution {
    // Rows without variables are settled here and never reach the backend.
    if let Some(row) = program
        .constraints
        .iter()
        .find(|c| c.expr.terms.is_empty() && !c.is_satisfied(&[], tolerance))
    {
        return Solution::failed(
            SolveStatus::Infeasible,
            format!("constraint `{}` cannot be met by any selection", row.name),
        );
    }
    if program.num_variables() == 0 {
        return Solution::optimal(Vec::new(), 0.0);
    }

    let mut vars = variables!();
    let xs: Vec<Variable> = (0..program.num_variables())
        .map(|_| vars.add(variable().binary()))
        .collect();

    let objective = to_expression(&program.objective, &xs);
    let mut problem = vars.maximise(objective).using(default_solver);
    for c in program.constraints.iter().filter(|c| !c.expr.terms.is_empty()) {
        let lhs = to_expression(&c.expr, &xs);
        let row = match c.sense {
            Sense::LessEq => lhs.leq(c.rhs),
            Sense::Eq => lhs.eq(c.rhs),
            Sense::GreaterEq => lhs.geq(c.rhs),
        };
        problem = problem.with(row);
    }

    let solved = match problem.solve() {
        Ok(solved) => solved,
        Err(ResolutionError::Infeasible) => {
            return Solution::failed(
                SolveStatus::Infeasible,
                "no lineup satisfies the constraints",
            );
        }
        Err(ResolutionError::Unbounded) => {
            return Solution::failed(SolveStatus::Unbounded, "objective is unbounded");
        }
        Err(e) => {
            return Solution::failed(SolveStatus::SolverError, format!("solver failure: {e}"));
        }
    };

    let values: Vec<bool> = xs.iter().map(|&x| solved.value(x) > 0.5).collect();
    if let Some(name) = program.first_violation(&values, tolerance) {
        return Solution::failed(
            SolveStatus::SolverError,
            format!("numerical failure: returned assignment violates `{name}`"),
        );
    }
    let objective = program.objective.evaluate(&values);
    Solution::optimal(values, objective)
}
