// 0/1 integer program interface and the exact solver behind it.
//
// The model builder produces an `IntegerProgram`; anything implementing
// `Solver` can turn it into a `Solution`. The result assembler only ever
// sees the `Solution`, so the backend can be swapped freely.

pub mod milp;

use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub use milp::GoodLpSolver;

// ---------------------------------------------------------------------------
// Problem description
// ---------------------------------------------------------------------------

/// Index of a binary decision variable within an `IntegerProgram`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

/// A linear combination of decision variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        LinearExpr::default()
    }

    pub fn add(&mut self, var: VarId, coeff: f64) {
        if coeff != 0.0 {
            self.terms.push((var, coeff));
        }
    }

    /// Sum of the variables, each with coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        LinearExpr {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    pub fn evaluate(&self, values: &[bool]) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| values[v.0])
            .map(|(_, c)| c)
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    LessEq,
    Eq,
    GreaterEq,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sense::LessEq => "<=",
            Sense::Eq => "==",
            Sense::GreaterEq => ">=",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    pub fn new(name: impl Into<String>, expr: LinearExpr, sense: Sense, rhs: f64) -> Self {
        Constraint {
            name: name.into(),
            expr,
            sense,
            rhs,
        }
    }

    /// Whether the assignment satisfies this constraint within `tol`.
    pub fn is_satisfied(&self, values: &[bool], tol: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.sense {
            Sense::LessEq => lhs <= self.rhs + tol,
            Sense::Eq => (lhs - self.rhs).abs() <= tol,
            Sense::GreaterEq => lhs >= self.rhs - tol,
        }
    }
}

/// A maximization problem over binary variables.
#[derive(Debug, Clone, Default)]
pub struct IntegerProgram {
    /// Variable names, indexed by `VarId`.
    pub variables: Vec<String>,
    pub objective: LinearExpr,
    pub constraints: Vec<Constraint>,
}

impl IntegerProgram {
    pub fn new() -> Self {
        IntegerProgram::default()
    }

    pub fn add_variable(&mut self, name: impl Into<String>) -> VarId {
        self.variables.push(name.into());
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Dense objective coefficients, one per variable.
    pub fn objective_coefficients(&self) -> Vec<f64> {
        let mut c = vec![0.0; self.variables.len()];
        for &(v, coeff) in &self.objective.terms {
            c[v.0] += coeff;
        }
        c
    }

    /// Name of the first constraint violated by `values`, if any.
    pub fn first_violation(&self, values: &[bool], tol: f64) -> Option<&str> {
        self.constraints
            .iter()
            .find(|c| !c.is_satisfied(values, tol))
            .map(|c| c.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Solution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    SolverError,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::SolverError => "SolverError",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolveStatus,
    /// One value per variable. Only meaningful when `status` is `Optimal`.
    pub values: Vec<bool>,
    pub objective: f64,
    /// Why the solve did not reach `Optimal`.
    pub message: Option<String>,
}

impl Solution {
    pub fn optimal(values: Vec<bool>, objective: f64) -> Self {
        Solution {
            status: SolveStatus::Optimal,
            values,
            objective,
            message: None,
        }
    }

    pub fn failed(status: SolveStatus, message: impl Into<String>) -> Self {
        Solution {
            status,
            values: Vec::new(),
            objective: 0.0,
            message: Some(message.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Solver trait and settings
// ---------------------------------------------------------------------------

/// Solves an `IntegerProgram` to global optimality or reports why it could not.
pub trait Solver {
    fn solve(&self, program: &IntegerProgram) -> Solution;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Wall-clock budget for one solve. `None` means unlimited.
    pub time_limit: Option<Duration>,
    /// Slack allowed when re-checking the returned assignment.
    pub tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            time_limit: None,
            tolerance: 1e-6,
        }
    }
}
