// Classic contest model: one binary "selected" variable per candidate.

use tracing::{debug, info};

use super::{BuildOutcome, ConstraintModel, ModelBuilder, SlotRole};
use crate::contest::ClassicRules;
use crate::player::{PlayerRecord, Position};
use crate::solver::{Constraint, LinearExpr, Sense, VarId};

pub struct ClassicModel<'a> {
    rules: &'a ClassicRules,
    budget: i64,
}

impl<'a> ClassicModel<'a> {
    pub fn new(rules: &'a ClassicRules, budget: i64) -> Self {
        ClassicModel { rules, budget }
    }

    /// Check every position floor against the candidate counts. Returns a
    /// message naming the first unmet quota.
    pub fn precheck(&self, candidates: &[PlayerRecord]) -> Result<(), String> {
        for quota in &self.rules.quotas {
            let available = candidates
                .iter()
                .filter(|p| p.position == quota.position)
                .count();
            if (available as u32) < quota.min {
                return Err(format!(
                    "Not enough players available to create a valid lineup after applying filters: \
                     need at least {} {}, found {}",
                    quota.min, quota.position, available
                ));
            }
        }
        Ok(())
    }
}

impl ModelBuilder for ClassicModel<'_> {
    fn build(&self, candidates: Vec<PlayerRecord>) -> BuildOutcome {
        if let Err(reason) = self.precheck(&candidates) {
            info!("classic precheck failed: {}", reason);
            return BuildOutcome::Infeasible(reason);
        }

        let mut model = ConstraintModel::new(candidates);
        let vars: Vec<VarId> = (0..model.candidates.len())
            .map(|i| model.add_decision(i, SlotRole::Regular))
            .collect();

        // Objective: maximize projected points.
        let mut salary = LinearExpr::new();
        for (&v, p) in vars.iter().zip(&model.candidates) {
            model.program.objective.add(v, p.projected_points);
            salary.add(v, p.salary as f64);
        }

        model.program.add_constraint(Constraint::new(
            "salary_cap",
            salary,
            Sense::LessEq,
            self.budget as f64,
        ));

        for position in Position::ALL {
            let members: Vec<VarId> = vars
                .iter()
                .zip(&model.candidates)
                .filter(|(_, p)| p.position == position)
                .map(|(&v, _)| v)
                .collect();
            let min = self.rules.quota_for(position).map_or(0, |q| q.min);
            let cap = self.rules.cap_for(position);

            if members.is_empty() {
                continue;
            }

            let name = position.display_str().to_lowercase();
            if cap == Some(min) {
                model.program.add_constraint(Constraint::new(
                    format!("{name}_exact"),
                    LinearExpr::sum(members),
                    Sense::Eq,
                    min as f64,
                ));
                continue;
            }
            if min > 0 {
                model.program.add_constraint(Constraint::new(
                    format!("{name}_min"),
                    LinearExpr::sum(members.clone()),
                    Sense::GreaterEq,
                    min as f64,
                ));
            }
            if let Some(cap) = cap {
                model.program.add_constraint(Constraint::new(
                    format!("{name}_max"),
                    LinearExpr::sum(members),
                    Sense::LessEq,
                    cap as f64,
                ));
            }
        }

        model.program.add_constraint(Constraint::new(
            "roster_size",
            LinearExpr::sum(vars.iter().copied()),
            Sense::LessEq,
            self.rules.max_roster as f64,
        ));

        debug!(
            "classic model: {} variables, {} constraints",
            model.program.num_variables(),
            model.program.constraints.len()
        );
        BuildOutcome::Ready(model)
    }
}
