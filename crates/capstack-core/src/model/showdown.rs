// Showdown (captain) contest model.
//
// Each candidate gets two variables: "regular" and "captain". The captain
// slot multiplies points and salary, and a per-player row keeps the same
// person from filling both slots. The cap row charges the unrounded captain
// salary; rounding only happens when the lineup is reported.

use tracing::debug;

use super::{BuildOutcome, ConstraintModel, ModelBuilder, SlotRole};
use crate::contest::ShowdownRules;
use crate::player::PlayerRecord;
use crate::solver::{Constraint, LinearExpr, Sense, VarId};

pub struct ShowdownModel<'a> {
    rules: &'a ShowdownRules,
    budget: i64,
}

impl<'a> ShowdownModel<'a> {
    pub fn new(rules: &'a ShowdownRules, budget: i64) -> Self {
        ShowdownModel { rules, budget }
    }
}

impl ModelBuilder for ShowdownModel<'_> {
    fn build(&self, candidates: Vec<PlayerRecord>) -> BuildOutcome {
        let mut model = ConstraintModel::new(candidates);
        let count = model.candidates.len();
        let regulars: Vec<VarId> = (0..count)
            .map(|i| model.add_decision(i, SlotRole::Regular))
            .collect();
        let captains: Vec<VarId> = (0..count)
            .map(|i| model.add_decision(i, SlotRole::Captain))
            .collect();

        let mut salary = LinearExpr::new();
        for (i, p) in model.candidates.iter().enumerate() {
            model
                .program
                .objective
                .add(captains[i], self.rules.captain_points(p.projected_points));
            model.program.objective.add(regulars[i], p.projected_points);
            salary.add(captains[i], self.rules.captain_salary_cost(p.salary));
            salary.add(regulars[i], p.salary as f64);
        }

        model.program.add_constraint(Constraint::new(
            "salary_cap",
            salary,
            Sense::LessEq,
            self.budget as f64,
        ));
        model.program.add_constraint(Constraint::new(
            "one_captain",
            LinearExpr::sum(captains.iter().copied()),
            Sense::Eq,
            1.0,
        ));
        model.program.add_constraint(Constraint::new(
            "regular_slots",
            LinearExpr::sum(regulars.iter().copied()),
            Sense::Eq,
            self.rules.regular_slots as f64,
        ));
        for i in 0..count {
            model.program.add_constraint(Constraint::new(
                format!("single_slot_{i}"),
                LinearExpr::sum([captains[i], regulars[i]]),
                Sense::LessEq,
                1.0,
            ));
        }

        debug!(
            "showdown model: {} variables, {} constraints",
            model.program.num_variables(),
            model.program.constraints.len()
        );
        BuildOutcome::Ready(model)
    }
}
