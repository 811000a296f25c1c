// Result assembly: solved assignment -> ordered lineup with totals.

use serde::Serialize;
use std::fmt;

use crate::contest::{ContestConfig, ContestMode};
use crate::model::{ConstraintModel, SlotRole};
use crate::player::Position;
use crate::solver::{Solution, SolveStatus};

const DEFAULT_FAILURE: &str = "No valid lineup found with given constraints";

/// A chosen player with effective (post-multiplier) salary and points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedPlayer {
    pub name: String,
    pub team: String,
    pub position: Position,
    pub captain: bool,
    /// Display label, e.g. `WR` or `CPT QB`.
    pub slot: String,
    pub salary: u32,
    pub points: f64,
}

/// The outcome of one optimization. `selected_players` is empty unless
/// `status` is `Optimal`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupResult {
    pub status: SolveStatus,
    pub mode: ContestMode,
    pub budget: i64,
    pub selected_players: Vec<SelectedPlayer>,
    pub total_salary: i64,
    pub total_points: f64,
    pub remaining_budget: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl LineupResult {
    pub fn failure(
        config: &ContestConfig,
        status: SolveStatus,
        message: impl Into<String>,
    ) -> Self {
        LineupResult {
            status,
            mode: config.mode,
            budget: config.budget,
            selected_players: Vec::new(),
            total_salary: 0,
            total_points: 0.0,
            remaining_budget: config.budget,
            error_message: Some(message.into()),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn captain(&self) -> Option<&SelectedPlayer> {
        self.selected_players.iter().find(|p| p.captain)
    }
}

/// Turn a solver result into a lineup.
///
/// Non-optimal statuses are passed through with their message and no players.
/// Otherwise every selected variable becomes an entry; the captain (if any)
/// gets multiplied salary (truncated) and points. Ordering: classic lineups
/// by position (QB, RB, WR, TE, ...) then pool order; showdown lineups
/// captain first, then regulars in pool order.
pub fn assemble(model: &ConstraintModel, solution: &Solution, config: &ContestConfig) -> LineupResult {
    if solution.status != SolveStatus::Optimal {
        let message = solution
            .message
            .clone()
            .unwrap_or_else(|| DEFAULT_FAILURE.to_string());
        return LineupResult::failure(config, solution.status, message);
    }

    let mut chosen: Vec<(usize, SlotRole)> = model
        .decisions
        .iter()
        .zip(&solution.values)
        .filter(|(_, selected)| **selected)
        .map(|(d, _)| (d.candidate, d.role))
        .collect();

    match config.mode {
        ContestMode::Classic => chosen.sort_by_key(|&(i, _)| (model.candidates[i].position.sort_order(), i)),
        ContestMode::Showdown => chosen.sort_by_key(|&(i, role)| (role != SlotRole::Captain, i)),
    }

    let rules = &config.showdown;
    let selected_players: Vec<SelectedPlayer> = chosen
        .into_iter()
        .map(|(i, role)| {
            let p = &model.candidates[i];
            let captain = role == SlotRole::Captain;
            let (salary, points) = if captain {
                (rules.captain_salary(p.salary), rules.captain_points(p.projected_points))
            } else {
                (p.salary, p.projected_points)
            };
            SelectedPlayer {
                name: p.name.clone(),
                team: p.team.clone(),
                position: p.position,
                captain,
                slot: if captain {
                    format!("CPT {}", p.position)
                } else {
                    p.position.to_string()
                },
                salary,
                points,
            }
        })
        .collect();

    let total_salary: i64 = selected_players.iter().map(|p| p.salary as i64).sum();
    let total_points: f64 = selected_players.iter().map(|p| p.points).sum();

    if total_salary > config.budget {
        return LineupResult::failure(
            config,
            SolveStatus::SolverError,
            format!(
                "assembled lineup costs {} which exceeds the budget {}",
                total_salary, config.budget
            ),
        );
    }

    LineupResult {
        status: SolveStatus::Optimal,
        mode: config.mode,
        budget: config.budget,
        selected_players,
        total_salary,
        total_points,
        remaining_budget: config.budget - total_salary,
        error_message: None,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Format an integer with comma thousands separators.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for LineupResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.error_message {
            return writeln!(f, "Error: {message}");
        }

        let rule = "-".repeat(80);
        writeln!(f, "Optimization Status: {}", self.status)?;
        writeln!(f, "Mode: {}", title_case(self.mode.as_str()))?;
        writeln!(f)?;
        writeln!(f, "Total Projected Points: {:.2}", self.total_points)?;
        writeln!(f, "Total Salary: ${}", format_thousands(self.total_salary))?;
        writeln!(f, "Remaining Budget: ${}", format_thousands(self.remaining_budget))?;
        writeln!(f)?;
        writeln!(f, "Optimal Lineup:")?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<10}{:<20}{:<8}{:<12}{:<10}",
            "Position", "Player", "Team", "Salary", "Projected"
        )?;
        writeln!(f, "{rule}")?;
        for p in &self.selected_players {
            writeln!(
                f,
                "{:<10}{:<20}{:<8}${:<11}{:<10.2}",
                p.slot,
                p.name,
                p.team,
                format_thousands(p.salary as i64),
                p.points
            )?;
        }
        writeln!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Decision;
    use crate::player::PlayerRecord;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn model(candidates: Vec<PlayerRecord>, decisions: Vec<Decision>) -> ConstraintModel {
        let mut model = ConstraintModel::new(candidates);
        for d in decisions {
            model.add_decision(d.candidate, d.role);
        }
        model
    }

    fn regular(candidate: usize) -> Decision {
        Decision {
            candidate,
            role: SlotRole::Regular,
        }
    }

    fn captain(candidate: usize) -> Decision {
        Decision {
            candidate,
            role: SlotRole::Captain,
        }
    }

    #[test]
    fn classic_orders_by_position_then_pool_order() {
        let candidates = vec![
            PlayerRecord::new("WR-a", "KC", Position::WideReceiver, 5000, 12.0),
            PlayerRecord::new("TE-a", "KC", Position::TightEnd, 3000, 9.0),
            PlayerRecord::new("RB-a", "KC", Position::RunningBack, 6000, 14.0),
            PlayerRecord::new("QB-a", "KC", Position::Quarterback, 8000, 20.0),
            PlayerRecord::new("WR-b", "KC", Position::WideReceiver, 4000, 10.0),
        ];
        let decisions = (0..5).map(regular).collect();
        let m = model(candidates, decisions);
        let solution = Solution::optimal(vec![true; 5], 65.0);
        let result = assemble(&m, &solution, &ContestConfig::classic(30_000));

        let names: Vec<&str> = result.selected_players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["QB-a", "RB-a", "WR-a", "WR-b", "TE-a"]);
        assert_eq!(result.total_salary, 26_000);
        assert_eq!(result.remaining_budget, 4_000);
        assert!(approx_eq(result.total_points, 65.0, 1e-9));
        assert!(result.error_message.is_none());
    }

    #[test]
    fn showdown_captain_first_with_multiplier() {
        let candidates = vec![
            PlayerRecord::new("A", "KC", Position::Quarterback, 8000, 20.0),
            PlayerRecord::new("B", "KC", Position::RunningBack, 7001, 15.5),
            PlayerRecord::new("C", "KC", Position::WideReceiver, 5000, 12.0),
        ];
        let decisions = vec![regular(0), regular(1), regular(2), captain(0), captain(1), captain(2)];
        let m = model(candidates, decisions);
        // A and C regular, B captain.
        let solution = Solution::optimal(vec![true, false, true, false, true, false], 55.25);
        let result = assemble(&m, &solution, &ContestConfig::showdown(30_000));

        let first = &result.selected_players[0];
        assert_eq!(first.name, "B");
        assert!(first.captain);
        assert_eq!(first.slot, "CPT RB");
        // 7001 * 1.5 = 10501.5, truncated.
        assert_eq!(first.salary, 10_501);
        assert!(approx_eq(first.points, 23.25, 1e-12));
        assert_eq!(result.selected_players[1].name, "A");
        assert_eq!(result.selected_players[2].name, "C");
        assert_eq!(result.total_salary, 10_501 + 8000 + 5000);
        assert_eq!(result.captain().map(|p| p.name.as_str()), Some("B"));
    }

    #[test]
    fn failure_propagates_message_without_players() {
        let m = model(vec![], vec![]);
        let solution = Solution::failed(SolveStatus::Infeasible, "budget too low");
        let result = assemble(&m, &solution, &ContestConfig::classic(1_000));
        assert_eq!(result.status, SolveStatus::Infeasible);
        assert_eq!(result.error_message.as_deref(), Some("budget too low"));
        assert!(result.selected_players.is_empty());
        assert_eq!(result.remaining_budget, 1_000);
    }

    #[test]
    fn over_budget_assignment_is_rejected() {
        let candidates = vec![PlayerRecord::new("A", "KC", Position::Quarterback, 8000, 20.0)];
        let m = model(candidates, vec![regular(0)]);
        let solution = Solution::optimal(vec![true], 20.0);
        let result = assemble(&m, &solution, &ContestConfig::classic(5_000));
        assert_eq!(result.status, SolveStatus::SolverError);
        assert!(result.selected_players.is_empty());
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(50_000), "50,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
        assert_eq!(format_thousands(-2_500), "-2,500");
    }

    #[test]
    fn table_rendering() {
        let candidates = vec![PlayerRecord::new("P. Mahomes II", "KC", Position::Quarterback, 8000, 22.4)];
        let m = model(candidates, vec![regular(0)]);
        let result = assemble(&m, &Solution::optimal(vec![true], 22.4), &ContestConfig::classic(50_000));
        let text = result.to_string();
        assert!(text.contains("Optimization Status: Optimal"));
        assert!(text.contains("Mode: Classic"));
        assert!(text.contains("Total Projected Points: 22.40"));
        assert!(text.contains("Total Salary: $8,000"));
        assert!(text.contains("Remaining Budget: $42,000"));
        assert!(text.contains("QB        P. Mahomes II       KC      $8,000      22.40"));
    }

    #[test]
    fn error_rendering() {
        let result = LineupResult::failure(
            &ContestConfig::classic(50_000),
            SolveStatus::Infeasible,
            "Not enough players",
        );
        assert_eq!(result.to_string(), "Error: Not enough players\n");
    }

    #[test]
    fn serializes_to_json() {
        let candidates = vec![PlayerRecord::new("A", "KC", Position::Quarterback, 8000, 20.0)];
        let m = model(candidates, vec![captain(0)]);
        let result = assemble(&m, &Solution::optimal(vec![true], 30.0), &ContestConfig::showdown(50_000));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "Optimal");
        assert_eq!(json["mode"], "showdown");
        assert_eq!(json["selected_players"][0]["position"], "QB");
        assert_eq!(json["selected_players"][0]["slot"], "CPT QB");
        assert_eq!(json["selected_players"][0]["salary"], 12_000);
        assert!(json.get("error_message").is_none());
    }
}
