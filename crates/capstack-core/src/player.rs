// Player records and football positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Football positions that appear in DFS salary files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DST")]
    Defense,
}

impl Position {
    /// Every position, in lineup display order.
    pub const ALL: [Position; 6] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::Defense,
    ];

    /// Parse a position string into a Position enum.
    ///
    /// Handles the abbreviations used by the major DFS sites:
    /// - "QB", "RB", "WR", "TE"
    /// - "K" / "PK" -> Kicker
    /// - "DST" / "D/ST" / "DEF" / "D" -> Defense
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "D/ST" | "DEF" | "D" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
        }
    }

    /// Deterministic ordering index for classic lineup display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Kicker => 4,
            Position::Defense => 5,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Outcome of reconciling a player between the salary feed and the
/// projection feed. Only `Both` records are eligible for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Both,
    SalaryOnly,
    ProjectionOnly,
}

impl MatchStatus {
    /// Parse the merge indicator written by the upstream join
    /// (`both`, `left_only`, `right_only`).
    pub fn from_indicator(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "both" => Some(MatchStatus::Both),
            "left_only" | "salary_only" => Some(MatchStatus::SalaryOnly),
            "right_only" | "projection_only" => Some(MatchStatus::ProjectionOnly),
            _ => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchStatus::Both)
    }
}

/// One candidate player in a contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub team: String,
    pub position: Position,
    pub salary: u32,
    pub projected_points: f64,
    #[serde(default)]
    pub match_status: MatchStatus,
}

impl PlayerRecord {
    /// Convenience constructor for a fully reconciled record.
    pub fn new(name: &str, team: &str, position: Position, salary: u32, projected_points: f64) -> Self {
        PlayerRecord {
            name: name.to_string(),
            team: team.to_string(),
            position,
            salary,
            projected_points,
            match_status: MatchStatus::Both,
        }
    }

    /// Identity used for pool deduplication: upper-cased name, team, position.
    pub fn identity(&self) -> (String, String, Position) {
        (self.name.to_uppercase(), self.team.to_uppercase(), self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_site_aliases() {
        assert_eq!(Position::from_str_pos("qb"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos(" WR "), Some(Position::WideReceiver));
        assert_eq!(Position::from_str_pos("D/ST"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("DEF"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("PK"), Some(Position::Kicker));
        assert_eq!(Position::from_str_pos("LB"), None);
    }

    #[test]
    fn display_matches_parse() {
        for pos in Position::ALL {
            assert_eq!(Position::from_str_pos(pos.display_str()), Some(pos));
        }
    }

    #[test]
    fn sort_order_is_qb_rb_wr_te() {
        let mut positions = vec![
            Position::TightEnd,
            Position::WideReceiver,
            Position::Quarterback,
            Position::RunningBack,
        ];
        positions.sort_by_key(|p| p.sort_order());
        assert_eq!(
            positions,
            vec![
                Position::Quarterback,
                Position::RunningBack,
                Position::WideReceiver,
                Position::TightEnd,
            ]
        );
    }

    #[test]
    fn merge_indicator_parsing() {
        assert_eq!(MatchStatus::from_indicator("both"), Some(MatchStatus::Both));
        assert_eq!(MatchStatus::from_indicator("left_only"), Some(MatchStatus::SalaryOnly));
        assert_eq!(MatchStatus::from_indicator("RIGHT_ONLY"), Some(MatchStatus::ProjectionOnly));
        assert_eq!(MatchStatus::from_indicator("maybe"), None);
        assert_eq!(MatchStatus::from_indicator("  "), None);
        assert!(MatchStatus::Both.is_matched());
        assert!(!MatchStatus::SalaryOnly.is_matched());
    }

    #[test]
    fn identity_ignores_name_case() {
        let a = PlayerRecord::new("P. Mahomes II", "KC", Position::Quarterback, 8000, 22.0);
        let b = PlayerRecord::new("p. mahomes ii", "kc", Position::Quarterback, 8100, 21.0);
        assert_eq!(a.identity(), b.identity());
    }
}
