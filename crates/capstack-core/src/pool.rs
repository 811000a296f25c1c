// Validated, immutable player pool for a single contest snapshot.

use serde::Serialize;
use thiserror::Error;

use crate::player::PlayerRecord;

#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    #[error("player at row {row}: field `{field}` {message}")]
    InvalidRecord {
        row: usize,
        field: &'static str,
        message: String,
    },
}

/// Candidate players for one contest. Validation happens once, here, so the
/// model builder can trust every field it reads.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerPool {
    players: Vec<PlayerRecord>,
}

impl PlayerPool {
    /// Build a pool, rejecting records with an empty name or team or with
    /// projected points that are negative or non-finite.
    pub fn new(players: Vec<PlayerRecord>) -> Result<Self, PoolError> {
        for (row, p) in players.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(PoolError::InvalidRecord {
                    row,
                    field: "name",
                    message: "must not be empty".into(),
                });
            }
            if p.team.trim().is_empty() {
                return Err(PoolError::InvalidRecord {
                    row,
                    field: "team",
                    message: format!("must not be empty (player '{}')", p.name),
                });
            }
            if !p.projected_points.is_finite() || p.projected_points < 0.0 {
                return Err(PoolError::InvalidRecord {
                    row,
                    field: "projected_points",
                    message: format!(
                        "must be finite and non-negative, got {} (player '{}')",
                        p.projected_points, p.name
                    ),
                });
            }
        }
        Ok(PlayerPool { players })
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of records that were reconciled across both upstream feeds.
    pub fn matched_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.match_status.is_matched())
            .count()
    }
}
