// Library root: salary-cap lineup optimization for classic and showdown
// DFS contests.

pub mod contest;
pub mod lineup;
pub mod loader;
pub mod model;
pub mod optimize;
pub mod player;
pub mod pool;
pub mod solver;

pub use contest::{ConfigError, ContestConfig, ContestMode};
pub use lineup::{LineupResult, SelectedPlayer};
pub use optimize::{optimize, optimize_with};
pub use player::{PlayerRecord, Position};
pub use pool::PlayerPool;
pub use solver::{SolveStatus, Solver, SolverSettings};
