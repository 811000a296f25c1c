// JSON report envelope for --json output.

use chrono::{DateTime, Utc};
use serde::Serialize;

use capstack_core::{ContestMode, LineupResult};

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub mode: ContestMode,
    pub budget: i64,
    pub result: &'a LineupResult,
}

impl<'a> Report<'a> {
    pub fn new(result: &'a LineupResult) -> Self {
        Report {
            generated_at: Utc::now(),
            mode: result.mode,
            budget: result.budget,
            result,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
