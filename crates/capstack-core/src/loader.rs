// Player pool loading from the merged salary/projection CSV.
//
// The upstream merge step writes one row per player with the salary-site
// columns, the projection columns and a `_merge` indicator telling whether
// the row was found in both sources.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::player::{MatchStatus, PlayerRecord, Position};
use crate::pool::{PlayerPool, PoolError};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} has no `{column}` column")]
    MissingColumn { path: String, column: &'static str },

    #[error("invalid player pool in {path}: {source}")]
    Pool { path: String, source: PoolError },
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// One row of the merged CSV. Salary and points are read as text so that
/// site formatting ("$7,200") and stray values can be handled per row
/// instead of failing the whole file. Extra columns are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerRow {
    #[serde(alias = "Name", alias = "player", alias = "name")]
    Player: String,
    #[serde(default, alias = "team")]
    Team: String,
    #[serde(alias = "Pos", alias = "position")]
    Position: String,
    #[serde(alias = "salary")]
    Salary: String,
    #[serde(alias = "Proj", alias = "Projected", alias = "points")]
    Points: String,
    #[serde(default, rename = "_merge", alias = "Match")]
    merge: Option<String>,
}

/// Required columns and the header spellings accepted for each. Keep in sync
/// with the serde aliases on `RawPlayerRow`.
const REQUIRED_COLUMNS: [(&str, &[&str]); 5] = [
    ("Player", &["Player", "Name", "player", "name"]),
    ("Team", &["Team", "team"]),
    ("Position", &["Position", "Pos", "position"]),
    ("Salary", &["Salary", "salary"]),
    ("Points", &["Points", "Proj", "Projected", "points"]),
];

const MERGE_COLUMNS: [&str; 2] = ["_merge", "Match"];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a salary written as `7200`, `7,200`, `$7,200` or `7200.0`.
fn parse_salary(s: &str) -> Option<u32> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if let Ok(v) = cleaned.parse::<u32>() {
        return Some(v);
    }
    let v = cleaned.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Some(v as u32)
    } else {
        None
    }
}

fn parse_points(s: &str) -> Option<f64> {
    let v = s.trim().parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

/// Build a record from one row. `has_merge_column` separates a file without
/// an indicator column (every row matched) from a blank indicator cell.
fn record_from_row(raw: RawPlayerRow, has_merge_column: bool) -> Option<PlayerRecord> {
    let name = raw.Player.trim().to_string();
    let Some(position) = Position::from_str_pos(&raw.Position) else {
        warn!("skipping player '{}': unknown position '{}'", name, raw.Position);
        return None;
    };
    let Some(salary) = parse_salary(&raw.Salary) else {
        warn!("skipping player '{}': unparseable salary '{}'", name, raw.Salary);
        return None;
    };
    let Some(projected_points) = parse_points(&raw.Points) else {
        warn!("skipping player '{}': invalid points '{}'", name, raw.Points);
        return None;
    };
    let indicator = match raw.merge.as_deref() {
        Some(value) => value,
        None if has_merge_column => "",
        None => "both",
    };
    let Some(match_status) = MatchStatus::from_indicator(indicator) else {
        warn!("skipping player '{}': unknown merge indicator '{}'", name, indicator);
        return None;
    };
    if name.is_empty() || raw.Team.trim().is_empty() {
        warn!("skipping row with missing name or team");
        return None;
    }

    Some(PlayerRecord {
        name,
        team: raw.Team.trim().to_uppercase(),
        position,
        salary,
        projected_points,
        match_status,
    })
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Which required columns the header row lacks, by canonical name.
fn missing_columns(headers: &csv::StringRecord) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|(_, spellings)| !headers.iter().any(|h| spellings.contains(&h)))
        .map(|(name, _)| *name)
        .collect()
}

fn load_records_from_reader<R: Read>(rdr: R, source: &str) -> Result<Vec<PlayerRecord>, LoaderError> {
    let csv_error = |e: csv::Error| LoaderError::Csv {
        path: source.to_string(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(rdr);
    let headers = reader.headers().map_err(csv_error)?.clone();
    if let Some(column) = missing_columns(&headers).into_iter().next() {
        return Err(LoaderError::MissingColumn {
            path: source.to_string(),
            column,
        });
    }
    let has_merge_column = headers.iter().any(|h| MERGE_COLUMNS.contains(&h));

    let mut records = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => {
                if let Some(record) = record_from_row(raw, has_merge_column) {
                    records.push(record);
                }
            }
            Err(e) if e.is_io_error() => return Err(csv_error(e)),
            Err(e) => {
                warn!("skipping malformed player row: {}", e);
            }
        }
    }
    Ok(records)
}

/// Load a pool from any reader. Exposed for tests and for callers that
/// already hold the CSV in memory.
pub fn load_pool_from_reader<R: Read>(rdr: R, source: &str) -> Result<PlayerPool, LoaderError> {
    let records = load_records_from_reader(rdr, source)?;
    let pool = PlayerPool::new(records).map_err(|e| LoaderError::Pool {
        path: source.to_string(),
        source: e,
    })?;
    info!(
        "loaded {} players from {} ({} matched across sources)",
        pool.len(),
        source,
        pool.matched_count()
    );
    Ok(pool)
}

/// Load a player pool from a merged CSV file.
pub fn load_pool(path: &Path) -> Result<PlayerPool, LoaderError> {
    let file = std::fs::File::open(path).map_err(|e| LoaderError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_pool_from_reader(file, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_csv_roundtrip() {
        let csv_data = "\
Player,Team,Position,Salary,Points,_merge
P. Mahomes II,KC,QB,8000,22.4,both
C. McCaffrey,SF,RB,9200,24.1,both
T. Kelce,KC,TE,7000,15.0,left_only";

        let pool = load_pool_from_reader(csv_data.as_bytes(), "inline").unwrap();
        assert_eq!(pool.len(), 3);
        let players = pool.players();
        assert_eq!(players[0].name, "P. Mahomes II");
        assert_eq!(players[0].team, "KC");
        assert_eq!(players[0].position, Position::Quarterback);
        assert_eq!(players[0].salary, 8000);
        assert!((players[0].projected_points - 22.4).abs() < f64::EPSILON);
        assert_eq!(players[2].match_status, MatchStatus::SalaryOnly);
        assert_eq!(pool.matched_count(), 2);
    }

    #[test]
    fn missing_merge_column_means_matched() {
        let csv_data = "\
Name,Team,Pos,Salary,Proj
J. Allen,BUF,QB,8200,23.0";

        let pool = load_pool_from_reader(csv_data.as_bytes(), "inline").unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.players()[0].match_status, MatchStatus::Both);
    }

    #[test]
    fn salary_formatting_is_stripped() {
        assert_eq!(parse_salary("$7,200"), Some(7200));
        assert_eq!(parse_salary(" 6400 "), Some(6400));
        assert_eq!(parse_salary("5000.0"), Some(5000));
        assert_eq!(parse_salary("5000.5"), None);
        assert_eq!(parse_salary("-100"), None);
        assert_eq!(parse_salary("n/a"), None);
    }

    #[test]
    fn bad_rows_are_skipped() {
        let csv_data = "\
Player,Team,Position,Salary,Points,_merge
Good Player,KC,WR,5000,12.0,both
Bad Position,KC,LB,5000,12.0,both
Bad Salary,KC,WR,lots,12.0,both
Bad Points,KC,WR,5000,NaN,both
Negative Points,KC,WR,5000,-3,both
Bad Merge,KC,WR,5000,12.0,sometimes";

        let pool = load_pool_from_reader(csv_data.as_bytes(), "inline").unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.players()[0].name, "Good Player");
    }

    #[test]
    fn extra_columns_ignored_and_team_uppercased() {
        let csv_data = "\
Player,Team,Position,Salary,Points,Opp,Value,_merge
D. Adams,lv,WR,7400,16.2,KC,2.19,both";

        let pool = load_pool_from_reader(csv_data.as_bytes(), "inline").unwrap();
        assert_eq!(pool.players()[0].team, "LV");
    }

    #[test]
    fn wrong_header_is_an_error() {
        let csv_data = "Foo,Bar,Baz\n1,2,3\n4,5,6\n";
        match load_pool_from_reader(csv_data.as_bytes(), "inline").unwrap_err() {
            LoaderError::MissingColumn { column, .. } => assert_eq!(column, "Player"),
            other => panic!("expected MissingColumn, got: {other}"),
        }
    }

    #[test]
    fn missing_points_column_is_named() {
        let csv_data = "Player,Team,Position,Salary\nA,KC,QB,8000\n";
        match load_pool_from_reader(csv_data.as_bytes(), "inline").unwrap_err() {
            LoaderError::MissingColumn { column, .. } => assert_eq!(column, "Points"),
            other => panic!("expected MissingColumn, got: {other}"),
        }
    }

    #[test]
    fn blank_merge_cell_skips_row() {
        let csv_data = "\
Player,Team,Position,Salary,Points,_merge
Matched,KC,WR,5000,12.0,both
Blank,KC,WR,5000,12.0,
Spaces,KC,WR,5000,12.0,  ";

        let pool = load_pool_from_reader(csv_data.as_bytes(), "inline").unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.players()[0].name, "Matched");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_pool(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
