// Command-line flags and how they override file settings.

use std::path::PathBuf;
use thiserror::Error;

use capstack_core::ContestMode;

use crate::config::Settings;

pub const USAGE: &str = "\
Usage: capstack [OPTIONS]

Options:
  --config-dir <DIR>   Directory holding config/ and defaults/ (default: current dir)
  --pool <FILE>        Merged salary/projection CSV (overrides [data] pool)
  --mode <MODE>        classic | showdown | captain
  --budget <N>         Salary cap in whole dollars
  --team <CODE>        Restrict to a team; repeat for several teams
  --exclude <NAME>     Drop a player by name; repeat for several players
  --json               Print a JSON report instead of the table
  --help               Show this message
";

#[derive(Debug, Error, PartialEq)]
pub enum ArgsError {
    #[error("missing value for {flag}")]
    MissingValue { flag: String },

    #[error("invalid {flag} value '{value}': {message}")]
    InvalidValue {
        flag: String,
        value: String,
        message: String,
    },

    #[error("unknown argument: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub config_dir: Option<PathBuf>,
    pub pool: Option<PathBuf>,
    pub mode: Option<ContestMode>,
    pub budget: Option<i64>,
    pub teams: Vec<String>,
    pub exclude: Vec<String>,
    pub json: bool,
    pub help: bool,
}

/// Parse flags, not including the program name.
pub fn parse_args<I>(args: I) -> Result<CliArgs, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config-dir" => parsed.config_dir = Some(PathBuf::from(value(&arg, args.next())?)),
            "--pool" => parsed.pool = Some(PathBuf::from(value(&arg, args.next())?)),
            "--mode" => {
                let raw = value(&arg, args.next())?;
                let mode = ContestMode::parse(&raw).map_err(|e| invalid(&arg, &raw, e.to_string()))?;
                parsed.mode = Some(mode);
            }
            "--budget" => {
                let raw = value(&arg, args.next())?;
                let budget = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| invalid(&arg, &raw, e.to_string()))?;
                parsed.budget = Some(budget);
            }
            "--team" => parsed.teams.push(value(&arg, args.next())?),
            "--exclude" => parsed.exclude.push(value(&arg, args.next())?),
            "--json" => parsed.json = true,
            "--help" | "-h" => parsed.help = true,
            _ => return Err(ArgsError::Unknown(arg)),
        }
    }

    Ok(parsed)
}

fn value(flag: &str, next: Option<String>) -> Result<String, ArgsError> {
    match next {
        Some(v) if !v.starts_with("--") => Ok(v),
        _ => Err(ArgsError::MissingValue {
            flag: flag.to_string(),
        }),
    }
}

fn invalid(flag: &str, value: &str, message: String) -> ArgsError {
    ArgsError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
        message,
    }
}

impl CliArgs {
    /// Apply flags on top of file settings. Team and exclusion flags replace
    /// the file lists rather than extending them.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(pool) = &self.pool {
            settings.pool_path = pool.clone();
        }
        if let Some(mode) = self.mode {
            settings.contest.mode = mode;
        }
        if let Some(budget) = self.budget {
            settings.contest.budget = budget;
        }
        if !self.teams.is_empty() {
            settings.contest = settings.contest.clone().with_teams(&self.teams);
        }
        if !self.exclude.is_empty() {
            settings.contest.excluded_players = self.exclude.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstack_core::{ContestConfig, SolverSettings};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn settings() -> Settings {
        Settings {
            contest: ContestConfig::classic(50_000).with_teams(["KC"]),
            solver: SolverSettings::default(),
            pool_path: PathBuf::from("data/pool.csv"),
        }
    }

    #[test]
    fn empty_args_are_defaults() {
        assert_eq!(parse_args(Vec::new()).unwrap(), CliArgs::default());
    }

    #[test]
    fn parses_every_flag() {
        let parsed = parse_args(args(&[
            "--config-dir",
            "/etc/capstack",
            "--pool",
            "week1.csv",
            "--mode",
            "Captain",
            "--budget",
            "60000",
            "--team",
            "kc",
            "--team",
            "SF",
            "--exclude",
            "T. Kelce",
            "--json",
        ]))
        .unwrap();
        assert_eq!(parsed.config_dir, Some(PathBuf::from("/etc/capstack")));
        assert_eq!(parsed.pool, Some(PathBuf::from("week1.csv")));
        assert_eq!(parsed.mode, Some(ContestMode::Showdown));
        assert_eq!(parsed.budget, Some(60_000));
        assert_eq!(parsed.teams, vec!["kc", "SF"]);
        assert_eq!(parsed.exclude, vec!["T. Kelce"]);
        assert!(parsed.json);
        assert!(!parsed.help);
    }

    #[test]
    fn missing_value_is_an_error() {
        assert_eq!(
            parse_args(args(&["--budget"])),
            Err(ArgsError::MissingValue {
                flag: "--budget".into()
            })
        );
        assert_eq!(
            parse_args(args(&["--pool", "--json"])),
            Err(ArgsError::MissingValue {
                flag: "--pool".into()
            })
        );
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(matches!(
            parse_args(args(&["--budget", "lots"])),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_args(args(&["--mode", "tiers"])),
            Err(ArgsError::InvalidValue { .. })
        ));
        assert_eq!(
            parse_args(args(&["--verbose"])),
            Err(ArgsError::Unknown("--verbose".into()))
        );
    }

    #[test]
    fn flags_override_settings() {
        let mut s = settings();
        let parsed = parse_args(args(&[
            "--mode", "showdown", "--budget", "45000", "--team", "sf", "--exclude", "B. Purdy",
        ]))
        .unwrap();
        parsed.apply(&mut s);
        assert_eq!(s.contest.mode, ContestMode::Showdown);
        assert_eq!(s.contest.budget, 45_000);
        assert_eq!(s.contest.team_filter.iter().collect::<Vec<_>>(), vec!["SF"]);
        assert_eq!(s.contest.excluded_players, vec!["B. Purdy".to_string()]);
        assert_eq!(s.pool_path, PathBuf::from("data/pool.csv"));
    }

    #[test]
    fn no_flags_leave_settings_alone() {
        let mut s = settings();
        CliArgs::default().apply(&mut s);
        assert_eq!(s.contest, settings().contest);
    }
}
