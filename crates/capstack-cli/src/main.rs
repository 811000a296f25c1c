// capstack entry point.
//
// Startup sequence:
// 1. Parse flags (print usage and exit on --help)
// 2. Initialize tracing (log to file, stdout is reserved for the lineup)
// 3. Load settings, then apply flag overrides
// 4. Load the player pool
// 5. Optimize and print the table or JSON report

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use capstack_cli::args::{self, USAGE};
use capstack_cli::config;
use capstack_cli::report::Report;
use capstack_core::loader;
use capstack_core::solver::GoodLpSolver;

fn main() -> anyhow::Result<()> {
    // 1. Parse flags
    let cli = args::parse_args(std::env::args().skip(1)).context("invalid command line")?;
    if cli.help {
        print!("{USAGE}");
        return Ok(());
    }

    // 2. Initialize tracing
    init_tracing()?;
    info!("capstack starting up");

    // 3. Load settings
    let base_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };
    let mut settings = config::load_settings(&base_dir).context("failed to load configuration")?;
    cli.apply(&mut settings);
    config::validate(&settings).context("invalid settings after applying flags")?;
    info!(
        "Settings loaded: mode={}, budget={}, pool={}",
        settings.contest.mode,
        settings.contest.budget,
        settings.pool_path.display()
    );

    // 4. Load the player pool
    let pool = loader::load_pool(&settings.pool_path)
        .with_context(|| format!("failed to load player pool from {}", settings.pool_path.display()))?;
    info!("Loaded {} players ({} matched)", pool.len(), pool.matched_count());

    // 5. Optimize and print
    let solver = GoodLpSolver::new(settings.solver);
    let result = capstack_core::optimize_with(&pool, &settings.contest, &solver)
        .context("contest configuration rejected")?;

    if cli.json {
        let json = Report::new(&result).to_json().context("failed to serialize report")?;
        println!("{json}");
    } else {
        print!("{result}");
    }

    info!("capstack finished with status {}", result.status);
    Ok(())
}

/// Initialize tracing to log to `logs/capstack.log` under the working directory.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir: PathBuf = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("capstack.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("capstack=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
