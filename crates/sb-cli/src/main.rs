//! `sbctl`: inspect and validate saved Scenario Board files.

mod report;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use sb_core::config::BoardConfig;
use sb_core::routing::RoutePolicy;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sbctl", version, about = "Check and inspect Scenario Board files")]
struct Cli {
    /// Board config JSON file (canvas size, route policy, standoff)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a scenario and report lint findings. Exits 1 on any warning.
    Check { file: PathBuf },
    /// Print the title and a per-tab summary.
    Info { file: PathBuf },
    /// Print the SVG path data of every connection.
    Routes {
        file: PathBuf,
        /// Only this tab
        #[arg(long)]
        tab: Option<u32>,
        /// Override the configured route policy
        #[arg(long, value_parser = parse_policy)]
        policy: Option<RoutePolicy>,
    },
}

fn parse_policy(token: &str) -> Result<RoutePolicy, String> {
    RoutePolicy::from_token(token)
        .ok_or_else(|| format!("unknown policy `{token}` (expected straight, elbow, or curved)"))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the command ran but found problems.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Check { file } => {
            let (text, clean) = report::check(&read(&file)?);
            print!("{text}");
            Ok(clean)
        }
        Command::Info { file } => {
            let scenario = sb_core::codec::from_json(&read(&file)?)
                .with_context(|| format!("failed to load {}", file.display()))?;
            print!("{}", report::info(&scenario));
            Ok(true)
        }
        Command::Routes { file, tab, policy } => {
            let scenario = sb_core::codec::from_json(&read(&file)?)
                .with_context(|| format!("failed to load {}", file.display()))?;
            let mut router = config.router();
            if let Some(policy) = policy {
                router.policy = policy;
            }
            let tab = tab.map(sb_core::TabId);
            if let Some(id) = tab
                && scenario.tab(id).is_none()
            {
                bail!("{id} not found in {}", file.display());
            }
            print!("{}", report::routes(&scenario, &router, tab));
            Ok(true)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<BoardConfig> {
    let Some(path) = path else {
        return Ok(BoardConfig::default());
    };
    let text = read(path)?;
    BoardConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}
