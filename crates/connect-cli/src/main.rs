//! Connection point resolver CLI
//!
//! Ranks the candidate attachment points for a belt or pipe link, either for
//! a scenario described in a JSON file or for entities in a running game
//! reached over RCON. Results go to stdout as JSON; logs go to stderr.

mod endpoint;
mod scenario;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use connect_core::Position;
use connect_resolver::ConnectionKind;
use endpoint::{EndpointSpec, parse_point};
use factorio_bridge::{FactorioConfig, FactorioWorld};
use scenario::{Report, Scenario};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "connect-resolve",
    version,
    about = "Rank belt and pipe connection points between Factorio entities"
)]
struct Args {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Resolve a JSON scenario file
    Scenario {
        /// Path to the scenario
        file: PathBuf,
    },
    /// Resolve entities in a running game over RCON
    Live {
        /// Connection medium: belt or pipe
        #[arg(long)]
        kind: ConnectionKind,
        /// Source endpoint: entity:<unit>, group:<unit> or pos:<x>,<y>
        #[arg(long)]
        source: EndpointSpec,
        /// Target endpoint: entity:<unit>, group:<unit> or pos:<x>,<y>
        #[arg(long)]
        target: EndpointSpec,
        /// Centre of the snapshot area
        #[arg(long, default_value = "0,0", value_parser = parse_center)]
        center: Position,
        /// Snapshot radius in tiles
        #[arg(long, default_value_t = 64.0)]
        radius: f64,
        /// RCON address, overrides FACTORIO_RCON_ADDR
        #[arg(long)]
        rcon_address: Option<String>,
        /// RCON password, overrides FACTORIO_RCON_PASSWORD
        #[arg(long)]
        rcon_password: Option<String>,
    },
}

fn parse_center(s: &str) -> std::result::Result<Position, String> {
    parse_point(s).map_err(|e| e.to_string())
}

fn run_scenario(file: &Path) -> Result<Report> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read scenario {}", file.display()))?;
    let scenario = Scenario::from_json(&json)
        .with_context(|| format!("Invalid scenario {}", file.display()))?;
    Ok(scenario.resolve()?)
}

async fn run_live(
    kind: ConnectionKind,
    source: &EndpointSpec,
    target: &EndpointSpec,
    center: Position,
    radius: f64,
    config: FactorioConfig,
) -> Result<Report> {
    let mut world = FactorioWorld::with_config(config);
    world.connect().await?;

    let snapshot = world.snapshot(center, radius).await;
    world.disconnect().await;
    let snapshot = snapshot?;
    info!("Snapshot holds {} entities", snapshot.len());

    let source = source.resolve(&snapshot).context("Failed to resolve source")?;
    let target = target.resolve(&snapshot).context("Failed to resolve target")?;
    Ok(Report::build(kind, &snapshot, &source, &target)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs to stderr, stdout carries the JSON report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let report = match args.mode {
        Mode::Scenario { file } => run_scenario(&file)?,
        Mode::Live {
            kind,
            source,
            target,
            center,
            radius,
            rcon_address,
            rcon_password,
        } => {
            let mut config = FactorioConfig::from_env();
            if let Some(address) = rcon_address {
                config.rcon_address = address;
            }
            if let Some(password) = rcon_password {
                config.rcon_password = password;
            }
            run_live(kind, &source, &target, center, radius, config).await?
        }
    };

    info!("Resolved {} candidate pairs", report.pairs.len());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
