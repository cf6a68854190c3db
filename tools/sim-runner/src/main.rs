//! sim-runner: run combat simulations and inspect path geometry.
//!
//! Usage:
//!   sim-runner run --request attack.json --maps assets/maps --out result.json
//!   sim-runner scenario flamethrower --seed 7
//!   sim-runner path --maps assets/maps --map 1 --path 2 --samples 200
//!   sim-runner target-offsets --map-file assets/maps/map1.json --out target_lengths1.json

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use conquest_core::constants::DEFAULT_PATH_SAMPLES;
use conquest_core::state::SimulationRequest;
use conquest_paths::offsets::target_offsets;
use conquest_paths::{MapCatalog, MapDocument};
use conquest_sim::scenario::{build_scenario, ScenarioId};
use conquest_sim::{simulate, SimConfig};

#[derive(Parser)]
#[command(author, version, about = "Conquest combat simulator", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Simulate an attack request against a maps directory
    Run {
        #[arg(long)]
        request: PathBuf,
        /// Directory holding map<id>.json files
        #[arg(long)]
        maps: PathBuf,
        /// JSON SimConfig; missing fields take defaults
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run a built-in demo scenario on the demo path
    Scenario {
        /// flamethrower or gunner
        name: ScenarioId,
        #[arg(long, default_value_t = conquest_core::constants::DEFAULT_SEED)]
        seed: u64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print a resampled path
    Path {
        #[arg(long)]
        maps: PathBuf,
        #[arg(long)]
        map: u32,
        #[arg(long)]
        path: u32,
        #[arg(long, default_value_t = DEFAULT_PATH_SAMPLES)]
        samples: usize,
    },
    /// Precompute building-slot path offsets for one map file
    TargetOffsets {
        #[arg(long)]
        map_file: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr so stdout stays clean JSON output.
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.cmd {
        Cmd::Run {
            request,
            maps,
            config,
            seed,
            out,
        } => cmd_run(&request, &maps, config.as_deref(), seed, out.as_deref()),
        Cmd::Scenario { name, seed, out } => cmd_scenario(name, seed, out.as_deref()),
        Cmd::Path {
            maps,
            map,
            path,
            samples,
        } => cmd_path(&maps, map, path, samples),
        Cmd::TargetOffsets { map_file, out } => cmd_target_offsets(&map_file, out.as_deref()),
    }
}

fn cmd_run(
    request: &Path,
    maps: &Path,
    config: Option<&Path>,
    seed: Option<u64>,
    out: Option<&Path>,
) -> Result<()> {
    let request: SimulationRequest = read_json(request)?;
    let mut config: SimConfig = match config {
        Some(path) => read_json(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }

    let catalog = MapCatalog::load_dir(maps)
        .with_context(|| format!("load maps from {}", maps.display()))?;
    let result = simulate(config, &request, &catalog).context("simulation rejected")?;
    write_json(&result, out)
}

fn cmd_scenario(id: ScenarioId, seed: u64, out: Option<&Path>) -> Result<()> {
    info!(scenario = %id, seed, "running scenario");
    let result = build_scenario(id, seed)
        .run()
        .with_context(|| format!("scenario {id}"))?;
    write_json(&result, out)
}

fn cmd_path(maps: &Path, map: u32, path: u32, samples: usize) -> Result<()> {
    let catalog = MapCatalog::load_dir(maps)
        .with_context(|| format!("load maps from {}", maps.display()))?;
    let data = catalog
        .path_data(map, path, samples)
        .with_context(|| format!("resample path {path} of map {map}"))?;
    info!(map, path, length = data.length, points = data.points.len(), "path resampled");
    write_json(&data, None)
}

fn cmd_target_offsets(map_file: &Path, out: Option<&Path>) -> Result<()> {
    let map = MapDocument::load(map_file)?;
    let table = target_offsets(&map)
        .with_context(|| format!("offsets for {}", map_file.display()))?;
    info!(slots = table.len(), "target offsets computed");
    write_json(&table, out)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
}

/// Pretty-print to `out`, or to stdout when no file is given.
fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    match out {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
            info!(file = %path.display(), "output written");
        }
        None => println!("{text}"),
    }
    Ok(())
}
