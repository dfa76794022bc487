use anyhow::Context;
use clap::Parser;
use nexuscore::auth::{FileSessionStore, MemorySessionStore};
use scenario::config::ScenarioConfig;
use scenario::runner::{Runner, ScenarioReport};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::runtime::Builder as TokioBuilder;

mod scenario;

#[derive(Parser)]
#[command(author, version, about = "Headless driver for the simulated sonar console")]
struct Args {
    /// Load a scenario from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Override the number of sweep scheduler ticks
    #[arg(long)]
    ticks: Option<u32>,
    /// Override the echo generator seed
    #[arg(long)]
    seed: Option<u64>,
    /// Persist the session record to this file instead of memory
    #[arg(long)]
    session: Option<PathBuf>,
    /// Append the JSON session report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig::default()
    };
    if let Some(ticks) = args.ticks {
        config.sweep_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let runner = Runner::new(config);
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating scenario runtime")?;

    let report = match args.session {
        Some(path) => runtime.block_on(runner.run(FileSessionStore::new(path)))?,
        None => runtime.block_on(runner.run(MemorySessionStore::new()))?,
    };

    println!(
        "Session complete -> sweeps {}, points {} spawned / {} expired, rejected toggles {}, final phase {:?}",
        report.sweeps_completed,
        report.points_spawned,
        report.points_expired,
        report.toggles_rejected,
        report.final_phase
    );

    if let Some(path) = args.report {
        append_report(&path, &report)?;
    }

    Ok(())
}

fn append_report(path: &Path, report: &ScenarioReport) -> anyhow::Result<()> {
    let line = serde_json::to_string(report).context("serializing session report")?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report file {}", path.display()))?;
    writeln!(file, "{line}")?;
    Ok(())
}
