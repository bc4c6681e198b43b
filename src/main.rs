use anyhow::{Context, Result};
use clap::Parser;
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

use stint_analyzer::config::AnalyzerConfig;
use stint_analyzer::{analyze, AnalysisRequest, LapMetric, SessionData, StintStrategy};

/// Stint, gap and driver comparison analysis for a loaded session.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Session JSON (key, event name, drivers, laps)
    #[arg(long, env = "SESSION_PATH")]
    session: PathBuf,

    /// Analyzer config JSON
    #[arg(long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Driver code to analyze; repeat for several drivers
    #[arg(short, long = "driver")]
    drivers: Vec<String>,

    /// lap_time, speed, sector1_time, sector2_time or sector3_time
    #[arg(long)]
    metric: Option<LapMetric>,

    /// compound or pit_time
    #[arg(long)]
    strategy: Option<StintStrategy>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };

    let session_txt = fs::read_to_string(&cli.session)
        .with_context(|| format!("failed to read session at {}", cli.session.display()))?;
    let session: SessionData =
        serde_json::from_str(&session_txt).with_context(|| "failed to parse session JSON")?;

    let request = AnalysisRequest {
        drivers: if cli.drivers.is_empty() { cfg.drivers } else { cli.drivers },
        metric: cli.metric.unwrap_or(cfg.metric),
        strategy: cli.strategy.or(cfg.stint_strategy),
    };

    let report = analyze(&session, &request)?;
    if !report.missing_drivers.is_empty() {
        tracing::warn!("no data for {:?}", report.missing_drivers);
    }
    tracing::info!(
        stints = report.drivers.iter().map(|d| d.stints.len()).sum::<usize>(),
        gap_rows = report.gaps.len(),
        "analysis done"
    );

    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", out);
    Ok(())
}
