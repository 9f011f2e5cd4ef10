//! Command line host for a peak report run.
//!
//! Supplies the window and mode, prints the JSON report (or nothing, for a
//! malformed window) and maps run-level failures to a failing exit status.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{Mode, PeakConfig};
use crate::pipeline::{RunRequest, run};

/// Peak utilization per fiber node over a time window.
#[derive(Debug, Parser)]
#[command(name = "fiber_node_peaks", about)]
pub struct Cli {
    /// Window start, MM/DD/YYYY HH:MM:SS.
    #[arg(long)]
    pub start: String,

    /// Window end, MM/DD/YYYY HH:MM:SS.
    #[arg(long)]
    pub end: String,

    /// Read the upstream families (US_PEAK / OFDMA_PEAK) instead of downstream.
    #[arg(long)]
    pub upstream: bool,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root directory holding the category directories. Overrides the config file.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Scan day directories in parallel.
    #[arg(long)]
    pub parallel: bool,

    /// Fail on malformed timestamps instead of producing no output.
    #[arg(long)]
    pub strict_timestamps: bool,

    /// Write the JSON report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pub pretty: bool,

    /// Logging verbosity level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Builds the effective configuration: file values, then flag overrides.
    pub fn resolve_config(&self) -> Result<PeakConfig> {
        let mut config = match &self.config {
            Some(path) => PeakConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => PeakConfig::default(),
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        config.parallel |= self.parallel;
        config.strict_timestamps |= self.strict_timestamps;

        Ok(config)
    }

    pub fn request(&self) -> RunRequest {
        RunRequest {
            start: self.start.clone(),
            end: self.end.clone(),
            mode: Mode::from_flag(!self.upstream),
        }
    }
}

/// Entry point of the `fiber_node_peaks` binary.
pub fn fiber_node_peaks_main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the report.
    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("invalid log level: {}", cli.log_level))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = cli.resolve_config()?;
    let Some(report) = run(&config, &cli.request()).context("peak report run failed")? else {
        return Ok(());
    };

    let json = report.to_json(cli.pretty)?;
    match &cli.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}
