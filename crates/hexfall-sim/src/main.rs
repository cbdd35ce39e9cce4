//! # Hexfall Simulator
//!
//! Headless driver for the Hexfall combat core.
//!
//! Loads a scenario from `hexfall.toml` (or the path given as the first
//! argument), runs the encounter on a fixed timestep and prints a JSON
//! report to stdout. `hexfall --init [path]` writes the default scenario.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod report;
mod runner;
mod timing;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{SimConfig, CONFIG_FILE};

/// Write the default scenario instead of running one.
const INIT_FLAG: &str = "--init";

/// Main entry point.
fn main() -> Result<()> {
    // Logs go to stderr so the report on stdout stays parseable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("hexfall=info".parse()?))
        .init();

    info!("Hexfall simulator starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args_os().skip(1).peekable();
    let init = args.next_if(|arg| arg == INIT_FLAG).is_some();
    let path = args
        .next()
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);

    if init {
        SimConfig::default().save_to(&path)?;
        info!("Wrote default scenario to {}", path.display());
        return Ok(());
    }

    let config = SimConfig::load_from(&path);

    let report = runner::run(&config);
    println!("{}", report.to_json()?);

    info!("Hexfall simulator finished");
    Ok(())
}
